//! Placement of slide content on the page.
//!
//! Each [`Slide`] is lowered to a list of rectangles and text boxes with
//! explicit geometry, fonts and colors. Positions are in EMU on a 10 in ×
//! 7.5 in (4:3) canvas.

use deck_core::format::{render, strip_markup, TextRun};
use deck_core::{Rgb, Slide, ThemeColors};

pub const EMU_PER_INCH: i64 = 914_400;

/// Slide width in EMU (10 in).
pub const SLIDE_WIDTH: i64 = 9_144_000;

/// Slide height in EMU (7.5 in).
pub const SLIDE_HEIGHT: i64 = 6_858_000;

const FOOTER_TEXT: &str = "Created with AI Presentation Generator";

/// Convert inches to EMU.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Position and size of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    /// Frame from inch coordinates.
    pub fn inches(x: f64, y: f64, cx: f64, cy: f64) -> Self {
        Self {
            x: inches(x),
            y: inches(y),
            cx: inches(cx),
            cy: inches(cy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

/// One paragraph of a text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub size_pt: u32,
    pub color: Rgb,
    /// Bold for the whole paragraph, on top of per-run emphasis.
    pub bold: bool,
    pub align: Align,
    pub bullet: bool,
}

impl Paragraph {
    /// An unstyled single-run paragraph.
    pub fn plain(text: &str, size_pt: u32, color: Rgb) -> Self {
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextRun {
                text: text.to_string(),
                bold: false,
                italic: false,
            }]
        };
        Self {
            runs,
            size_pt,
            color,
            bold: false,
            align: Align::Left,
            bullet: false,
        }
    }

    /// A bullet point with bold/italic markup applied.
    pub fn bullet(raw: &str, size_pt: u32, color: Rgb) -> Self {
        Self {
            runs: render(raw).runs(),
            bullet: true,
            ..Self::plain("", size_pt, color)
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A drawable element of a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Solid rectangle, outline in the same color.
    Rect { frame: Frame, fill: Rgb },
    /// Word-wrapped text box.
    Text {
        frame: Frame,
        paragraphs: Vec<Paragraph>,
        anchor: Anchor,
    },
}

impl Shape {
    fn text(frame: Frame, paragraphs: Vec<Paragraph>) -> Self {
        Shape::Text {
            frame,
            paragraphs,
            anchor: Anchor::Top,
        }
    }
}

/// Lower a slide to shapes using the theme's colors.
pub fn layout_slide(slide: &Slide, colors: &ThemeColors) -> Vec<Shape> {
    match slide {
        Slide::Title { title, subtitle } => title_slide(title, subtitle.as_deref(), colors),
        Slide::Divider { section_name } => divider_slide(section_name, colors),
        Slide::Content {
            title,
            bullets,
            position_in_section,
            total_in_section,
        } => content_slide(title, bullets, *position_in_section, *total_in_section, colors),
        Slide::Blank => Vec::new(),
        Slide::Closing { title, body } => closing_slide(title, body.as_deref(), colors),
    }
}

fn title_slide(title: &str, subtitle: Option<&str>, colors: &ThemeColors) -> Vec<Shape> {
    let mut shapes = vec![
        Shape::Rect {
            frame: Frame::inches(0.0, 0.0, 10.0, 0.85),
            fill: colors.primary,
        },
        Shape::Text {
            frame: Frame::inches(0.75, 2.33, 8.5, 1.61),
            paragraphs: vec![Paragraph::plain(&strip_markup(title), 44, colors.text)
                .bold()
                .align(Align::Center)],
            anchor: Anchor::Middle,
        },
    ];

    if let Some(subtitle) = subtitle {
        shapes.push(Shape::text(
            Frame::inches(1.5, 4.25, 7.0, 1.92),
            vec![Paragraph::plain(&strip_markup(subtitle), 24, colors.secondary).align(Align::Center)],
        ));
    }

    shapes.push(Shape::text(
        Frame::inches(0.5, 6.5, 9.0, 0.5),
        vec![Paragraph::plain(FOOTER_TEXT, 12, colors.secondary).align(Align::Right)],
    ));
    shapes
}

fn content_slide(
    title: &str,
    bullets: &[String],
    position: usize,
    total: usize,
    colors: &ThemeColors,
) -> Vec<Shape> {
    let mut shapes = vec![
        Shape::Rect {
            frame: Frame::inches(0.0, 0.0, 10.0, 0.2),
            fill: colors.accent,
        },
        Shape::Text {
            frame: Frame::inches(0.5, 0.3, 9.0, 1.25),
            paragraphs: vec![Paragraph::plain(&strip_markup(title), 36, colors.primary).bold()],
            anchor: Anchor::Middle,
        },
        Shape::text(
            Frame::inches(0.5, 1.75, 9.0, 4.95),
            bullets
                .iter()
                .map(|b| Paragraph::bullet(b, 24, colors.text))
                .collect(),
        ),
    ];

    if total > 1 {
        shapes.push(Shape::text(
            Frame::inches(9.0, 6.5, 0.5, 0.3),
            vec![
                Paragraph::plain(&format!("{}/{}", position, total), 10, colors.secondary)
                    .align(Align::Right),
            ],
        ));
    }
    shapes
}

fn divider_slide(section_name: &str, colors: &ThemeColors) -> Vec<Shape> {
    vec![
        Shape::Rect {
            frame: Frame {
                x: 0,
                y: 0,
                cx: SLIDE_WIDTH,
                cy: SLIDE_HEIGHT,
            },
            fill: colors.primary,
        },
        Shape::Text {
            frame: Frame::inches(1.0, 2.5, 8.0, 2.0),
            paragraphs: vec![Paragraph::plain(&strip_markup(section_name), 54, Rgb::WHITE)
                .bold()
                .align(Align::Center)],
            anchor: Anchor::Middle,
        },
    ]
}

fn closing_slide(title: &str, body: Option<&str>, colors: &ThemeColors) -> Vec<Shape> {
    let half = SLIDE_HEIGHT / 2;
    let mut shapes = vec![
        Shape::Rect {
            frame: Frame {
                x: 0,
                y: 0,
                cx: SLIDE_WIDTH,
                cy: half,
            },
            fill: colors.secondary,
        },
        Shape::Rect {
            frame: Frame {
                x: 0,
                y: half,
                cx: SLIDE_WIDTH,
                cy: half,
            },
            fill: colors.primary,
        },
        Shape::text(
            Frame::inches(1.0, 2.5, 8.0, 1.5),
            vec![Paragraph::plain(title, 60, Rgb::WHITE)
                .bold()
                .align(Align::Center)],
        ),
    ];

    if let Some(body) = body {
        shapes.push(Shape::text(
            Frame::inches(1.0, 4.0, 8.0, 1.0),
            vec![Paragraph::plain(&strip_markup(body), 28, Rgb::WHITE).align(Align::Center)],
        ));
    }
    shapes
}
