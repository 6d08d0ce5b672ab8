//! Domain types: the outline that drives generation and the deck it produces.

use serde::{Deserialize, Serialize};

/// Default number of slides when neither the caller nor the prompt says otherwise.
pub const DEFAULT_TARGET_SLIDES: usize = 15;

/// Title used for sections that arrive without one.
pub const DEFAULT_SECTION_TITLE: &str = "Section";

/// Title of the closing slide.
pub const CLOSING_TITLE: &str = "Thank You";

/// Structured content produced by the outline generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,

    pub subtitle: Option<String>,

    /// Approximate number of slides the deck should have.
    pub target_slides: usize,

    /// Sections in presentation order. May be empty.
    pub sections: Vec<Section>,

    pub call_to_action: Option<String>,

    pub special_instructions: Vec<Instruction>,
}

impl Outline {
    /// Create an empty outline with the default target slide count.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            target_slides: DEFAULT_TARGET_SLIDES,
            sections: Vec::new(),
            call_to_action: None,
            special_instructions: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_target_slides(mut self, target: usize) -> Self {
        self.target_slides = target;
        self
    }

    pub fn with_call_to_action(mut self, cta: impl Into<String>) -> Self {
        self.call_to_action = Some(cta.into());
        self
    }

    /// Append a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Add an instruction unless an identical one is already present.
    pub fn add_instruction(&mut self, instruction: Instruction) {
        if !self.special_instructions.contains(&instruction) {
            self.special_instructions.push(instruction);
        }
    }

    /// 0-based indices that must be rendered as blank slides.
    pub fn blank_slide_indices(&self) -> Vec<usize> {
        self.special_instructions
            .iter()
            .filter_map(Instruction::blank_index)
            .collect()
    }
}

/// A named group of bullet points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,

    /// Raw bullet text, possibly containing emphasis markers.
    pub content: Vec<String>,
}

impl Section {
    /// Create a section. A blank title falls back to "Section".
    pub fn new(title: impl Into<String>, content: Vec<String>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            DEFAULT_SECTION_TITLE.to_string()
        } else {
            title
        };
        Self { title, content }
    }

    /// The grouping key for divider slides: the title text before the first
    /// colon, trimmed. "AI Ethics: Bias" belongs to "AI Ethics". A title with
    /// nothing before the colon (": Intro") is its own major section.
    pub fn major_section(&self) -> &str {
        match self.title.split_once(':') {
            Some((major, _)) if !major.trim().is_empty() => major.trim(),
            _ => self.title.trim(),
        }
    }

    /// Content weight used for proportional slide allocation.
    pub fn weight(&self) -> usize {
        self.content.len()
    }
}

/// A per-slide override or a free-text directive for the generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instruction {
    /// Render the content-stream slide at this 0-based index as a blank slide.
    Blank { slide_index: usize },

    /// Free text appended verbatim to the generation prompt.
    Directive(String),
}

impl Instruction {
    pub fn blank_index(&self) -> Option<usize> {
        match self {
            Instruction::Blank { slide_index } => Some(*slide_index),
            Instruction::Directive(_) => None,
        }
    }
}

/// A single slide of the generated deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slide {
    Title {
        title: String,
        subtitle: Option<String>,
    },
    Divider {
        section_name: String,
    },
    Content {
        title: String,
        bullets: Vec<String>,
        /// 1-based position of this slide within its section.
        position_in_section: usize,
        /// Number of slides the section was distributed over.
        total_in_section: usize,
    },
    Blank,
    Closing {
        title: String,
        body: Option<String>,
    },
}

impl Slide {
    /// Short name of the slide kind, used in logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Slide::Title { .. } => "title",
            Slide::Divider { .. } => "divider",
            Slide::Content { .. } => "content",
            Slide::Blank => "blank",
            Slide::Closing { .. } => "closing",
        }
    }
}

/// The finished, immutable deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Slide count the outline asked for.
    pub requested_slides: usize,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Requested vs. actual slide count.
    pub fn report(&self) -> SlideCountReport {
        SlideCountReport {
            requested: self.requested_slides,
            actual: self.slides.len(),
        }
    }
}

/// Requested and actual slide counts of a generated deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideCountReport {
    pub requested: usize,
    pub actual: usize,
}

impl SlideCountReport {
    pub fn is_exact(&self) -> bool {
        self.requested == self.actual
    }

    /// Signed difference `actual - requested`.
    pub fn deviation(&self) -> i64 {
        self.actual as i64 - self.requested as i64
    }
}

impl std::fmt::Display for SlideCountReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_exact() {
            write!(f, "{} slides", self.actual)
        } else {
            write!(
                f,
                "requested {} slides, created {} to fit the content",
                self.requested, self.actual
            )
        }
    }
}
