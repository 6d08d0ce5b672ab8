//! PPTX package writer.
//!
//! A deck is written as a minimal Office Open XML presentation: one slide
//! master, one blank layout, a theme whose color scheme comes from the
//! selected [`Theme`], and one slide part per deck slide.

use crate::layout::{layout_slide, Align, Anchor, Frame, Paragraph, Shape, SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::xml::{relationships, XmlBuilder, NS_A, NS_P, NS_R};
use deck_core::{Deck, Error, Result, Slide, Theme, ThemeColors};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const APPLICATION: &str = "AI Presentation Generator";

/// Bullet indent in EMU (0.375 in).
const BULLET_INDENT: i64 = 342_900;

/// Writes decks as `.pptx` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxWriter {
    theme: Theme,
}

impl PptxWriter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Write the package for `deck` into `writer` and hand it back.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, writer: W) -> Result<W> {
        let colors = self.theme.colors();
        let mut zip = ZipWriter::new(writer);

        let count = deck.len();
        self.add_part(&mut zip, "[Content_Types].xml", &content_types(count)?)?;
        self.add_part(
            &mut zip,
            "_rels/.rels",
            &relationships(&[
                ("rId1", "officeDocument", "ppt/presentation.xml"),
                (
                    "rId2",
                    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
                    "docProps/core.xml",
                ),
                ("rId3", "extended-properties", "docProps/app.xml"),
            ])?,
        )?;
        self.add_part(&mut zip, "docProps/core.xml", &core_properties(deck_title(deck))?)?;
        self.add_part(&mut zip, "docProps/app.xml", &app_properties(count)?)?;
        self.add_part(&mut zip, "ppt/presentation.xml", &presentation(count)?)?;
        self.add_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &presentation_relationships(count)?,
        )?;
        self.add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", &slide_master(&colors)?)?;
        self.add_part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ])?,
        )?;
        self.add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &slide_layout()?)?;
        self.add_part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")])?,
        )?;
        self.add_part(&mut zip, "ppt/theme/theme1.xml", &theme_part(self.theme, &colors)?)?;

        let slide_rels =
            relationships(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")])?;
        for (idx, slide) in deck.slides.iter().enumerate() {
            let number = idx + 1;
            let shapes = layout_slide(slide, &colors);
            self.add_part(
                &mut zip,
                &format!("ppt/slides/slide{}.xml", number),
                &slide_xml(&shapes)?,
            )?;
            self.add_part(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &slide_rels,
            )?;
        }

        log::debug!("Wrote {} slides with theme {}", count, self.theme);

        zip.finish()
            .map_err(|e| Error::Zip(format!("Failed to finish package: {}", e)))
    }

    /// Save `deck` to `path`, appending `.pptx` when the path lacks it.
    /// Returns the path actually written.
    pub fn save(&self, deck: &Deck, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = with_pptx_extension(path.as_ref());
        let file = File::create(&path)?;
        let mut file = self.write(deck, file)?;
        file.flush()?;
        log::debug!("Saved presentation to {}", path.display());
        Ok(path)
    }

    fn add_part<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        name: &str,
        content: &str,
    ) -> Result<()> {
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)
            .map_err(|e| Error::Zip(format!("Failed to add '{}': {}", name, e)))?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn with_pptx_extension(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(".pptx") {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".pptx");
        PathBuf::from(name)
    }
}

fn deck_title(deck: &Deck) -> &str {
    deck.slides
        .iter()
        .find_map(|slide| match slide {
            Slide::Title { title, .. } => Some(title.as_str()),
            _ => None,
        })
        .unwrap_or("Presentation")
}

fn content_types(slide_count: usize) -> Result<String> {
    const CT: &str = "application/vnd.openxmlformats-officedocument";

    let mut xml = XmlBuilder::new()?;
    xml.start(
        "Types",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
    )?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let overrides = [
        ("/ppt/presentation.xml", format!("{}.presentationml.presentation.main+xml", CT)),
        ("/ppt/slideMasters/slideMaster1.xml", format!("{}.presentationml.slideMaster+xml", CT)),
        ("/ppt/slideLayouts/slideLayout1.xml", format!("{}.presentationml.slideLayout+xml", CT)),
        ("/ppt/theme/theme1.xml", format!("{}.theme+xml", CT)),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
        ("/docProps/app.xml", format!("{}.extended-properties+xml", CT)),
    ];
    for (part, content_type) in &overrides {
        xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
    }

    let slide_type = format!("{}.presentationml.slide+xml", CT);
    for number in 1..=slide_count {
        let part = format!("/ppt/slides/slide{}.xml", number);
        xml.empty("Override", &[("PartName", &part), ("ContentType", &slide_type)])?;
    }

    xml.end("Types")?;
    xml.finish()
}

fn core_properties(title: &str) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.text_element("dc:title", title)?;
    xml.text_element("dc:creator", APPLICATION)?;
    xml.end("cp:coreProperties")?;
    xml.finish()
}

fn app_properties(slide_count: usize) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    xml.text_element("Application", APPLICATION)?;
    xml.text_element("Slides", &slide_count.to_string())?;
    xml.end("Properties")?;
    xml.finish()
}

fn presentation(slide_count: usize) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:presentation",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;

    xml.start("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    xml.end("p:sldMasterIdLst")?;

    if slide_count > 0 {
        xml.start("p:sldIdLst", &[])?;
        for idx in 0..slide_count {
            // rId1 is the master, rId2 the theme.
            let id = (256 + idx).to_string();
            let rel = format!("rId{}", idx + 3);
            xml.empty("p:sldId", &[("id", &id), ("r:id", &rel)])?;
        }
        xml.end("p:sldIdLst")?;
    }

    let (cx, cy) = (SLIDE_WIDTH.to_string(), SLIDE_HEIGHT.to_string());
    xml.empty("p:sldSz", &[("cx", &cx), ("cy", &cy), ("type", "screen4x3")])?;
    xml.empty("p:notesSz", &[("cx", &cy), ("cy", &cx)])?;
    xml.end("p:presentation")?;
    xml.finish()
}

fn presentation_relationships(slide_count: usize) -> Result<String> {
    let slides: Vec<(String, String)> = (1..=slide_count)
        .map(|n| (format!("rId{}", n + 2), format!("slides/slide{}.xml", n)))
        .collect();

    let mut rels = vec![
        ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        ("rId2", "theme", "theme/theme1.xml"),
    ];
    rels.extend(
        slides
            .iter()
            .map(|(id, target)| (id.as_str(), "slide", target.as_str())),
    );
    relationships(&rels)
}

/// Open `<p:cSld>` with an optional background and the group-shape header
/// every shape tree starts with.
fn open_shape_tree(xml: &mut XmlBuilder, background: Option<&str>) -> Result<()> {
    xml.start("p:cSld", &[])?;
    if let Some(hex) = background {
        xml.start("p:bg", &[])?;
        xml.start("p:bgPr", &[])?;
        xml.solid_fill(hex)?;
        xml.empty("a:effectLst", &[])?;
        xml.end("p:bgPr")?;
        xml.end("p:bg")?;
    }
    xml.start("p:spTree", &[])?;
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;
    xml.start("p:grpSpPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.end("a:xfrm")?;
    xml.end("p:grpSpPr")?;
    Ok(())
}

fn close_shape_tree(xml: &mut XmlBuilder) -> Result<()> {
    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    Ok(())
}

fn slide_master(colors: &ThemeColors) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sldMaster",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    open_shape_tree(&mut xml, Some(&colors.background.hex()))?;
    close_shape_tree(&mut xml)?;
    xml.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;
    xml.start("p:sldLayoutIdLst", &[])?;
    xml.empty("p:sldLayoutId", &[("id", "2147483649"), ("r:id", "rId1")])?;
    xml.end("p:sldLayoutIdLst")?;

    xml.start("p:txStyles", &[])?;
    for (style, size) in [("p:titleStyle", "4400"), ("p:bodyStyle", "2400"), ("p:otherStyle", "1800")] {
        xml.start(style, &[])?;
        xml.start("a:lvl1pPr", &[])?;
        xml.empty("a:defRPr", &[("sz", size)])?;
        xml.end("a:lvl1pPr")?;
        xml.end(style)?;
    }
    xml.end("p:txStyles")?;

    xml.end("p:sldMaster")?;
    xml.finish()
}

fn slide_layout() -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sldLayout",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("type", "blank"),
            ("preserve", "1"),
        ],
    )?;
    xml.start("p:cSld", &[("name", "Blank")])?;
    xml.start("p:spTree", &[])?;
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;
    xml.empty("p:grpSpPr", &[])?;
    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    master_color_mapping(&mut xml)?;
    xml.end("p:sldLayout")?;
    xml.finish()
}

fn master_color_mapping(xml: &mut XmlBuilder) -> Result<()> {
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    Ok(())
}

fn theme_part(theme: Theme, colors: &ThemeColors) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("a:theme", &[("xmlns:a", NS_A), ("name", theme.name())])?;
    xml.start("a:themeElements", &[])?;

    xml.start("a:clrScheme", &[("name", theme.name())])?;
    let scheme = [
        ("a:dk1", colors.text.hex()),
        ("a:lt1", "FFFFFF".to_string()),
        ("a:dk2", colors.secondary.hex()),
        ("a:lt2", colors.background.hex()),
        ("a:accent1", colors.primary.hex()),
        ("a:accent2", colors.accent.hex()),
        ("a:accent3", colors.secondary.hex()),
        ("a:accent4", "8064A2".to_string()),
        ("a:accent5", "4BACC6".to_string()),
        ("a:accent6", "F79646".to_string()),
        ("a:hlink", colors.primary.hex()),
        ("a:folHlink", colors.secondary.hex()),
    ];
    for (slot, hex) in &scheme {
        xml.start(slot, &[])?;
        xml.empty("a:srgbClr", &[("val", hex)])?;
        xml.end(slot)?;
    }
    xml.end("a:clrScheme")?;

    xml.start("a:fontScheme", &[("name", "Office")])?;
    for group in ["a:majorFont", "a:minorFont"] {
        xml.start(group, &[])?;
        xml.empty("a:latin", &[("typeface", "Calibri")])?;
        xml.empty("a:ea", &[("typeface", "")])?;
        xml.empty("a:cs", &[("typeface", "")])?;
        xml.end(group)?;
    }
    xml.end("a:fontScheme")?;

    xml.start("a:fmtScheme", &[("name", "Office")])?;
    xml.start("a:fillStyleLst", &[])?;
    for _ in 0..3 {
        scheme_fill(&mut xml)?;
    }
    xml.end("a:fillStyleLst")?;
    xml.start("a:lnStyleLst", &[])?;
    for width in ["9525", "25400", "38100"] {
        xml.start("a:ln", &[("w", width)])?;
        scheme_fill(&mut xml)?;
        xml.end("a:ln")?;
    }
    xml.end("a:lnStyleLst")?;
    xml.start("a:effectStyleLst", &[])?;
    for _ in 0..3 {
        xml.start("a:effectStyle", &[])?;
        xml.empty("a:effectLst", &[])?;
        xml.end("a:effectStyle")?;
    }
    xml.end("a:effectStyleLst")?;
    xml.start("a:bgFillStyleLst", &[])?;
    for _ in 0..3 {
        scheme_fill(&mut xml)?;
    }
    xml.end("a:bgFillStyleLst")?;
    xml.end("a:fmtScheme")?;

    xml.end("a:themeElements")?;
    xml.end("a:theme")?;
    xml.finish()
}

fn scheme_fill(xml: &mut XmlBuilder) -> Result<()> {
    xml.start("a:solidFill", &[])?;
    xml.empty("a:schemeClr", &[("val", "phClr")])?;
    xml.end("a:solidFill")?;
    Ok(())
}

fn slide_xml(shapes: &[Shape]) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    open_shape_tree(&mut xml, None)?;

    for (idx, shape) in shapes.iter().enumerate() {
        // id 1 is the group shape.
        let id = (idx + 2).to_string();
        match shape {
            Shape::Rect { frame, fill } => {
                let name = format!("Rectangle {}", idx + 1);
                let hex = fill.hex();
                xml.start("p:sp", &[])?;
                non_visual(&mut xml, &id, &name, false)?;
                xml.start("p:spPr", &[])?;
                transform(&mut xml, frame)?;
                rect_geometry(&mut xml)?;
                xml.solid_fill(&hex)?;
                xml.start("a:ln", &[])?;
                xml.solid_fill(&hex)?;
                xml.end("a:ln")?;
                xml.end("p:spPr")?;
                xml.end("p:sp")?;
            }
            Shape::Text {
                frame,
                paragraphs,
                anchor,
            } => {
                let name = format!("TextBox {}", idx + 1);
                xml.start("p:sp", &[])?;
                non_visual(&mut xml, &id, &name, true)?;
                xml.start("p:spPr", &[])?;
                transform(&mut xml, frame)?;
                rect_geometry(&mut xml)?;
                xml.empty("a:noFill", &[])?;
                xml.end("p:spPr")?;
                text_body(&mut xml, paragraphs, *anchor)?;
                xml.end("p:sp")?;
            }
        }
    }

    close_shape_tree(&mut xml)?;
    master_color_mapping(&mut xml)?;
    xml.end("p:sld")?;
    xml.finish()
}

fn non_visual(xml: &mut XmlBuilder, id: &str, name: &str, text_box: bool) -> Result<()> {
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id), ("name", name)])?;
    if text_box {
        xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    } else {
        xml.empty("p:cNvSpPr", &[])?;
    }
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvSpPr")?;
    Ok(())
}

fn transform(xml: &mut XmlBuilder, frame: &Frame) -> Result<()> {
    let (x, y) = (frame.x.to_string(), frame.y.to_string());
    let (cx, cy) = (frame.cx.to_string(), frame.cy.to_string());
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", &x), ("y", &y)])?;
    xml.empty("a:ext", &[("cx", &cx), ("cy", &cy)])?;
    xml.end("a:xfrm")?;
    Ok(())
}

fn rect_geometry(xml: &mut XmlBuilder) -> Result<()> {
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")?;
    Ok(())
}

fn text_body(xml: &mut XmlBuilder, paragraphs: &[Paragraph], anchor: Anchor) -> Result<()> {
    let anchor = match anchor {
        Anchor::Top => "t",
        Anchor::Middle => "ctr",
    };
    xml.start("p:txBody", &[])?;
    xml.start("a:bodyPr", &[("wrap", "square"), ("rtlCol", "0"), ("anchor", anchor)])?;
    xml.empty("a:normAutofit", &[])?;
    xml.end("a:bodyPr")?;
    xml.empty("a:lstStyle", &[])?;

    if paragraphs.is_empty() {
        xml.empty("a:p", &[])?;
    }
    for paragraph in paragraphs {
        write_paragraph(xml, paragraph)?;
    }

    xml.end("p:txBody")?;
    Ok(())
}

fn write_paragraph(xml: &mut XmlBuilder, paragraph: &Paragraph) -> Result<()> {
    let align = match paragraph.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };
    let size = (paragraph.size_pt * 100).to_string();
    let color = paragraph.color.hex();

    xml.start("a:p", &[])?;
    if paragraph.bullet {
        let margin = BULLET_INDENT.to_string();
        let indent = (-BULLET_INDENT).to_string();
        xml.start("a:pPr", &[("marL", &margin), ("indent", &indent), ("algn", align)])?;
        xml.empty("a:buFont", &[("typeface", "Arial")])?;
        xml.empty("a:buChar", &[("char", "\u{2022}")])?;
        xml.end("a:pPr")?;
    } else {
        xml.start("a:pPr", &[("algn", align)])?;
        xml.empty("a:buNone", &[])?;
        xml.end("a:pPr")?;
    }

    for run in &paragraph.runs {
        let bold = if run.bold || paragraph.bold { "1" } else { "0" };
        let italic = if run.italic { "1" } else { "0" };
        xml.start("a:r", &[])?;
        xml.start(
            "a:rPr",
            &[("lang", "en-US"), ("sz", &size), ("b", bold), ("i", italic), ("dirty", "0")],
        )?;
        xml.solid_fill(&color)?;
        xml.end("a:rPr")?;
        xml.text_element("a:t", &run.text)?;
        xml.end("a:r")?;
    }

    xml.empty("a:endParaRPr", &[("lang", "en-US"), ("sz", &size), ("dirty", "0")])?;
    xml.end("a:p")?;
    Ok(())
}
