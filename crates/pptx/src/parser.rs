//! Text extraction from existing PPTX files, used for reference material.

use crate::package::{attribute, trailing_number, unprefixed, Package};
use deck_core::Result;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};

const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// Text of one slide, shapes ordered top-to-bottom then left-to-right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSlide {
    /// 1-based position in the presentation.
    pub number: usize,
    pub lines: Vec<String>,
}

impl ExtractedSlide {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Reader for PPTX (Office Open XML) files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PptxParser;

impl PptxParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of every slide, in presentation order.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Vec<ExtractedSlide>> {
        let mut package = Package::open(reader)?;

        let mut slides: Vec<(Option<usize>, String)> = package
            .relationships(PRESENTATION_RELS)?
            .into_iter()
            .filter(|rel| rel.is("slide"))
            .map(|rel| {
                let part = rel.part_name("ppt");
                let order = trailing_number(&part).or_else(|| trailing_number(&rel.id));
                (order, part)
            })
            .collect();
        // Numbered parts first, in number order; unnumbered ones by name.
        slides.sort_by(|a, b| match (a.0, b.0) {
            (Some(x), Some(y)) => x.cmp(&y),
            (x, y) => y.is_some().cmp(&x.is_some()).then_with(|| a.1.cmp(&b.1)),
        });
        log::debug!("Found {} slides", slides.len());

        slides
            .into_iter()
            .enumerate()
            .map(|(idx, (_, part))| {
                let xml = package.read_part(&part)?;
                let mut blocks = text_blocks(&xml);
                blocks.sort_by_key(|block| (block.y, block.x));
                Ok(ExtractedSlide {
                    number: idx + 1,
                    lines: blocks.into_iter().map(|block| block.text).collect(),
                })
            })
            .collect()
    }
}

/// Text of one shape with its top-left offset.
#[derive(Debug, Default)]
struct TextBlock {
    x: i64,
    y: i64,
    text: String,
}

/// Non-empty shape texts of a slide part, in document order.
///
/// Text comes only from `<a:t>` runs and is kept untrimmed until the shape
/// closes, so spaces at run boundaries survive. A malformed part yields the
/// blocks read before the error.
fn text_blocks(xml: &str) -> Vec<TextBlock> {
    let mut reader = Reader::from_str(xml);
    let mut blocks = Vec::new();

    let mut shape: Option<(TextBlock, Vec<String>)> = None;
    let mut paragraph: Option<String> = None;
    let mut in_run = false;

    loop {
        let event = match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => event,
            Err(e) => {
                log::warn!("Malformed slide XML, keeping {} text blocks: {}", blocks.len(), e);
                break;
            }
        };

        match event {
            Event::Start(e) => match unprefixed(e.name().as_ref()) {
                b"sp" | b"pic" => shape = Some((TextBlock::default(), Vec::new())),
                b"p" if shape.is_some() => paragraph = Some(String::new()),
                b"t" => in_run = paragraph.is_some(),
                _ => {}
            },
            Event::Empty(e) if unprefixed(e.name().as_ref()) == b"off" => {
                if let Some((block, _)) = shape.as_mut() {
                    block.x = attribute(&e, b"x").parse().unwrap_or(0);
                    block.y = attribute(&e, b"y").parse().unwrap_or(0);
                }
            }
            Event::Text(t) if in_run => {
                if let Some(text) = paragraph.as_mut() {
                    text.push_str(&t.unescape().unwrap_or_default());
                }
            }
            Event::End(e) => match unprefixed(e.name().as_ref()) {
                b"t" => in_run = false,
                b"p" => {
                    if let (Some((_, paragraphs)), Some(text)) = (shape.as_mut(), paragraph.take()) {
                        paragraphs.push(text);
                    }
                }
                b"sp" | b"pic" => {
                    if let Some((mut block, paragraphs)) = shape.take() {
                        block.text = paragraphs.join("\n").trim().to_string();
                        if !block.text.is_empty() {
                            blocks.push(block);
                        }
                    }
                    paragraph = None;
                    in_run = false;
                }
                _ => {}
            },
            _ => {}
        }
    }

    blocks
}
