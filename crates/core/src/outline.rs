//! Validation of generator output into a typed [`Outline`].
//!
//! The generator answers with loosely shaped JSON. Everything is checked here
//! so that the allocator only ever sees a well-formed outline; any shape
//! problem becomes [`Error::UpstreamParse`].

use crate::error::{Error, Result};
use crate::types::{Instruction, Outline, Section, DEFAULT_SECTION_TITLE};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawOutline {
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    target_slides: Option<RawCount>,
    sections: Vec<RawSection>,
    #[serde(default)]
    call_to_action: Option<String>,
    #[serde(default)]
    special_instructions: Option<Vec<RawInstruction>>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<Vec<String>>,
}

/// Models sometimes quote numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInstruction {
    Text(String),
    Slide {
        #[serde(default)]
        slide_index: Option<u64>,
        #[serde(default)]
        slide_number: Option<u64>,
        action: String,
    },
}

impl Outline {
    /// Parse and validate generator JSON.
    ///
    /// `fallback_target` is used when the response carries no `target_slides`.
    pub fn from_json(json: &str, fallback_target: usize) -> Result<Self> {
        let raw: RawOutline = serde_json::from_str(json)
            .map_err(|e| Error::UpstreamParse(format!("invalid outline JSON: {}", e)))?;
        raw.validate(fallback_target)
    }
}

impl RawOutline {
    fn validate(self, fallback_target: usize) -> Result<Outline> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::UpstreamParse("outline title is empty".to_string()));
        }

        let target_slides = match self.target_slides {
            None => fallback_target,
            Some(RawCount::Number(n)) => usize::try_from(n).map_err(|_| {
                Error::UpstreamParse(format!("target_slides out of range: {}", n))
            })?,
            Some(RawCount::Text(s)) => s.trim().parse().map_err(|_| {
                Error::UpstreamParse(format!("target_slides is not a number: {:?}", s))
            })?,
        };

        let sections = self
            .sections
            .into_iter()
            .map(|s| {
                Section::new(
                    s.title.unwrap_or_else(|| DEFAULT_SECTION_TITLE.to_string()),
                    s.content.unwrap_or_default(),
                )
            })
            .collect();

        let mut outline = Outline {
            title,
            subtitle: non_empty(self.subtitle),
            target_slides,
            sections,
            call_to_action: non_empty(self.call_to_action),
            special_instructions: Vec::new(),
        };

        for raw in self.special_instructions.unwrap_or_default() {
            outline.add_instruction(raw.into_instruction()?);
        }

        Ok(outline)
    }
}

impl RawInstruction {
    fn into_instruction(self) -> Result<Instruction> {
        match self {
            RawInstruction::Text(text) => Ok(Instruction::Directive(text)),
            RawInstruction::Slide {
                slide_index,
                slide_number,
                action,
            } => {
                let index = match (slide_index, slide_number) {
                    (Some(idx), _) => idx,
                    (None, Some(n)) if n >= 1 => n - 1,
                    _ => {
                        return Err(Error::UpstreamParse(format!(
                            "special instruction {:?} has no usable slide_index or slide_number",
                            action
                        )))
                    }
                };
                let index = usize::try_from(index).map_err(|_| {
                    Error::UpstreamParse(format!("slide index out of range: {}", index))
                })?;

                match action.trim().to_lowercase().as_str() {
                    "blank" | "empty" => Ok(Instruction::Blank { slide_index: index }),
                    _ => Ok(Instruction::Directive(format!(
                        "Slide {}: {}",
                        index + 1,
                        action.trim()
                    ))),
                }
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
