//! Extraction of presentation directives from free-form prompt text.
//!
//! Two kinds are recognized: per-slide blank directives ("leave slide 3
//! blank", "make the second slide empty") and general directive sentences
//! ("the presentation should ...") that are forwarded to the generator.

use crate::types::Instruction;
use regex::Regex;
use std::sync::LazyLock;

/// "leave slide 3 blank", "keep the page 2 empty".
static SLIDE_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:leave|make|create|keep)\s+(?:the\s+)?(?:slide|page)\s+(\d+)\s+(blank|empty)\b")
        .unwrap()
});

/// "make the 3rd slide empty", "leave the first slide blank".
static ORDINAL_SLIDE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:leave|make|create|keep)\s+(?:the\s+)?(?:(\d+)(?:st|nd|rd|th)?|([a-z]+))\s+(?:slide|page)\s+(blank|empty)\b",
    )
    .unwrap()
});

static GENERAL_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)please\s+(?:make|create|design)\s+(?:a|the)\s+presentation\s+(?:that|which)\s+.*?[.!?]",
        r"(?i)the\s+presentation\s+should\s+.*?[.!?]",
        r"(?i)make\s+sure\s+(?:to|that)\s+.*?[.!?]",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// General directives shorter than this are treated as noise.
const MIN_DIRECTIVE_CHARS: usize = 10;

/// Word ordinals understood in slide directives, mapped to 0-based indices.
const ORDINAL_WORDS: &[(&str, usize)] = &[
    ("first", 0),
    ("second", 1),
    ("third", 2),
    ("fourth", 3),
    ("fifth", 4),
];

/// What a slide directive asks for. Both render as a blank slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideAction {
    Blank,
    Empty,
}

impl SlideAction {
    fn parse(word: &str) -> Self {
        if word.eq_ignore_ascii_case("empty") {
            SlideAction::Empty
        } else {
            SlideAction::Blank
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlideAction::Blank => "blank",
            SlideAction::Empty => "empty",
        }
    }
}

/// A directive targeting one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideInstruction {
    /// 0-based slide index.
    pub slide_index: usize,
    pub action: SlideAction,
}

impl SlideInstruction {
    pub fn to_instruction(self) -> Instruction {
        Instruction::Blank {
            slide_index: self.slide_index,
        }
    }
}

/// Everything found in one piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedInstructions {
    pub slide_instructions: Vec<SlideInstruction>,
    pub general_instructions: Vec<String>,
}

impl ExtractedInstructions {
    pub fn is_empty(&self) -> bool {
        self.slide_instructions.is_empty() && self.general_instructions.is_empty()
    }

    /// All findings as outline instructions, slide directives first.
    pub fn to_instructions(&self) -> Vec<Instruction> {
        self.slide_instructions
            .iter()
            .map(|s| s.to_instruction())
            .chain(
                self.general_instructions
                    .iter()
                    .map(|g| Instruction::Directive(g.clone())),
            )
            .collect()
    }
}

/// Scan `text` for slide and general directives.
pub fn extract(text: &str) -> ExtractedInstructions {
    let mut found: Vec<(usize, SlideInstruction)> = Vec::new();

    for caps in SLIDE_NUMBER_REGEX.captures_iter(text) {
        let start = caps.get(0).map_or(0, |m| m.start());
        if let Some(index) = number_to_index(&caps[1]) {
            found.push((start, slide_instruction(index, &caps[2])));
        }
    }

    for caps in ORDINAL_SLIDE_REGEX.captures_iter(text) {
        let start = caps.get(0).map_or(0, |m| m.start());
        let index = match (caps.get(1), caps.get(2)) {
            (Some(digits), _) => number_to_index(digits.as_str()),
            (None, Some(word)) => ordinal_to_index(word.as_str()),
            (None, None) => None,
        };
        if let Some(index) = index {
            found.push((start, slide_instruction(index, &caps[3])));
        }
    }

    found.sort_by_key(|(start, _)| *start);

    let mut slide_instructions: Vec<SlideInstruction> = Vec::new();
    for (_, instruction) in found {
        if !slide_instructions
            .iter()
            .any(|s| s.slide_index == instruction.slide_index)
        {
            slide_instructions.push(instruction);
        }
    }

    let mut general_instructions: Vec<String> = Vec::new();
    for regex in GENERAL_REGEXES.iter() {
        for m in regex.find_iter(text) {
            let directive = m.as_str().trim();
            if directive.chars().count() < MIN_DIRECTIVE_CHARS {
                continue;
            }
            if !general_instructions.iter().any(|g| g == directive) {
                general_instructions.push(directive.to_string());
            }
        }
    }

    ExtractedInstructions {
        slide_instructions,
        general_instructions,
    }
}

fn slide_instruction(slide_index: usize, action: &str) -> SlideInstruction {
    SlideInstruction {
        slide_index,
        action: SlideAction::parse(action),
    }
}

/// "3" -> 2. Slide 0 does not exist and is dropped.
fn number_to_index(digits: &str) -> Option<usize> {
    match digits.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n - 1),
        _ => {
            log::debug!("Ignoring slide directive with slide number {:?}", digits);
            None
        }
    }
}

/// Unknown ordinal words are dropped rather than defaulting to the first slide.
fn ordinal_to_index(word: &str) -> Option<usize> {
    let word = word.to_lowercase();
    let index = ORDINAL_WORDS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, idx)| *idx);
    if index.is_none() {
        log::debug!("Ignoring slide directive with unknown ordinal {:?}", word);
    }
    index
}
