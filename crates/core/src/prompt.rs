//! Prompt composition for the outline generator.
//!
//! The front-end hands over a topic plus optional transcript and reference
//! text; these are joined into a single prompt that also states the target
//! slide count. The generator side reads that count back and enriches the
//! prompt with the directives found in it.

use crate::error::{Error, Result};
use crate::instructions::ExtractedInstructions;
use crate::types::DEFAULT_TARGET_SLIDES;
use regex::Regex;
use std::sync::LazyLock;

static TARGET_SLIDES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Target exactly (\d+) slides total").unwrap());

const SLIDE_INSTRUCTIONS_HEADER: &str = "Specific slide instructions:";

/// Everything the front-end collected for one generation request.
#[derive(Debug, Clone, Default)]
pub struct DeckRequest {
    pub topic: String,
    pub transcript: Option<String>,
    pub reference: Option<String>,
    pub target_slides: usize,
    pub detailed: bool,
}

impl DeckRequest {
    pub fn new(topic: impl Into<String>, target_slides: usize) -> Self {
        Self {
            topic: topic.into(),
            transcript: None,
            reference: None,
            target_slides,
            detailed: true,
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = Some(transcript.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    /// Join topic, transcript, reference material and the slide-count target.
    pub fn compose_prompt(&self) -> Result<String> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(Error::InvalidRequest(
                "Please provide a presentation topic or description".to_string(),
            ));
        }

        let mut prompt = topic.to_string();
        if let Some(transcript) = non_blank(self.transcript.as_deref()) {
            prompt.push_str(&format!("\n\nAdditional spoken details: {}", transcript));
        }
        if let Some(reference) = non_blank(self.reference.as_deref()) {
            prompt.push_str(&format!("\n\nReference material: {}", reference));
        }
        prompt.push_str(&format!(
            "\n\nTarget exactly {} slides total.",
            self.target_slides
        ));
        Ok(prompt)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Read the "Target exactly N slides total" marker, defaulting to 15.
pub fn extract_target_slides(prompt: &str) -> usize {
    TARGET_SLIDES_REGEX
        .captures(prompt)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(DEFAULT_TARGET_SLIDES)
}

/// Append extracted directives to the prompt so the generator sees them
/// restated. Directives already present verbatim are not repeated.
pub fn enhance_prompt(prompt: &str, instructions: &ExtractedInstructions) -> String {
    let mut enhanced = prompt.to_string();

    for directive in &instructions.general_instructions {
        if !enhanced.contains(directive.as_str()) {
            enhanced.push_str(&format!(
                "\n\nPlease follow this specific instruction: {}",
                directive
            ));
        }
    }

    if !instructions.slide_instructions.is_empty() && !enhanced.contains(SLIDE_INSTRUCTIONS_HEADER)
    {
        enhanced.push_str("\n\n");
        enhanced.push_str(SLIDE_INSTRUCTIONS_HEADER);
        for slide in &instructions.slide_instructions {
            enhanced.push_str(&format!(
                "\n- Make slide {} {}",
                slide.slide_index + 1,
                slide.action.as_str()
            ));
        }
    }

    enhanced
}

/// System instruction describing the JSON outline the generator must return.
pub fn system_prompt(target_slides: usize, detailed: bool) -> String {
    let detail_level = if detailed {
        "highly detailed and comprehensive"
    } else {
        "concise and focused"
    };

    format!(
        r#"You are an expert presentation content creator specializing in insightful and {detail_level} presentations.

Instructions:
- Create a well-structured presentation based on the user's input.
- Generate EXACTLY {target_slides} slides total, including title and closing slides.
- If specific slide instructions are provided (like 'leave slide 3 blank'), follow them exactly.
- Ensure the presentation has a logical flow with clear progression between topics.
- Include real-world examples, case studies, and statistics where relevant.
- Use rich text formatting in content points:
    - **double asterisks** for important terms that should be bold
    - *single asterisks* for terms that should be italic

Format requirements:
Respond with a JSON object with the following structure:

{{
    "title": "Presentation Title",
    "subtitle": "Optional Subtitle",
    "target_slides": {target_slides},
    "sections": [
        {{
            "title": "Section Title",
            "content": ["Point 1 with **bold** and *italic* text", "Point 2", "Point 3"]
        }}
    ],
    "call_to_action": "Key takeaways and next steps",
    "special_instructions": []
}}

How the {target_slides} slides are counted:
- The presentation always includes a title slide and a closing slide (2 slides).
- Each major section (the text before the colon in a section title) gets one section header slide.
- Content slides hold at most 7 bullet points; longer sections are split across several slides.
- Plan the major sections and the number of bullet points so the total comes to {target_slides}.
- Include "target_slides": {target_slides} in the JSON response."#
    )
}

/// Default output file name derived from the topic:
/// `presentation_<first 20 chars, non-alphanumerics as '_'>.pptx`.
pub fn output_file_name(topic: &str) -> String {
    let safe: String = topic
        .chars()
        .take(20)
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let safe = safe.trim_matches('_');
    let safe = if safe.is_empty() { "ai_presentation" } else { safe };
    format!("presentation_{}.pptx", safe)
}
