//! The generation pipeline: prompt → outline → deck.

use crate::allocate::SlideAllocator;
use crate::error::Result;
use crate::instructions;
use crate::prompt::DeckRequest;
use crate::types::{Deck, Outline};

/// Something that turns a prompt into a structured outline.
///
/// Implementations report failures as [`crate::Error::UpstreamRequest`] or
/// [`crate::Error::UpstreamParse`]; they do not retry.
pub trait OutlineGenerator {
    fn generate(&self, prompt: &str, detailed: bool) -> Result<Outline>;
}

/// A generator that always returns the same outline, e.g. one loaded from disk.
#[derive(Debug, Clone)]
pub struct FixedOutline(pub Outline);

impl OutlineGenerator for FixedOutline {
    fn generate(&self, _prompt: &str, _detailed: bool) -> Result<Outline> {
        Ok(self.0.clone())
    }
}

/// Run one generation request end to end.
///
/// The caller's slide count overrides whatever the generator echoed back, and
/// blank-slide directives found in the prompt are added to the outline so the
/// allocator applies them.
pub fn generate_deck(
    generator: &dyn OutlineGenerator,
    allocator: &SlideAllocator,
    request: &DeckRequest,
) -> Result<(Outline, Deck)> {
    let prompt = request.compose_prompt()?;
    log::debug!("Prompt is {} characters", prompt.chars().count());

    let mut outline = generator.generate(&prompt, request.detailed)?;
    if outline.target_slides != request.target_slides {
        log::debug!(
            "Generator returned target_slides={}, using requested {}",
            outline.target_slides,
            request.target_slides
        );
        outline.target_slides = request.target_slides;
    }

    for slide in instructions::extract(&prompt).slide_instructions {
        outline.add_instruction(slide.to_instruction());
    }

    let deck = allocator.allocate(&outline);
    Ok((outline, deck))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{Instruction, Section, Slide};

    struct FailingGenerator;

    impl OutlineGenerator for FailingGenerator {
        fn generate(&self, _prompt: &str, _detailed: bool) -> Result<Outline> {
            Err(Error::UpstreamRequest("connection refused".to_string()))
        }
    }

    fn sample_outline() -> Outline {
        let mut outline = Outline::new("Bees").with_target_slides(99);
        outline.add_section(Section::new("Bees: Life", vec!["a".into(), "b".into(), "c".into()]));
        outline
    }

    #[test]
    fn test_request_target_overrides_generator() {
        let request = DeckRequest::new("Bees", 6);
        let (outline, deck) = generate_deck(
            &FixedOutline(sample_outline()),
            &SlideAllocator::new(),
            &request,
        )
        .unwrap();
        assert_eq!(outline.target_slides, 6);
        assert_eq!(deck.requested_slides, 6);
        assert!(deck.report().is_exact());
    }

    #[test]
    fn test_prompt_blank_directives_applied() {
        let request = DeckRequest::new("Bees. Leave slide 1 blank.", 6);
        let (outline, deck) = generate_deck(
            &FixedOutline(sample_outline()),
            &SlideAllocator::new(),
            &request,
        )
        .unwrap();
        assert_eq!(
            outline.special_instructions,
            vec![Instruction::Blank { slide_index: 0 }]
        );
        assert_eq!(deck.slides[2], Slide::Blank);
    }

    #[test]
    fn test_generator_failure_produces_no_deck() {
        let request = DeckRequest::new("Bees", 6);
        let err = generate_deck(&FailingGenerator, &SlideAllocator::new(), &request).unwrap_err();
        assert!(matches!(err, Error::UpstreamRequest(_)));
    }
}
