//! Slide-count allocation.
//!
//! Given an outline and its target slide count, decide how many slides every
//! section may occupy and build the deck: title slide, a divider whenever the
//! major section changes, the distributed content slides (with blank slides
//! inserted where requested) and a closing slide.
//!
//! ## Budget
//!
//! The title, the closing slide and one divider per *distinct* major section
//! are fixed overhead. The remaining slides are shared out in proportion to
//! each section's bullet count, every section getting at least one slide, and
//! any surplus or shortfall is reconciled against the largest sections.
//!
//! Dividers themselves are emitted whenever the major section differs from the
//! previous section's, so a major section that reappears later gets a second
//! divider that the budget did not reserve.
//!
//! ## Blank slides
//!
//! Blank indices count the content stream: content and blank slides, 0-based,
//! excluding title, divider and closing slides. A blank is inserted before the
//! content slide that would otherwise occupy that position; no content is
//! dropped.

use crate::deck::DeckBuilder;
use crate::distribute::ContentDistributor;
use crate::types::{Deck, Outline, Section, CLOSING_TITLE};
use std::collections::{BTreeSet, HashSet};

/// Title slide + closing slide.
const BOOKEND_SLIDES: usize = 2;

/// Per-section slide budgets for one outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    /// Slide count the outline asked for.
    pub target_slides: usize,

    /// Title, closing and one divider per distinct major section.
    pub fixed_slides: usize,

    /// Slides left for content, never less than one.
    pub available_slides: usize,

    /// Slides granted to each section, in outline order. Each is at least 1.
    pub budgets: Vec<usize>,
}

impl AllocationPlan {
    /// Whether the overhead alone reaches the target, forcing the deck past it.
    pub fn is_degenerate(&self) -> bool {
        self.fixed_slides >= self.target_slides
    }

    /// Sum of all section budgets.
    pub fn content_slides(&self) -> usize {
        self.budgets.iter().sum()
    }
}

/// Allocates slides to sections and realizes the deck.
#[derive(Debug, Clone, Default)]
pub struct SlideAllocator {
    distributor: ContentDistributor,
}

impl SlideAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom content distributor.
    pub fn with_distributor(mut self, distributor: ContentDistributor) -> Self {
        self.distributor = distributor;
        self
    }

    /// Compute per-section budgets without building slides.
    pub fn plan(&self, outline: &Outline) -> AllocationPlan {
        let majors: HashSet<&str> = outline.sections.iter().map(Section::major_section).collect();
        let fixed_slides = BOOKEND_SLIDES + majors.len();
        let available_slides = outline.target_slides.saturating_sub(fixed_slides).max(1);

        let weights: Vec<usize> = outline.sections.iter().map(Section::weight).collect();
        let total_weight = weights.iter().sum::<usize>().max(1);

        let mut remaining = available_slides as i64;
        let mut budgets = Vec::with_capacity(weights.len());

        for &weight in &weights {
            let share = (weight as f64 / total_weight as f64 * available_slides as f64)
                .round_ties_even() as i64;
            let mut slides = share.max(1);
            if slides > remaining {
                slides = remaining;
            }
            // Every section keeps a slide even once the pool is exhausted.
            let slides = slides.max(1);
            budgets.push(slides as usize);
            remaining -= slides;
        }

        reconcile(&mut budgets, &weights, remaining);

        log::debug!(
            "Allocation: target={} fixed={} available={} budgets={:?}",
            outline.target_slides,
            fixed_slides,
            available_slides,
            budgets
        );

        AllocationPlan {
            target_slides: outline.target_slides,
            fixed_slides,
            available_slides,
            budgets,
        }
    }

    /// Build the complete deck for `outline`.
    ///
    /// The deck's slide count should equal the target but may deviate when the
    /// outline has too many major sections, too little content, or blank
    /// slides are requested; [`Deck::report`] exposes the difference.
    pub fn allocate(&self, outline: &Outline) -> Deck {
        let plan = self.plan(outline);
        if plan.is_degenerate() {
            log::warn!(
                "Target of {} slides is too small for {} fixed slides; every section gets one slide",
                plan.target_slides,
                plan.fixed_slides
            );
        }

        let blanks: BTreeSet<usize> = outline.blank_slide_indices().into_iter().collect();

        let mut builder = DeckBuilder::new(outline.target_slides);
        builder.add_title_slide(&outline.title, outline.subtitle.as_deref());

        let mut current_major: Option<&str> = None;
        let mut stream_index = 0;

        for (section, &budget) in outline.sections.iter().zip(&plan.budgets) {
            let major = section.major_section();
            if current_major != Some(major) {
                builder.add_section_header_slide(major);
                current_major = Some(major);
            }

            let chunks = self
                .distributor
                .distribute(&section.title, &section.content, budget);
            let total = chunks.len();

            for (idx, chunk) in chunks.into_iter().enumerate() {
                while blanks.contains(&stream_index) {
                    builder.add_blank_slide();
                    stream_index += 1;
                }
                builder.add_content_slide(chunk.title, chunk.bullets, idx + 1, total);
                stream_index += 1;
            }
        }

        let unreached: Vec<usize> = blanks.range(stream_index..).copied().collect();
        if !unreached.is_empty() {
            log::warn!(
                "Blank slide indices {:?} lie beyond the {} content slides and were not applied",
                unreached,
                stream_index
            );
        }

        builder.add_closing_slide(CLOSING_TITLE, outline.call_to_action.as_deref());

        let deck = builder.finish();
        let report = deck.report();
        if report.is_exact() {
            log::debug!("Built deck with {}", report);
        } else {
            log::info!("Built deck: {}", report);
        }
        deck
    }
}

/// Convenience wrapper using the default allocator.
pub fn allocate(outline: &Outline) -> Deck {
    SlideAllocator::new().allocate(outline)
}

/// Settle the pool after the proportional pass.
///
/// A shortfall (`remaining < 0`) is paid back by the largest sections, one
/// slide each in weight order; a surplus is handed to the largest sections the
/// same way, cycling through them again once every section has had a turn.
fn reconcile(budgets: &mut [usize], original: &[usize], mut remaining: i64) {
    let mut weights = original.to_vec();
    while remaining < 0 {
        match largest(&weights) {
            Some(idx) => {
                if budgets[idx] > 1 {
                    budgets[idx] -= 1;
                    remaining += 1;
                }
                weights[idx] = 0;
            }
            None => {
                weights = original
                    .iter()
                    .zip(budgets.iter())
                    .map(|(&w, &b)| if b > 1 { w } else { 0 })
                    .collect();
                if weights.iter().all(|&w| w == 0) {
                    break;
                }
            }
        }
    }

    let mut weights = original.to_vec();
    while remaining > 0 {
        match largest(&weights) {
            Some(idx) => {
                budgets[idx] += 1;
                remaining -= 1;
                weights[idx] = 0;
            }
            None => {
                if original.iter().all(|&w| w == 0) {
                    break;
                }
                weights = original.to_vec();
            }
        }
    }
}

/// Index of the first maximal non-zero weight.
fn largest(weights: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, &w) in weights.iter().enumerate() {
        if w > 0 && best.map_or(true, |b| w > weights[b]) {
            best = Some(idx);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Instruction, Slide};

    fn section(title: &str, n: usize) -> Section {
        Section::new(title, (1..=n).map(|i| format!("{} point {}", title, i)).collect())
    }

    fn outline(target: usize, sections: Vec<Section>) -> Outline {
        let mut outline = Outline::new("Deck").with_target_slides(target);
        for s in sections {
            outline.add_section(s);
        }
        outline
    }

    fn kinds(deck: &Deck) -> Vec<&'static str> {
        deck.slides.iter().map(Slide::kind).collect()
    }

    #[test]
    fn test_proportional_budgets_with_shared_major() {
        let outline = outline(
            15,
            vec![section("AI: Intro", 2), section("AI: Uses", 6), section("AI: Risks", 1)],
        );
        let plan = SlideAllocator::new().plan(&outline);

        assert_eq!(plan.fixed_slides, 3);
        assert_eq!(plan.available_slides, 12);
        assert_eq!(plan.content_slides(), 12);
        assert!(plan.budgets.iter().all(|&b| b >= 1));
        assert!(plan.budgets[1] >= plan.budgets[0]);
        assert!(plan.budgets[1] >= plan.budgets[2]);
        assert_eq!(plan.budgets, vec![3, 8, 1]);
    }

    #[test]
    fn test_content_volume_limits_deck() {
        // Nine bullets cannot fill twelve budgeted slides.
        let outline = outline(
            15,
            vec![section("AI: Intro", 2), section("AI: Uses", 6), section("AI: Risks", 1)],
        );
        let deck = allocate(&outline);
        assert_eq!(deck.len(), 12);
        assert_eq!(deck.report().requested, 15);
        assert!(!deck.report().is_exact());
    }

    #[test]
    fn test_exact_target_reached() {
        let outline = outline(10, vec![section("Intro", 7), section("Body", 14)]);
        let plan = SlideAllocator::new().plan(&outline);
        assert_eq!(plan.budgets, vec![2, 4]);

        let deck = allocate(&outline);
        assert!(deck.report().is_exact());
        assert_eq!(
            kinds(&deck),
            vec![
                "title", "divider", "content", "content", "divider", "content", "content",
                "content", "content", "closing"
            ]
        );
    }

    #[test]
    fn test_degenerate_target_is_reported_not_fatal() {
        let sections = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|t| section(t, 2))
            .collect();
        let outline = outline(3, sections);
        let plan = SlideAllocator::new().plan(&outline);

        assert_eq!(plan.fixed_slides, 7);
        assert_eq!(plan.available_slides, 1);
        assert!(plan.is_degenerate());
        assert_eq!(plan.budgets, vec![1; 5]);

        let deck = allocate(&outline);
        let report = deck.report();
        assert_eq!(report.requested, 3);
        assert_eq!(report.actual, 12);
        assert!(report.actual > report.requested);
    }

    #[test]
    fn test_surplus_goes_to_largest_section() {
        let outline = outline(9, vec![section("A", 1), section("B", 1)]);
        let plan = SlideAllocator::new().plan(&outline);
        // 2.5 rounds to 2 for both, the spare slide goes to the first largest.
        assert_eq!(plan.budgets, vec![3, 2]);
    }

    #[test]
    fn test_half_shares_round_to_even() {
        let outline = outline(14, vec![section("A", 1), section("B", 3)]);
        let plan = SlideAllocator::new().plan(&outline);
        assert_eq!(plan.available_slides, 10);
        assert_eq!(plan.budgets, vec![2, 8]);
    }

    #[test]
    fn test_shortfall_taken_from_largest_section() {
        // Shares are [2, 1]; the second section is floored at one slide after
        // the pool is exhausted, so the first gives one back.
        let outline = outline(6, vec![section("A", 3), section("B", 1)]);
        let plan = SlideAllocator::new().plan(&outline);
        assert_eq!(plan.available_slides, 2);
        assert_eq!(plan.budgets, vec![1, 1]);
        assert_eq!(plan.content_slides(), 2);
    }

    #[test]
    fn test_empty_sections_get_one_slide() {
        let outline = outline(8, vec![section("A", 0), section("B", 0)]);
        let plan = SlideAllocator::new().plan(&outline);
        assert_eq!(plan.budgets, vec![1, 1]);

        let deck = allocate(&outline);
        assert_eq!(
            kinds(&deck),
            vec!["title", "divider", "content", "divider", "content", "closing"]
        );
    }

    #[test]
    fn test_no_sections() {
        let deck = allocate(&outline(15, vec![]));
        assert_eq!(kinds(&deck), vec!["title", "closing"]);
    }

    #[test]
    fn test_dividers_only_on_change() {
        let outline = outline(
            12,
            vec![section("Ethics: Bias", 1), section("Ethics: Privacy", 1), section("Cost", 1)],
        );
        let deck = allocate(&outline);
        let dividers: Vec<&str> = deck
            .slides
            .iter()
            .filter_map(|s| match s {
                Slide::Divider { section_name } => Some(section_name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(dividers, vec!["Ethics", "Cost"]);
    }

    #[test]
    fn test_divider_never_empty_for_leading_colon() {
        let outline = outline(8, vec![section(": Intro", 1), section("Cost", 1)]);
        let deck = allocate(&outline);
        assert_eq!(
            deck.slides[1],
            Slide::Divider {
                section_name: ": Intro".to_string()
            }
        );
    }

    #[test]
    fn test_non_contiguous_major_gets_second_divider() {
        let outline = outline(
            8,
            vec![section("A: one", 1), section("B: two", 1), section("A: three", 1)],
        );
        let plan = SlideAllocator::new().plan(&outline);
        // Budget reserves two dividers (distinct majors A and B)...
        assert_eq!(plan.fixed_slides, 4);
        assert_eq!(plan.content_slides(), 4);

        // ...but three are emitted, one per contiguous run.
        let deck = allocate(&outline);
        let dividers = deck.slides.iter().filter(|s| s.kind() == "divider").count();
        assert_eq!(dividers, 3);
    }

    #[test]
    fn test_content_slides_carry_position() {
        let outline = outline(6, vec![section("Only", 10)]);
        let deck = allocate(&outline);
        let positions: Vec<(usize, usize)> = deck
            .slides
            .iter()
            .filter_map(|s| match s {
                Slide::Content {
                    position_in_section,
                    total_in_section,
                    ..
                } => Some((*position_in_section, *total_in_section)),
                _ => None,
            })
            .collect();
        assert_eq!(positions, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_blank_indices_count_content_stream() {
        let mut outline = outline(9, vec![section("A", 2), section("B", 2)]);
        outline.add_instruction(Instruction::Blank { slide_index: 0 });
        outline.add_instruction(Instruction::Blank { slide_index: 3 });
        let deck = allocate(&outline);

        assert_eq!(
            kinds(&deck),
            vec![
                "title", "divider", "blank", "content", "content", "divider", "blank",
                "content", "content", "closing"
            ]
        );
        // Every bullet still appears.
        let bullets: usize = deck
            .slides
            .iter()
            .map(|s| match s {
                Slide::Content { bullets, .. } => bullets.len(),
                _ => 0,
            })
            .sum();
        assert_eq!(bullets, 4);
    }

    #[test]
    fn test_consecutive_blanks_and_unreachable_index() {
        let mut outline = outline(5, vec![section("A", 1)]);
        outline.add_instruction(Instruction::Blank { slide_index: 0 });
        outline.add_instruction(Instruction::Blank { slide_index: 1 });
        outline.add_instruction(Instruction::Blank { slide_index: 40 });
        let deck = allocate(&outline);
        assert_eq!(
            kinds(&deck),
            vec!["title", "divider", "blank", "blank", "content", "closing"]
        );
    }

    #[test]
    fn test_closing_slide_body() {
        let outline = outline(5, vec![section("A", 1)]).with_call_to_action("Try it today");
        let deck = allocate(&outline);
        assert_eq!(
            deck.slides.last(),
            Some(&Slide::Closing {
                title: "Thank You".to_string(),
                body: Some("Try it today".to_string()),
            })
        );

        let deck = allocate(&outline.with_call_to_action(""));
        assert_eq!(
            deck.slides.last(),
            Some(&Slide::Closing {
                title: "Thank You".to_string(),
                body: None,
            })
        );
    }

    #[test]
    fn test_allocation_is_idempotent() {
        let mut outline = outline(
            14,
            vec![section("X: a", 9), section("Y: b", 4), section("X: c", 12)],
        );
        outline.add_instruction(Instruction::Blank { slide_index: 2 });
        let allocator = SlideAllocator::new();
        assert_eq!(allocator.allocate(&outline), allocator.allocate(&outline));
        assert_eq!(allocator.plan(&outline), allocator.plan(&outline));
    }
}
