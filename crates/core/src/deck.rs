//! Stateful deck builder.
//!
//! Slides are appended in presentation order; [`DeckBuilder::finish`] hands the
//! finished deck over for export. The builder is owned by a single generation
//! request and is consumed when the deck is finished.

use crate::types::{Deck, Slide};

/// Appends slides of the five kinds to an in-memory deck.
#[derive(Debug)]
pub struct DeckBuilder {
    requested_slides: usize,
    slides: Vec<Slide>,
}

impl DeckBuilder {
    /// Start an empty deck for an outline that asked for `requested_slides`.
    pub fn new(requested_slides: usize) -> Self {
        Self {
            requested_slides,
            slides: Vec::new(),
        }
    }

    pub fn add_title_slide(&mut self, title: impl Into<String>, subtitle: Option<&str>) {
        self.slides.push(Slide::Title {
            title: title.into(),
            subtitle: subtitle
                .filter(|s| !s.trim().is_empty())
                .map(String::from),
        });
    }

    /// Divider marking the start of a major section.
    pub fn add_section_header_slide(&mut self, section_name: impl Into<String>) {
        self.slides.push(Slide::Divider {
            section_name: section_name.into(),
        });
    }

    /// Bullet slide; `position` is 1-based within a section spread over `total` slides.
    pub fn add_content_slide(
        &mut self,
        title: impl Into<String>,
        bullets: Vec<String>,
        position: usize,
        total: usize,
    ) {
        self.slides.push(Slide::Content {
            title: title.into(),
            bullets,
            position_in_section: position,
            total_in_section: total,
        });
    }

    pub fn add_blank_slide(&mut self) {
        self.slides.push(Slide::Blank);
    }

    pub fn add_closing_slide(&mut self, title: impl Into<String>, body: Option<&str>) {
        self.slides.push(Slide::Closing {
            title: title.into(),
            body: body.filter(|b| !b.trim().is_empty()).map(String::from),
        });
    }

    /// Number of slides appended so far.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn finish(self) -> Deck {
        Deck {
            requested_slides: self.requested_slides,
            slides: self.slides,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_slides_in_order() {
        let mut builder = DeckBuilder::new(5);
        builder.add_title_slide("Deck", Some("Sub"));
        builder.add_section_header_slide("Part one");
        builder.add_content_slide("Part one: intro", vec!["a".into()], 1, 1);
        builder.add_blank_slide();
        builder.add_closing_slide("Thank You", None);
        assert_eq!(builder.len(), 5);

        let deck = builder.finish();
        let kinds: Vec<&str> = deck.slides.iter().map(Slide::kind).collect();
        assert_eq!(kinds, vec!["title", "divider", "content", "blank", "closing"]);
        assert!(deck.report().is_exact());
    }

    #[test]
    fn test_blank_optional_text_is_dropped() {
        let mut builder = DeckBuilder::new(2);
        builder.add_title_slide("Deck", Some("  "));
        builder.add_closing_slide("Thank You", Some(""));
        let deck = builder.finish();
        assert_eq!(
            deck.slides,
            vec![
                Slide::Title { title: "Deck".into(), subtitle: None },
                Slide::Closing { title: "Thank You".into(), body: None },
            ]
        );
    }
}
