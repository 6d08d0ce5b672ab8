//! Lightweight emphasis markup in bullet text.
//!
//! `**text**` is bold and `*text*` is italic. Markers are stripped from the
//! display text and returned as (substring, style) spans. Styles are mapped
//! back onto the display text by substring search, so a styled phrase that
//! occurs more than once is styled everywhere it occurs.

use regex::Regex;
use std::sync::LazyLock;

static BOLD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

static ITALIC_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());

/// Underline and strikethrough markers are stripped but not styled.
static UNSTYLED_MARKER_REGEXES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"__(.*?)__").unwrap(),
        Regex::new(r"~~(.*?)~~").unwrap(),
    ]
});

/// Character style carried by a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Bold,
    Italic,
}

/// A styled substring of the display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Emphasis,
}

/// A contiguous piece of display text with uniform styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

/// Bullet text with markup removed and emphasis recorded separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedText {
    pub display: String,
    pub spans: Vec<StyledSpan>,
}

/// Strip emphasis markers from `raw`, recording what they styled.
///
/// Bold pairs are resolved first; single markers are scanned afterwards on the
/// bold-free text, so `**a**` never yields an italic span. Empty pairs are
/// dropped.
pub fn render(raw: &str) -> FormattedText {
    let mut spans = Vec::new();

    collect_spans(&BOLD_REGEX, raw, Emphasis::Bold, &mut spans);
    let without_bold = BOLD_REGEX.replace_all(raw, "$1");

    collect_spans(&ITALIC_REGEX, &without_bold, Emphasis::Italic, &mut spans);
    let mut display = ITALIC_REGEX.replace_all(&without_bold, "$1").into_owned();

    for regex in UNSTYLED_MARKER_REGEXES.iter() {
        display = regex.replace_all(&display, "$1").into_owned();
    }

    FormattedText { display, spans }
}

/// Display text only.
pub fn strip_markup(raw: &str) -> String {
    render(raw).display
}

fn collect_spans(regex: &Regex, text: &str, style: Emphasis, spans: &mut Vec<StyledSpan>) {
    for caps in regex.captures_iter(text) {
        let inner = &caps[1];
        if !inner.is_empty() {
            spans.push(StyledSpan {
                text: inner.to_string(),
                style,
            });
        }
    }
}

impl FormattedText {
    /// Split the display text into uniformly styled runs.
    pub fn runs(&self) -> Vec<TextRun> {
        let len = self.display.len();
        let mut bold = vec![false; len];
        let mut italic = vec![false; len];

        for span in &self.spans {
            let flags = match span.style {
                Emphasis::Bold => &mut bold,
                Emphasis::Italic => &mut italic,
            };
            for (start, matched) in self.display.match_indices(span.text.as_str()) {
                flags[start..start + matched.len()].fill(true);
            }
        }

        let mut runs: Vec<TextRun> = Vec::new();
        for (idx, ch) in self.display.char_indices() {
            let (b, i) = (bold[idx], italic[idx]);
            match runs.last_mut() {
                Some(run) if run.bold == b && run.italic == i => run.text.push(ch),
                _ => runs.push(TextRun {
                    text: ch.to_string(),
                    bold: b,
                    italic: i,
                }),
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, style: Emphasis) -> StyledSpan {
        StyledSpan {
            text: text.to_string(),
            style,
        }
    }

    #[test]
    fn test_bold_and_italic() {
        let formatted = render("**Important** and *light*");
        assert_eq!(formatted.display, "Important and light");
        assert_eq!(
            formatted.spans,
            vec![span("Important", Emphasis::Bold), span("light", Emphasis::Italic)]
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        let formatted = render("No markup here, 3 * 4 = 12");
        assert_eq!(formatted.display, "No markup here, 3 * 4 = 12");
        assert!(formatted.spans.is_empty());
    }

    #[test]
    fn test_unstyled_markers_stripped() {
        assert_eq!(strip_markup("__under__ and ~~gone~~"), "under and gone");
    }

    #[test]
    fn test_empty_pairs_ignored() {
        let formatted = render("**** left");
        assert_eq!(formatted.display, " left");
        assert!(formatted.spans.is_empty());
    }

    #[test]
    fn test_runs_split_by_style() {
        let runs = render("**Important** and *light*").runs();
        assert_eq!(
            runs,
            vec![
                TextRun { text: "Important".into(), bold: true, italic: false },
                TextRun { text: " and ".into(), bold: false, italic: false },
                TextRun { text: "light".into(), bold: false, italic: true },
            ]
        );
    }

    #[test]
    fn test_repeated_substring_styled_everywhere() {
        // Substring matching styles both occurrences of "AI".
        let runs = render("**AI** helps AI").runs();
        assert_eq!(
            runs,
            vec![
                TextRun { text: "AI".into(), bold: true, italic: false },
                TextRun { text: " helps ".into(), bold: false, italic: false },
                TextRun { text: "AI".into(), bold: true, italic: false },
            ]
        );
    }

    #[test]
    fn test_runs_handle_multibyte_text() {
        let runs = render("Café *crème*").runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Café ");
        assert_eq!(runs[1].text, "crème");
        assert!(runs[1].italic);
    }

    #[test]
    fn test_empty_input_has_no_runs() {
        assert!(render("").runs().is_empty());
    }
}
