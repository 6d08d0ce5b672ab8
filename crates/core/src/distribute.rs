//! Bullet splitting and distribution of a section's content across slides.
//!
//! Long bullets are broken into shorter ones first, then the resulting list is
//! cut into contiguous chunks, one chunk per slide, never exceeding the number
//! of slides the allocator granted the section.

/// Maximum number of bullet points per slide.
pub const MAX_BULLETS_PER_SLIDE: usize = 7;

/// Bullets longer than this (in characters) are split.
pub const MAX_BULLET_CHARS: usize = 100;

/// Target width when a bullet has to be broken between words.
pub const WRAP_CHARS: usize = 80;

/// One slide's worth of bullets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub title: String,
    pub bullets: Vec<String>,
}

/// Distributes bullet lists over a bounded number of slides.
#[derive(Debug, Clone)]
pub struct ContentDistributor {
    max_bullets_per_slide: usize,
    max_bullet_chars: usize,
    wrap_chars: usize,
}

impl Default for ContentDistributor {
    fn default() -> Self {
        Self {
            max_bullets_per_slide: MAX_BULLETS_PER_SLIDE,
            max_bullet_chars: MAX_BULLET_CHARS,
            wrap_chars: WRAP_CHARS,
        }
    }
}

impl ContentDistributor {
    /// Create a distributor with the default limits (7 bullets, 100 characters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom per-slide bullet cap.
    pub fn with_max_bullets_per_slide(mut self, max: usize) -> Self {
        self.max_bullets_per_slide = max.max(1); // At least 1 bullet per slide
        self
    }

    /// Split `bullets` into at most `max_slides` chunks, all titled `title`.
    ///
    /// `max_slides == 0` means no limit. The chunks partition the (re-split)
    /// bullet list in order. A chunk only exceeds the per-slide cap when the
    /// content cannot otherwise fit in `max_slides`.
    pub fn distribute(&self, title: &str, bullets: &[String], max_slides: usize) -> Vec<Chunk> {
        let points = self.expand_long_bullets(bullets);
        let count = points.len();

        let mut per_slide = if max_slides > 0 {
            let lower = (count / max_slides).max(1);
            self.max_bullets_per_slide
                .min(lower.max(count.div_ceil(max_slides)))
        } else {
            self.max_bullets_per_slide
        };

        if count <= per_slide {
            return vec![Chunk {
                title: title.to_string(),
                bullets: points,
            }];
        }

        let limit = if max_slides > 0 { max_slides } else { usize::MAX };
        let slides = limit.min(count.div_ceil(per_slide));
        // Even out the chunks over the slides actually used.
        per_slide = count.div_ceil(slides);

        log::debug!(
            "Distributing {} bullets of {:?} over {} slides ({} per slide)",
            count,
            title,
            slides,
            per_slide
        );

        points
            .chunks(per_slide)
            .map(|chunk| Chunk {
                title: title.to_string(),
                bullets: chunk.to_vec(),
            })
            .collect()
    }

    /// Replace every over-long bullet with its split pieces.
    pub fn expand_long_bullets(&self, bullets: &[String]) -> Vec<String> {
        let mut points = Vec::with_capacity(bullets.len());
        for bullet in bullets {
            if bullet.chars().count() > self.max_bullet_chars {
                points.extend(self.split_long_bullet(bullet));
            } else {
                points.push(bullet.clone());
            }
        }
        points
    }

    /// Break one bullet into shorter ones.
    ///
    /// Tries sentence ends first, then commas/semicolons, and finally packs
    /// words into lines of at most the wrap width.
    pub fn split_long_bullet(&self, text: &str) -> Vec<String> {
        let mut pieces = split_after(text, &['.', '!', '?']);
        if pieces.len() == 1 {
            pieces = split_after(text, &[',', ';']);
        }
        if pieces.len() == 1 && text.chars().count() > self.max_bullet_chars {
            pieces = pack_words(text, self.wrap_chars);
        }
        pieces
    }
}

/// Convenience wrapper using the default distributor.
pub fn distribute(title: &str, bullets: &[String], max_slides: usize) -> Vec<Chunk> {
    ContentDistributor::new().distribute(title, bullets, max_slides)
}

/// Split after any terminator that is followed by whitespace, dropping the
/// whitespace. Empty pieces are discarded.
fn split_after(text: &str, terminators: &[char]) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let followed_by_space = chars.peek().is_some_and(|&(_, next)| next.is_whitespace());
        if terminators.contains(&ch) && followed_by_space {
            pieces.push(&text[start..idx + ch.len_utf8()]);
            while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                chars.next();
            }
            start = chars.peek().map(|&(i, _)| i).unwrap_or(text.len());
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Greedily pack whitespace-delimited words into lines of at most `width`
/// characters. A single word longer than `width` gets a line of its own.
fn pack_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut char_count = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if char_count + word_len > width && !current.is_empty() {
            lines.push(current.join(" "));
            current.clear();
            char_count = 0;
        }
        current.push(word);
        char_count += word_len + 1; // +1 for the joining space
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    lines
}
