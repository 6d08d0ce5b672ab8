//! Outline model, slide allocation, content distribution and deck building
//! for generating slide decks from structured outlines.

pub mod allocate;
pub mod deck;
pub mod distribute;
pub mod error;
pub mod format;
pub mod generate;
pub mod instructions;
pub mod outline;
pub mod prompt;
pub mod theme;
pub mod types;

pub use allocate::{allocate, AllocationPlan, SlideAllocator};
pub use deck::DeckBuilder;
pub use distribute::{distribute, Chunk, ContentDistributor};
pub use error::{Error, Result};
pub use format::{render, Emphasis, FormattedText, StyledSpan, TextRun};
pub use generate::{generate_deck, FixedOutline, OutlineGenerator};
pub use instructions::{extract, ExtractedInstructions, SlideAction, SlideInstruction};
pub use prompt::DeckRequest;
pub use theme::{Rgb, Theme, ThemeColors};
pub use types::{Deck, Instruction, Outline, Section, Slide, SlideCountReport};
