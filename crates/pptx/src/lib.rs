//! PPTX (Office Open XML) backend.
//!
//! Writes generated decks as .pptx packages and extracts plain text from
//! reference documents (text, PDF, Word, PowerPoint and spreadsheets).

pub mod layout;
mod package;
pub mod parser;
pub mod reference;
mod sheet;
pub mod writer;
mod xml;

pub use layout::{layout_slide, Shape};
pub use parser::{ExtractedSlide, PptxParser};
pub use reference::{extract_reference_text, preview, read_reference};
pub use writer::PptxWriter;
