//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating or exporting a deck.
///
/// A target slide count that is too small for the outline is not an error:
/// the allocator floors every budget at one slide and the deck reports the
/// deviation (see [`crate::Deck::report`]).
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid credentials/configuration for the outline generator.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request to the outline generator failed (network or HTTP status).
    #[error("API request failed: {0}")]
    UpstreamRequest(String),

    /// The generator answered, but not with a valid outline.
    #[error("Failed to parse response: {0}")]
    UpstreamParse(String),

    /// A reference document could not be decoded.
    #[error("Content extraction error: {0}")]
    ContentExtraction(String),

    /// The caller supplied an unusable request (e.g. an empty topic).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error (for PPTX/DOCX).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML reading or writing error (for PPTX/DOCX).
    #[error("XML error: {0}")]
    Xml(String),
}
