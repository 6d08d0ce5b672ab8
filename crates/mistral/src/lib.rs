//! Mistral chat-completions backend for outline generation.
//!
//! Implements [`deck_core::OutlineGenerator`]: the prompt is restated with its
//! extracted directives, sent alongside a system instruction describing the
//! outline JSON, and the reply is validated into an [`deck_core::Outline`].

pub mod client;
pub mod config;

pub use client::MistralClient;
pub use config::ClientConfig;
