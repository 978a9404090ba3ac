//! Completion client implementations for Cocorabot.
//!
//! All providers implement the `cocorabot_core::CompletionProvider` trait.
//! The retry wrapper adds exponential backoff on rate-limit failures without
//! the provider knowing about it.

pub mod gemini;
pub mod retry;

pub use gemini::GeminiProvider;
pub use retry::{RetryPolicy, complete_with_backoff};
