//! # Cocorabot Core
//!
//! Domain types, traits, and error definitions for the Cocorabot chat
//! service. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! The gateway, the knowledge store, and the completion client all depend
//! inward on this crate and never on each other's internals, which keeps the
//! request pipeline (classify → match → compose → complete) testable with
//! stub implementations.

pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, KnowledgeError, ProviderError, Result};
pub use message::{Role, Turn};
pub use provider::{CompletionProvider, CompletionRequest, CompletionResponse, GenerationSettings};
