//! # Cocorabot Knowledge
//!
//! The request-classification and knowledge-lookup pipeline:
//!
//! - [`model`] — FAQ/metadata entries, the on-disk document shape, and the
//!   closed set of topical categories with their keyword lists.
//! - [`store`] — loading the knowledge base (JSON document or a directory of
//!   text documents) and the [`store::KnowledgeHandle`] that exposes its
//!   load state to the gateway.
//! - [`classifier`] — text normalization and intent classification
//!   (greeting / domain / general).
//! - [`matcher`] — direct-match and per-category relevance lookup.
//! - [`composer`] — per-intent prompt assembly around the Condorito persona.
//!
//! Everything downstream of the store is a pure function: same store and
//! question, same result. Nothing in this crate performs I/O after load.

pub mod classifier;
pub mod composer;
pub mod matcher;
pub mod model;
pub mod store;

pub use classifier::{Intent, classify, normalize};
pub use composer::{ComposedPrompt, compose, generation_settings};
pub use matcher::{MatchResult, RankedEntry, match_context};
pub use model::{Category, FaqEntry, KnowledgeDocument};
pub use store::{KnowledgeBase, KnowledgeHandle};
