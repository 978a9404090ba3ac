//! CompletionProvider trait — the abstraction over the generative-text API.
//!
//! A provider knows how to send a composed prompt plus a short history
//! window to an LLM backend and return the generated reply. The gateway
//! calls `complete()` without knowing which backend is configured, which is
//! also what makes the HTTP layer testable with stub providers.

use crate::error::ProviderError;
use crate::message::Turn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Decoding parameters for a completion request.
///
/// The defaults are the conversational settings used for greeting and
/// general-knowledge replies; factual domain replies lower the temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Temperature (0.0 = deterministic, higher = more creative)
    pub temperature: f32,

    /// Nucleus sampling bound
    pub top_p: f32,

    /// Top-k sampling bound
    pub top_k: u32,

    /// Maximum tokens to generate
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 0.1,
            top_k: 16,
            max_output_tokens: 1000,
        }
    }
}

impl GenerationSettings {
    /// Settings for fact-grounded replies: keep the model close to the
    /// supplied knowledge snippets.
    pub fn factual() -> Self {
        Self {
            temperature: 0.3,
            ..Self::default()
        }
    }
}

/// A completion request: the full turn sequence to send, last turn being the
/// composed prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gemini-1.5-flash")
    pub model: String,

    /// Trimmed history window plus the composed prompt as the final user turn
    pub turns: Vec<Turn>,

    /// Decoding parameters
    pub generation: GenerationSettings,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated reply text
    pub text: String,

    /// Which model actually responded
    pub model: String,
}

/// The core completion trait.
///
/// The only backend shipped is Gemini, but the gateway and the retry wrapper
/// are written against this trait so tests can inject counting/failing
/// stubs.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;
}
