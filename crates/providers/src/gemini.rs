//! Gemini provider implementation.
//!
//! Uses Google's Generative Language API (`generateContent` endpoint) with
//! `x-goog-api-key` header authentication. Failures are classified into the
//! typed `ProviderError` variants at the transport layer so callers decide
//! about retries from the error kind, never from message text.

use async_trait::async_trait;
use cocorabot_core::error::ProviderError;
use cocorabot_core::message::{Role, Turn};
use cocorabot_core::provider::{CompletionProvider, CompletionRequest, CompletionResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "gemini".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn to_api_contents(turns: &[Turn]) -> Vec<ApiContent> {
        turns
            .iter()
            .map(|turn| ApiContent {
                role: match turn.role {
                    Role::User => "user",
                    Role::Model => "model",
                },
                parts: vec![ApiPart {
                    text: turn.parts.clone(),
                }],
            })
            .collect()
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );

        let body = ApiRequest {
            contents: Self::to_api_contents(&request.turns),
            generation_config: ApiGenerationConfig {
                temperature: request.generation.temperature,
                top_p: request.generation.top_p,
                top_k: request.generation.top_k,
                max_output_tokens: request.generation.max_output_tokens,
            },
        };

        debug!(provider = "gemini", model = %request.model, turns = request.turns.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid Gemini API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini API error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: ApiResponse = response.json().await.map_err(|e| ProviderError::ApiError {
            status_code: 200,
            message: format!("Failed to parse Gemini response: {e}"),
        })?;

        // A well-formed 200 with no candidates or empty parts is an empty
        // reply, not a transport failure; the caller decides what to answer.
        let text = api_resp
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            text,
            model: request.model,
        })
    }
}

// --- Wire types ---

#[derive(Serialize)]
struct ApiRequest {
    contents: Vec<ApiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: ApiGenerationConfig,
}

#[derive(Serialize)]
struct ApiContent {
    role: &'static str,
    parts: Vec<ApiPart>,
}

#[derive(Serialize, Deserialize)]
struct ApiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Deserialize)]
struct ApiCandidate {
    content: ApiCandidateContent,
}

#[derive(Deserialize)]
struct ApiCandidateContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}
