//! HTTP API gateway for Cocorabot.
//!
//! Exposes the chat endpoint and a health check:
//!
//! - `POST /chat`   — classify + match + compose, forward to the model,
//!   return the answer with the updated history
//! - `GET  /health` — liveness plus knowledge-store readiness
//!
//! Built on Axum. Each request is processed sequentially (classify → match →
//! compose → complete); the only shared state is the read-only knowledge
//! handle, so concurrent requests never contend.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use cocorabot_core::error::ProviderError;
use cocorabot_core::message::{Turn, recent_window};
use cocorabot_core::provider::{CompletionProvider, CompletionRequest};
use cocorabot_knowledge::{
    KnowledgeBase, KnowledgeHandle, classifier, compose, generation_settings, match_context,
};
use cocorabot_providers::{GeminiProvider, RetryPolicy, complete_with_backoff};

/// Shared application state for the gateway.
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub knowledge: KnowledgeHandle,
    pub model: String,
    pub retry: RetryPolicy,
    pub history_window: usize,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

pub type SharedState = Arc<AppState>;

/// Served when the model returns an empty reply or declines with its own
/// "no information" phrasing; the caller still gets a 200.
const FALLBACK_ANSWER: &str =
    "Lo siento, no tengo información sobre eso. ¿Puedo ayudarte con otra cosa?";

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Refuses to start without an API credential; the knowledge store loads in
/// the background and requests arriving before it resolves are served with
/// an empty store.
pub async fn start(config: cocorabot_config::AppConfig) -> cocorabot_core::Result<()> {
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| cocorabot_core::Error::Config {
            message: "No completion API key configured — set COCORABOT_API_KEY or GEMINI_API_KEY"
                .into(),
        })?;

    let provider: Arc<dyn CompletionProvider> = Arc::new(GeminiProvider::new(api_key));
    let knowledge = KnowledgeHandle::spawn_load(config.knowledge.path.clone());

    let state = Arc::new(AppState {
        provider,
        knowledge,
        model: config.model.clone(),
        retry: RetryPolicy {
            max_attempts: config.completion.max_attempts,
            base_delay: Duration::from_millis(config.completion.base_delay_ms),
        },
        history_window: config.completion.history_window,
        start_time: chrono::Utc::now(),
    });

    let app = build_router(state);
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    info!(addr = %addr, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| cocorabot_core::Error::Internal(format!("Failed to bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| cocorabot_core::Error::Internal(e.to_string()))?;

    Ok(())
}

// --- Wire types ---

#[derive(Deserialize)]
pub struct ChatRequest {
    /// The user's question. Required; validated by the handler so a missing
    /// field gets the same 400 as an empty one.
    #[serde(default)]
    pub question: Option<String>,

    /// Prior conversation turns, owned by the caller and echoed back.
    #[serde(default)]
    pub history: Vec<Turn>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub history: Vec<Turn>,
    /// "json+ai" when knowledge-base content contributed to the prompt,
    /// "ai" otherwise.
    pub source: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<Vec<Turn>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    knowledge_ready: bool,
    knowledge_entries: usize,
    uptime_secs: i64,
}

// --- Handlers ---

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorBody>)> {
    let question = payload.question.as_deref().map(str::trim).unwrap_or("");
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "La pregunta es obligatoria.".into(),
                history: None,
            }),
        ));
    }

    let normalized = classifier::normalize(question);
    let intent = classifier::classify_normalized(&normalized);

    // Unready or failed store degrades to empty matching; classification and
    // matching never produce a non-200 response.
    let loaded = state.knowledge.get();
    let empty = KnowledgeBase::empty();
    let base: &KnowledgeBase = loaded.as_deref().unwrap_or(&empty);

    let matches = match_context(base, &normalized);
    let prompt = compose(intent, &matches, question);
    let source = if prompt.used_knowledge { "json+ai" } else { "ai" };

    info!(
        intent = intent.as_str(),
        direct_matches = matches.direct.len(),
        source,
        question_len = question.len(),
        "Chat request"
    );

    let mut turns = recent_window(&payload.history, state.history_window).to_vec();
    turns.push(Turn::user(prompt.text));

    let request = CompletionRequest {
        model: state.model.clone(),
        turns,
        generation: generation_settings(intent),
    };

    match complete_with_backoff(state.provider.as_ref(), request, &state.retry).await {
        Ok(response) => {
            let answer = if response.text.trim().is_empty()
                || response.text.contains("no hay información")
            {
                FALLBACK_ANSWER.to_string()
            } else {
                response.text
            };
            let mut history = payload.history;
            history.push(Turn::model(answer.clone()));
            Ok(Json(ChatResponse {
                answer,
                history,
                source: source.into(),
            }))
        }
        Err(e @ ProviderError::RateLimited { .. }) => {
            warn!(question, error = %e, "Completion rate limited after retries");
            Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorBody {
                    error: "El servicio está saturado; inténtalo de nuevo en unos segundos.".into(),
                    history: Some(payload.history),
                }),
            ))
        }
        Err(e) => {
            error!(question, error = %e, "Completion failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Error interno del servidor.".into(),
                    history: Some(payload.history),
                }),
            ))
        }
    }
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        knowledge_ready: state.knowledge.ready(),
        knowledge_entries: state.knowledge.entry_count(),
        uptime_secs: (chrono::Utc::now() - state.start_time).num_seconds(),
    })
}
