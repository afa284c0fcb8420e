//! HTTP chat API.
//!
//! Exposes one orchestrator over HTTP. Turns are serialized behind a mutex
//! because every turn reads and rewrites the same memory file.

use super::ask::UNAVAILABLE_MESSAGE;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::AppsterError;
use crate::orchestrator::Orchestrator;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
pub struct AppState {
    orchestrator: Mutex<Orchestrator>,
    chunks: usize,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        let chunks = orchestrator.index().len();
        Self {
            orchestrator: Mutex::new(orchestrator),
            chunks,
        }
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/history", get(history))
        .route("/clear", post(clear))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;
    let state = Arc::new(AppState::new(orchestrator));
    let app = router(state.clone());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Appster API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Index", &format!("{} chunks", state.chunks));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Chat", "POST /chat");
    Output::kv("History", "GET  /history");
    Output::kv("Clear", "POST /clear");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    info!(%addr, "serving chat API");
    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ChatRequest {
    /// A missing field is treated as an empty question.
    #[serde(default)]
    question: String,
}

#[derive(Serialize, Deserialize)]
struct ChatResponse {
    answer: String,
    context_used: bool,
    context_snippets: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct HistoryResponse {
    history: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "chunks": state.chunks }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let mut orchestrator = state.orchestrator.lock().await;

    match orchestrator.submit_question(&req.question).await {
        Ok(turn) => Json(ChatResponse {
            answer: turn.answer,
            context_used: turn.used_context,
            context_snippets: turn.snippets,
        })
        .into_response(),
        Err(AppsterError::EmptyQuestion) => {
            error_response(StatusCode::BAD_REQUEST, "Question is empty")
        }
        Err(AppsterError::EmbeddingUnavailable { .. }) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_MESSAGE)
        }
        Err(e) => {
            error!(error = %e, "chat turn failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let orchestrator = state.orchestrator.lock().await;
    Json(HistoryResponse {
        history: orchestrator.history().to_string(),
    })
}

async fn clear(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.orchestrator.lock().await.clear_history();
    Json(serde_json::json!({ "status": "cleared" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::embedding::Embedder;
    use crate::error::Result;
    use crate::generation::{GenerationClient, Generator};
    use crate::memory::MemoryStore;
    use crate::orchestrator::RetrievalOptions;
    use crate::rag::PromptComposer;
    use crate::vector_store::{test_chunk, VectorIndex};
    use async_trait::async_trait;

    struct AxisEmbedder;

    #[async_trait]
    impl Embedder for AxisEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("offline") {
                return Err(AppsterError::EmbeddingUnavailable {
                    attempts: 3,
                    reason: "connection refused".to_string(),
                });
            }
            Ok(vec![1.0, 0.0])
        }

        fn model(&self) -> &str {
            "axis"
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok("A loop repeats code.".to_string())
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    async fn spawn_server() -> (String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::new(vec![
            test_chunk(0, "Loops repeat a block.", vec![1.0, 0.0]),
            test_chunk(1, "Functions take arguments.", vec![0.0, 1.0]),
        ])
        .unwrap();

        let orchestrator = Orchestrator::with_components(
            Arc::new(AxisEmbedder),
            GenerationClient::new(Arc::new(EchoGenerator), "fallback"),
            Arc::new(index),
            MemoryStore::new(dir.path().join("chat_history.txt")),
            PromptComposer::new(Prompts::default(), "AppsterGPT"),
            RetrievalOptions::default(),
            1200,
        );

        let app = router(Arc::new(AppState::new(orchestrator)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), dir)
    }

    #[tokio::test]
    async fn test_chat_history_and_clear() {
        let (base, _dir) = spawn_server().await;
        let client = reqwest::Client::new();

        let health: serde_json::Value = client
            .get(format!("{}/health", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["chunks"], 2);

        let resp = client
            .post(format!("{}/chat", base))
            .json(&serde_json::json!({ "question": "What is a loop?" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: ChatResponse = resp.json().await.unwrap();
        assert_eq!(body.answer, "A loop repeats code.");
        assert!(body.context_used);
        assert_eq!(body.context_snippets[0], "Loops repeat a block.");

        let history: HistoryResponse = client
            .get(format!("{}/history", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(history.history.contains("User: What is a loop?"));
        assert!(history.history.contains("AppsterGPT: A loop repeats code."));

        let cleared: serde_json::Value = client
            .post(format!("{}/clear", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(cleared["status"], "cleared");

        let history: HistoryResponse = client
            .get(format!("{}/history", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(history.history.is_empty());
    }

    #[tokio::test]
    async fn test_chat_error_statuses() {
        let (base, _dir) = spawn_server().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{}/chat", base))
            .json(&serde_json::json!({ "question": "   " }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let resp = client
            .post(format!("{}/chat", base))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Question is empty");

        let resp = client
            .post(format!("{}/chat", base))
            .json(&serde_json::json!({ "question": "are you offline?" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 503);

        let history: HistoryResponse = client
            .get(format!("{}/history", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(history.history.is_empty());
    }
}
