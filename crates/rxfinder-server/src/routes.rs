//! HTTP surface: chat page, session API, health, metrics, and
//! local-mode shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{delete, get, post};
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::page;
use crate::session::Bubble;
use crate::state::AppState;

/// How long the shutdown handler waits for the worker's acknowledgment.
pub const SHUTDOWN_ACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Request body for `/api/sessions/{id}/ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// The user's query text.
    pub text: String,
}

/// Request body for `/api/shutdown`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownRequest {
    /// Session requesting the shutdown (receives the acknowledgment).
    pub session_id: String,
}

/// Response for session creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    /// New session identifier.
    pub session_id: String,
}

/// Rendered transcript plus the busy indicator.
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    /// Bubbles, newest pair first.
    pub bubbles: Vec<Bubble>,
    /// Whether a query is awaiting its answer.
    pub busy: bool,
}

/// Status indicator fields for the header.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Discovered tool names (empty until the latch fires).
    pub tool_names: Vec<String>,
    /// Whether a query is awaiting its answer.
    pub busy: bool,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", delete(end_session))
        .route("/api/sessions/{id}/ask", post(ask))
        .route("/api/sessions/{id}/clear", post(clear))
        .route("/api/sessions/{id}/status", get(session_status))
        .route("/api/shutdown", post(shutdown))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render(
        state.settings.server.hosted,
        env!("CARGO_PKG_VERSION"),
    ))
}

async fn health() -> &'static str {
    "OK"
}

async fn render_metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}

async fn create_session(State(state): State<Arc<AppState>>) -> Json<SessionCreated> {
    let session = state.create_session();
    Json(SessionCreated {
        session_id: session.id().to_owned(),
    })
}

async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    if state.remove_session(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<AskRequest>,
) -> Result<Json<TranscriptResponse>, StatusCode> {
    let session = state.session(&id).ok_or(StatusCode::NOT_FOUND)?;
    session
        .submit_query(&state.bridge, &request.text)
        .await
        .map_err(|e| {
            warn!(session_id = %id, error = %e, "submit failed");
            StatusCode::SERVICE_UNAVAILABLE
        })?;
    Ok(Json(TranscriptResponse {
        bubbles: session.render(),
        busy: session.busy(),
    }))
}

async fn clear(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptResponse>, StatusCode> {
    let session = state.session(&id).ok_or(StatusCode::NOT_FOUND)?;
    session.clear();
    Ok(Json(TranscriptResponse {
        bubbles: session.render(),
        busy: session.busy(),
    }))
}

async fn session_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let session = state.session(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(StatusResponse {
        tool_names: session.tool_names(),
        busy: session.busy(),
    }))
}

/// Local-mode only: send the sentinel, wait briefly for the ack, then
/// stop the server. Hidden entirely in hosted deployments.
async fn shutdown(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ShutdownRequest>,
) -> StatusCode {
    if state.settings.server.hosted {
        return StatusCode::NOT_FOUND;
    }
    info!(session_id = %request.session_id, "shutdown requested");

    if let Some(session) = state.session(&request.session_id) {
        if state.bridge.request_shutdown(&request.session_id).is_ok() {
            // Best effort: a missing ack must not block teardown.
            if let Err(e) = session.await_shutdown_ack(SHUTDOWN_ACK_TIMEOUT).await {
                warn!(error = %e, "proceeding with teardown without acknowledgment");
            }
        }
    }
    state.shutdown.cancel();
    StatusCode::ACCEPTED
}
