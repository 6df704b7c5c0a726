//! Axum route handlers for the chat API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::orchestrator::{run_session_turn, run_turn};
use crate::chat::session::ChatSession;
use crate::errors::AppError;
use crate::models::conversation::ConversationTurn;
use crate::profile::prompts::{EXAMPLE_PROMPTS, PAGE_DESCRIPTION, PAGE_TITLE_TEMPLATE};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PersonaInfoResponse {
    pub name: String,
    pub title: String,
    pub description: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SessionMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionMessageResponse {
    pub reply: String,
    pub turns: Vec<ConversationTurn>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/persona
pub async fn handle_persona_info(State(state): State<AppState>) -> Json<PersonaInfoResponse> {
    let name = state.orchestrator.persona_name();
    Json(PersonaInfoResponse {
        name: name.to_string(),
        title: PAGE_TITLE_TEMPLATE.replace("{name}", name),
        description: PAGE_DESCRIPTION.to_string(),
        examples: EXAMPLE_PROMPTS.iter().map(|p| p.to_string()).collect(),
    })
}

/// POST /api/v1/chat
///
/// Stateless turn: the caller owns and sends the history.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    validate_message(&request.message)?;

    let reply = run_turn(state.orchestrator.clone(), request.history, request.message).await;
    Ok(Json(ChatResponse { reply }))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session = state.sessions.create();
    info!(
        "Created chat session {} ({} active)",
        session.session_id,
        state.sessions.len()
    );
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.session_id,
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ChatSession>, AppError> {
    let handle = state
        .sessions
        .get(session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    let session = handle.lock().await.clone();
    Ok(Json(session))
}

/// POST /api/v1/sessions/:id/messages
///
/// Runs a turn against the session's history and appends both sides of it.
pub async fn handle_session_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SessionMessageRequest>,
) -> Result<Json<SessionMessageResponse>, AppError> {
    validate_message(&request.message)?;

    let handle = state
        .sessions
        .get(session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let (reply, turns) =
        run_session_turn(state.orchestrator.clone(), handle, request.message).await;

    Ok(Json(SessionMessageResponse { reply, turns }))
}

fn validate_message(message: &str) -> Result<(), AppError> {
    if message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    Ok(())
}
