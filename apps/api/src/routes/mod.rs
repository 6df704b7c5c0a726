pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/persona", get(handlers::handle_persona_info))
        // Stateless chat: caller sends the history
        .route("/api/v1/chat", post(handlers::handle_chat))
        // Server-held sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/sessions/:id/messages",
            post(handlers::handle_session_message),
        )
        .with_state(state)
}
