use std::sync::Arc;

use crate::chat::orchestrator::TurnOrchestrator;
use crate::chat::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup around the immutable profile.
    pub orchestrator: Arc<TurnOrchestrator>,
    pub sessions: Arc<SessionStore>,
}
