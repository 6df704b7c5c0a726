//! TurnOrchestrator — turns (history, message) into one agent execution.
//!
//! Never fails: agent errors come back as an `Error: ...` reply.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::agent::{PersonaAgent, TaskRequest};
use crate::chat::prompts::{CONTEXT_SECTION_TEMPLATE, EXPECTED_OUTPUT_TEMPLATE, TURN_TASK_TEMPLATE};
use crate::chat::session::ChatSession;
use crate::models::conversation::ConversationTurn;

pub struct TurnOrchestrator {
    agent: PersonaAgent,
}

impl TurnOrchestrator {
    pub fn new(agent: PersonaAgent) -> Self {
        Self { agent }
    }

    pub fn persona_name(&self) -> &str {
        &self.agent.persona().name
    }

    /// Produces the assistant reply for `message` given the prior `history`.
    pub async fn respond(&self, history: &[ConversationTurn], message: &str) -> String {
        let task = build_task(self.persona_name(), history, message);
        info!("Running turn with {} prior turns", history.len());

        match self.agent.execute(&task).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Turn failed: {e}");
                format!("Error: {e}")
            }
        }
    }
}

/// Runs a turn on its own task so a slow model call never blocks the caller's executor thread.
pub async fn run_turn(
    orchestrator: Arc<TurnOrchestrator>,
    history: Vec<ConversationTurn>,
    message: String,
) -> String {
    let handle = tokio::spawn(async move { orchestrator.respond(&history, &message).await });
    match handle.await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Turn task aborted: {e}");
            format!("Error: {e}")
        }
    }
}

/// Runs a session turn on its own task. The task holds the session lock for the
/// whole turn and records both sides itself, so a dropped caller cannot leave a
/// sent notification without its turn in the history.
pub async fn run_session_turn(
    orchestrator: Arc<TurnOrchestrator>,
    session: Arc<Mutex<ChatSession>>,
    message: String,
) -> (String, Vec<ConversationTurn>) {
    let task_session = session.clone();
    let handle = tokio::spawn(async move {
        let mut session = task_session.lock().await;
        let history = session.turns().to_vec();
        let reply = orchestrator.respond(&history, &message).await;
        session.record_turn(message, reply.clone());
        (reply, session.turns().to_vec())
    });

    match handle.await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Session turn task aborted: {e}");
            let turns = session.lock().await.turns().to_vec();
            (format!("Error: {e}"), turns)
        }
    }
}

/// Renders a history as one `User: ...` / `Assistant: ...` line per turn, in order.
/// Line breaks inside a turn are folded into spaces.
pub fn flatten_history(history: &[ConversationTurn]) -> String {
    history
        .iter()
        .map(|turn| {
            let content = turn.content.lines().collect::<Vec<_>>().join(" ");
            format!("{}: {}\n", turn.role.label(), content)
        })
        .collect()
}

pub fn build_task(name: &str, history: &[ConversationTurn], message: &str) -> TaskRequest {
    let context_section = if history.is_empty() {
        String::new()
    } else {
        CONTEXT_SECTION_TEMPLATE.replace("{transcript}", &flatten_history(history))
    };

    // The message goes in last so braces inside it are never treated as placeholders.
    let body = TURN_TASK_TEMPLATE
        .replace("{name}", name)
        .replace("{message}", message);
    let instructions = format!("{context_section}{body}");

    TaskRequest {
        instructions,
        expected_output: EXPECTED_OUTPUT_TEMPLATE.replace("{name}", name),
    }
}
