// Chat: turn orchestration, in-memory sessions and the HTTP surface for both.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod session;
