// PersonaAgent: a model-backed responder with a persona and a bounded toolset.
// The model is only reached through `engine::ReasoningEngine`.

pub mod engine;
pub mod executor;
pub mod sanitize;
pub mod tools;

pub use executor::{Persona, PersonaAgent, TaskRequest};
pub use tools::{NotificationTool, Tool};
