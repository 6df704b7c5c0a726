//! ReasoningEngine — the seam between the agent loop and the model.
//!
//! Production uses `LlmClient`; tests plug in scripted engines so the
//! dispatch logic runs without a live model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::LlmError;

/// A tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: Value,
}

/// A model-chosen tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// One entry of the agent's working transcript for a single execution.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentMessage {
    User(String),
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
    },
    ToolResult {
        call_id: String,
        content: String,
    },
}

/// Everything the engine sees when planning its next step.
#[derive(Debug, Clone)]
pub struct ReasoningRequest {
    pub system: String,
    pub messages: Vec<AgentMessage>,
    /// Empty when tool use is no longer allowed.
    pub tools: Vec<ToolSpec>,
}

/// The engine's decision for one planning round.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Final(String),
    CallTools {
        content: Option<String>,
        calls: Vec<ToolCall>,
    },
}

#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn next_step(&self, request: &ReasoningRequest) -> Result<Step, LlmError>;
}
