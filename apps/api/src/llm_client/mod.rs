/// LLM Client — the single point of entry for all model calls.
///
/// ARCHITECTURAL RULE: No other module may call the model endpoint directly.
/// The agent reaches the model only through the `ReasoningEngine` impl below.
///
/// Backend: Azure OpenAI chat completions with function-style tool calling.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::agent::engine::{AgentMessage, ReasoningEngine, ReasoningRequest, Step, ToolCall, ToolSpec};
use crate::config::ModelConfig;

pub mod prompts;

const MAX_TOKENS: u32 = 1024;
const MAX_RATE_LIMIT_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Model credentials are not configured (AZURE_API_BASE / AZURE_API_KEY)")]
    MissingCredentials,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionSpec<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunctionSpec<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded arguments, as the API sends them.
    arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ChatResponse {
    /// Converts the first choice into an agent step.
    fn into_step(self) -> Result<Step, LlmError> {
        let message = self
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyContent)?
            .message;

        if !message.tool_calls.is_empty() {
            let calls = message
                .tool_calls
                .into_iter()
                .map(|call| ToolCall {
                    id: call.id,
                    name: call.function.name,
                    // Keep malformed arguments as a raw string; the tool reports it back.
                    arguments: serde_json::from_str(&call.function.arguments)
                        .unwrap_or(serde_json::Value::String(call.function.arguments)),
                })
                .collect();
            return Ok(Step::CallTools {
                content: message.content.filter(|c| !c.trim().is_empty()),
                calls,
            });
        }

        match message.content {
            Some(text) if !text.trim().is_empty() => Ok(Step::Final(text)),
            _ => Err(LlmError::EmptyContent),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by the agent.
/// Wraps Azure OpenAI chat completions with retry logic and tool-call decoding.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: ModelConfig,
}

impl LlmClient {
    pub fn new(config: ModelConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn deployment(&self) -> &str {
        &self.config.deployment
    }

    fn endpoint(&self, api_base: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            api_base.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }

    /// Makes a raw chat-completions call.
    /// Only 429 (rate limit) is retried, with exponential backoff; the request was
    /// never processed, so a retry cannot duplicate work. Every other failure is
    /// returned to the caller at once.
    pub async fn call(&self, request: &ReasoningRequest) -> Result<ChatResponse, LlmError> {
        let (Some(api_base), Some(api_key)) = (&self.config.api_base, &self.config.api_key) else {
            return Err(LlmError::MissingCredentials);
        };
        let url = self.endpoint(api_base);
        let request_body = to_wire(request);

        for attempt in 0..MAX_RATE_LIMIT_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call rate limited (attempt {}), retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("api-key", api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await?;

            let status = response.status();

            if status.as_u16() == 429 {
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(LlmError::RateLimited {
            retries: MAX_RATE_LIMIT_RETRIES,
        })
    }
}

#[async_trait]
impl ReasoningEngine for LlmClient {
    async fn next_step(&self, request: &ReasoningRequest) -> Result<Step, LlmError> {
        self.call(request).await?.into_step()
    }
}

fn to_wire(request: &ReasoningRequest) -> ChatRequest<'_> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    messages.push(WireMessage {
        role: "system",
        content: Some(&request.system),
        tool_calls: Vec::new(),
        tool_call_id: None,
    });

    for message in &request.messages {
        messages.push(match message {
            AgentMessage::User(text) => WireMessage {
                role: "user",
                content: Some(text),
                tool_calls: Vec::new(),
                tool_call_id: None,
            },
            AgentMessage::Assistant {
                content,
                tool_calls,
            } => WireMessage {
                role: "assistant",
                content: content.as_deref(),
                tool_calls: tool_calls
                    .iter()
                    .map(|call| WireToolCall {
                        id: call.id.clone(),
                        kind: function_kind(),
                        function: WireFunctionCall {
                            name: call.name.clone(),
                            arguments: call.arguments.to_string(),
                        },
                    })
                    .collect(),
                tool_call_id: None,
            },
            AgentMessage::ToolResult { call_id, content } => WireMessage {
                role: "tool",
                content: Some(content),
                tool_calls: Vec::new(),
                tool_call_id: Some(call_id),
            },
        });
    }

    ChatRequest {
        messages,
        tools: request.tools.iter().map(wire_tool).collect(),
        max_tokens: MAX_TOKENS,
    }
}

fn wire_tool(spec: &ToolSpec) -> WireTool<'_> {
    WireTool {
        kind: "function",
        function: WireFunctionSpec {
            name: &spec.name,
            description: &spec.description,
            parameters: &spec.parameters,
        },
    }
}
