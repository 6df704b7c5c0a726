//! Tools the agent may invoke. A tool's result is always text, success or failure.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::agent::engine::ToolSpec;
use crate::notification::{NotificationError, Notifier};

pub const SEND_EMAIL_TOOL: &str = "send_email";

pub const EMAIL_SENT: &str = "Email sent successfully!";
pub const EMAIL_CREDENTIALS_MISSING: &str = "Email credentials are not set properly.";

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the arguments object.
    fn input_schema(&self) -> Value;

    /// Side-effecting tools that must run at most once per agent execution.
    fn once_per_execution(&self) -> bool {
        false
    }

    async fn invoke(&self, args: Value) -> String;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.input_schema(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SendEmailArgs {
    subject: String,
    message: String,
}

/// Sends a notification email through the configured gateway.
pub struct NotificationTool {
    notifier: Arc<dyn Notifier>,
}

impl NotificationTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Tool for NotificationTool {
    fn name(&self) -> &str {
        SEND_EMAIL_TOOL
    }

    fn description(&self) -> &str {
        "Sends an email to the site owner with the specified subject and message. \
         Returns a status message indicating success or failure."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subject": {"type": "string", "description": "The email subject line."},
                "message": {"type": "string", "description": "The body message of the email."}
            },
            "required": ["subject", "message"],
            "additionalProperties": false
        })
    }

    fn once_per_execution(&self) -> bool {
        true
    }

    async fn invoke(&self, args: Value) -> String {
        let args: SendEmailArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => {
                warn!("Rejected {SEND_EMAIL_TOOL} call with bad arguments: {e}");
                return format!("Invalid arguments for {SEND_EMAIL_TOOL}: {e}");
            }
        };

        info!("Agent requested notification '{}'", args.subject);
        match self.notifier.notify(&args.subject, &args.message).await {
            Ok(()) => EMAIL_SENT.to_string(),
            Err(NotificationError::MisconfiguredCredentials) => EMAIL_CREDENTIALS_MISSING.to_string(),
            Err(e) => format!("Failed to send email: {e}"),
        }
    }
}
