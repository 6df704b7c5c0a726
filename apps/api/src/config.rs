use anyhow::{Context, Result};

use crate::chat::session::DEFAULT_MAX_SESSIONS;

const DEFAULT_PERSONA_NAME: &str = "Sudarkodi S";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_MODEL_API_VERSION: &str = "2024-12-01-preview";
const DEFAULT_MODEL_DEPLOYMENT: &str = "gpt-4o";

/// Application configuration loaded from environment variables.
///
/// Credentials are optional at startup: missing mail credentials turn the
/// notification tool into a reported no-op, missing model credentials fail
/// every turn with a textual error.
#[derive(Debug, Clone)]
pub struct Config {
    pub persona_name: String,
    pub resume_path: String,
    pub summary_path: String,
    pub notification: NotificationConfig,
    pub model: ModelConfig,
    pub max_tool_rounds: usize,
    pub max_sessions: usize,
    pub port: u16,
    pub rust_log: String,
}

/// Sender/recipient settings for the SMTP notification gateway.
#[derive(Clone, Default)]
pub struct NotificationConfig {
    pub sender: Option<String>,
    pub secret: Option<String>,
    pub recipient: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
}

// Hand-written so the app password never lands in logs.
impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("sender", &self.sender)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("recipient", &self.recipient)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

/// Azure OpenAI endpoint settings for the reasoning engine.
#[derive(Clone, Default)]
pub struct ModelConfig {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub api_version: String,
    pub deployment: String,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            persona_name: env_or("PERSONA_NAME", DEFAULT_PERSONA_NAME),
            resume_path: env_or("RESUME_PATH", "files/resume.pdf"),
            summary_path: env_or("SUMMARY_PATH", "files/summary.txt"),
            notification: NotificationConfig {
                sender: optional_env("GMAIL_USER"),
                secret: optional_env("GMAIL_APP_PASSWORD"),
                recipient: optional_env("NOTIFICATION_EMAIL"),
                smtp_host: env_or("SMTP_HOST", DEFAULT_SMTP_HOST),
                smtp_port: parse_env("SMTP_PORT", 587)?,
            },
            model: ModelConfig {
                api_base: optional_env("AZURE_API_BASE"),
                api_key: optional_env("AZURE_API_KEY"),
                api_version: env_or("AZURE_API_VERSION", DEFAULT_MODEL_API_VERSION),
                deployment: env_or("AZURE_DEPLOYMENT", DEFAULT_MODEL_DEPLOYMENT),
            },
            max_tool_rounds: parse_env("MAX_TOOL_ROUNDS", 3)?,
            max_sessions: parse_env("MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

impl NotificationConfig {
    /// True when sender, secret and recipient are all present.
    pub fn has_credentials(&self) -> bool {
        self.sender.is_some() && self.secret.is_some() && self.recipient.is_some()
    }
}

/// Reads an env var, treating empty or whitespace-only values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_credentials_requires_all_three() {
        let mut cfg = NotificationConfig {
            sender: Some("me@example.com".to_string()),
            secret: Some("app-password".to_string()),
            recipient: None,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: 587,
        };
        assert!(!cfg.has_credentials());

        cfg.recipient = Some("inbox@example.com".to_string());
        assert!(cfg.has_credentials());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cfg = NotificationConfig {
            secret: Some("hunter2".to_string()),
            ..Default::default()
        };
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));

        let model = ModelConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{model:?}").contains("sk-secret"));
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("PERSONA_API_TEST_UNSET_PORT", 4242).unwrap();
        assert_eq!(value, 4242);
    }
}
