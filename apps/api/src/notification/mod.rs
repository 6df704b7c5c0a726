//! NotificationGateway — one-shot email notifications to a fixed recipient.
//!
//! Failures are returned as data. The agent's tool layer turns every outcome
//! into a status string for the model.

use async_trait::async_trait;
use thiserror::Error;

pub mod smtp;

pub use smtp::SmtpNotifier;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Email credentials are not set properly")]
    MisconfiguredCredentials,

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    #[error("Authentication with the mail server failed")]
    AuthFailure,

    #[error("Send failure: {0}")]
    SendFailure(String),
}

/// A single outbound notification. The recipient is fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

/// Sends a notification. Each call is exactly one delivery attempt; retries duplicate mail.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError>;
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every notification instead of sending it.
    #[derive(Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        fail_with: Option<fn() -> NotificationError>,
    }

    impl RecordingNotifier {
        pub fn failing(fail_with: fn() -> NotificationError) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_with: Some(fail_with),
            }
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), body.to_string()));
            match self.fail_with {
                Some(make_err) => Err(make_err()),
                None => Ok(()),
            }
        }
    }
}
