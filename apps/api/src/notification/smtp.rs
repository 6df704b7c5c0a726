//! SMTP notifier over STARTTLS.
//!
//! Every call builds its own transport: connect, STARTTLS, AUTH, send, QUIT.
//! The transport is built without connection pooling, so the session is closed
//! on every exit path and dropped with the call.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::{
        authentication::Credentials,
        response::{Category, Severity},
    },
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::NotificationConfig;
use crate::notification::{NotificationError, NotificationRequest, Notifier};

/// Email notifier backed by an authenticated SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    config: NotificationConfig,
}

impl SmtpNotifier {
    pub fn new(config: NotificationConfig) -> Self {
        if !config.has_credentials() {
            warn!("Email credentials are incomplete; notifications will be reported as failed");
        }
        Self { config }
    }

    /// Assembles the request, or reports missing credentials before any I/O.
    fn request(&self, subject: &str, body: &str) -> Result<NotificationRequest, NotificationError> {
        let recipient = self
            .config
            .recipient
            .clone()
            .ok_or(NotificationError::MisconfiguredCredentials)?;
        if !self.config.has_credentials() {
            return Err(NotificationError::MisconfiguredCredentials);
        }
        Ok(NotificationRequest {
            subject: subject.to_string(),
            body: body.to_string(),
            recipient,
        })
    }

    fn build_message(
        &self,
        sender: &str,
        request: &NotificationRequest,
    ) -> Result<Message, NotificationError> {
        let from: Mailbox = sender
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                NotificationError::SendFailure(format!("invalid sender address: {e}"))
            })?;
        let to: Mailbox = request
            .recipient
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                NotificationError::SendFailure(format!("invalid recipient address: {e}"))
            })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&request.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(request.body.clone())
            .map_err(|e| NotificationError::SendFailure(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        let request = self.request(subject, body)?;
        let (Some(sender), Some(secret)) = (&self.config.sender, &self.config.secret) else {
            return Err(NotificationError::MisconfiguredCredentials);
        };

        let message = self.build_message(sender, &request)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| NotificationError::TransportFailure(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(sender.clone(), secret.clone()))
            .build();

        info!(
            "Sending notification '{}' via {}:{}",
            request.subject, self.config.smtp_host, self.config.smtp_port
        );

        match transport.send(message).await {
            Ok(_) => {
                info!("Notification '{}' delivered", request.subject);
                Ok(())
            }
            Err(e) => {
                let err = classify_smtp_error(e);
                warn!("Notification '{}' failed: {err}", request.subject);
                Err(err)
            }
        }
    }
}

/// Maps a lettre SMTP error onto the gateway's failure taxonomy.
///
/// 5.3.x replies (530/534/535) come back from AUTH; other server replies are
/// treated as send failures; everything without a reply code is transport-level.
fn classify_smtp_error(e: lettre::transport::smtp::Error) -> NotificationError {
    if let Some(code) = e.status() {
        if matches!(
            (code.severity, code.category),
            (Severity::PermanentNegativeCompletion, Category::Unspecified3)
        ) {
            return NotificationError::AuthFailure;
        }
    }
    if e.is_transient() || e.is_permanent() {
        NotificationError::SendFailure(e.to_string())
    } else {
        NotificationError::TransportFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::net::TcpListener;

    use super::*;

    fn config(port: u16) -> NotificationConfig {
        NotificationConfig {
            sender: Some("me@example.com".to_string()),
            secret: Some("app-password".to_string()),
            recipient: Some("inbox@example.com".to_string()),
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: port,
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_never_connects() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        for unset in 0..3 {
            let mut cfg = config(port);
            match unset {
                0 => cfg.sender = None,
                1 => cfg.secret = None,
                _ => cfg.recipient = None,
            }

            let err = SmtpNotifier::new(cfg)
                .notify("Unanswered Question", "body")
                .await
                .unwrap_err();
            assert!(matches!(err, NotificationError::MisconfiguredCredentials));
        }

        let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(accepted.is_err(), "no connection should have been attempted");
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_transport_failure() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = SmtpNotifier::new(config(port))
            .notify("New Contact: Jane", "jane@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::TransportFailure(_)), "{err:?}");
    }

    #[test]
    fn test_invalid_sender_is_send_failure() {
        let mut cfg = config(587);
        cfg.sender = Some("not an address".to_string());
        let notifier = SmtpNotifier::new(cfg);

        let request = notifier.request("Subject", "Body").unwrap();
        let err = notifier
            .build_message("not an address", &request)
            .unwrap_err();
        assert!(matches!(err, NotificationError::SendFailure(_)));
    }

    #[test]
    fn test_message_carries_subject_and_recipient() {
        let notifier = SmtpNotifier::new(config(587));
        let request = notifier.request("New Contact: Jane", "Email: jane@example.com").unwrap();
        assert_eq!(request.recipient, "inbox@example.com");

        let message = notifier.build_message("me@example.com", &request).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: New Contact: Jane"));
        assert!(raw.contains("To: inbox@example.com"));
        assert!(raw.contains("jane@example.com"));
    }
}
