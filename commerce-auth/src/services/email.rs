//! Notifier: outbound email delivery.
//!
//! The core calls the notifier with fully rendered content; SMTP transport
//! details stay behind the trait.

use async_trait::async_trait;
use commerce_core::error::AppError;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use std::time::Duration;

use crate::config::SmtpConfig;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), anyhow::Error>;
}

#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: SmtpTransport,
    from_email: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = SmtpTransport::relay(&config.host)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e.to_string())))?
            .credentials(creds)
            .port(config.port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, "Email notifier initialized");

        Ok(Self {
            mailer,
            from_email: config.from_email.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), anyhow::Error> {
        let email = Message::builder()
            .from(self.from_email.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        // The smtp transport is blocking; keep it off the async runtime
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email)).await?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to, subject = %subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, to = %to, "Failed to send email");
                Err(anyhow::anyhow!("Failed to send email: {}", e))
            }
        }
    }
}

/// A delivered email captured by the mock notifier.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Test notifier that records what would have been sent.
#[derive(Default)]
pub struct MockNotifier {
    pub sent: std::sync::Mutex<Vec<SentEmail>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_to(&self, to: &str) -> Vec<SentEmail> {
        self.sent
            .lock()
            .expect("mock notifier mutex poisoned")
            .iter()
            .filter(|m| m.to == to)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), anyhow::Error> {
        self.sent
            .lock()
            .map_err(|e| anyhow::anyhow!("Mock notifier mutex poisoned: {}", e))?
            .push(SentEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_notifier_creation() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "test@example.com".to_string(),
            password: "test_password".to_string(),
            from_email: "no-reply@example.com".to_string(),
        };

        assert!(SmtpNotifier::new(&config).is_ok());
    }

    #[tokio::test]
    async fn mock_notifier_records_sent_mail() {
        let notifier = MockNotifier::new();
        notifier
            .send("jane@example.com", "Hello", "<p>Hi</p>")
            .await
            .unwrap();

        let sent = notifier.sent_to("jane@example.com");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Hello");
    }
}
