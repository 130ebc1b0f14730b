//! Outbound mail.
//!
//! Delivery goes through a JSON relay endpoint when `MAIL_API_URL` is
//! configured; otherwise the log-only mailer prints the message so local
//! setups can copy setup links out of the server log.

use async_trait::async_trait;
use serde::Serialize;

use super::ports::{MailError, MailerPort, OutboundMail};

pub struct RestMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl RestMailer {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl MailerPort for RestMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&RelayRequest {
                from: &self.from,
                to: &mail.to,
                subject: &mail.subject,
                text: &mail.body,
            })
            .send()
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Delivery(format!(
                "relay returned {}",
                response.status()
            )));
        }
        tracing::info!(to = %mail.to, subject = %mail.subject, "Sent mail via relay");
        Ok(())
    }
}

/// Logs instead of sending. The body contains the setup/reset link.
pub struct LogMailer;

#[async_trait]
impl MailerPort for LogMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "Mail relay not configured, logging message instead"
        );
        Ok(())
    }
}
