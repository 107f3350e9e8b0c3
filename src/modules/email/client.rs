use async_trait::async_trait;
use serde::Serialize;

use super::{parse_recipients, EmailSender, NotificationError};
use crate::core::config::EmailConfig;

#[derive(Debug, Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: EmailAddress<'a>,
    to: Vec<EmailAddress<'a>>,
    subject: &'a str,
    text: &'a str,
}

/// Sends mail through an HTTP email API (`POST {api_url}` with a bearer key)
pub struct HttpEmailClient {
    api_url: String,
    api_key: String,
    from_address: String,
    from_name: String,
    http_client: reqwest::Client,
}

impl HttpEmailClient {
    /// Build the client; `None` when no provider is configured
    pub fn from_config(config: &EmailConfig) -> Result<Option<Self>, NotificationError> {
        let (Some(api_url), Some(api_key)) = (&config.api_url, &config.api_key) else {
            return Ok(None);
        };

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        Ok(Some(Self {
            api_url: api_url.clone(),
            api_key: api_key.clone(),
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            http_client,
        }))
    }
}

#[async_trait]
impl EmailSender for HttpEmailClient {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let recipients = parse_recipients(to);
        if recipients.is_empty() {
            return Err(NotificationError::NoRecipients(to.to_string()));
        }

        let request = SendEmailRequest {
            from: EmailAddress {
                email: &self.from_address,
                name: Some(&self.from_name),
            },
            to: recipients
                .iter()
                .map(|email| EmailAddress { email, name: None })
                .collect(),
            subject,
            text: body,
        };

        tracing::debug!(
            "Sending email to {} recipient(s) via {}",
            recipients.len(),
            self.api_url
        );

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach email provider: {}", e);
                NotificationError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Email provider error: HTTP {} - {}", status, body);
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Used when no provider is configured; every send fails
pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send_email(
        &self,
        to: &str,
        _subject: &str,
        _body: &str,
    ) -> Result<(), NotificationError> {
        tracing::warn!("Email to '{}' dropped: no email provider configured", to);
        Err(NotificationError::Disabled)
    }
}
