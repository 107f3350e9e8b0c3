//! Outgoing email
//!
//! The rest of the crate only sees [`EmailSender`]. Recipients are passed as a
//! single string; several addresses are joined with `;`.

mod client;

use async_trait::async_trait;
use thiserror::Error;

pub use client::{DisabledEmailSender, HttpEmailClient};

use crate::shared::constants::EMAIL_ADDRESS_SEPARATOR;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Email delivery is not configured")]
    Disabled,

    #[error("No valid recipient in '{0}'")]
    NoRecipients(String),

    #[error("Email transport failed: {0}")]
    Transport(String),

    #[error("Email provider rejected the message: HTTP {status} {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str)
        -> Result<(), NotificationError>;
}

/// Split a `;`-joined recipient string into trimmed, non-empty addresses
pub fn parse_recipients(to: &str) -> Vec<String> {
    to.split(EMAIL_ADDRESS_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
