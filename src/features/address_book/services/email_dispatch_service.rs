use std::sync::Arc;

use crate::features::address_book::dtos::EmailDispatchResultDto;
use crate::modules::email::EmailSender;
use crate::shared::constants::{EMAIL_FAILED_MESSAGE, EMAIL_SENT_MESSAGE};

/// Sends one email and turns the outcome into a status message plus a
/// navigation target. Never retries and never raises.
pub struct EmailDispatchService {
    sender: Arc<dyn EmailSender>,
}

impl EmailDispatchService {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }

    /// On success point back to `list_path`, on failure back to `form_path`
    pub async fn dispatch(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        list_path: &str,
        form_path: &str,
    ) -> EmailDispatchResultDto {
        match self.sender.send_email(to, subject, body).await {
            Ok(()) => {
                tracing::info!("Email '{}' sent", subject);
                EmailDispatchResultDto {
                    sent: true,
                    status_message: EMAIL_SENT_MESSAGE.to_string(),
                    redirect_to: with_status(list_path, EMAIL_SENT_MESSAGE),
                }
            }
            Err(e) => {
                tracing::error!("Failed to send email '{}': {}", subject, e);
                EmailDispatchResultDto {
                    sent: false,
                    status_message: EMAIL_FAILED_MESSAGE.to_string(),
                    redirect_to: with_status(form_path, EMAIL_FAILED_MESSAGE),
                }
            }
        }
    }
}

fn with_status(path: &str, message: &str) -> String {
    format!("{}?status_message={}", path, urlencoding::encode(message))
}
