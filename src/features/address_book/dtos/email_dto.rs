use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Prefilled email form for a contact or a category group
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailFormDto {
    /// Contact full name or category name
    pub group_name: String,
    /// Recipient addresses joined with `;`
    pub email_address: String,
    pub email_subject: String,
    pub email_body: String,
}

/// Message composed by the user; recipients are always resolved server-side
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendEmailDto {
    #[validate(length(min = 1, max = 200, message = "Subject is required"))]
    pub email_subject: String,

    #[validate(length(min = 1, max = 10000, message = "Message body is required"))]
    pub email_body: String,
}

/// Outcome of an email send; failures are reported here rather than raised
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailDispatchResultDto {
    pub sent: bool,
    pub status_message: String,
    /// Where the client should navigate next, carrying the status message
    pub redirect_to: String,
}

/// Status message carried back to a form after a failed send
#[derive(Debug, Deserialize)]
pub struct StatusMessageQuery {
    pub status_message: Option<String>,
}
