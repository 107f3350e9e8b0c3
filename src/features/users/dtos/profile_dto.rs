use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::models::AppUser;

/// Current user's profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponseDto {
    /// Identity provider subject
    pub id: String,
    /// From the access token, when the provider includes it
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    /// Absent until the user first saves something
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfileResponseDto {
    pub fn new(user: &AuthenticatedUser, row: Option<AppUser>) -> Self {
        match row {
            Some(row) => Self {
                id: row.id.clone(),
                email: user.email.clone(),
                full_name: row.full_name(),
                first_name: row.first_name,
                last_name: row.last_name,
                created_at: Some(row.created_at),
            },
            None => Self {
                id: user.sub.clone(),
                email: user.email.clone(),
                first_name: None,
                last_name: None,
                full_name: None,
                created_at: None,
            },
        }
    }
}

/// Request DTO for updating the profile names
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 2, max = 50, message = "First name must be 2-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 50, message = "Last name must be 2-50 characters"))]
    pub last_name: String,
}
