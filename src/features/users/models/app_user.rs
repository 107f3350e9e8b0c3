use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Address book owner, keyed by the identity provider's subject
#[derive(Debug, Clone, FromRow)]
pub struct AppUser {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppUser {
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        }
    }
}
