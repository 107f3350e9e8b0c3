use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for category
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    /// Optimistic concurrency token, bumped on every update
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a new category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub owner_id: String,
    pub name: String,
}
