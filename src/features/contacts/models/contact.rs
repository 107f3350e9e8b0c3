use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for contacts
#[derive(Debug, Clone, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub owner_id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    /// Two-letter state code
    pub state: String,
    pub zip_code: i32,
    pub email: String,
    pub phone_number: String,
    pub image_data: Option<Vec<u8>>,
    pub image_type: Option<String>,
    /// Optimistic concurrency token, bumped on every update
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data for inserting a new contact
#[derive(Debug, Clone)]
pub struct NewContact {
    pub owner_id: String,
    pub fields: ContactFields,
}

/// Editable scalar fields shared by create and update
#[derive(Debug, Clone)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: i32,
    pub email: String,
    pub phone_number: String,
}
