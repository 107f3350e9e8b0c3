use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategorySummaryDto;
use crate::features::contacts::models::{Contact, ContactFields, UsState};
use crate::shared::validation::{validate_not_blank, PHONE_REGEX};

/// Request DTO for creating a contact
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateContactDto {
    #[validate(
        length(min = 2, max = 50, message = "First name must be 2-50 characters"),
        custom(function = "validate_not_blank", message = "First name is required")
    )]
    pub first_name: String,

    #[validate(
        length(min = 2, max = 50, message = "Last name must be 2-50 characters"),
        custom(function = "validate_not_blank", message = "Last name is required")
    )]
    pub last_name: String,

    #[schema(value_type = Option<String>, format = Date, example = "1990-04-21")]
    pub birth_date: Option<NaiveDate>,

    #[validate(
        length(min = 1, max = 100, message = "Address is required"),
        custom(function = "validate_not_blank", message = "Address is required")
    )]
    pub address1: String,

    #[validate(length(max = 100, message = "Address line 2 must not exceed 100 characters"))]
    pub address2: Option<String>,

    #[validate(
        length(min = 1, max = 50, message = "City is required"),
        custom(function = "validate_not_blank", message = "City is required")
    )]
    pub city: String,

    pub state: UsState,

    #[validate(range(min = 0, max = 99999, message = "Zip code must be between 0 and 99999"))]
    pub zip_code: i32,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone number is not valid"))]
    pub phone_number: String,

    /// Categories to put the contact in; ids the user does not own are ignored
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// Request DTO for editing a contact
///
/// `category_ids` replaces the contact's categories when present; leave it
/// out to keep them as they are.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateContactDto {
    #[validate(
        length(min = 2, max = 50, message = "First name must be 2-50 characters"),
        custom(function = "validate_not_blank", message = "First name is required")
    )]
    pub first_name: String,

    #[validate(
        length(min = 2, max = 50, message = "Last name must be 2-50 characters"),
        custom(function = "validate_not_blank", message = "Last name is required")
    )]
    pub last_name: String,

    #[schema(value_type = Option<String>, format = Date, example = "1990-04-21")]
    pub birth_date: Option<NaiveDate>,

    #[validate(
        length(min = 1, max = 100, message = "Address is required"),
        custom(function = "validate_not_blank", message = "Address is required")
    )]
    pub address1: String,

    #[validate(length(max = 100, message = "Address line 2 must not exceed 100 characters"))]
    pub address2: Option<String>,

    #[validate(
        length(min = 1, max = 50, message = "City is required"),
        custom(function = "validate_not_blank", message = "City is required")
    )]
    pub city: String,

    pub state: UsState,

    #[validate(range(min = 0, max = 99999, message = "Zip code must be between 0 and 99999"))]
    pub zip_code: i32,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone number is not valid"))]
    pub phone_number: String,

    /// Version the edit was based on
    pub version: i32,

    pub category_ids: Option<Vec<Uuid>>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl CreateContactDto {
    pub fn into_parts(self) -> (ContactFields, Vec<Uuid>) {
        let fields = ContactFields {
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
            address1: self.address1,
            address2: blank_to_none(self.address2),
            city: self.city,
            state: self.state.code().to_string(),
            zip_code: self.zip_code,
            email: self.email,
            phone_number: self.phone_number,
        };
        (fields, self.category_ids)
    }
}

impl UpdateContactDto {
    pub fn into_parts(self) -> (ContactFields, i32, Option<Vec<Uuid>>) {
        let fields = ContactFields {
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
            address1: self.address1,
            address2: blank_to_none(self.address2),
            city: self.city,
            state: self.state.code().to_string(),
            zip_code: self.zip_code,
            email: self.email,
            phone_number: self.phone_number,
        };
        (fields, self.version, self.category_ids)
    }
}

/// Response DTO for a contact with its categories
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactResponseDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub birth_date: Option<NaiveDate>,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    /// Two-letter state code
    pub state: String,
    pub zip_code: i32,
    pub email: String,
    pub phone_number: String,
    /// `data:` URI of the stored image, or the placeholder image path
    pub image: String,
    pub categories: Vec<CategorySummaryDto>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

/// Contact as listed inside a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactSummaryDto {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

impl From<&Contact> for ContactSummaryDto {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id,
            full_name: c.full_name(),
            email: c.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StateOptionDto {
    pub code: String,
    pub name: String,
}

impl From<UsState> for StateOptionDto {
    fn from(state: UsState) -> Self {
        Self {
            code: state.code().to_string(),
            name: state.name().to_string(),
        }
    }
}

/// Select options for the contact create and edit forms
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactFormOptionsDto {
    pub categories: Vec<CategorySummaryDto>,
    pub states: Vec<StateOptionDto>,
}

/// Edit form: the current contact, its selected categories and the options
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactEditFormDto {
    pub contact: ContactResponseDto,
    pub selected_category_ids: Vec<Uuid>,
    pub options: ContactFormOptionsDto,
}

/// Multipart body for the contact image upload.
/// Note: documentation only, the handler reads the multipart stream directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadContactImageDto {
    /// JPEG, PNG, GIF or WebP image
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListContactsQuery {
    /// Only contacts in this category
    pub category_id: Option<Uuid>,
    /// One-time notification echoed back as the response message
    pub status_message: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchContactsQuery {
    /// Case-insensitive match against "first last"
    pub q: Option<String>,
}
