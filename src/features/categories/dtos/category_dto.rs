use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::features::contacts::dtos::ContactSummaryDto;
use crate::shared::validation::validate_not_blank;

/// Category as listed on a contact
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorySummaryDto {
    pub id: Uuid,
    pub name: String,
}

impl From<&Category> for CategorySummaryDto {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
        }
    }
}

/// Request DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    pub name: String,

    /// Contacts to put in the category; ids the user does not own are ignored
    #[serde(default)]
    pub contact_ids: Vec<Uuid>,
}

/// Request DTO for editing a category
///
/// `contact_ids` replaces the members when present; leave it out to keep them.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    pub name: String,

    /// Version the edit was based on
    pub version: i32,

    pub contact_ids: Option<Vec<Uuid>>,
}

/// Response DTO for a category with its contacts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub contacts: Vec<ContactSummaryDto>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

/// Select options for the category create and edit forms
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryFormOptionsDto {
    pub contacts: Vec<ContactSummaryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryEditFormDto {
    pub category: CategoryResponseDto,
    pub selected_contact_ids: Vec<Uuid>,
    pub options: CategoryFormOptionsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryMembershipDto {
    pub category_id: Uuid,
    pub contact_id: Uuid,
    pub is_member: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCategoriesQuery {
    /// Only categories containing this contact
    pub contact_id: Option<Uuid>,
    /// One-time notification echoed back as the response message
    pub status_message: Option<String>,
}
