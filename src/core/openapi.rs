use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::address_book::dtos as address_book_dtos;
use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::contacts::{dtos as contacts_dtos, handlers as contacts_handlers};
use crate::features::users::{dtos as users_dtos, handlers::profile_handler};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        profile_handler::get_profile,
        profile_handler::update_profile,
        // Contacts
        contacts_handlers::list_contacts,
        contacts_handlers::search_contacts,
        contacts_handlers::new_contact_form,
        contacts_handlers::create_contact,
        contacts_handlers::get_contact,
        contacts_handlers::edit_contact_form,
        contacts_handlers::update_contact,
        contacts_handlers::delete_contact_preview,
        contacts_handlers::delete_contact,
        contacts_handlers::upload_contact_image,
        contacts_handlers::contact_email_form,
        contacts_handlers::send_contact_email,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::new_category_form,
        categories_handlers::create_category,
        categories_handlers::get_category,
        categories_handlers::edit_category_form,
        categories_handlers::update_category,
        categories_handlers::delete_category_preview,
        categories_handlers::delete_category,
        categories_handlers::category_membership,
        categories_handlers::category_email_form,
        categories_handlers::send_category_email,
    ),
    components(
        schemas(
            // Shared
            Meta,
            auth::model::AuthenticatedUser,
            // Users
            users_dtos::UserProfileResponseDto,
            users_dtos::UpdateProfileDto,
            ApiResponse<users_dtos::UserProfileResponseDto>,
            // Contacts
            contacts_dtos::ContactResponseDto,
            contacts_dtos::ContactSummaryDto,
            contacts_dtos::CreateContactDto,
            contacts_dtos::UpdateContactDto,
            contacts_dtos::ContactFormOptionsDto,
            contacts_dtos::ContactEditFormDto,
            contacts_dtos::StateOptionDto,
            contacts_dtos::UploadContactImageDto,
            crate::features::contacts::models::UsState,
            ApiResponse<contacts_dtos::ContactResponseDto>,
            ApiResponse<Vec<contacts_dtos::ContactResponseDto>>,
            ApiResponse<contacts_dtos::ContactFormOptionsDto>,
            ApiResponse<contacts_dtos::ContactEditFormDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategorySummaryDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryFormOptionsDto,
            categories_dtos::CategoryEditFormDto,
            categories_dtos::CategoryMembershipDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryFormOptionsDto>,
            ApiResponse<categories_dtos::CategoryEditFormDto>,
            ApiResponse<categories_dtos::CategoryMembershipDto>,
            // Email
            address_book_dtos::EmailFormDto,
            address_book_dtos::SendEmailDto,
            address_book_dtos::EmailDispatchResultDto,
            ApiResponse<address_book_dtos::EmailFormDto>,
            ApiResponse<address_book_dtos::EmailDispatchResultDto>,
        )
    ),
    tags(
        (name = "users", description = "Address book owner profile"),
        (name = "contacts", description = "Contacts, search, images and email"),
        (name = "categories", description = "Categories, membership and group email"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Address Book API",
        version = "0.1.0",
        description = "Personal address book: contacts, categories and email",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
