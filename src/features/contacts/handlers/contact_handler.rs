use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedForm;
use crate::features::address_book::dtos::{
    EmailDispatchResultDto, EmailFormDto, SendEmailDto, StatusMessageQuery,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::contacts::dtos::{
    ContactEditFormDto, ContactFormOptionsDto, ContactResponseDto, CreateContactDto,
    ListContactsQuery, SearchContactsQuery, UpdateContactDto, UploadContactImageDto,
};
use crate::features::contacts::services::ContactService;
use crate::shared::types::ApiResponse;

/// List the current user's contacts
///
/// Ordered by last name, then first name. `status_message` is echoed back as
/// the response message.
#[utoipa::path(
    get,
    path = "/api/contacts",
    params(ListContactsQuery),
    responses(
        (status = 200, description = "Contacts", body = ApiResponse<Vec<ContactResponseDto>>),
        (status = 404, description = "Category filter not found"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn list_contacts(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Query(query): Query<ListContactsQuery>,
) -> Result<Json<ApiResponse<Vec<ContactResponseDto>>>> {
    let contacts = service.list(user.user_id(), query.category_id).await?;
    Ok(Json(ApiResponse::list(contacts, query.status_message)))
}

/// Search the current user's contacts by name
#[utoipa::path(
    get,
    path = "/api/contacts/search",
    params(SearchContactsQuery),
    responses(
        (status = 200, description = "Matching contacts", body = ApiResponse<Vec<ContactResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn search_contacts(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Query(query): Query<SearchContactsQuery>,
) -> Result<Json<ApiResponse<Vec<ContactResponseDto>>>> {
    let contacts = service.search(user.user_id(), query.q.as_deref()).await?;
    Ok(Json(ApiResponse::list(contacts, None)))
}

/// Options for the create form
#[utoipa::path(
    get,
    path = "/api/contacts/new",
    responses(
        (status = 200, description = "Form options", body = ApiResponse<ContactFormOptionsDto>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn new_contact_form(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
) -> Result<Json<ApiResponse<ContactFormOptionsDto>>> {
    let options = service.form_options(user.user_id()).await?;
    Ok(Json(ApiResponse::success(Some(options), None, None)))
}

/// Create a contact and put it in the selected categories
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactDto,
    responses(
        (status = 201, description = "Contact created", body = ApiResponse<ContactResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn create_contact(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    ValidatedForm(dto): ValidatedForm<CreateContactDto>,
) -> Result<(StatusCode, Json<ApiResponse<ContactResponseDto>>)> {
    let contact = service.create(user.user_id(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(contact), None, None)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact found", body = ApiResponse<ContactResponseDto>),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn get_contact(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ContactResponseDto>>> {
    let contact = service.get(user.user_id(), id).await?;
    Ok(Json(ApiResponse::success(Some(contact), None, None)))
}

/// Edit form: the contact with its current categories preselected
#[utoipa::path(
    get,
    path = "/api/contacts/{id}/edit",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Edit form", body = ApiResponse<ContactEditFormDto>),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn edit_contact_form(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ContactEditFormDto>>> {
    let form = service.edit_form(user.user_id(), id).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Save an edit
///
/// When `category_ids` is present the contact's categories are replaced by it.
#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact ID")),
    request_body = UpdateContactDto,
    responses(
        (status = 200, description = "Contact updated", body = ApiResponse<ContactResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Contact not found"),
        (status = 409, description = "Contact was changed by another request")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn update_contact(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Path(id): Path<Uuid>,
    ValidatedForm(dto): ValidatedForm<UpdateContactDto>,
) -> Result<Json<ApiResponse<ContactResponseDto>>> {
    let contact = service.update(user.user_id(), id, dto).await?;
    Ok(Json(ApiResponse::success(Some(contact), None, None)))
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/api/contacts/{id}/delete",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact to delete", body = ApiResponse<ContactResponseDto>),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn delete_contact_preview(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ContactResponseDto>>> {
    let contact = service.get(user.user_id(), id).await?;
    Ok(Json(ApiResponse::success(Some(contact), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact deleted"),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn delete_contact(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(user.user_id(), id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Contact deleted".to_string()),
        None,
    )))
}

/// Replace the contact's image
///
/// Accepts multipart/form-data with an `image` file field.
#[utoipa::path(
    put,
    path = "/api/contacts/{id}/image",
    params(("id" = Uuid, Path, description = "Contact ID")),
    request_body(
        content = UploadContactImageDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<ContactResponseDto>),
        (status = 400, description = "Missing, too large or unsupported image"),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn upload_contact_image(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ContactResponseDto>>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "image" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read image bytes: {}", e);
            AppError::BadRequest(format!("Failed to read image data: {}", e))
        })?;
        upload = Some((content_type, data.to_vec()));
    }

    let (content_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("Image is required".to_string()))?;

    let contact = service
        .set_image(user.user_id(), id, &content_type, &data)
        .await?;
    Ok(Json(ApiResponse::success(Some(contact), None, None)))
}

/// Prefilled email form for the contact
#[utoipa::path(
    get,
    path = "/api/contacts/{id}/email",
    params(
        ("id" = Uuid, Path, description = "Contact ID"),
        ("status_message" = Option<String>, Query, description = "Message from a previous send")
    ),
    responses(
        (status = 200, description = "Email form", body = ApiResponse<EmailFormDto>),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn contact_email_form(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<StatusMessageQuery>,
) -> Result<Json<ApiResponse<EmailFormDto>>> {
    let form = service.email_form(user.user_id(), id).await?;
    Ok(Json(ApiResponse::success(
        Some(form),
        query.status_message,
        None,
    )))
}

/// Email the contact
///
/// Delivery failures are reported in the body (`sent = false`), not as an
/// error status.
#[utoipa::path(
    post,
    path = "/api/contacts/{id}/email",
    params(("id" = Uuid, Path, description = "Contact ID")),
    request_body = SendEmailDto,
    responses(
        (status = 200, description = "Send attempted", body = ApiResponse<EmailDispatchResultDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
pub async fn send_contact_email(
    user: AuthenticatedUser,
    State(service): State<Arc<ContactService>>,
    Path(id): Path<Uuid>,
    ValidatedForm(dto): ValidatedForm<SendEmailDto>,
) -> Result<Json<ApiResponse<EmailDispatchResultDto>>> {
    let result = service.send_email(user.user_id(), id, dto).await?;
    let message = result.status_message.clone();
    Ok(Json(ApiResponse::success(Some(result), Some(message), None)))
}
