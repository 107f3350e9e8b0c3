use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedForm;
use crate::features::address_book::dtos::{
    EmailDispatchResultDto, EmailFormDto, SendEmailDto, StatusMessageQuery,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::dtos::{
    CategoryEditFormDto, CategoryFormOptionsDto, CategoryMembershipDto, CategoryResponseDto,
    CreateCategoryDto, ListCategoriesQuery, UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// List the current user's categories
///
/// Ordered by name. `status_message` is echoed back as the response message.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "Categories", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 404, description = "Contact filter not found"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn list_categories(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list(user.user_id(), query.contact_id).await?;
    Ok(Json(ApiResponse::list(categories, query.status_message)))
}

/// Options for the create form
#[utoipa::path(
    get,
    path = "/api/categories/new",
    responses(
        (status = 200, description = "Form options", body = ApiResponse<CategoryFormOptionsDto>)
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn new_category_form(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<CategoryFormOptionsDto>>> {
    let options = service.form_options(user.user_id()).await?;
    Ok(Json(ApiResponse::success(Some(options), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn create_category(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    ValidatedForm(dto): ValidatedForm<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    let category = service.create(user.user_id(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn get_category(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get(user.user_id(), id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/edit",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Edit form", body = ApiResponse<CategoryEditFormDto>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn edit_category_form(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryEditFormDto>>> {
    let form = service.edit_form(user.user_id(), id).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Save an edit
///
/// When `contact_ids` is present the category's members are replaced by it.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category was changed by another request")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn update_category(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    ValidatedForm(dto): ValidatedForm<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.update(user.user_id(), id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/delete",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category to delete", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn delete_category_preview(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get(user.user_id(), id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete a category; its contacts are kept
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn delete_category(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(user.user_id(), id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted".to_string()),
        None,
    )))
}

/// Whether a contact is in the category
#[utoipa::path(
    get,
    path = "/api/categories/{id}/contacts/{contact_id}",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ("contact_id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Membership", body = ApiResponse<CategoryMembershipDto>),
        (status = 404, description = "Category or contact not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn category_membership(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path((id, contact_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<CategoryMembershipDto>>> {
    let membership = service.membership(user.user_id(), id, contact_id).await?;
    Ok(Json(ApiResponse::success(Some(membership), None, None)))
}

/// Group email form, addressed to every member of the category
#[utoipa::path(
    get,
    path = "/api/categories/{id}/email",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ("status_message" = Option<String>, Query, description = "Message from a previous send")
    ),
    responses(
        (status = 200, description = "Email form", body = ApiResponse<EmailFormDto>),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn category_email_form(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
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

/// Email every member of the category
///
/// Delivery failures are reported in the body (`sent = false`), not as an
/// error status.
#[utoipa::path(
    post,
    path = "/api/categories/{id}/email",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = SendEmailDto,
    responses(
        (status = 200, description = "Send attempted", body = ApiResponse<EmailDispatchResultDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn send_category_email(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    ValidatedForm(dto): ValidatedForm<SendEmailDto>,
) -> Result<Json<ApiResponse<EmailDispatchResultDto>>> {
    let result = service.send_email(user.user_id(), id, dto).await?;
    let message = result.status_message.clone();
    Ok(Json(ApiResponse::success(Some(result), Some(message), None)))
}
