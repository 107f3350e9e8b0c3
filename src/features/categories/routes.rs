use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// Note: every route needs an authenticated user
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/api/categories/new", get(handlers::new_category_form))
        .route(
            "/api/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/categories/{id}/edit",
            get(handlers::edit_category_form),
        )
        .route(
            "/api/categories/{id}/delete",
            get(handlers::delete_category_preview),
        )
        .route(
            "/api/categories/{id}/contacts/{contact_id}",
            get(handlers::category_membership),
        )
        .route(
            "/api/categories/{id}/email",
            get(handlers::category_email_form).post(handlers::send_category_email),
        )
        .with_state(service)
}
