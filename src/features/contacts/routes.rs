use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::contacts::handlers;
use crate::features::contacts::services::ContactService;

/// Create routes for the contacts feature
///
/// Note: every route needs an authenticated user
pub fn routes(service: Arc<ContactService>) -> Router {
    Router::new()
        .route(
            "/api/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route("/api/contacts/search", get(handlers::search_contacts))
        .route("/api/contacts/new", get(handlers::new_contact_form))
        .route(
            "/api/contacts/{id}",
            get(handlers::get_contact)
                .put(handlers::update_contact)
                .delete(handlers::delete_contact),
        )
        .route("/api/contacts/{id}/edit", get(handlers::edit_contact_form))
        .route(
            "/api/contacts/{id}/delete",
            get(handlers::delete_contact_preview),
        )
        .route(
            "/api/contacts/{id}/image",
            put(handlers::upload_contact_image),
        )
        .route(
            "/api/contacts/{id}/email",
            get(handlers::contact_email_form).post(handlers::send_contact_email),
        )
        .with_state(service)
}
