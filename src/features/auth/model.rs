use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The caller resolved from a validated bearer token.
///
/// `sub` is the identity provider's subject and is used as the owning user id
/// for every contact and category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Owner id used to scope every read and write
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}
