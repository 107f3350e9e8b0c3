//! Identity resolution: bearer JWT validation against the provider's JWKS.
//!
//! The identity provider itself is external; this feature only turns a valid
//! access token into an [`model::AuthenticatedUser`].

mod jwks;
mod validator;

pub mod model;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
