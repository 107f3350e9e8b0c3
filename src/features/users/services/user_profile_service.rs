use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateProfileDto, UserProfileResponseDto};
use crate::modules::persistence::UserRepository;

/// Service for the current user's own profile row
pub struct UserProfileService {
    users: Arc<dyn UserRepository>,
}

impl UserProfileService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get_profile(&self, user: &AuthenticatedUser) -> Result<UserProfileResponseDto> {
        let row = self.users.find(user.user_id()).await?;
        Ok(UserProfileResponseDto::new(user, row))
    }

    pub async fn update_profile(
        &self,
        user: &AuthenticatedUser,
        dto: UpdateProfileDto,
    ) -> Result<UserProfileResponseDto> {
        let row = self
            .users
            .upsert_profile(user.user_id(), dto.first_name.trim(), dto.last_name.trim())
            .await?;

        tracing::info!("Profile updated for user {}", user.user_id());
        Ok(UserProfileResponseDto::new(user, Some(row)))
    }
}
