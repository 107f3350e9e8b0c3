//! Contact image handling
//!
//! Images live in the contact row as raw bytes plus a MIME type. Clients get
//! them back as a `data:` URI, or the placeholder path when none is stored.

use base64::prelude::*;

use crate::core::config::ImageConfig;
use crate::core::error::{AppError, Result};
use crate::shared::constants::DEFAULT_CONTACT_IMAGE;

/// Allowed MIME types for contact images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

#[derive(Debug, Clone)]
pub struct ImageService {
    max_bytes: usize,
}

impl ImageService {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            max_bytes: config.max_bytes,
        }
    }

    /// Check an uploaded image and return the bytes to store
    pub fn bytes_of(&self, content_type: &str, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(AppError::BadRequest("Image is empty".to_string()));
        }

        if data.len() > self.max_bytes {
            return Err(AppError::BadRequest(format!(
                "Image too large. Maximum size is {} bytes",
                self.max_bytes
            )));
        }

        if !is_image_type_allowed(content_type) {
            return Err(AppError::BadRequest(format!(
                "Image type '{}' is not allowed. Allowed types: {}",
                content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }

        Ok(data.to_vec())
    }

    pub fn to_displayable_string(&self, data: Option<&[u8]>, content_type: Option<&str>) -> String {
        match (data, content_type) {
            (Some(bytes), Some(mime)) if !bytes.is_empty() => {
                format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes))
            }
            _ => DEFAULT_CONTACT_IMAGE.to_string(),
        }
    }
}

impl Default for ImageService {
    fn default() -> Self {
        Self::new(&ImageConfig::default())
    }
}
