//! Application Configuration
//!
//! Limits for uploads and list endpoints.

use platform::config::{self as env, ConfigError};
use platform::media::MediaUpload;

/// Image content types accepted by upload endpoints
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Club application configuration
#[derive(Debug, Clone)]
pub struct ClubConfig {
    /// Maximum `image` files on event creation
    pub event_max_images: usize,
    /// Per-file upload limit in bytes
    pub upload_max_bytes: usize,
    /// Default page size for event and photo lists
    pub list_page_limit: u64,
    /// Default page size for event search
    pub search_page_limit: u64,
    /// Default page size for a user's testimonials
    pub testimonial_page_limit: u64,
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            event_max_images: 5,
            upload_max_bytes: 10 * 1024 * 1024,
            list_page_limit: kernel::pagination::DEFAULT_LIMIT,
            search_page_limit: 10,
            testimonial_page_limit: 2,
        }
    }
}

impl ClubConfig {
    /// Build from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            event_max_images: env::parse_or("EVENT_MAX_IMAGES", defaults.event_max_images)?,
            upload_max_bytes: env::parse_or("UPLOAD_MAX_BYTES", defaults.upload_max_bytes)?,
            ..defaults
        })
    }

    /// Request body limit for multipart endpoints (all files plus form fields)
    pub fn multipart_body_limit(&self) -> usize {
        self.upload_max_bytes
            .saturating_mul(self.event_max_images)
            .saturating_add(64 * 1024)
    }

    pub fn is_allowed_image(content_type: &str) -> bool {
        ALLOWED_IMAGE_TYPES.contains(&content_type)
    }

    /// Content type and size check for one uploaded image
    pub fn check_image(&self, file: &MediaUpload) -> Result<(), String> {
        match file.content_type.as_deref() {
            Some(ct) if Self::is_allowed_image(ct) => {}
            _ => {
                return Err(format!(
                    "{}: only PNG and JPEG images are allowed",
                    file.file_name
                ));
            }
        }
        if file.bytes.is_empty() {
            return Err(format!("{}: file is empty", file.file_name));
        }
        if file.bytes.len() > self.upload_max_bytes {
            return Err(format!(
                "{}: file exceeds {} bytes",
                file.file_name, self.upload_max_bytes
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClubConfig::default();
        assert_eq!(config.event_max_images, 5);
        assert_eq!(config.list_page_limit, 9);
        assert_eq!(config.search_page_limit, 10);
        assert_eq!(config.testimonial_page_limit, 2);
        assert!(config.multipart_body_limit() > config.upload_max_bytes * 5);
    }

    #[test]
    fn test_allowed_types() {
        assert!(ClubConfig::is_allowed_image("image/png"));
        assert!(ClubConfig::is_allowed_image("image/jpeg"));
        assert!(!ClubConfig::is_allowed_image("image/gif"));
    }

    #[test]
    fn test_check_image() {
        let config = ClubConfig {
            upload_max_bytes: 4,
            ..Default::default()
        };
        let file = |ct: &str, len: usize| MediaUpload {
            file_name: "a.png".to_string(),
            content_type: Some(ct.to_string()),
            bytes: vec![0; len],
        };

        assert!(config.check_image(&file("image/png", 4)).is_ok());
        assert!(config.check_image(&file("image/png", 5)).is_err());
        assert!(config.check_image(&file("image/png", 0)).is_err());
        assert!(config.check_image(&file("text/plain", 1)).is_err());
    }
}
