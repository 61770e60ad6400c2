//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::config::{self as env, ConfigError};
use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Access token cookie name
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Refresh token cookie name
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 secret for access tokens
    pub access_token_secret: Vec<u8>,
    /// Access token TTL (30 minutes)
    pub access_token_ttl: Duration,
    /// HS256 secret for refresh tokens (distinct from the access secret)
    pub refresh_token_secret: Vec<u8>,
    /// Refresh token TTL (7 days)
    pub refresh_token_ttl: Duration,
    /// Key required to register an admin; `None` disables admin registration
    pub admin_key: Option<String>,
    /// Registration restricted to this email domain when set
    pub allowed_email_domain: Option<String>,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(30 * 60),
            refresh_token_secret: Vec::new(),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            admin_key: None,
            allowed_email_domain: None,
            password_pepper: None,
            cookie_secure: true,
            cookie_same_site: SameSite::None,
        }
    }
}

impl AuthConfig {
    /// Create config with random token secrets (for development)
    pub fn with_random_secrets() -> Self {
        Self {
            access_token_secret: platform::crypto::random_bytes(32),
            refresh_token_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            ..Self::with_random_secrets()
        }
    }

    /// Build from environment variables
    ///
    /// Token secrets are required in release builds; debug builds fall back
    /// to random secrets (tokens then die with the process).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let secret = |name: &str| -> Result<Vec<u8>, ConfigError> {
            match env::optional(name) {
                Some(value) => Ok(value.into_bytes()),
                None if cfg!(debug_assertions) => {
                    tracing::warn!(variable = name, "Token secret not set, using a random one");
                    Ok(platform::crypto::random_bytes(32))
                }
                None => Err(ConfigError::Missing(name.to_string())),
            }
        };

        let same_site = match env::optional("COOKIE_SAME_SITE") {
            Some(raw) => SameSite::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                name: "COOKIE_SAME_SITE".to_string(),
                reason: format!("expected strict, lax or none, got {:?}", raw),
            })?,
            None => defaults.cookie_same_site,
        };

        Ok(Self {
            access_token_secret: secret("ACCESS_TOKEN_SECRET")?,
            access_token_ttl: env::duration_secs("ACCESS_TOKEN_EXPIRY_SECS", defaults.access_token_ttl)?,
            refresh_token_secret: secret("REFRESH_TOKEN_SECRET")?,
            refresh_token_ttl: env::duration_secs(
                "REFRESH_TOKEN_EXPIRY_SECS",
                defaults.refresh_token_ttl,
            )?,
            admin_key: env::optional("ADMIN_KEY"),
            allowed_email_domain: env::optional("ALLOWED_EMAIL_DOMAIN"),
            password_pepper: env::optional("PASSWORD_PEPPER").map(String::into_bytes),
            cookie_secure: env::flag("COOKIE_SECURE", !cfg!(debug_assertions))?,
            cookie_same_site: same_site,
        })
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    fn cookie(&self, name: &str, ttl: Duration) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(ttl.as_secs() as i64),
        }
    }

    /// Cookie carrying the access token (`Max-Age` = access TTL)
    pub fn access_cookie(&self) -> CookieConfig {
        self.cookie(ACCESS_TOKEN_COOKIE, self.access_token_ttl)
    }

    /// Cookie carrying the refresh token (`Max-Age` = refresh TTL)
    pub fn refresh_cookie(&self) -> CookieConfig {
        self.cookie(REFRESH_TOKEN_COOKIE, self.refresh_token_ttl)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_secret", &"[REDACTED]")
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("admin_key", &self.admin_key.as_ref().map(|_| "[REDACTED]"))
            .field("allowed_email_domain", &self.allowed_email_domain)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secrets_are_distinct() {
        let config = AuthConfig::with_random_secrets();
        assert_eq!(config.access_token_secret.len(), 32);
        assert_ne!(config.access_token_secret, config.refresh_token_secret);
    }

    #[test]
    fn test_cookie_max_age_follows_ttl() {
        let config = AuthConfig::development();
        assert_eq!(config.access_cookie().max_age_secs, Some(1800));
        assert_eq!(config.refresh_cookie().max_age_secs, Some(604800));
        assert_eq!(config.refresh_cookie().name, REFRESH_TOKEN_COOKIE);
        assert!(!config.access_cookie().secure);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            admin_key: Some("hunter2".to_string()),
            ..AuthConfig::with_random_secrets()
        };
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
