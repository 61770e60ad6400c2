//! Refresh Use Case
//!
//! Exchanges the current refresh token for a new token pair.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::{TokenPair, TokenService};
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Refresh use case
pub struct RefreshUseCase<U>
where
    U: UserRepository,
{
    tokens: TokenService<U>,
}

impl<U> RefreshUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self {
            tokens: TokenService::new(user_repo, config),
        }
    }

    /// ## Arguments
    /// * `incoming` - Refresh token from the cookie or the request body
    pub async fn execute(&self, incoming: Option<String>) -> AuthResult<(User, TokenPair)> {
        let incoming = incoming
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::InvalidRefreshToken)?;

        self.tokens.refresh(incoming.trim()).await
    }
}
