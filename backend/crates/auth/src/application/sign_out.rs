//! Sign Out Use Case
//!
//! Revokes the caller's refresh token. Access tokens already issued stay
//! valid until they expire.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<U>
where
    U: UserRepository,
{
    tokens: TokenService<U>,
}

impl<U> SignOutUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self {
            tokens: TokenService::new(user_repo, config),
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        self.tokens.invalidate(user_id).await?;
        tracing::info!(user_id = %user_id, "User signed out");
        Ok(())
    }
}
