//! Update Email Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, email::Email};
use crate::error::{AuthError, AuthResult};

/// Update email use case
pub struct UpdateEmailUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> UpdateEmailUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, user_id: &UserId, new_email: String) -> AuthResult<User> {
        let email = Email::new_in_domain(new_email, self.config.allowed_email_domain.as_deref())?;

        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.email == email {
            return Ok(user);
        }

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        user.set_email(email);
        self.user_repo.update_email(&user.user_id, &user.email).await?;

        tracing::info!(user_id = %user.user_id, "Email updated");
        Ok(user)
    }
}
