//! Change Password Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, user_id: &UserId, input: ChangePasswordInput) -> AuthResult<()> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let old = RawPassword::candidate(input.old_password);
        if !user.password.verify(&old, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let new = RawPassword::new(input.new_password)?;
        user.set_password(UserPassword::from_raw(&new, self.config.pepper())?);

        self.user_repo
            .update_password(&user.user_id, &user.password)
            .await?;

        tracing::info!(user_id = %user.user_id, "Password changed");
        Ok(())
    }
}
