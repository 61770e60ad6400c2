//! Delete User Use Case
//!
//! Removes a user account. Dependents held by other crates (likes) are
//! removed through the `UserCascade` port first.

use std::sync::Arc;

use crate::domain::cascade::UserCascade;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// Delete user use case
pub struct DeleteUserUseCase<U, C>
where
    U: UserRepository,
    C: UserCascade,
{
    user_repo: Arc<U>,
    cascade: Arc<C>,
}

impl<U, C> DeleteUserUseCase<U, C>
where
    U: UserRepository,
    C: UserCascade,
{
    pub fn new(user_repo: Arc<U>, cascade: Arc<C>) -> Self {
        Self { user_repo, cascade }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        let removed = self.cascade.before_user_delete(user_id).await?;

        if !self.user_repo.delete(user_id).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, likes_removed = removed, "User deleted");
        Ok(())
    }
}
