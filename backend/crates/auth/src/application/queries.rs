//! User Queries

use std::sync::Arc;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// Read-only user lookups
pub struct UserQueries<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserQueries<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn get(&self, user_id: &UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// All users, newest first (admin)
    pub async fn list(&self) -> AuthResult<Vec<User>> {
        self.user_repo.list().await
    }
}
