//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::User;
use crate::domain::value_object::{
    UserId, email::Email, user_name::UserName, user_password::UserPassword,
};
use crate::error::AuthResult;

/// User repository trait
///
/// `create` and `update_email` report uniqueness violations as
/// `AuthError::UserNameTaken` / `AuthError::EmailTaken`.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find every existing user among `user_ids`; unknown ids are skipped
    async fn find_by_ids(&self, user_ids: &[UserId]) -> AuthResult<Vec<User>>;

    /// Find user by user name (exact, case-sensitive)
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if user name exists
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// All users, newest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Replace the password hash
    async fn update_password(&self, user_id: &UserId, password: &UserPassword) -> AuthResult<()>;

    /// Replace the email
    async fn update_email(&self, user_id: &UserId, email: &Email) -> AuthResult<()>;

    /// Overwrite (or clear) the current refresh token unconditionally
    async fn set_refresh_token(&self, user_id: &UserId, token: Option<&str>) -> AuthResult<()>;

    /// Compare-and-overwrite: store `next` only if the current token is `expected`
    ///
    /// Returns `false` when another rotation won the race or the token was revoked.
    async fn rotate_refresh_token(
        &self,
        user_id: &UserId,
        expected: &str,
        next: &str,
    ) -> AuthResult<bool>;

    /// Delete user; returns `false` if it did not exist
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;
}
