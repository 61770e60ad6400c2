//! User Deletion Cascade Port
//!
//! Records owned by other crates that must not outlive a user (likes) are
//! removed through this port before the user row is deleted.

use kernel::error::app_error::AppResult;
use kernel::id::UserId;

#[trait_variant::make(UserCascade: Send)]
pub trait LocalUserCascade {
    /// Remove dependents of `user_id`; returns how many records were removed
    async fn before_user_delete(&self, user_id: &UserId) -> AppResult<u64>;
}

/// Cascade that has nothing to remove
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCascade;

impl UserCascade for NoCascade {
    async fn before_user_delete(&self, _user_id: &UserId) -> AppResult<u64> {
        Ok(0)
    }
}
