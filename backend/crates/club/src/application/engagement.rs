//! Engagement Store
//!
//! Like / unlike for events and photos. At most one like per
//! `(user, target)`; storage uniqueness decides concurrent duplicates.

use std::sync::Arc;

use crate::domain::entity::{Like, LikeTarget};
use crate::domain::repository::ClubStore;
use crate::domain::value_object::UserId;
use crate::error::{ClubError, ClubResult};

pub struct EngagementService<S>
where
    S: ClubStore,
{
    store: Arc<S>,
}

impl<S> EngagementService<S>
where
    S: ClubStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Like a target
    ///
    /// ## Errors
    /// - target missing → `EventNotFound` / `PhotoNotFound`
    /// - already liked → `AlreadyLiked`
    pub async fn like(&self, user_id: &UserId, target: LikeTarget) -> ClubResult<Like> {
        self.ensure_target(&target).await?;

        let like = Like::new(*user_id, target);
        self.store.insert_like(&like).await?;

        tracing::info!(user_id = %user_id, target = %target, "Liked");
        Ok(like)
    }

    /// Remove the caller's like on a target, returning the removed like
    pub async fn unlike(&self, user_id: &UserId, target: LikeTarget) -> ClubResult<Like> {
        let like = self
            .store
            .delete_like(user_id, &target)
            .await?
            .ok_or(ClubError::LikeNotFound)?;

        tracing::info!(user_id = %user_id, target = %target, "Unliked");
        Ok(like)
    }

    async fn ensure_target(&self, target: &LikeTarget) -> ClubResult<()> {
        let exists = match target {
            LikeTarget::Event(id) => self.store.find_event(id).await?.is_some(),
            LikeTarget::Photo(id) => self.store.find_photo(id).await?.is_some(),
        };

        if exists {
            Ok(())
        } else {
            Err(not_found(target))
        }
    }
}

/// NotFound error matching the target kind
pub(crate) fn not_found(target: &LikeTarget) -> ClubError {
    match target {
        LikeTarget::Event(_) => ClubError::EventNotFound,
        LikeTarget::Photo(_) => ClubError::PhotoNotFound,
    }
}
