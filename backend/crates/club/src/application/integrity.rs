//! Referential Integrity Coordinator
//!
//! Every delete of a parent entity goes through here. Order is always:
//! dependents, then the parent record, then remote assets. The steps are not
//! one transaction; a crash between them can leave orphans behind, but the
//! `RESTRICT` foreign keys on `likes` make a parent delete fail rather than
//! leave likes dangling.
//!
//! | Parent | Dependents |
//! |---|---|
//! | Event  | likes deleted, photos detached, uploaded images removed |
//! | Photo  | likes deleted, member collection entry removed, image removed |
//! | Member | owned photos (each as above), profile photo removed |
//! | User   | likes made by the user |

use std::sync::Arc;

use auth::UserCascade;
use kernel::error::app_error::AppResult;
use platform::media::{MediaStore, external_id_from_url};

use crate::application::members::MemberProfile;
use crate::domain::entity::{Event, LikeTarget, Photo, PhotoOwner};
use crate::domain::repository::ClubStore;
use crate::domain::value_object::{EventId, MemberId, PhotoId, UserId};
use crate::error::{ClubError, ClubResult};

/// What a completed cascade removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeletionReport {
    pub likes_removed: u64,
    pub photos_detached: u64,
    pub photos_deleted: u64,
    pub assets_removed: u64,
}

/// The removed record together with its cascade report
#[derive(Debug, Clone)]
pub struct Deleted<T> {
    pub item: T,
    pub report: DeletionReport,
}

impl DeletionReport {
    fn absorb(&mut self, other: DeletionReport) {
        self.likes_removed += other.likes_removed;
        self.photos_detached += other.photos_detached;
        self.photos_deleted += other.photos_deleted;
        self.assets_removed += other.assets_removed;
    }
}

pub struct IntegrityCoordinator<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    store: Arc<S>,
    media: Arc<M>,
}

impl<S, M> Clone for IntegrityCoordinator<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            media: self.media.clone(),
        }
    }
}

impl<S, M> IntegrityCoordinator<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, media: Arc<M>) -> Self {
        Self { store, media }
    }

    /// Delete an event with its likes; owned photos are detached, not deleted
    pub async fn delete_event(&self, event_id: &EventId) -> ClubResult<Deleted<Event>> {
        let event = self
            .store
            .find_event(event_id)
            .await?
            .ok_or(ClubError::EventNotFound)?;

        let mut report = DeletionReport {
            likes_removed: self
                .store
                .delete_likes_on(&LikeTarget::Event(*event_id))
                .await?,
            photos_detached: self.store.detach_event_photos(event_id).await?,
            ..Default::default()
        };

        if !self.store.delete_event(event_id).await? {
            return Err(ClubError::EventNotFound);
        }

        let mut failures = Vec::new();
        for url in &event.photos {
            match external_id_from_url(url) {
                Some(external_id) => {
                    if self.remove_asset(&external_id, &mut failures).await {
                        report.assets_removed += 1;
                    }
                }
                None => failures.push(url.clone()),
            }
        }

        tracing::info!(
            event_id = %event_id,
            likes_removed = report.likes_removed,
            photos_detached = report.photos_detached,
            "Event deleted"
        );

        finish("Event", event, report, failures)
    }

    /// Delete a photo with its likes and its member collection entry
    pub async fn delete_photo(&self, photo_id: &PhotoId) -> ClubResult<Deleted<Photo>> {
        let photo = self
            .store
            .find_photo(photo_id)
            .await?
            .ok_or(ClubError::PhotoNotFound)?;

        let mut failures = Vec::new();
        let report = self.remove_photo(&photo, true, &mut failures).await?;

        tracing::info!(photo_id = %photo_id, likes_removed = report.likes_removed, "Photo deleted");

        finish("Photo", photo, report, failures)
    }

    /// Delete a member, every photo it owns and its profile photo
    pub async fn delete_member(&self, member_id: &MemberId) -> ClubResult<Deleted<MemberProfile>> {
        let member = self
            .store
            .find_member(member_id)
            .await?
            .ok_or(ClubError::MemberNotFound)?;

        let mut report = DeletionReport::default();
        let mut failures = Vec::new();

        // 所属写真は写真の規則で 1 枚ずつ削除（メンバー側のリストはメンバーごと消える）
        let photos = self.store.photos_of_members(&[*member_id]).await?;
        for photo in &photos {
            report.absorb(self.remove_photo(photo, false, &mut failures).await?);
        }

        if !self.store.delete_member(member_id).await? {
            return Err(ClubError::MemberNotFound);
        }

        if let Some(url) = &member.profile_photo {
            match external_id_from_url(url) {
                Some(external_id) => {
                    if self.remove_asset(&external_id, &mut failures).await {
                        report.assets_removed += 1;
                    }
                }
                None => failures.push(url.clone()),
            }
        }

        tracing::info!(
            member_id = %member_id,
            photos_deleted = report.photos_deleted,
            likes_removed = report.likes_removed,
            "Member deleted"
        );

        finish("Member", MemberProfile { member, photos }, report, failures)
    }

    /// Remove every like made by the user
    pub async fn purge_user_likes(&self, user_id: &UserId) -> ClubResult<u64> {
        let removed = self.store.delete_likes_by_user(user_id).await?;
        tracing::debug!(user_id = %user_id, removed, "User likes purged");
        Ok(removed)
    }

    async fn remove_photo(
        &self,
        photo: &Photo,
        unlink_member: bool,
        failures: &mut Vec<String>,
    ) -> ClubResult<DeletionReport> {
        let mut report = DeletionReport {
            likes_removed: self
                .store
                .delete_likes_on(&LikeTarget::Photo(photo.photo_id))
                .await?,
            ..Default::default()
        };

        if !self.store.delete_photo(&photo.photo_id).await? {
            return Err(ClubError::PhotoNotFound);
        }
        report.photos_deleted = 1;

        if let (true, PhotoOwner::Member(member_id)) = (unlink_member, photo.owner) {
            self.store
                .remove_member_photo(&member_id, &photo.photo_id)
                .await?;
        }

        if self.remove_asset(&photo.external_id, failures).await {
            report.assets_removed = 1;
        }

        Ok(report)
    }

    /// Delete a remote asset, recording the id on failure
    async fn remove_asset(&self, external_id: &str, failures: &mut Vec<String>) -> bool {
        match self.media.delete(external_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(external_id, error = %e, "Asset delete failed");
                failures.push(external_id.to_string());
                false
            }
        }
    }
}

fn finish<T>(
    resource: &'static str,
    item: T,
    report: DeletionReport,
    failures: Vec<String>,
) -> ClubResult<Deleted<T>> {
    if failures.is_empty() {
        Ok(Deleted { item, report })
    } else {
        Err(ClubError::AssetCleanup {
            resource,
            action: "deleted",
            failures,
        })
    }
}

impl<S, M> UserCascade for IntegrityCoordinator<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    async fn before_user_delete(&self, user_id: &UserId) -> AppResult<u64> {
        Ok(self.purge_user_likes(user_id).await?)
    }
}
