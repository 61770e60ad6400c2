//! Photo Use Cases

use std::sync::Arc;

use kernel::pagination::{PageRequest, Paged};
use platform::media::{MediaStore, MediaUpload};

use crate::application::actor::Actor;
use crate::application::aggregator::{Engaged, EngagementAggregator};
use crate::application::config::ClubConfig;
use crate::application::integrity::{Deleted, IntegrityCoordinator};
use crate::application::uploads;
use crate::domain::entity::{Photo, PhotoOwner};
use crate::domain::repository::ClubStore;
use crate::domain::value_object::{EventId, MemberId, PhotoId, UserId, text};
use crate::error::{ClubError, ClubResult};

/// Photo form fields (besides the `image` file)
#[derive(Debug, Clone, Default)]
pub struct CreatePhotoInput {
    pub content: Option<String>,
    pub displayed: Option<bool>,
    pub event_id: Option<EventId>,
    pub member_id: Option<MemberId>,
}

pub struct PhotoService<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    store: Arc<S>,
    media: Arc<M>,
    config: Arc<ClubConfig>,
    aggregator: EngagementAggregator<S>,
    integrity: IntegrityCoordinator<S, M>,
}

impl<S, M> PhotoService<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, media: Arc<M>, config: Arc<ClubConfig>) -> Self {
        Self {
            aggregator: EngagementAggregator::new(store.clone()),
            integrity: IntegrityCoordinator::new(store.clone(), media.clone()),
            store,
            media,
            config,
        }
    }

    /// Upload a photo, optionally owned by an event or a member profile
    ///
    /// A member-owned photo needs the member's own user or an admin, and is
    /// appended to the member's collection.
    pub async fn create(
        &self,
        actor: Actor,
        input: CreatePhotoInput,
        image: Option<MediaUpload>,
    ) -> ClubResult<Photo> {
        let mut errors = Vec::new();

        let content = input
            .content
            .as_deref()
            .and_then(|c| text::PHOTO_CONTENT.collect(c, &mut errors))
            .filter(|c| !c.is_empty());

        match &image {
            None => errors.push("Image is required".to_string()),
            Some(file) => {
                if let Err(e) = self.config.check_image(file) {
                    errors.push(e);
                }
            }
        }

        let owner = match (input.event_id, input.member_id) {
            (None, None) => PhotoOwner::Unattached,
            (Some(event_id), None) => PhotoOwner::Event(event_id),
            (None, Some(member_id)) => PhotoOwner::Member(member_id),
            (Some(_), Some(_)) => {
                errors.push("A photo belongs to an event or a member, not both".to_string());
                PhotoOwner::Unattached
            }
        };

        let image = match image {
            Some(image) if errors.is_empty() => image,
            _ => return Err(ClubError::Validation(errors)),
        };

        self.check_owner(&actor, owner).await?;

        let assets = uploads::upload_all(self.media.as_ref(), vec![image]).await?;
        let Some(asset) = assets.first() else {
            return Err(ClubError::Internal("upload returned no asset".to_string()));
        };

        let photo = Photo::new(
            asset.url.clone(),
            asset.external_id.clone(),
            Some(actor.user_id),
            content,
            input.displayed.unwrap_or(false),
            owner,
        );

        if let Err(e) = self.store.insert_photo(&photo).await {
            uploads::discard(self.media.as_ref(), &assets).await;
            return Err(e);
        }

        if let PhotoOwner::Member(member_id) = owner {
            self.store
                .append_member_photo(&member_id, &photo.photo_id)
                .await?;
        }

        tracing::info!(photo_id = %photo.photo_id, author = %actor.user_id, "Photo created");
        Ok(photo)
    }

    pub async fn list(
        &self,
        page: Option<PageRequest>,
        viewer: Option<&UserId>,
    ) -> ClubResult<Paged<Engaged<Photo>>> {
        let (photos, total) = self.store.list_photos(page).await?;
        self.aggregator
            .page(Paged::new(photos, total, page), viewer)
            .await
    }

    pub async fn get(&self, photo_id: &PhotoId, viewer: Option<&UserId>) -> ClubResult<Engaged<Photo>> {
        let photo = self
            .store
            .find_photo(photo_id)
            .await?
            .ok_or(ClubError::PhotoNotFound)?;

        self.aggregator.one(photo, viewer).await
    }

    /// Delete by the author or an admin
    pub async fn delete(&self, actor: Actor, photo_id: &PhotoId) -> ClubResult<Deleted<Photo>> {
        let photo = self
            .store
            .find_photo(photo_id)
            .await?
            .ok_or(ClubError::PhotoNotFound)?;

        if !actor.may_manage(photo.author.as_ref()) {
            return Err(ClubError::forbidden(
                "Only the author or an admin can delete this photo",
            ));
        }

        self.integrity.delete_photo(photo_id).await
    }

    async fn check_owner(&self, actor: &Actor, owner: PhotoOwner) -> ClubResult<()> {
        match owner {
            PhotoOwner::Unattached => Ok(()),
            PhotoOwner::Event(event_id) => {
                if self.store.find_event(&event_id).await?.is_none() {
                    return Err(ClubError::EventNotFound);
                }
                Ok(())
            }
            PhotoOwner::Member(member_id) => {
                let member = self
                    .store
                    .find_member(&member_id)
                    .await?
                    .ok_or(ClubError::MemberNotFound)?;
                if !actor.may_manage(Some(&member.user_id)) {
                    return Err(ClubError::forbidden(
                        "Photos can only be added to your own member profile",
                    ));
                }
                Ok(())
            }
        }
    }
}
