//! Member Use Cases
//!
//! One member profile per user. Profile reads include the owned photos in
//! collection order.

use std::collections::HashMap;
use std::sync::Arc;

use platform::media::{MediaStore, MediaUpload, UploadedAsset, external_id_from_url};

use crate::application::config::ClubConfig;
use crate::application::integrity::{Deleted, IntegrityCoordinator};
use crate::application::uploads;
use crate::domain::entity::{Member, MemberPatch, Photo};
use crate::domain::repository::ClubStore;
use crate::domain::value_object::{MemberId, UserId, member_role::MemberRole, text};
use crate::error::{ClubError, ClubResult};

/// Member with its photos resolved
#[derive(Debug, Clone)]
pub struct MemberProfile {
    pub member: Member,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateMemberInput {
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub role: Option<String>,
    pub displayed: Option<bool>,
}

/// Fields left `None` keep their value
#[derive(Debug, Clone, Default)]
pub struct UpdateMemberInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub role: Option<String>,
    pub displayed: Option<bool>,
}

pub struct MemberService<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    store: Arc<S>,
    media: Arc<M>,
    config: Arc<ClubConfig>,
    integrity: IntegrityCoordinator<S, M>,
}

impl<S, M> MemberService<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, media: Arc<M>, config: Arc<ClubConfig>) -> Self {
        Self {
            integrity: IntegrityCoordinator::new(store.clone(), media.clone()),
            store,
            media,
            config,
        }
    }

    /// Create the member profile of a user (admin)
    pub async fn create(&self, input: CreateMemberInput) -> ClubResult<Member> {
        let mut errors = Vec::new();

        let name = text::MEMBER_NAME.collect(&input.name, &mut errors);
        let description = text::MEMBER_DESCRIPTION.collect(
            input.description.as_deref().unwrap_or_default(),
            &mut errors,
        );
        let role = match input.role.as_deref() {
            None => Some(MemberRole::default()),
            Some(raw) => MemberRole::parse(raw).map_err(|e| errors.push(e)).ok(),
        };

        let (Some(name), Some(description), Some(role)) = (name, description, role) else {
            return Err(ClubError::Validation(errors));
        };

        if self.store.find_member_by_user(&input.user_id).await?.is_some() {
            return Err(member_exists());
        }

        let member = Member::new(
            input.user_id,
            name,
            description,
            input.displayed.unwrap_or(false),
            role,
        );
        self.store.insert_member(&member).await?;

        tracing::info!(member_id = %member.member_id, user_id = %member.user_id, "Member created");
        Ok(member)
    }

    /// Every member with photos (admin)
    pub async fn list_all(&self) -> ClubResult<Vec<MemberProfile>> {
        let members = self.store.list_members().await?;
        let ids: Vec<MemberId> = members.iter().map(|m| m.member_id).collect();

        let mut photos: HashMap<_, Photo> = self
            .store
            .photos_of_members(&ids)
            .await?
            .into_iter()
            .map(|p| (p.photo_id, p))
            .collect();

        Ok(members
            .into_iter()
            .map(|member| {
                let owned = member
                    .photos
                    .iter()
                    .filter_map(|id| photos.remove(id))
                    .collect();
                MemberProfile {
                    member,
                    photos: owned,
                }
            })
            .collect())
    }

    /// Member profile of the caller
    pub async fn get_own(&self, user_id: &UserId) -> ClubResult<MemberProfile> {
        let member = self.own_member(user_id).await?;
        self.profile(member).await
    }

    pub async fn update_own(&self, user_id: &UserId, input: UpdateMemberInput) -> ClubResult<MemberProfile> {
        let mut errors = Vec::new();

        let patch = MemberPatch {
            name: input
                .name
                .as_deref()
                .and_then(|n| text::MEMBER_NAME.collect(n, &mut errors)),
            description: input
                .description
                .as_deref()
                .and_then(|d| text::MEMBER_DESCRIPTION.collect(d, &mut errors)),
            displayed: input.displayed,
            role: input
                .role
                .as_deref()
                .and_then(|r| MemberRole::parse(r).map_err(|e| errors.push(e)).ok()),
        };

        if !errors.is_empty() {
            return Err(ClubError::Validation(errors));
        }

        let mut member = self.own_member(user_id).await?;
        member.apply(patch);
        if !self.store.update_member(&member).await? {
            return Err(ClubError::MemberNotFound);
        }

        tracing::info!(member_id = %member.member_id, "Member updated");
        self.profile(member).await
    }

    /// Set the first profile photo; use replace when one exists
    pub async fn upload_profile_photo(
        &self,
        user_id: &UserId,
        image: Option<MediaUpload>,
    ) -> ClubResult<MemberProfile> {
        let image = self.check_profile_image(image)?;
        let mut member = self.own_member(user_id).await?;

        if member.profile_photo.is_some() {
            return Err(ClubError::Conflict(
                "Profile photo already set, replace it instead".to_string(),
            ));
        }

        let asset = self.upload_one(image).await?;
        member.set_profile_photo(asset.url.clone());
        self.save_or_discard(&member, &asset).await?;

        tracing::info!(member_id = %member.member_id, "Profile photo uploaded");
        self.profile(member).await
    }

    /// Swap the profile photo; the old asset is removed after the record is saved
    ///
    /// If the old asset cannot be removed the new photo stays in place and
    /// the call reports `AssetCleanup`.
    pub async fn replace_profile_photo(
        &self,
        user_id: &UserId,
        image: Option<MediaUpload>,
    ) -> ClubResult<MemberProfile> {
        let image = self.check_profile_image(image)?;
        let mut member = self.own_member(user_id).await?;

        let asset = self.upload_one(image).await?;
        let old_url = member.set_profile_photo(asset.url.clone());
        self.save_or_discard(&member, &asset).await?;

        if let Some(old_url) = old_url {
            let result = match external_id_from_url(&old_url) {
                Some(external_id) => self.media.delete(&external_id).await.map_err(|e| {
                    tracing::warn!(external_id, error = %e, "Old profile photo not removed");
                    external_id.clone()
                }),
                None => Err(old_url.clone()),
            };
            if let Err(failed) = result {
                return Err(ClubError::AssetCleanup {
                    resource: "Profile photo",
                    action: "replaced",
                    failures: vec![failed],
                });
            }
        }

        tracing::info!(member_id = %member.member_id, "Profile photo replaced");
        self.profile(member).await
    }

    /// Delete a member with its photos (admin)
    pub async fn delete(&self, member_id: &MemberId) -> ClubResult<Deleted<MemberProfile>> {
        self.integrity.delete_member(member_id).await
    }

    async fn own_member(&self, user_id: &UserId) -> ClubResult<Member> {
        self.store
            .find_member_by_user(user_id)
            .await?
            .ok_or(ClubError::MemberNotFound)
    }

    async fn profile(&self, member: Member) -> ClubResult<MemberProfile> {
        let mut photos = self.store.photos_of_members(&[member.member_id]).await?;
        photos.sort_by_key(|p| {
            member
                .photos
                .iter()
                .position(|id| *id == p.photo_id)
                .unwrap_or(usize::MAX)
        });

        Ok(MemberProfile { member, photos })
    }

    fn check_profile_image(&self, image: Option<MediaUpload>) -> ClubResult<MediaUpload> {
        let image = image.ok_or_else(|| ClubError::validation("Profile photo is required"))?;
        self.config
            .check_image(&image)
            .map_err(ClubError::validation)?;
        Ok(image)
    }

    async fn upload_one(&self, image: MediaUpload) -> ClubResult<UploadedAsset> {
        Ok(self.media.upload(image).await?)
    }

    async fn save_or_discard(&self, member: &Member, asset: &UploadedAsset) -> ClubResult<()> {
        match self.store.update_member(member).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                uploads::discard(self.media.as_ref(), std::slice::from_ref(asset)).await;
                Err(ClubError::MemberNotFound)
            }
            Err(e) => {
                uploads::discard(self.media.as_ref(), std::slice::from_ref(asset)).await;
                Err(e)
            }
        }
    }
}

fn member_exists() -> ClubError {
    ClubError::Conflict("Member already exists for this user".to_string())
}
