//! Engagement Aggregator
//!
//! Read-path composition adding `likesCount` and `isLiked` to events and
//! photos. Lists use one batched query for the whole page.

use std::sync::Arc;

use kernel::pagination::Paged;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entity::{Event, LikeTarget, Photo, TargetKind};
use crate::domain::repository::ClubStore;
use crate::domain::value_object::UserId;
use crate::error::ClubResult;

/// Item plus its engagement numbers
///
/// Serializes flat: the item's own fields, then `likesCount` and `isLiked`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Engaged<T> {
    #[serde(flatten)]
    pub item: T,
    pub likes_count: u64,
    pub is_liked: bool,
}

impl<T> Engaged<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Engaged<U> {
        Engaged {
            item: f(self.item),
            likes_count: self.likes_count,
            is_liked: self.is_liked,
        }
    }
}

/// Content that can be liked
pub trait Engageable {
    const KIND: TargetKind;

    fn target_uuid(&self) -> Uuid;

    fn like_target(&self) -> LikeTarget;
}

impl Engageable for Event {
    const KIND: TargetKind = TargetKind::Event;

    fn target_uuid(&self) -> Uuid {
        self.event_id.into_uuid()
    }

    fn like_target(&self) -> LikeTarget {
        LikeTarget::Event(self.event_id)
    }
}

impl Engageable for Photo {
    const KIND: TargetKind = TargetKind::Photo;

    fn target_uuid(&self) -> Uuid {
        self.photo_id.into_uuid()
    }

    fn like_target(&self) -> LikeTarget {
        LikeTarget::Photo(self.photo_id)
    }
}

pub struct EngagementAggregator<S>
where
    S: ClubStore,
{
    store: Arc<S>,
}

impl<S> EngagementAggregator<S>
where
    S: ClubStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Single item; `isLiked` is false for an anonymous viewer
    pub async fn one<T>(&self, item: T, viewer: Option<&UserId>) -> ClubResult<Engaged<T>>
    where
        T: Engageable + Send,
    {
        let target = item.like_target();
        let likes_count = self.store.count_likes(&target).await?;
        let is_liked = match viewer {
            Some(user_id) => self.store.has_liked(user_id, &target).await?,
            None => false,
        };

        Ok(Engaged {
            item,
            likes_count,
            is_liked,
        })
    }

    /// Many items, order preserved
    pub async fn many<T>(&self, items: Vec<T>, viewer: Option<&UserId>) -> ClubResult<Vec<Engaged<T>>>
    where
        T: Engageable + Send,
    {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = items.iter().map(Engageable::target_uuid).collect();
        let summaries = self.store.summarize_likes(T::KIND, &ids, viewer).await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let summary = summaries
                    .get(&item.target_uuid())
                    .copied()
                    .unwrap_or_default();
                Engaged {
                    item,
                    likes_count: summary.likes_count,
                    is_liked: viewer.is_some() && summary.liked_by_viewer,
                }
            })
            .collect())
    }

    /// One page (or full list) with paging metadata kept
    pub async fn page<T>(&self, paged: Paged<T>, viewer: Option<&UserId>) -> ClubResult<Paged<Engaged<T>>>
    where
        T: Engageable + Send,
    {
        let Paged {
            items,
            total,
            current_page,
            total_pages,
        } = paged;

        Ok(Paged {
            items: self.many(items, viewer).await?,
            total,
            current_page,
            total_pages,
        })
    }
}
