//! Photo Entity
//!
//! A photo belongs to at most one owner: an event or a member profile.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::value_object::{EventId, MemberId, PhotoId, UserId};

/// Owner of a photo; never both an event and a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoOwner {
    #[default]
    Unattached,
    Event(EventId),
    Member(MemberId),
}

impl PhotoOwner {
    /// Build from the two nullable storage columns
    pub fn from_columns(event_id: Option<Uuid>, member_id: Option<Uuid>) -> Result<Self, String> {
        match (event_id, member_id) {
            (None, None) => Ok(PhotoOwner::Unattached),
            (Some(e), None) => Ok(PhotoOwner::Event(EventId::from_uuid(e))),
            (None, Some(m)) => Ok(PhotoOwner::Member(MemberId::from_uuid(m))),
            (Some(_), Some(_)) => Err("photo owned by both an event and a member".to_string()),
        }
    }

    /// `(event_id, member_id)` storage columns
    pub fn columns(&self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            PhotoOwner::Unattached => (None, None),
            PhotoOwner::Event(id) => (Some(id.into_uuid()), None),
            PhotoOwner::Member(id) => (None, Some(id.into_uuid())),
        }
    }

    pub fn event_id(&self) -> Option<EventId> {
        match self {
            PhotoOwner::Event(id) => Some(*id),
            _ => None,
        }
    }

    pub fn member_id(&self) -> Option<MemberId> {
        match self {
            PhotoOwner::Member(id) => Some(*id),
            _ => None,
        }
    }
}

/// Photo
#[derive(Debug, Clone)]
pub struct Photo {
    pub photo_id: PhotoId,
    pub img_url: String,
    /// Asset id in the remote media store
    pub external_id: String,
    /// Uploader (non-owning)
    pub author: Option<UserId>,
    pub content: Option<String>,
    pub displayed: bool,
    pub owner: PhotoOwner,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Photo {
    pub fn new(
        img_url: String,
        external_id: String,
        author: Option<UserId>,
        content: Option<String>,
        displayed: bool,
        owner: PhotoOwner,
    ) -> Self {
        let now = Utc::now();

        Self {
            photo_id: PhotoId::new(),
            img_url,
            external_id,
            author,
            content,
            displayed,
            owner,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        self.author.as_ref() == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_columns_round_trip() {
        let event = EventId::new();
        let owner = PhotoOwner::Event(event);
        let (e, m) = owner.columns();
        assert_eq!(PhotoOwner::from_columns(e, m), Ok(owner));
        assert_eq!(owner.event_id(), Some(event));
        assert_eq!(owner.member_id(), None);
    }

    #[test]
    fn test_owner_rejects_both() {
        let result = PhotoOwner::from_columns(Some(Uuid::new_v4()), Some(Uuid::new_v4()));
        assert!(result.is_err());
    }
}
