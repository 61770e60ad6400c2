//! Like Entity
//!
//! A like points at exactly one target. The enum makes "both" and "neither"
//! unrepresentable; storage repeats the rule as a CHECK constraint.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::domain::value_object::{EventId, LikeId, PhotoId, UserId};

/// Kind of likeable content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Event,
    Photo,
}

impl TargetKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Event => "event",
            TargetKind::Photo => "photo",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Liked item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Event(EventId),
    Photo(PhotoId),
}

impl LikeTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            LikeTarget::Event(_) => TargetKind::Event,
            LikeTarget::Photo(_) => TargetKind::Photo,
        }
    }

    /// Raw id of the target
    pub fn uuid(&self) -> Uuid {
        match self {
            LikeTarget::Event(id) => id.into_uuid(),
            LikeTarget::Photo(id) => id.into_uuid(),
        }
    }

    /// `(event_id, photo_id)` storage columns
    pub fn columns(&self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            LikeTarget::Event(id) => (Some(id.into_uuid()), None),
            LikeTarget::Photo(id) => (None, Some(id.into_uuid())),
        }
    }

    /// Build from the two nullable storage columns; exactly one must be set
    pub fn from_columns(event_id: Option<Uuid>, photo_id: Option<Uuid>) -> Result<Self, String> {
        match (event_id, photo_id) {
            (Some(e), None) => Ok(LikeTarget::Event(EventId::from_uuid(e))),
            (None, Some(p)) => Ok(LikeTarget::Photo(PhotoId::from_uuid(p))),
            _ => Err("like must reference exactly one of event or photo".to_string()),
        }
    }
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.uuid())
    }
}

/// Like
#[derive(Debug, Clone)]
pub struct Like {
    pub like_id: LikeId,
    pub user_id: UserId,
    pub target: LikeTarget,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: UserId, target: LikeTarget) -> Self {
        Self {
            like_id: LikeId::new(),
            user_id,
            target,
            created_at: Utc::now(),
        }
    }
}

/// Per-item engagement numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngagementSummary {
    pub likes_count: u64,
    pub liked_by_viewer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_columns_exactly_one() {
        let target = LikeTarget::Photo(PhotoId::new());
        let (e, p) = target.columns();
        assert_eq!(LikeTarget::from_columns(e, p), Ok(target));

        assert!(LikeTarget::from_columns(None, None).is_err());
        assert!(LikeTarget::from_columns(Some(Uuid::new_v4()), Some(Uuid::new_v4())).is_err());
    }
}
