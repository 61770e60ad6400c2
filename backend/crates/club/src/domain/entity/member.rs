//! Member Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{MemberId, PhotoId, UserId, member_role::MemberRole};

/// Club member profile (one per user)
#[derive(Debug, Clone)]
pub struct Member {
    pub member_id: MemberId,
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub profile_photo: Option<String>,
    /// Owned photos in insertion order, no duplicates
    pub photos: Vec<PhotoId>,
    pub displayed: bool,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a member profile
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub displayed: Option<bool>,
    pub role: Option<MemberRole>,
}

impl Member {
    pub fn new(
        user_id: UserId,
        name: String,
        description: String,
        displayed: bool,
        role: MemberRole,
    ) -> Self {
        let now = Utc::now();

        Self {
            member_id: MemberId::new(),
            user_id,
            name,
            description,
            profile_photo: None,
            photos: Vec::new(),
            displayed,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: MemberPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(displayed) = patch.displayed {
            self.displayed = displayed;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        self.updated_at = Utc::now();
    }

    pub fn set_profile_photo(&mut self, url: String) -> Option<String> {
        self.updated_at = Utc::now();
        self.profile_photo.replace(url)
    }

    /// Append a photo id, keeping the collection a set
    pub fn add_photo(&mut self, photo_id: PhotoId) -> bool {
        if self.photos.contains(&photo_id) {
            return false;
        }
        self.photos.push(photo_id);
        true
    }

    pub fn remove_photo(&mut self, photo_id: &PhotoId) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p != photo_id);
        before != self.photos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_collection_is_a_set() {
        let mut member = Member::new(UserId::new(), "A".into(), String::new(), false, MemberRole::Default);
        let photo = PhotoId::new();

        assert!(member.add_photo(photo));
        assert!(!member.add_photo(photo));
        assert_eq!(member.photos.len(), 1);

        assert!(member.remove_photo(&photo));
        assert!(!member.remove_photo(&photo));
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let mut member = Member::new(UserId::new(), "A".into(), "desc".into(), false, MemberRole::Default);
        member.apply(MemberPatch {
            role: Some(MemberRole::Coordinator),
            ..Default::default()
        });

        assert_eq!(member.name, "A");
        assert_eq!(member.description, "desc");
        assert_eq!(member.role, MemberRole::Coordinator);
    }
}
