//! Acting user of a write operation

use auth::CurrentUser;

use crate::domain::value_object::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    /// Owner of the resource, or an admin
    pub fn may_manage(&self, owner: Option<&UserId>) -> bool {
        self.is_admin || owner == Some(&self.user_id)
    }
}

impl From<CurrentUser> for Actor {
    fn from(user: CurrentUser) -> Self {
        Self {
            user_id: user.user_id,
            is_admin: user.is_admin(),
        }
    }
}
