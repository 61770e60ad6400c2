//! User Entity
//!
//! Identity root of the system: credentials, role and the single current
//! refresh token.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    UserId, email::Email, user_name::UserName, user_password::UserPassword, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// User name (unique, for login and display)
    pub user_name: UserName,
    /// Email (unique, lowercased)
    pub email: Email,
    /// Argon2id hash
    pub password: UserPassword,
    /// Role (User, Admin)
    pub user_role: UserRole,
    /// Current refresh token; `None` when signed out
    pub refresh_token: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(user_name: UserName, email: Email, password: UserPassword, user_role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password,
            user_role,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }

    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Whether `presented` is the stored current refresh token
    pub fn holds_refresh_token(&self, presented: &str) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|current| platform::crypto::constant_time_eq(current.as_bytes(), presented.as_bytes()))
    }
}
