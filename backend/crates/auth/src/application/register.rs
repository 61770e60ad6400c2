//! Register Use Case
//!
//! Creates a new user account. Tokens are not issued here; the client signs
//! in afterwards.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
    /// `"user"` (default) or `"admin"`
    pub role: Option<String>,
    /// Admin key, required when `role` is admin
    pub admin_key: Option<String>,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let mut errors = Vec::new();

        let user_role = match input.role.as_deref() {
            None => UserRole::User,
            Some(code) => UserRole::from_code(code).unwrap_or_else(|| {
                errors.push(format!("Unknown role '{}'", code.trim()));
                UserRole::User
            }),
        };

        let user_name = UserName::new(&input.user_name)
            .map_err(|e| errors.push(e.to_string()))
            .ok();

        let email = Email::new_in_domain(
            input.email,
            self.config.allowed_email_domain.as_deref(),
        )
        .map_err(|e| errors.push(e.message().to_string()))
        .ok();

        let password = RawPassword::new(input.password)
            .map_err(|e| {
                if e.errors().is_empty() {
                    errors.push(e.message().to_string());
                } else {
                    errors.extend(e.errors().iter().cloned());
                }
            })
            .ok();

        let (Some(user_name), Some(email), Some(password)) = (user_name, email, password) else {
            return Err(AuthError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        if user_role.is_admin() {
            self.check_admin_key(input.admin_key.as_deref())?;
        }

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = UserPassword::from_raw(&password, self.config.pepper())?;
        let user = User::new(user_name, email, password, user_role);

        // 同時登録は一意制約で弾かれる
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            role = %user.user_role,
            "User registered"
        );

        Ok(user)
    }

    fn check_admin_key(&self, presented: Option<&str>) -> AuthResult<()> {
        let Some(expected) = self.config.admin_key.as_deref() else {
            return Err(AuthError::InvalidAdminKey);
        };
        let presented = presented.unwrap_or_default();

        if platform::crypto::constant_time_eq(expected.as_bytes(), presented.as_bytes()) {
            Ok(())
        } else {
            Err(AuthError::InvalidAdminKey)
        }
    }
}
