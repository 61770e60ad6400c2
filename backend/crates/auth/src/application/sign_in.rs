//! Sign In Use Case
//!
//! Authenticates a user by user name or email and issues a token pair.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::{TokenPair, TokenService};
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    /// User name or email
    pub identifier: String,
    /// Password
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: TokenService<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self {
            tokens: TokenService::new(user_repo.clone(), config.clone()),
            user_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let identifier = input.identifier.trim();
        if identifier.is_empty() || input.password.is_empty() {
            return Err(AuthError::validation(
                "Username or email and password are required",
            ));
        }

        // '@' を含む識別子はメールアドレスとして扱う
        let user = if identifier.contains('@') {
            let email = Email::new(identifier).map_err(|_| AuthError::InvalidCredentials)?;
            self.user_repo.find_by_email(&email).await?
        } else {
            let user_name =
                UserName::new(identifier).map_err(|_| AuthError::InvalidCredentials)?;
            self.user_repo.find_by_user_name(&user_name).await?
        };

        let user = user.ok_or(AuthError::InvalidCredentials)?;

        let candidate = RawPassword::candidate(input.password);
        if !user.password.verify(&candidate, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.tokens.issue_pair(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed in"
        );

        let mut user = user;
        user.refresh_token = Some(tokens.refresh_token.clone());

        Ok(SignInOutput { user, tokens })
    }
}
