//! Token Service
//!
//! Issues and verifies access/refresh tokens and keeps the single current
//! refresh token per user.
//!
//! Session lifecycle per user:
//! `NoSession -> Active(access, refresh) -> Active(rotated) -> NoSession`
//! (sign-out or account deletion).

use std::sync::Arc;

use platform::jwt::{self, TokenError};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId,
    token_claims::{AccessClaims, RefreshClaims},
};
use crate::error::{AuthError, AuthResult};

/// Access + refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token service
pub struct TokenService<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> TokenService<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Sign an access token (stateless)
    pub fn issue_access_token(&self, user: &User) -> AuthResult<String> {
        let now = jwt::now_secs();
        let claims = AccessClaims {
            sub: user.user_id.into_uuid(),
            username: user.user_name.to_string(),
            email: user.email.to_string(),
            iat: now,
            exp: now + self.config.access_token_ttl.as_secs() as i64,
        };
        Ok(jwt::sign(&claims, &self.config.access_token_secret)?)
    }

    fn sign_refresh_token(&self, user_id: &UserId) -> AuthResult<String> {
        let now = jwt::now_secs();
        let claims = RefreshClaims {
            sub: user_id.into_uuid(),
            iat: now,
            exp: now + self.config.refresh_token_ttl.as_secs() as i64,
            jti: platform::crypto::random_token(16),
        };
        Ok(jwt::sign(&claims, &self.config.refresh_token_secret)?)
    }

    /// Sign a refresh token and make it the user's current one
    pub async fn issue_refresh_token(&self, user: &User) -> AuthResult<String> {
        let token = self.sign_refresh_token(&user.user_id)?;
        self.user_repo
            .set_refresh_token(&user.user_id, Some(&token))
            .await?;
        Ok(token)
    }

    /// Issue both tokens (sign-in)
    pub async fn issue_pair(&self, user: &User) -> AuthResult<TokenPair> {
        let access_token = self.issue_access_token(user)?;
        let refresh_token = self.issue_refresh_token(user).await?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token (signature + expiry)
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessClaims> {
        jwt::verify::<AccessClaims>(token, &self.config.access_token_secret).map_err(|e| {
            match e {
                TokenError::Expired => tracing::debug!("Access token expired"),
                other => tracing::debug!(error = %other, "Access token rejected"),
            }
            AuthError::Unauthorized
        })
    }

    /// Rotate: exchange the current refresh token for a new pair
    ///
    /// The presented token must verify, belong to an existing user and be
    /// that user's current token. A replayed (rotated-out) token and a lost
    /// rotation race both fail with `InvalidRefreshToken`.
    pub async fn refresh(&self, incoming: &str) -> AuthResult<(User, TokenPair)> {
        let claims = jwt::verify::<RefreshClaims>(incoming, &self.config.refresh_token_secret)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token failed verification");
                AuthError::InvalidRefreshToken
            })?;

        let user_id = UserId::from_uuid(claims.sub);
        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if !user.holds_refresh_token(incoming) {
            tracing::warn!(user_id = %user_id, "Refresh token is not current (replay or revoked)");
            return Err(AuthError::InvalidRefreshToken);
        }

        let access_token = self.issue_access_token(&user)?;
        let refresh_token = self.sign_refresh_token(&user_id)?;

        let rotated = self
            .user_repo
            .rotate_refresh_token(&user_id, incoming, &refresh_token)
            .await?;
        if !rotated {
            tracing::warn!(user_id = %user_id, "Concurrent refresh lost the rotation race");
            return Err(AuthError::InvalidRefreshToken);
        }

        tracing::info!(user_id = %user_id, "Refresh token rotated");

        let mut user = user;
        user.refresh_token = Some(refresh_token.clone());

        Ok((
            user,
            TokenPair {
                access_token,
                refresh_token,
            },
        ))
    }

    /// Clear the stored refresh token
    pub async fn invalidate(&self, user_id: &UserId) -> AuthResult<()> {
        self.user_repo.set_refresh_token(user_id, None).await?;
        tracing::info!(user_id = %user_id, "Refresh token invalidated");
        Ok(())
    }

    /// Decode the subject of an access token without loading the user
    pub fn subject(&self, token: &str) -> AuthResult<UserId> {
        let claims = self.verify_access_token(token)?;
        Ok(UserId::from_uuid(claims.sub))
    }
}

/// Parse a UUID path parameter into a user id
pub fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    Uuid::parse_str(raw.trim())
        .map(UserId::from_uuid)
        .map_err(|_| AuthError::validation("Invalid user id"))
}
