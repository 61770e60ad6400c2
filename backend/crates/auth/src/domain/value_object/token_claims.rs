//! Token Claims
//!
//! Claim sets carried by access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token claims (short-lived, stateless)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Refresh token claims
///
/// `jti` keeps tokens minted in the same second distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}
