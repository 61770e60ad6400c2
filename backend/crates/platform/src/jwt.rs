//! Identity Token Codec
//!
//! HS256 JSON Web Tokens. Signing is generic over the claim set; verification
//! checks signature and `exp` with zero leeway.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Token codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature valid but `exp` is in the past
    #[error("Token has expired")]
    Expired,

    /// Malformed, wrong signature, wrong algorithm or missing claims
    #[error("Token is invalid: {0}")]
    Invalid(String),

    /// Encoding failed (should not happen with HMAC keys)
    #[error("Token signing failed: {0}")]
    Signing(String),
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// Sign `claims` with the HS256 `secret`
pub fn sign<C: Serialize>(claims: &C, secret: &[u8]) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify signature and expiry, returning the decoded claims
pub fn verify<C: DeserializeOwned>(token: &str, secret: &[u8]) -> Result<C, TokenError> {
    decode::<C>(token, &DecodingKey::from_secret(secret), &validation())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        })
}

/// Current UNIX time in seconds
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Claims {
        sub: String,
        iat: i64,
        exp: i64,
    }

    fn claims(exp_offset: i64) -> Claims {
        let now = now_secs();
        Claims {
            sub: "user-1".to_string(),
            iat: now,
            exp: now + exp_offset,
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let original = claims(60);
        let token = sign(&original, b"secret").unwrap();
        let decoded: Claims = verify(&token, b"secret").unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = sign(&claims(-5), b"secret").unwrap();
        assert_eq!(verify::<Claims>(&token, b"secret"), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign(&claims(60), b"secret").unwrap();
        assert!(matches!(
            verify::<Claims>(&token, b"other"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            verify::<Claims>("not.a.token", b"secret"),
            Err(TokenError::Invalid(_))
        ));
    }
}
