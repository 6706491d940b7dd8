//! Access-token claims (transport-agnostic).
//!
//! The console never verifies token signatures: it holds no verification
//! key; the server remains the authority on token validity. Decoding here
//! exists only to read the expiry for the cheap client-side staleness
//! check.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The minimal claim set the console reads out of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject / user identifier.
    pub sub: String,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,

    /// Issued-at, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: Option<i64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not decodable: {0}")]
    Undecodable(String),

    #[error("token has expired")]
    Expired,
}

/// Decode a token's claims without verifying its signature.
pub fn decode_claims(token: &str) -> Result<AccessClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    // Expiry is compared against a caller-supplied clock in
    // `validate_expiry`, not against the wall clock at decode time.
    validation.validate_exp = false;
    validation.validate_aud = false;

    let data =
        jsonwebtoken::decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| TokenError::Undecodable(e.to_string()))?;

    Ok(data.claims)
}

/// Deterministically validate a token's expiry against `now`.
pub fn validate_expiry(claims: &AccessClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= now.timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(())
}
