//! Client-held token pair and its persistence.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::claims::{decode_claims, validate_expiry};

/// The access/refresh token pair handed out by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// File-backed store for the token pair.
///
/// Tokens are persisted separately from the session snapshot record. Reads
/// fail closed: any I/O or parse failure is reported as "no tokens".
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store under the platform app-data directory.
    pub fn open_default() -> anyhow::Result<Self> {
        let dir = dirs::data_dir().context("failed to determine app data directory")?;
        Ok(Self {
            path: dir.join("consola").join("tokens.json"),
        })
    }

    /// Store at an explicit path (tests, portable installs).
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn get(&self) -> Option<TokenPair> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read token file");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(pair) => Some(pair),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "token file is corrupt");
                None
            }
        }
    }

    pub fn store(&self, pair: &TokenPair) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create token directory at {:?}", parent))?;
        }

        let raw = serde_json::to_string(pair).context("failed to serialize token pair")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write token file at {:?}", self.path))?;
        Ok(())
    }

    /// Idempotent: clearing an absent file is a no-op.
    pub fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to remove token file at {:?}", self.path)),
        }
    }

    /// Pure decode-and-compare expiry check; no network involved.
    ///
    /// A malformed or undecodable token is treated as expired (fail-closed).
    pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
        match decode_claims(token) {
            Ok(claims) => validate_expiry(&claims, now).is_err(),
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::AccessClaims;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    fn mint(expires_at: DateTime<Utc>) -> String {
        let claims = AccessClaims {
            sub: "user-1".to_string(),
            exp: expires_at.timestamp(),
            iat: Some(Utc::now().timestamp()),
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("failed to encode jwt")
    }

    fn temp_store(name: &str) -> TokenStore {
        let path = std::env::temp_dir().join(format!(
            "consola-tokens-{}-{}.json",
            name,
            uuid::Uuid::now_v7()
        ));
        TokenStore::at_path(path)
    }

    #[test]
    fn future_expiry_is_not_expired() {
        let now = Utc::now();
        let token = mint(now + Duration::minutes(30));
        assert!(!TokenStore::is_expired(&token, now));
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = Utc::now();
        let token = mint(now - Duration::minutes(1));
        assert!(TokenStore::is_expired(&token, now));
    }

    #[test]
    fn malformed_token_is_expired() {
        assert!(TokenStore::is_expired("not-a-jwt", Utc::now()));
        assert!(TokenStore::is_expired("", Utc::now()));
    }

    #[test]
    fn store_then_get_roundtrips() {
        let store = temp_store("roundtrip");
        let pair = TokenPair {
            access_token: mint(Utc::now() + Duration::hours(1)),
            refresh_token: "refresh-opaque".to_string(),
        };

        store.store(&pair).unwrap();
        assert_eq!(store.get(), Some(pair));

        store.clear().unwrap();
    }

    #[test]
    fn get_on_missing_file_is_none() {
        let store = temp_store("missing");
        assert_eq!(store.get(), None);
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let store = temp_store("corrupt");
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        store.store(&pair).unwrap();

        let path = std::env::temp_dir().join(format!(
            "consola-tokens-corrupt-overwrite-{}.json",
            uuid::Uuid::now_v7()
        ));
        let corrupt = TokenStore::at_path(&path);
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(corrupt.get(), None);

        store.clear().unwrap();
        corrupt.clear().unwrap();
    }

    #[test]
    fn clear_is_idempotent() {
        let store = temp_store("clear");
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        store.store(&pair).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }
}
