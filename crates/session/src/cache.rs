//! Persisted session snapshot (untrusted cache).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use tokio::sync::Mutex;

use consola_auth::{Permission, Principal, Role};

use crate::api::UserRecord;

/// The single keyed record the console persists between runs.
///
/// Tokens are stored separately (see [`crate::TokenStore`]). This record is
/// an untrusted cache: it is only ever believed after token expiry has been
/// re-validated, and even then only as the provisional state while the
/// principal is re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub user: UserRecord,
    pub permissions: Vec<String>,
    pub is_authenticated: bool,
}

impl PersistedSession {
    pub fn to_principal(&self) -> Principal {
        Principal::new(
            self.user.id,
            self.user.roles.iter().cloned().map(Role::from),
            self.permissions.iter().cloned().map(Permission::from),
        )
    }
}

const RECORD_KEY: &str = "current";

/// SQLite-backed store for the persisted session record.
///
/// Cheap to clone and safe to share; the pool is initialized lazily on
/// first use.
#[derive(Debug, Clone)]
pub struct SessionCache {
    pool: Arc<Mutex<Option<SqlitePool>>>,
    db_path: PathBuf,
}

impl SessionCache {
    /// Cache under the platform app-data directory.
    pub fn open_default() -> anyhow::Result<Self> {
        let dir = dirs::data_dir().context("failed to determine app data directory")?;
        Ok(Self::at_path(dir.join("consola").join("session.db")))
    }

    /// Cache at an explicit path (tests, portable installs).
    pub fn at_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            pool: Arc::new(Mutex::new(None)),
            db_path: db_path.into(),
        }
    }

    /// Initialize the database connection (called lazily on first use).
    async fn ensure_initialized(&self) -> anyhow::Result<()> {
        let mut pool_guard = self.pool.lock().await;
        if pool_guard.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session cache directory at {:?}", parent)
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.db_path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open session cache at {:?}", self.db_path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session_state (
                key       TEXT PRIMARY KEY,
                data      TEXT NOT NULL,
                cached_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create session_state table")?;

        *pool_guard = Some(pool);
        Ok(())
    }

    /// Get the pool, initializing if necessary.
    async fn get_pool(&self) -> anyhow::Result<SqlitePool> {
        self.ensure_initialized().await?;
        let pool_guard = self.pool.lock().await;
        pool_guard
            .as_ref()
            .cloned()
            .context("session cache pool missing after initialization")
    }

    pub async fn store(&self, record: &PersistedSession) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;
        let data = serde_json::to_string(record).context("failed to serialize session record")?;

        sqlx::query(
            r#"
            INSERT INTO session_state (key, data, cached_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET data = excluded.data, cached_at = excluded.cached_at
            "#,
        )
        .bind(RECORD_KEY)
        .bind(data)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .context("failed to store session record")?;

        Ok(())
    }

    pub async fn load(&self) -> anyhow::Result<Option<PersistedSession>> {
        let pool = self.get_pool().await?;

        let row = sqlx::query("SELECT data FROM session_state WHERE key = ?1")
            .bind(RECORD_KEY)
            .fetch_optional(&pool)
            .await
            .context("failed to load session record")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let data: String = row
            .try_get("data")
            .context("session record row missing data column")?;
        let record = serde_json::from_str(&data).context("failed to deserialize session record")?;
        Ok(Some(record))
    }

    /// Idempotent: clearing an empty cache is a no-op.
    pub async fn clear(&self) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;
        sqlx::query("DELETE FROM session_state WHERE key = ?1")
            .bind(RECORD_KEY)
            .execute(&pool)
            .await
            .context("failed to clear session record")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consola_core::UserId;

    fn temp_cache(name: &str) -> SessionCache {
        let path = std::env::temp_dir().join(format!(
            "consola-cache-{}-{}.db",
            name,
            uuid::Uuid::now_v7()
        ));
        SessionCache::at_path(path)
    }

    fn record() -> PersistedSession {
        PersistedSession {
            user: UserRecord {
                id: UserId::new(),
                email: "ana@example.com".to_string(),
                display_name: Some("Ana".to_string()),
                roles: vec!["VIEWER".to_string()],
            },
            permissions: vec!["BUSINESS_CLIENT_READ".to_string()],
            is_authenticated: true,
        }
    }

    #[tokio::test]
    async fn store_then_load_roundtrips() {
        let cache = temp_cache("roundtrip");
        let record = record();

        cache.store(&record).await.unwrap();
        assert_eq!(cache.load().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn store_replaces_the_single_record() {
        let cache = temp_cache("replace");
        let mut record = record();

        cache.store(&record).await.unwrap();
        record.permissions = vec!["BUSINESS_INVOICE_READ".to_string()];
        cache.store(&record).await.unwrap();

        assert_eq!(cache.load().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn load_of_missing_record_is_none() {
        let cache = temp_cache("missing");
        assert_eq!(cache.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let cache = temp_cache("clear");
        cache.store(&record()).await.unwrap();

        cache.clear().await.unwrap();
        cache.clear().await.unwrap();
        assert_eq!(cache.load().await.unwrap(), None);
    }

    #[test]
    fn persisted_record_rebuilds_the_principal() {
        let record = record();
        let principal = record.to_principal();

        assert_eq!(principal.user_id, record.user.id);
        assert!(principal.has_role(&Role::new("VIEWER")));
        assert!(principal.has_permission(&Permission::new("BUSINESS_CLIENT_READ")));
    }
}
