//! SQLite-backed credential table.
//!
//! One row per enrolled client certificate. The gateway only ever reads;
//! rows are written by `gemflux-admin`.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};

use crate::store::fingerprint::Fingerprint;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    cert     TEXT PRIMARY KEY NOT NULL,
    instance TEXT NOT NULL,
    token    TEXT NOT NULL
)
"#;

/// Errors raised by the credential store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A client certificate enrolled against a Miniflux account.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct CredentialRecord {
    #[sqlx(rename = "cert")]
    pub fingerprint: String,
    pub instance: String,
    pub token: String,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("fingerprint", &self.fingerprint)
            .field("instance", &self.instance)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Shared handle to the credential database.
///
/// Cloning is cheap; all clones share one connection pool, which serves
/// concurrent lookups from every connection task.
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(path = %path, "Credential store opened");
        Ok(store)
    }

    /// Private in-memory database, used by tests.
    ///
    /// Limited to a single connection: every SQLite `:memory:` connection is
    /// its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Find the record enrolled for `fingerprint`.
    ///
    /// `Ok(None)` means the certificate is unknown; `Err` is a storage fault.
    pub async fn lookup(&self, fingerprint: &Fingerprint) -> Result<Option<CredentialRecord>, StoreError> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            "SELECT cert, instance, token FROM users WHERE cert = ?1",
        )
        .bind(fingerprint.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Insert or replace the record for a fingerprint.
    pub async fn upsert(&self, fingerprint: &Fingerprint, instance: &str, token: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (cert, instance, token) VALUES (?1, ?2, ?3)
             ON CONFLICT(cert) DO UPDATE SET instance = excluded.instance, token = excluded.token",
        )
        .bind(fingerprint.as_str())
        .bind(instance)
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete a record. Returns whether a row was removed.
    pub async fn remove(&self, fingerprint: &Fingerprint) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE cert = ?1")
            .bind(fingerprint.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All enrolled records, ordered by fingerprint.
    pub async fn list(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        let records = sqlx::query_as::<_, CredentialRecord>(
            "SELECT cert, instance, token FROM users ORDER BY cert",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Close the pool, waiting for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("connections", &self.pool.size())
            .finish()
    }
}
