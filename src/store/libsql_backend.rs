//! libSQL backend — async `StorageBackend` implementation.
//!
//! Supports local file and in-memory databases; the in-memory variant
//! backs the test suite.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::info;

use crate::error::StorageError;
use crate::store::traits::StorageBackend;

/// libSQL key-value backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn new_local(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Open(format!("Failed to create store directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StorageError::Open(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StorageError::Open(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Local store opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StorageError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StorageError::Open(format!("Failed to create in-memory store: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StorageError::Open(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS kv_store (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| StorageError::Query(format!("Failed to create kv_store table: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for LibSqlBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut rows = self
            .conn
            .query("SELECT value FROM kv_store WHERE key = ?1", params![key])
            .await
            .map_err(|e| StorageError::Query(format!("Failed to read {key}: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| StorageError::Query(format!("Failed to read {key}: {e}")))?;

        match row {
            Some(row) => {
                let value: String = row
                    .get(0)
                    .map_err(|e| StorageError::Query(format!("Failed to decode {key}: {e}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .await
            .map_err(|e| StorageError::Query(format!("Failed to write {key}: {e}")))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .await
            .map_err(|e| StorageError::Query(format!("Failed to remove {key}: {e}")))?;
        Ok(())
    }
}
