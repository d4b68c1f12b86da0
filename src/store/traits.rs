//! Backend-agnostic storage trait — single async interface for the
//! device-local key-value store.

use async_trait::async_trait;

use crate::error::StorageError;

/// Raw string key-value persistence.
///
/// The typed [`LocalStore`](crate::store::LocalStore) facade sits on top;
/// backends only move opaque strings. Last writer wins — no transactions.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value under `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
