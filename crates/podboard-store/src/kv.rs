//! The key-value seam every collection is persisted through.
//!
//! Backends only move opaque JSON strings. Typed access goes through
//! [`load`] and [`save`], which never fail from the caller's point of view:
//! a missing or malformed value reads as the fallback, and a failed write is
//! logged and dropped. In-memory state stays authoritative either way.
//!
//! Backends assume a single logical writer. Two processes sharing one store
//! can interleave read-modify-write cycles and lose updates.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Synchronous string-keyed store of JSON documents.
pub trait KeyValueStore {
    /// Raw JSON stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace whatever is stored under `key`.
    fn write(&self, key: &str, json: &str) -> Result<()>;
}

/// Read and decode `key`, returning `fallback` if it is absent, unreadable
/// or not well-formed.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, fallback: T) -> T {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return fallback,
        Err(e) => {
            tracing::warn!(key, error = %e, "store read failed, using fallback");
            return fallback;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "corrupt value in store, using fallback");
            fallback
        }
    }
}

/// Encode and write `value` under `key`. Failures are logged, not returned.
pub fn save<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to encode value, write dropped");
            return;
        }
    };

    if let Err(e) = store.write(key, &json) {
        tracing::warn!(key, error = %e, "store write failed, write dropped");
    }
}
