//! Volatile [`KeyValueStore`] backed by a `HashMap`.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;

/// In-process store. Nothing survives the handle being dropped.
///
/// A read-only instance rejects every write, which is how a full or
/// locked-down browser store behaves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            entries: RefCell::default(),
            read_only: true,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, json: &str) -> Result<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), json.to_string());
        Ok(())
    }
}
