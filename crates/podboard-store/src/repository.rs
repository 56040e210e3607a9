//! In-memory entity collections mirrored to a [`KeyValueStore`].
//!
//! A [`Repository`] is loaded once from its store key and is authoritative
//! from then on. Every mutation rewrites the whole collection under that key;
//! if the write fails the in-memory change stands.

use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use podboard_shared::models::{Guest, Project, User};
use podboard_shared::types::{GuestId, ProjectId, UserId};

use crate::error::{Result, StoreError};
use crate::kv::{self, KeyValueStore};

/// A record that can live in a [`Repository`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + fmt::Display;

    /// Human-readable kind used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
}

impl Record for User {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }
}

impl Record for Project {
    type Id = ProjectId;
    const KIND: &'static str = "project";

    fn id(&self) -> ProjectId {
        self.id
    }
}

impl Record for Guest {
    type Id = GuestId;
    const KIND: &'static str = "guest";

    fn id(&self) -> GuestId {
        self.id
    }
}

pub struct Repository<T: Record> {
    store: Rc<dyn KeyValueStore>,
    key: &'static str,
    items: Vec<T>,
}

impl<T: Record> Repository<T> {
    /// Load the collection stored under `key`; absent or corrupt data yields
    /// an empty collection.
    pub fn load(store: Rc<dyn KeyValueStore>, key: &'static str) -> Self {
        let items: Vec<T> = kv::load(store.as_ref(), key, Vec::new());
        tracing::debug!(key, count = items.len(), kind = T::KIND, "collection loaded");
        Self { store, key, items }
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Like [`Repository::get`] but a miss is an error.
    pub fn require(&self, id: T::Id) -> Result<&T> {
        self.get(id).ok_or_else(|| not_found::<T>(id))
    }

    /// Prepend a new record and persist.
    pub fn insert(&mut self, item: T) -> &T {
        self.items.insert(0, item);
        self.persist();
        &self.items[0]
    }

    /// Replace the record with the same id in place and persist.
    pub fn replace(&mut self, item: T) -> Result<()> {
        let id = item.id();
        let slot = self
            .items
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        *slot = item;
        self.persist();
        Ok(())
    }

    /// Remove the record with `id`, returning it. Nothing else is touched.
    pub fn remove(&mut self, id: T::Id) -> Result<T> {
        let pos = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        let removed = self.items.remove(pos);
        self.persist();
        Ok(removed)
    }

    fn persist(&self) {
        kv::save(self.store.as_ref(), self.key, &self.items);
    }
}

fn not_found<T: Record>(id: T::Id) -> StoreError {
    StoreError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}
