//! # podboard-store
//!
//! Local persistence for Podboard.
//!
//! Every collection is one JSON document under a string key in a
//! [`KeyValueStore`]. The crate provides the SQLite-backed [`Database`], a
//! volatile [`MemoryStore`], best-effort typed [`kv::load`]/[`kv::save`],
//! the in-memory [`Repository`] collections with their per-entity helpers,
//! and the per-series [`SequenceAllocator`].

pub mod database;
pub mod guests;
pub mod kv;
pub mod memory;
pub mod migrations;
pub mod projects;
pub mod repository;
pub mod sequences;
pub mod settings;
pub mod users;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use repository::{Record, Repository};
pub use sequences::SequenceAllocator;
