//! Application context shared by every command.
//!
//! [`AppState`] is built once at startup from a store handle and passed by
//! `&mut` to each command handler. It owns the in-memory collections, which
//! are authoritative for the life of the process; the store is only read
//! here, at construction.

use std::rc::Rc;

use podboard_shared::constants::{KEY_GUESTS, KEY_PROJECTS, KEY_USERS};
use podboard_shared::models::{Guest, Project, Session, Settings, User};
#[cfg(test)]
use podboard_store::MemoryStore;
use podboard_store::{settings, KeyValueStore, Repository, SequenceAllocator};

use crate::config::ClientConfig;
use crate::error::CommandError;

/// Central application state.
pub struct AppState {
    /// Backing store every mutation is mirrored to.
    pub store: Rc<dyn KeyValueStore>,

    pub users: Repository<User>,
    pub projects: Repository<Project>,
    pub guests: Repository<Guest>,

    /// Per-series episode counters, loaded once and written through.
    pub sequences: SequenceAllocator,

    pub settings: Settings,

    /// Who is logged in. A dangling user id reads as logged out.
    pub session: Session,
}

impl AppState {
    /// Load every collection from `store` and seed the first admin if the
    /// team is empty.
    pub fn open(store: Rc<dyn KeyValueStore>, config: &ClientConfig) -> Result<Self, CommandError> {
        let mut users: Repository<User> = Repository::load(store.clone(), KEY_USERS);
        users.seed_admin(&config.admin_name, &config.admin_email)?;

        let state = Self {
            projects: Repository::load(store.clone(), KEY_PROJECTS),
            guests: Repository::load(store.clone(), KEY_GUESTS),
            sequences: SequenceAllocator::new(store.clone()),
            settings: settings::load_settings(store.as_ref()),
            session: settings::load_session(store.as_ref()),
            users,
            store,
        };

        tracing::info!(
            users = state.users.len(),
            projects = state.projects.len(),
            guests = state.guests.len(),
            "application state loaded"
        );
        Ok(state)
    }

    /// Fresh state over a volatile store, with the default admin seeded.
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self::open(Rc::new(MemoryStore::new()), &ClientConfig::default()).unwrap()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.user_id.and_then(|id| self.users.get(id))
    }
}
