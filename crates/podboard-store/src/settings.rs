//! Process-wide records: app settings and the login session.

use podboard_shared::constants::{KEY_SESSION, KEY_SETTINGS};
use podboard_shared::models::{Session, Settings};

use crate::kv::{self, KeyValueStore};

pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
    kv::load(store, KEY_SETTINGS, Settings::default())
}

pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) {
    kv::save(store, KEY_SETTINGS, settings);
}

pub fn load_session(store: &dyn KeyValueStore) -> Session {
    kv::load(store, KEY_SESSION, Session::default())
}

pub fn save_session(store: &dyn KeyValueStore, session: &Session) {
    kv::save(store, KEY_SESSION, session);
}
