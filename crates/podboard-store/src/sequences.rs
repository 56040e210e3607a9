//! Per-series episode number allocation.
//!
//! The sequence map (`series -> last issued number`) is kept under its own
//! key and is never derived from the projects collection: deleting episodes
//! does not give numbers back.
//!
//! The map is loaded once when the allocator is built and is authoritative
//! for the rest of the process; every allocation is written through to the
//! store. There is no locking, so this is only correct with a single logical
//! writer per store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use podboard_shared::constants::KEY_SEQUENCES;

use crate::kv::{self, KeyValueStore};

pub type SequenceMap = BTreeMap<String, u32>;

pub struct SequenceAllocator {
    store: Rc<dyn KeyValueStore>,
    counters: RefCell<SequenceMap>,
}

impl SequenceAllocator {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        let counters = kv::load(store.as_ref(), KEY_SEQUENCES, SequenceMap::new());
        tracing::debug!(series = counters.len(), "sequence map loaded");
        Self {
            store,
            counters: RefCell::new(counters),
        }
    }

    /// Issue the next episode number for `series`, starting at 1.
    ///
    /// Any string is a valid series, including the empty one. The updated map
    /// is written back immediately; if that write fails the number is still
    /// returned, later calls keep counting up, and only a restart can issue
    /// it again.
    pub fn next_episode_number(&self, series: &str) -> u32 {
        let mut counters = self.counters.borrow_mut();
        let current = next_after(counters.get(series).copied(), series);
        counters.insert(series.to_string(), current);
        kv::save(self.store.as_ref(), KEY_SEQUENCES, &*counters);

        tracing::debug!(series, episode = current, "episode number issued");
        current
    }

    /// The number [`SequenceAllocator::next_episode_number`] would issue,
    /// without consuming it.
    pub fn peek_episode_number(&self, series: &str) -> u32 {
        next_after(self.counters.borrow().get(series).copied(), series)
    }
}

/// The number after `last`. A counter already at `u32::MAX` stays there.
fn next_after(last: Option<u32>, series: &str) -> u32 {
    let last = last.unwrap_or(0);
    last.checked_add(1).unwrap_or_else(|| {
        tracing::warn!(series, "episode counter is at its maximum");
        last
    })
}
