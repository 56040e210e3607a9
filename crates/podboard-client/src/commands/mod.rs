//! Command handlers, one sub-module per view.
//!
//! Each public function is one user action: it runs to completion against
//! [`AppState`](crate::state::AppState), mirrors any mutation to the store,
//! and either returns the result to display or a
//! [`CommandError`](crate::error::CommandError) with no state changed.

pub mod auth;
pub mod dashboard;
pub mod guests;
pub mod projects;
pub mod settings;
pub mod team;

use podboard_store::{Record, Repository};

use crate::error::CommandError;

/// Resolve a full id or a unique prefix of one (hyphens optional) against
/// the records of `repo`.
pub fn resolve_id<T: Record>(repo: &Repository<T>, input: &str) -> Result<T::Id, CommandError> {
    let needle: String = input
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_lowercase();
    if needle.is_empty() {
        return Err(CommandError::UnknownId {
            kind: T::KIND,
            input: input.to_string(),
        });
    }

    let mut matches = repo
        .all()
        .iter()
        .map(|item| item.id())
        .filter(|id| id.to_string().replace('-', "").starts_with(&needle));

    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(CommandError::UnknownId {
            kind: T::KIND,
            input: input.to_string(),
        }),
        (Some(_), Some(_)) => Err(CommandError::AmbiguousId {
            kind: T::KIND,
            input: input.to_string(),
        }),
    }
}
