use serde::Serialize;
use tracing::{info, warn};

use podboard_shared::models::{Guest, GuestDraft, Project};
use podboard_shared::views::filter_guests;

use crate::commands::resolve_id;
use crate::error::CommandError;
use crate::state::AppState;

/// Partial edit of a guest. `Some("")` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct GuestPatch {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub socials: Option<String>,
    pub notes: Option<String>,
    pub photo_data_url: Option<String>,
    pub planned_questions: Option<String>,
    pub topics: Option<String>,
}

/// A guest and the episodes they appear in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetail {
    pub guest: Guest,
    pub episodes: Vec<Project>,
}

pub fn list_guests<'a>(state: &'a AppState, query: &str) -> Vec<&'a Guest> {
    filter_guests(state.guests.all(), query)
}

pub fn show_guest(state: &AppState, id: &str) -> Result<GuestDetail, CommandError> {
    let id = resolve_id(&state.guests, id)?;
    let guest = state.guests.require(id)?.clone();
    let episodes = state.projects.for_guest(id).into_iter().cloned().collect();
    Ok(GuestDetail { guest, episodes })
}

pub fn add_guest(state: &mut AppState, draft: GuestDraft) -> Result<Guest, CommandError> {
    Ok(state.guests.create_guest(draft)?)
}

pub fn update_guest(
    state: &mut AppState,
    id: &str,
    patch: GuestPatch,
) -> Result<Guest, CommandError> {
    let id = resolve_id(&state.guests, id)?;
    let current = state.guests.require(id)?;

    let merge = |new: Option<String>, old: &Option<String>| new.or_else(|| old.clone());
    let draft = GuestDraft {
        name: patch.name.unwrap_or_else(|| current.name.clone()),
        company: merge(patch.company, &current.company),
        email: merge(patch.email, &current.email),
        bio: merge(patch.bio, &current.bio),
        socials: merge(patch.socials, &current.socials),
        notes: merge(patch.notes, &current.notes),
        photo_data_url: merge(patch.photo_data_url, &current.photo_data_url),
        planned_questions: merge(patch.planned_questions, &current.planned_questions),
        topics: merge(patch.topics, &current.topics),
    };

    Ok(state.guests.update_guest(id, draft)?)
}

/// Remove a guest. Episodes that referenced them keep the dangling id.
pub fn remove_guest(state: &mut AppState, id: &str) -> Result<Guest, CommandError> {
    let id = resolve_id(&state.guests, id)?;
    let removed = state.guests.remove(id)?;

    let orphaned = state.projects.for_guest(id).len();
    if orphaned > 0 {
        warn!(guest_id = %id, orphaned, "removed guest is still referenced by episodes");
    }
    info!(guest_id = %id, "guest removed");
    Ok(removed)
}
