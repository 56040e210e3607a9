use tracing::{info, warn};

use podboard_shared::models::{Session, User};
use podboard_shared::types::Role;
use podboard_shared::views::team_roster;
use podboard_store::settings::save_session;

use crate::commands::resolve_id;
use crate::error::CommandError;
use crate::state::AppState;

pub fn list_team(state: &AppState) -> Vec<&User> {
    team_roster(state.users.all())
}

/// Add a team member. Rejected if the email is already taken (any case).
pub fn invite(
    state: &mut AppState,
    name: &str,
    email: &str,
    role: Role,
) -> Result<User, CommandError> {
    Ok(state.users.create_user(name, email, role)?)
}

pub fn set_role(state: &mut AppState, id: &str, role: Role) -> Result<User, CommandError> {
    let id = resolve_id(&state.users, id)?;
    Ok(state.users.set_role(id, role)?)
}

/// Remove a team member. Removing the last admin is allowed; removing the
/// logged-in user also ends the session.
pub fn remove(state: &mut AppState, id: &str) -> Result<User, CommandError> {
    let id = resolve_id(&state.users, id)?;
    let removed = state.users.remove(id)?;

    if removed.is_admin() && state.users.admin_count() == 0 {
        warn!(user_id = %id, "removed the last admin");
    }
    if state.session.user_id == Some(id) {
        state.session = Session::default();
        save_session(state.store.as_ref(), &state.session);
    }

    info!(user_id = %id, "user removed");
    Ok(removed)
}
