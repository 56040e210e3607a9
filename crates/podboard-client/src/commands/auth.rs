//! Email login. There are no passwords: an unseen email provisions a new
//! member account.

use podboard_shared::models::{Session, User};
use podboard_shared::types::Role;
use podboard_shared::ValidationError;
use podboard_store::settings::save_session;
use tracing::info;

use crate::error::CommandError;
use crate::state::AppState;

/// Log in as the user with `email`, creating them if needed.
///
/// `name` is only used when provisioning; it defaults to the part of the
/// email before `@`, or the whole email when that part is blank.
pub fn login(
    state: &mut AppState,
    email: &str,
    name: Option<&str>,
) -> Result<User, CommandError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField("email").into());
    }

    let user = match state.users.find_by_email(email).cloned() {
        Some(user) => user,
        None => {
            let name = name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| default_name(email));
            state.users.create_user(name, email, Role::Member)?
        }
    };

    state.session = Session {
        user_id: Some(user.id),
    };
    save_session(state.store.as_ref(), &state.session);

    info!(user_id = %user.id, "logged in");
    Ok(user)
}

/// Clear the session. Returns the user that was logged in, if any.
pub fn logout(state: &mut AppState) -> Option<User> {
    let previous = state.current_user().cloned();
    state.session = Session::default();
    save_session(state.store.as_ref(), &state.session);

    if let Some(user) = &previous {
        info!(user_id = %user.id, "logged out");
    }
    previous
}

pub fn whoami(state: &AppState) -> Option<&User> {
    state.current_user()
}

fn default_name(email: &str) -> &str {
    email
        .split('@')
        .next()
        .map(str::trim)
        .filter(|local| !local.is_empty())
        .unwrap_or(email)
}
