use serde::Serialize;
use tracing::info;

use podboard_shared::models::{non_empty, Settings};
use podboard_store::settings::save_settings;

use crate::state::AppState;

/// Settings as displayed: the API key is never shown in clear.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub openai_key: Option<String>,
    pub enable_chat: bool,
}

pub fn get_settings(state: &AppState) -> SettingsView {
    SettingsView {
        openai_key: state.settings.masked_key(),
        enable_chat: state.settings.chat_enabled(),
    }
}

/// Store or clear (`None` / blank) the OpenAI key used by the chat panel.
pub fn set_openai_key(state: &mut AppState, key: Option<String>) -> SettingsView {
    update(state, |s| s.openai_key = non_empty(key));
    info!(has_key = state.settings.openai_key.is_some(), "OpenAI key updated");
    get_settings(state)
}

pub fn set_chat_enabled(state: &mut AppState, enabled: bool) -> SettingsView {
    update(state, |s| s.enable_chat = Some(enabled));
    info!(enabled, "chat toggled");
    get_settings(state)
}

fn update(state: &mut AppState, apply: impl FnOnce(&mut Settings)) {
    apply(&mut state.settings);
    save_settings(state.store.as_ref(), &state.settings);
}
