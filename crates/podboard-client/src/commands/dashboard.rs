use chrono::NaiveDateTime;
use serde::Serialize;

use podboard_shared::models::User;
use podboard_shared::types::ProjectId;
use podboard_shared::views::{dashboard_stats, find_guest, upcoming_sessions, DashboardStats};

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingSession {
    pub project_id: ProjectId,
    pub title: String,
    pub episode: String,
    pub scheduled_record_at: NaiveDateTime,
    /// `None` when unlinked or when the guest was deleted.
    pub guest_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: Option<User>,
    pub stats: DashboardStats,
    pub upcoming: Vec<UpcomingSession>,
}

pub fn dashboard(state: &AppState) -> Dashboard {
    let projects = state.projects.all();
    let upcoming = upcoming_sessions(projects)
        .into_iter()
        .filter_map(|p| {
            Some(UpcomingSession {
                project_id: p.id,
                title: p.title.clone(),
                episode: p.episode_label(),
                scheduled_record_at: p.scheduled_record_at?,
                guest_name: find_guest(state.guests.all(), p.guest_id).map(|g| g.name.clone()),
            })
        })
        .collect();

    Dashboard {
        user: state.current_user().cloned(),
        stats: dashboard_stats(projects),
        upcoming,
    }
}
