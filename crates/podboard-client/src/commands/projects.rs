use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use podboard_shared::calendar::{project_events, render_ics};
use podboard_shared::models::{non_empty, ChecklistItem, Guest, Project, ProjectDraft};
use podboard_shared::types::{Priority, Status};
use podboard_shared::views::{filter_projects, find_guest, ProjectQuery};
use podboard_shared::ValidationError;

use crate::commands::resolve_id;
use crate::error::CommandError;
use crate::state::AppState;

/// Partial edit of a project. `None` leaves a field alone; for optional text
/// and date fields `Some("")` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub series: Option<String>,
    pub episode_number: Option<u32>,
    pub description: Option<String>,
    pub before_notes: Option<String>,
    pub after_notes: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub scheduled_record_at: Option<String>,
    pub scheduled_publish_at: Option<String>,
    pub duration_estimate_min: Option<u32>,
    /// Id or id prefix of a guest, or `""` to unlink.
    pub guest: Option<String>,
    pub check: Vec<ChecklistItem>,
    pub uncheck: Vec<ChecklistItem>,
}

/// A project together with its resolved guest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub project: Project,
    pub guest: Option<Guest>,
}

pub fn list_projects<'a>(state: &'a AppState, query: &ProjectQuery) -> Vec<&'a Project> {
    filter_projects(state.projects.all(), query)
}

pub fn show_project(state: &AppState, id: &str) -> Result<ProjectDetail, CommandError> {
    let id = resolve_id(&state.projects, id)?;
    let project = state.projects.require(id)?.clone();
    let guest = find_guest(state.guests.all(), project.guest_id).cloned();
    Ok(ProjectDetail { project, guest })
}

/// The episode number a new project in `series` would get.
pub fn propose_episode_number(state: &AppState, series: &str) -> u32 {
    state.sequences.peek_episode_number(series)
}

/// Create a project. `guest` is an id or id prefix resolved against the
/// guest directory.
pub fn create_project(
    state: &mut AppState,
    mut draft: ProjectDraft,
    guest: Option<&str>,
) -> Result<Project, CommandError> {
    if let Some(guest) = guest.filter(|g| !g.trim().is_empty()) {
        draft.guest_id = Some(resolve_id(&state.guests, guest)?);
    }
    let project = state.projects.create_project(draft, &state.sequences)?;
    Ok(project)
}

pub fn update_project(
    state: &mut AppState,
    id: &str,
    patch: ProjectPatch,
) -> Result<Project, CommandError> {
    let id = resolve_id(&state.projects, id)?;
    let mut project = state.projects.require(id)?.clone();

    if let Some(title) = patch.title {
        project.title = title.trim().to_string();
    }
    if let Some(series) = patch.series {
        project.series = series;
    }
    if let Some(n) = patch.episode_number {
        project.episode_number = n;
    }
    if let Some(description) = patch.description {
        project.description = non_empty(Some(description));
    }
    if let Some(notes) = patch.before_notes {
        project.before_notes = non_empty(Some(notes));
    }
    if let Some(notes) = patch.after_notes {
        project.after_notes = non_empty(Some(notes));
    }
    if let Some(status) = patch.status {
        project.status = status;
    }
    if let Some(priority) = patch.priority {
        project.priority = priority;
    }
    if let Some(tags) = patch.tags {
        project.tags = tags;
    }
    if let Some(at) = patch.scheduled_record_at {
        project.scheduled_record_at = parse_optional_schedule(&at)?;
    }
    if let Some(at) = patch.scheduled_publish_at {
        project.scheduled_publish_at = parse_optional_schedule(&at)?;
    }
    if let Some(minutes) = patch.duration_estimate_min {
        project.duration_estimate_min = Some(minutes).filter(|m| *m > 0);
    }
    if let Some(guest) = patch.guest {
        project.guest_id = if guest.trim().is_empty() {
            None
        } else {
            Some(resolve_id(&state.guests, &guest)?)
        };
    }
    for item in patch.check {
        project.checklist.set(item, true);
    }
    for item in patch.uncheck {
        project.checklist.set(item, false);
    }

    Ok(state.projects.save_project(project)?)
}

pub fn delete_project(state: &mut AppState, id: &str) -> Result<Project, CommandError> {
    let id = resolve_id(&state.projects, id)?;
    let removed = state.projects.remove(id)?;
    info!(project_id = %removed.id, "project deleted");
    Ok(removed)
}

/// iCalendar document with the project's record and publish dates.
pub fn export_calendar(state: &AppState, id: &str) -> Result<String, CommandError> {
    let id = resolve_id(&state.projects, id)?;
    let project = state.projects.require(id)?;
    let events = project_events(project);
    if events.is_empty() {
        warn!(project_id = %project.id, "project has no scheduled dates to export");
    }
    Ok(render_ics(&events, Utc::now()))
}

/// Parse a schedule entered as `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM[:SS]`
/// or a bare date (midnight).
pub fn parse_schedule(input: &str) -> Result<NaiveDateTime, ValidationError> {
    let input = input.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(at);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "date",
            value: input.to_string(),
        })
}

fn parse_optional_schedule(input: &str) -> Result<Option<NaiveDateTime>, ValidationError> {
    if input.trim().is_empty() {
        Ok(None)
    } else {
        parse_schedule(input).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use podboard_shared::models::GuestDraft;
    use podboard_shared::views::SortKey;

    use super::*;
    use crate::commands::guests;

    fn draft(title: &str, series: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.into(),
            series: series.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_uses_allocator_per_series() {
        let mut state = AppState::in_memory();
        assert_eq!(propose_episode_number(&state, "Main"), 1);

        let numbers: Vec<u32> = [("A", "Main"), ("B", "Main"), ("C", "Guest Series")]
            .iter()
            .map(|(t, s)| create_project(&mut state, draft(t, s), None).unwrap().episode_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 1]);
        assert_eq!(propose_episode_number(&state, "Main"), 3);
    }

    #[test]
    fn test_numbers_keep_increasing_when_store_writes_fail() {
        let store = std::rc::Rc::new(podboard_store::MemoryStore::read_only());
        let mut state = AppState::open(store, &crate::config::ClientConfig::default()).unwrap();

        let a = create_project(&mut state, draft("A", "Main"), None).unwrap();
        let b = create_project(&mut state, draft("B", "Main"), None).unwrap();
        assert_eq!((a.episode_number, b.episode_number), (1, 2));
        assert_eq!(propose_episode_number(&state, "Main"), 3);
    }

    #[test]
    fn test_update_toggles_checklist_and_recomputes_progress() {
        let mut state = AppState::in_memory();
        let project = create_project(&mut state, draft("A", "Main"), None).unwrap();

        let updated = update_project(
            &mut state,
            &project.id.short(),
            ProjectPatch {
                check: vec![ChecklistItem::Research, ChecklistItem::Questions],
                status: Some(Status::Active),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.progress_pct, 50);
        assert_eq!(updated.status, Status::Active);

        let updated = update_project(
            &mut state,
            &project.id.to_string(),
            ProjectPatch {
                uncheck: vec![ChecklistItem::Research],
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.progress_pct, 25);
    }

    #[test]
    fn test_update_with_blank_title_changes_nothing() {
        let mut state = AppState::in_memory();
        let project = create_project(&mut state, draft("Keep me", "Main"), None).unwrap();

        let result = update_project(
            &mut state,
            &project.id.short(),
            ProjectPatch {
                title: Some("   ".into()),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(state.projects.get(project.id).unwrap().title, "Keep me");
    }

    #[test]
    fn test_schedule_parsing_and_clearing() {
        let mut state = AppState::in_memory();
        let project = create_project(&mut state, draft("A", "Main"), None).unwrap();

        let updated = update_project(
            &mut state,
            &project.id.short(),
            ProjectPatch {
                scheduled_record_at: Some("2024-06-01 09:30".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            updated.scheduled_record_at,
            parse_schedule("2024-06-01T09:30").ok()
        );

        let cleared = update_project(
            &mut state,
            &project.id.short(),
            ProjectPatch {
                scheduled_record_at: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(cleared.scheduled_record_at, None);

        assert!(parse_schedule("next tuesday").is_err());
        assert_eq!(
            parse_schedule("2024-06-01").unwrap().format("%H:%M").to_string(),
            "00:00"
        );
    }

    #[test]
    fn test_deleted_guest_leaves_project_readable() {
        let mut state = AppState::in_memory();
        let guest = guests::add_guest(
            &mut state,
            GuestDraft {
                name: "Dana".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let guest_id = guest.id.short();
        let project =
            create_project(&mut state, draft("Interview", "Main"), Some(&guest_id)).unwrap();
        assert_eq!(project.guest_id, Some(guest.id));

        guests::remove_guest(&mut state, &guest.id.short()).unwrap();

        let detail = show_project(&state, &project.id.short()).unwrap();
        assert_eq!(detail.project.guest_id, Some(guest.id));
        assert!(detail.guest.is_none());
    }

    #[test]
    fn test_unknown_guest_aborts_create() {
        let mut state = AppState::in_memory();
        let result = create_project(&mut state, draft("A", "Main"), Some("ffffffff"));
        assert!(matches!(result, Err(CommandError::UnknownId { kind: "guest", .. })));
        assert!(state.projects.is_empty());
        assert_eq!(propose_episode_number(&state, "Main"), 1);
    }

    #[test]
    fn test_list_and_delete() {
        let mut state = AppState::in_memory();
        let a = create_project(&mut state, draft("Alpha", "Main"), None).unwrap();
        create_project(&mut state, draft("Beta", "Main"), None).unwrap();

        let query = ProjectQuery {
            text: "alpha".into(),
            sort: SortKey::Episode,
            ..Default::default()
        };
        assert_eq!(list_projects(&state, &query).len(), 1);

        delete_project(&mut state, &a.id.short()).unwrap();
        assert!(list_projects(&state, &query).is_empty());
        assert_eq!(state.projects.len(), 1);
        assert!(delete_project(&mut state, &a.id.short()).is_err());
    }

    #[test]
    fn test_export_calendar_has_one_event_per_date() {
        let mut state = AppState::in_memory();
        let mut d = draft("Pilot", "Main");
        d.scheduled_record_at = parse_schedule("2024-06-01 09:30").ok();
        d.scheduled_publish_at = parse_schedule("2024-06-08 06:00").ok();
        let project = create_project(&mut state, d, None).unwrap();

        let ics = export_calendar(&state, &project.id.short()).unwrap();
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains(&format!("UID:{}-publish@podboard", project.id)));
    }
}
