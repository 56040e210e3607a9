//! iCalendar rendering of an episode's scheduled dates.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::constants::{ICS_PRODID, ICS_UID_DOMAIN};
use crate::models::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Record,
    Publish,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Publish => "publish",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Record => "Record",
            Self::Publish => "Publish",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Stable across exports of the same project and date field.
    pub uid: String,
    pub kind: EventKind,
    pub starts_at: NaiveDateTime,
    pub summary: String,
}

/// One event per scheduled date set on the project.
pub fn project_events(project: &Project) -> Vec<CalendarEvent> {
    [
        (EventKind::Record, project.scheduled_record_at),
        (EventKind::Publish, project.scheduled_publish_at),
    ]
    .into_iter()
    .filter_map(|(kind, at)| {
        at.map(|starts_at| CalendarEvent {
            uid: format!("{}-{}@{}", project.id, kind.as_str(), ICS_UID_DOMAIN),
            kind,
            starts_at,
            summary: format!(
                "{}: {} ({})",
                kind.label(),
                project.title,
                project.episode_label()
            ),
        })
    })
    .collect()
}

/// Render events as a `VCALENDAR` document with CRLF line endings.
///
/// Start times are floating (no time zone), matching how they were entered.
pub fn render_ics(events: &[CalendarEvent], stamp: DateTime<Utc>) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{ICS_PRODID}"),
    ];
    for event in events {
        lines.push("BEGIN:VEVENT".into());
        lines.push(format!("UID:{}", event.uid));
        lines.push(format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")));
        lines.push(format!("DTSTART:{}", event.starts_at.format("%Y%m%dT%H%M%S")));
        lines.push(format!("SUMMARY:{}", escape_text(&event.summary)));
        lines.push("END:VEVENT".into());
    }
    lines.push("END:VCALENDAR".into());

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

// RFC 5545 §3.3.11
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectDraft;

    fn scheduled_project() -> Project {
        Project::from_draft(
            ProjectDraft {
                title: "Pilot, part 1".into(),
                series: "Main".into(),
                scheduled_record_at: NaiveDateTime::parse_from_str(
                    "2024-06-01 09:30",
                    "%Y-%m-%d %H:%M",
                )
                .ok(),
                ..Default::default()
            },
            4,
            Utc::now(),
        )
    }

    #[test]
    fn test_one_event_per_scheduled_field() {
        let mut project = scheduled_project();
        assert_eq!(project_events(&project).len(), 1);

        project.scheduled_publish_at = project.scheduled_record_at;
        let events = project_events(&project);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Record);
        assert_eq!(events[1].kind, EventKind::Publish);
        assert_ne!(events[0].uid, events[1].uid);

        project.scheduled_record_at = None;
        project.scheduled_publish_at = None;
        assert!(project_events(&project).is_empty());
    }

    #[test]
    fn test_uid_is_stable() {
        let project = scheduled_project();
        assert_eq!(project_events(&project), project_events(&project));
        assert!(project_events(&project)[0]
            .uid
            .starts_with(&project.id.to_string()));
    }

    #[test]
    fn test_render_ics_escapes_summary() {
        let project = scheduled_project();
        let ics = render_ics(&project_events(&project), Utc::now());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(ics.contains("DTSTART:20240601T093000\r\n"));
        assert!(ics.contains("SUMMARY:Record: Pilot\\, part 1 (Main #4)\r\n"));
    }
}
