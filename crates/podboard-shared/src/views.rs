//! Derived views over the in-memory collections.
//!
//! Everything here is a pure function: inputs are borrowed, never mutated,
//! and every call recomputes from scratch.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::UPCOMING_LIMIT;
use crate::error::ValidationError;
use crate::models::{Guest, Project, User};
use crate::types::{GuestId, Priority, Status};

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Projects that are not archived.
    pub active_count: usize,
    pub completed_count: usize,
    /// Rounded mean progress of non-archived projects, 0 when there are none.
    pub avg_progress: u8,
}

pub fn dashboard_stats(projects: &[Project]) -> DashboardStats {
    let live: Vec<&Project> = projects
        .iter()
        .filter(|p| p.status != Status::Archived)
        .collect();
    let completed_count = projects
        .iter()
        .filter(|p| p.status == Status::Completed)
        .count();

    let avg_progress = if live.is_empty() {
        0
    } else {
        let total: u32 = live.iter().map(|p| p.progress_pct as u32).sum();
        (total as f64 / live.len() as f64).round() as u8
    };

    DashboardStats {
        active_count: live.len(),
        completed_count,
        avg_progress,
    }
}

/// Next recording sessions: non-archived, scheduled, soonest first.
pub fn upcoming_sessions(projects: &[Project]) -> Vec<&Project> {
    let mut scheduled: Vec<&Project> = projects
        .iter()
        .filter(|p| p.status != Status::Archived && p.scheduled_record_at.is_some())
        .collect();
    scheduled.sort_by_key(|p| p.scheduled_record_at);
    scheduled.truncate(UPCOMING_LIMIT);
    scheduled
}

// ---------------------------------------------------------------------------
// Project list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Most recently updated first.
    #[default]
    Updated,
    /// Highest progress first.
    Progress,
    /// By series, then episode number.
    Episode,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Progress => "progress",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "updated" => Ok(Self::Updated),
            "progress" => Ok(Self::Progress),
            "episode" => Ok(Self::Episode),
            _ => Err(ValidationError::InvalidValue {
                field: "sort",
                value: s.to_string(),
            }),
        }
    }
}

/// Search and filter controls of the project list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    pub text: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub sort: SortKey,
}

impl ProjectQuery {
    fn matches(&self, project: &Project, needle: &str) -> bool {
        if self.status.is_some_and(|s| s != project.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != project.priority) {
            return false;
        }
        needle.is_empty() || project.search_haystack().contains(needle)
    }
}

/// Apply the filters of `query` and order the survivors by its sort key.
pub fn filter_projects<'a>(projects: &'a [Project], query: &ProjectQuery) -> Vec<&'a Project> {
    let needle = query.text.trim().to_lowercase();
    let mut out: Vec<&Project> = projects
        .iter()
        .filter(|p| query.matches(p, &needle))
        .collect();

    match query.sort {
        SortKey::Updated => out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortKey::Progress => out.sort_by(|a, b| b.progress_pct.cmp(&a.progress_pct)),
        SortKey::Episode => out.sort_by(|a, b| episode_order(a, b)),
    }
    out
}

fn episode_order(a: &Project, b: &Project) -> Ordering {
    a.series
        .cmp(&b.series)
        .then(a.episode_number.cmp(&b.episode_number))
}

// ---------------------------------------------------------------------------
// Guests & team
// ---------------------------------------------------------------------------

/// Resolve a weak guest reference. Dangling ids resolve to `None`.
pub fn find_guest<'a>(guests: &'a [Guest], id: Option<GuestId>) -> Option<&'a Guest> {
    let id = id?;
    guests.iter().find(|g| g.id == id)
}

/// Guest directory search over name, company, email and topics, sorted by name.
pub fn filter_guests<'a>(guests: &'a [Guest], text: &str) -> Vec<&'a Guest> {
    let needle = text.trim().to_lowercase();
    let mut out: Vec<&Guest> = guests
        .iter()
        .filter(|g| {
            if needle.is_empty() {
                return true;
            }
            let haystack = format!(
                "{} {} {} {}",
                g.name,
                g.company.as_deref().unwrap_or_default(),
                g.email.as_deref().unwrap_or_default(),
                g.topics.as_deref().unwrap_or_default()
            )
            .to_lowercase();
            haystack.contains(&needle)
        })
        .collect();
    out.sort_by_key(|g| g.name.to_lowercase());
    out
}

/// Team roster: admins first, then by name.
pub fn team_roster(users: &[User]) -> Vec<&User> {
    let mut out: Vec<&User> = users.iter().collect();
    out.sort_by(|a, b| {
        b.is_admin()
            .cmp(&a.is_admin())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    out
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDateTime, Utc};

    use super::*;
    use crate::models::{GuestDraft, ProjectDraft};
    use crate::types::Role;

    fn project(title: &str, series: &str, n: u32) -> Project {
        Project::from_draft(
            ProjectDraft {
                title: title.into(),
                series: series.into(),
                ..Default::default()
            },
            n,
            Utc::now(),
        )
    }

    fn at(s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok()
    }

    #[test]
    fn test_dashboard_counts_one_per_status() {
        let projects: Vec<Project> = Status::ALL
            .iter()
            .map(|s| {
                let mut p = project(s.as_str(), "Main", 1);
                p.status = *s;
                p
            })
            .collect();

        let stats = dashboard_stats(&projects);
        assert_eq!(stats.active_count, 3);
        assert_eq!(stats.completed_count, 1);
    }

    #[test]
    fn test_avg_progress_guards_empty_and_archived() {
        assert_eq!(dashboard_stats(&[]).avg_progress, 0);

        let mut archived = project("Old", "Main", 1);
        archived.status = Status::Archived;
        archived.progress_pct = 100;
        let stats = dashboard_stats(&[archived]);
        assert_eq!(stats.avg_progress, 0);
        assert_eq!(stats.active_count, 0);
    }

    #[test]
    fn test_avg_progress_rounds_mean() {
        let mut a = project("A", "Main", 1);
        a.progress_pct = 25;
        let mut b = project("B", "Main", 2);
        b.progress_pct = 50;
        let c = project("C", "Main", 3);
        // (25 + 50 + 0) / 3 = 25.0
        assert_eq!(dashboard_stats(&[a.clone(), b.clone(), c]).avg_progress, 25);
        // (25 + 50) / 2 = 37.5
        assert_eq!(dashboard_stats(&[a, b]).avg_progress, 38);
    }

    #[test]
    fn test_upcoming_sessions_sorted_and_capped() {
        let mut projects = Vec::new();
        for day in (1..=7).rev() {
            let mut p = project(&format!("Day {day}"), "Main", day);
            p.scheduled_record_at = at(&format!("2024-06-0{day} 09:00"));
            projects.push(p);
        }
        let mut archived = project("Archived", "Main", 99);
        archived.status = Status::Archived;
        archived.scheduled_record_at = at("2024-05-01 09:00");
        projects.push(archived);
        projects.push(project("Unscheduled", "Main", 100));

        let upcoming = upcoming_sessions(&projects);
        let titles: Vec<&str> = upcoming.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Day 1", "Day 2", "Day 3", "Day 4", "Day 5"]);
    }

    #[test]
    fn test_search_matches_title_and_tags_case_insensitively() {
        let mut alpha = project("Alpha", "Main", 1);
        alpha.tags = vec!["news".into()];
        let mut beta = project("Beta", "Main", 2);
        beta.tags = vec!["tech".into()];
        let projects = vec![alpha, beta];

        let by_title = filter_projects(
            &projects,
            &ProjectQuery {
                text: "alpha".into(),
                ..Default::default()
            },
        );
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Alpha");

        let by_tag = filter_projects(
            &projects,
            &ProjectQuery {
                text: "TECH".into(),
                ..Default::default()
            },
        );
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].title, "Beta");
    }

    #[test]
    fn test_search_matches_series_name() {
        let projects = vec![project("Pilot", "Main", 1), project("Pilot", "Tech Talks", 1)];

        let found = filter_projects(
            &projects,
            &ProjectQuery {
                text: "talks".into(),
                ..Default::default()
            },
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].series, "Tech Talks");
    }

    #[test]
    fn test_empty_query_returns_everything_and_text_narrows() {
        let mut projects = vec![
            project("Alpha", "Main", 1),
            project("Beta", "Side", 1),
            project("Gamma", "Main", 2),
        ];
        projects[1].description = Some("A chat about alpine skiing".into());

        let all = filter_projects(&projects, &ProjectQuery::default());
        assert_eq!(all.len(), projects.len());

        let narrowed = filter_projects(
            &projects,
            &ProjectQuery {
                text: "alp".into(),
                ..Default::default()
            },
        );
        assert_eq!(narrowed.len(), 2);
        assert!(narrowed.iter().all(|p| all.iter().any(|q| q.id == p.id)));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let mut a = project("Alpha", "Main", 1);
        a.status = Status::Active;
        a.priority = Priority::High;
        let mut b = project("Alpha two", "Main", 2);
        b.status = Status::Active;
        b.priority = Priority::Low;
        let mut c = project("Other", "Main", 3);
        c.status = Status::Draft;
        c.priority = Priority::High;
        let projects = vec![a, b, c];

        let out = filter_projects(
            &projects,
            &ProjectQuery {
                text: "alpha".into(),
                status: Some(Status::Active),
                priority: Some(Priority::High),
                sort: SortKey::Updated,
            },
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].episode_number, 1);
    }

    #[test]
    fn test_episode_sort_groups_series() {
        let projects = vec![
            project("b2", "Bonus", 2),
            project("m3", "Main", 3),
            project("b1", "Bonus", 1),
            project("m1", "Main", 1),
            project("b3", "Bonus", 3),
        ];
        let out = filter_projects(
            &projects,
            &ProjectQuery {
                sort: SortKey::Episode,
                ..Default::default()
            },
        );
        let labels: Vec<String> = out.iter().map(|p| p.episode_label()).collect();
        assert_eq!(
            labels,
            vec!["Bonus #1", "Bonus #2", "Bonus #3", "Main #1", "Main #3"]
        );
    }

    #[test]
    fn test_updated_and_progress_sort_descending() {
        let now = Utc::now();
        let mut old = project("Old", "Main", 1);
        old.updated_at = now - Duration::hours(2);
        old.progress_pct = 75;
        let mut new = project("New", "Main", 2);
        new.updated_at = now;
        new.progress_pct = 25;
        let projects = vec![old, new];

        let by_updated = filter_projects(&projects, &ProjectQuery::default());
        assert_eq!(by_updated[0].title, "New");

        let by_progress = filter_projects(
            &projects,
            &ProjectQuery {
                sort: SortKey::Progress,
                ..Default::default()
            },
        );
        assert_eq!(by_progress[0].title, "Old");
        // source order untouched
        assert_eq!(projects[0].title, "Old");
    }

    #[test]
    fn test_dangling_guest_reference_resolves_to_none() {
        let guest = Guest::from_draft(
            GuestDraft {
                name: "Dana".into(),
                ..Default::default()
            },
            Utc::now(),
        );
        let guests = vec![guest.clone()];
        assert_eq!(find_guest(&guests, Some(guest.id)).unwrap().name, "Dana");
        assert!(find_guest(&guests, Some(GuestId::new())).is_none());
        assert!(find_guest(&guests, None).is_none());
    }

    #[test]
    fn test_guest_filter_searches_company_and_sorts_by_name() {
        let mk = |name: &str, company: Option<&str>| {
            Guest::from_draft(
                GuestDraft {
                    name: name.into(),
                    company: company.map(String::from),
                    ..Default::default()
                },
                Utc::now(),
            )
        };
        let guests = vec![
            mk("zoe", Some("Acme")),
            mk("Adam", Some("ACME labs")),
            mk("Bo", None),
        ];

        let names: Vec<&str> = filter_guests(&guests, "acme")
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["Adam", "zoe"]);
        assert_eq!(filter_guests(&guests, "").len(), 3);
    }

    #[test]
    fn test_team_roster_lists_admins_first() {
        let now = Utc::now();
        let users = vec![
            User::new("Carl", "c@x.io", Role::Member, now),
            User::new("Zed", "z@x.io", Role::Admin, now),
            User::new("amy", "a@x.io", Role::Member, now),
        ];
        let names: Vec<&str> = team_roster(&users).iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "amy", "Carl"]);
    }
}
