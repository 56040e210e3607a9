//! Domain records persisted by the store.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase field
//! names, which is the shape each collection takes under its store key.
//! Optional fields are skipped when absent and default to `None` when a
//! stored record predates them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::progress::calc_progress;
use crate::types::{GuestId, Priority, ProjectId, Role, Status, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A team member. `email` is the login handle, `id` the primary key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            role,
            created_at: now,
        }
    }

    /// Case-insensitive email comparison used for login and invites.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().to_lowercase() == email.trim().to_lowercase()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ---------------------------------------------------------------------------
// Guest
// ---------------------------------------------------------------------------

/// A person invited on an episode. Only `name` is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Free-form social handles / links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Inline `data:` URL of the guest's photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_questions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a user fills in when adding or editing a guest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestDraft {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub socials: Option<String>,
    pub notes: Option<String>,
    pub photo_data_url: Option<String>,
    pub planned_questions: Option<String>,
    pub topics: Option<String>,
}

impl GuestDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(())
    }
}

impl Guest {
    pub fn from_draft(draft: GuestDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: GuestId::new(),
            name: draft.name.trim().to_string(),
            company: non_empty(draft.company),
            email: non_empty(draft.email),
            bio: non_empty(draft.bio),
            socials: non_empty(draft.socials),
            notes: non_empty(draft.notes),
            photo_data_url: non_empty(draft.photo_data_url),
            planned_questions: non_empty(draft.planned_questions),
            topics: non_empty(draft.topics),
            created_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

/// Fixed four-item pre-production tracker. Missing fields decode as `false`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Checklist {
    pub research: bool,
    pub questions: bool,
    pub equipment: bool,
    pub thumbnails: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistItem {
    Research,
    Questions,
    Equipment,
    Thumbnails,
}

impl Checklist {
    pub fn items(&self) -> [(ChecklistItem, bool); 4] {
        [
            (ChecklistItem::Research, self.research),
            (ChecklistItem::Questions, self.questions),
            (ChecklistItem::Equipment, self.equipment),
            (ChecklistItem::Thumbnails, self.thumbnails),
        ]
    }

    pub fn done_count(&self) -> usize {
        self.items().iter().filter(|(_, done)| *done).count()
    }

    pub fn set(&mut self, item: ChecklistItem, done: bool) {
        let slot = match item {
            ChecklistItem::Research => &mut self.research,
            ChecklistItem::Questions => &mut self.questions,
            ChecklistItem::Equipment => &mut self.equipment,
            ChecklistItem::Thumbnails => &mut self.thumbnails,
        };
        *slot = done;
    }
}

impl ChecklistItem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Questions => "questions",
            Self::Equipment => "equipment",
            Self::Thumbnails => "thumbnails",
        }
    }
}

impl std::str::FromStr for ChecklistItem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "research" => Ok(Self::Research),
            "questions" => Ok(Self::Questions),
            "equipment" => Ok(Self::Equipment),
            "thumbnails" => Ok(Self::Thumbnails),
            _ => Err(ValidationError::InvalidValue {
                field: "checklist item",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Project (episode)
// ---------------------------------------------------------------------------

/// One unit of production work.
///
/// `progress_pct` is derived from `checklist` and stored alongside it. It is
/// only kept in sync by [`Project::touch`], which every save goes through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub series: String,
    pub episode_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_notes: Option<String>,
    pub status: Status,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Wall-clock recording slot. ISO-8601 on disk, so string order matches
    /// chronological order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_record_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_publish_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_estimate_min: Option<u32>,
    /// Weak reference; the guest may have been deleted since.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<GuestId>,
    #[serde(default)]
    pub checklist: Checklist,
    #[serde(default)]
    pub progress_pct: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a user fills in when creating an episode.
///
/// `episode_number` left as `None` means "take the next number of the
/// series".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub series: String,
    pub episode_number: Option<u32>,
    pub description: Option<String>,
    pub before_notes: Option<String>,
    pub after_notes: Option<String>,
    pub status: Status,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub scheduled_record_at: Option<NaiveDateTime>,
    pub scheduled_publish_at: Option<NaiveDateTime>,
    pub duration_estimate_min: Option<u32>,
    pub guest_id: Option<GuestId>,
    pub checklist: Checklist,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        Ok(())
    }
}

impl Project {
    pub fn from_draft(draft: ProjectDraft, episode_number: u32, now: DateTime<Utc>) -> Self {
        let mut project = Self {
            id: ProjectId::new(),
            title: draft.title.trim().to_string(),
            series: draft.series,
            episode_number,
            description: non_empty(draft.description),
            before_notes: non_empty(draft.before_notes),
            after_notes: non_empty(draft.after_notes),
            status: draft.status,
            priority: draft.priority,
            tags: draft.tags,
            scheduled_record_at: draft.scheduled_record_at,
            scheduled_publish_at: draft.scheduled_publish_at,
            duration_estimate_min: draft.duration_estimate_min,
            guest_id: draft.guest_id,
            checklist: draft.checklist,
            progress_pct: 0,
            created_at: now,
            updated_at: now,
        };
        project.touch(now);
        project
    }

    /// Recompute derived fields and stamp `updated_at`. Called on every save.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.progress_pct = calc_progress(&self.checklist);
        self.updated_at = now;
    }

    /// `"<series> #<n>"`, as shown in listings.
    pub fn episode_label(&self) -> String {
        format!("{} #{}", self.series, self.episode_number)
    }

    /// Text the project search matches against.
    pub fn search_haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.description.as_deref().unwrap_or_default(),
            self.tags.join(" "),
            self.series
        )
        .to_lowercase()
    }
}

// ---------------------------------------------------------------------------
// Settings & session
// ---------------------------------------------------------------------------

/// Keys up to this length are never partly shown.
const MASK_MIN_LEN: usize = 8;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_chat: Option<bool>,
}

impl Settings {
    pub fn chat_enabled(&self) -> bool {
        self.enable_chat.unwrap_or(false)
    }

    /// The stored key with everything but the last four characters hidden.
    /// Keys too short to keep most of them hidden are masked entirely.
    pub fn masked_key(&self) -> Option<String> {
        self.openai_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            let visible = if chars.len() > MASK_MIN_LEN { 4 } else { 0 };
            let tail: String = chars[chars.len() - visible..].iter().collect();
            format!("{}{}", "*".repeat(chars.len() - visible), tail)
        })
    }
}

/// The currently logged-in user, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim an optional text field, mapping blank input to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a comma-separated tag input, dropping blanks and keeping order.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
