/// Store key of the users collection
pub const KEY_USERS: &str = "podboard.users";

/// Store key of the projects collection
pub const KEY_PROJECTS: &str = "podboard.projects";

/// Store key of the guests collection
pub const KEY_GUESTS: &str = "podboard.guests";

/// Store key of the per-series episode counters
pub const KEY_SEQUENCES: &str = "podboard.sequences";

/// Store key of the settings record
pub const KEY_SETTINGS: &str = "podboard.settings";

/// Store key of the session record
pub const KEY_SESSION: &str = "podboard.session";

/// Number of items on the pre-production checklist
pub const CHECKLIST_ITEMS: usize = 4;

/// How many sessions the dashboard lists under "upcoming"
pub const UPCOMING_LIMIT: usize = 5;

/// Seed admin created on first run when no user exists
pub const DEFAULT_ADMIN_NAME: &str = "Admin";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@podboard.local";

/// iCalendar PRODID and UID domain
pub const ICS_PRODID: &str = "-//Podboard//Episode Planner//EN";
pub const ICS_UID_DOMAIN: &str = "podboard";
