//! CLI schema and output rendering for the `podboard` binary.
//!
//! Each subcommand is one view of the portal. Results go to stdout, as plain
//! text or, with `--json`, as pretty-printed JSON. Logs go to stderr.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use podboard_shared::models::{
    parse_tags, Checklist, ChecklistItem, Guest, GuestDraft, Project, ProjectDraft, User,
};
use podboard_shared::types::{Priority, Role, Status};
use podboard_shared::views::{ProjectQuery, SortKey};

use crate::commands::{auth, dashboard, guests, projects, settings, team};
use crate::error::CommandError;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "podboard")]
#[command(about = "Local-first planner for podcast episodes, guests and team")]
#[command(version)]
pub struct Cli {
    /// Directory holding the local database (overrides PODBOARD_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Progress overview and upcoming recording sessions
    Dashboard,

    /// Episodes
    #[command(subcommand)]
    Projects(ProjectsCommand),

    /// Team roster
    #[command(subcommand)]
    Team(TeamCommand),

    /// Guest directory
    #[command(subcommand)]
    Guests(GuestsCommand),

    /// App settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Log in by email, creating the account if it does not exist
    Login {
        email: String,
        /// Display name for a new account
        #[arg(long)]
        name: Option<String>,
    },

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// List episodes
    List {
        /// Search title, description, tags and series
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        priority: Option<Priority>,
        /// updated | progress | episode
        #[arg(long, default_value = "updated")]
        sort: SortKey,
    },
    /// Show one episode
    Show { id: String },
    /// Create an episode
    Create(CreateProjectArgs),
    /// Edit an episode
    Update(UpdateProjectArgs),
    /// Delete an episode (its number is not reused)
    Delete { id: String },
    /// Print the episode's scheduled dates as iCalendar
    Ics { id: String },
    /// Show the number the next episode of a series would get
    NextNumber {
        #[arg(default_value = "Main")]
        series: String,
    },
}

#[derive(Args, Debug)]
pub struct CreateProjectArgs {
    pub title: String,
    #[arg(long, default_value = "Main")]
    pub series: String,
    /// Explicit episode number instead of the next one in the series
    #[arg(long)]
    pub episode: Option<u32>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub before_notes: Option<String>,
    #[arg(long)]
    pub after_notes: Option<String>,
    #[arg(long, default_value = "draft")]
    pub status: Status,
    #[arg(long, default_value = "medium")]
    pub priority: Priority,
    /// Comma-separated
    #[arg(long)]
    pub tags: Option<String>,
    /// YYYY-MM-DD HH:MM
    #[arg(long)]
    pub record_at: Option<String>,
    /// YYYY-MM-DD HH:MM
    #[arg(long)]
    pub publish_at: Option<String>,
    /// Estimated duration in minutes
    #[arg(long)]
    pub duration: Option<u32>,
    /// Guest id (or prefix)
    #[arg(long)]
    pub guest: Option<String>,
    /// Checklist item already done (repeatable)
    #[arg(long)]
    pub check: Vec<ChecklistItem>,
}

#[derive(Args, Debug)]
pub struct UpdateProjectArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub series: Option<String>,
    #[arg(long)]
    pub episode: Option<u32>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub before_notes: Option<String>,
    #[arg(long)]
    pub after_notes: Option<String>,
    #[arg(long)]
    pub status: Option<Status>,
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Comma-separated; replaces the current tags
    #[arg(long)]
    pub tags: Option<String>,
    /// YYYY-MM-DD HH:MM, or "" to clear
    #[arg(long)]
    pub record_at: Option<String>,
    /// YYYY-MM-DD HH:MM, or "" to clear
    #[arg(long)]
    pub publish_at: Option<String>,
    /// Estimated minutes, 0 to clear
    #[arg(long)]
    pub duration: Option<u32>,
    /// Guest id (or prefix), or "" to unlink
    #[arg(long)]
    pub guest: Option<String>,
    /// Mark a checklist item done (repeatable)
    #[arg(long)]
    pub check: Vec<ChecklistItem>,
    /// Mark a checklist item not done (repeatable)
    #[arg(long)]
    pub uncheck: Vec<ChecklistItem>,
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// List team members
    List,
    /// Add a team member
    Invite {
        name: String,
        email: String,
        #[arg(long, default_value = "member")]
        role: Role,
    },
    /// Change a member's role
    SetRole { id: String, role: Role },
    /// Remove a team member
    Remove { id: String },
}

#[derive(Args, Debug, Default)]
pub struct GuestFields {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub socials: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// data: URL of a photo
    #[arg(long)]
    pub photo: Option<String>,
    #[arg(long)]
    pub questions: Option<String>,
    #[arg(long)]
    pub topics: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum GuestsCommand {
    /// List guests
    List {
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Show a guest and their episodes
    Show { id: String },
    /// Add a guest
    Add {
        name: String,
        #[command(flatten)]
        fields: GuestFields,
    },
    /// Edit a guest ("" clears a field)
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: GuestFields,
    },
    /// Remove a guest (episodes keep a dangling reference)
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show settings
    Show,
    /// Set the OpenAI API key ("" clears it)
    SetKey { key: String },
    /// Enable the chat panel
    EnableChat,
    /// Disable the chat panel
    DisableChat,
}

/// Run one parsed command against `state`, writing its output to `out`.
pub fn execute(
    state: &mut AppState,
    command: Command,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut printer = Printer { out, json };
    match command {
        Command::Dashboard => printer.dashboard(&dashboard::dashboard(state)),
        Command::Projects(cmd) => run_projects(state, cmd, &mut printer)?,
        Command::Team(cmd) => run_team(state, cmd, &mut printer)?,
        Command::Guests(cmd) => run_guests(state, cmd, &mut printer)?,
        Command::Settings(cmd) => {
            let view = match cmd {
                SettingsCommand::Show => settings::get_settings(state),
                SettingsCommand::SetKey { key } => settings::set_openai_key(state, Some(key)),
                SettingsCommand::EnableChat => settings::set_chat_enabled(state, true),
                SettingsCommand::DisableChat => settings::set_chat_enabled(state, false),
            };
            printer.emit(&view, |w| {
                let key = view.openai_key.as_deref().unwrap_or("(not set)");
                let chat = if view.enable_chat { "enabled" } else { "disabled" };
                writeln!(w, "OpenAI key:  {key}")?;
                writeln!(w, "Chat panel:  {chat}")
            });
        }
        Command::Login { email, name } => {
            let user = auth::login(state, &email, name.as_deref())?;
            printer.emit(&user, |w| writeln!(w, "Logged in as {} <{}>", user.name, user.email));
        }
        Command::Logout => {
            let user = auth::logout(state);
            printer.emit(&user, |w| match &user {
                Some(u) => writeln!(w, "Logged out {}", u.email),
                None => writeln!(w, "Not logged in"),
            });
        }
        Command::Whoami => {
            let user = auth::whoami(state);
            printer.emit(&user, |w| match user {
                Some(u) => writeln!(w, "{} <{}> ({})", u.name, u.email, u.role),
                None => writeln!(w, "Not logged in"),
            });
        }
    }
    Ok(())
}

fn run_projects(
    state: &mut AppState,
    cmd: ProjectsCommand,
    printer: &mut Printer<'_, impl Write>,
) -> Result<(), CommandError> {
    match cmd {
        ProjectsCommand::List {
            query,
            status,
            priority,
            sort,
        } => {
            let query = ProjectQuery {
                text: query.unwrap_or_default(),
                status,
                priority,
                sort,
            };
            let rows = projects::list_projects(state, &query);
            printer.emit(&rows, |w| {
                if rows.is_empty() {
                    return writeln!(w, "No episodes match.");
                }
                for p in &rows {
                    project_row(w, p)?;
                }
                Ok(())
            });
        }
        ProjectsCommand::Show { id } => {
            let detail = projects::show_project(state, &id)?;
            printer.emit(&detail, |w| {
                project_details(w, &detail.project)?;
                match &detail.guest {
                    Some(g) => writeln!(w, "  guest:     {}", g.name),
                    None if detail.project.guest_id.is_some() => {
                        writeln!(w, "  guest:     (removed)")
                    }
                    None => Ok(()),
                }
            });
        }
        ProjectsCommand::Create(args) => {
            let mut draft = ProjectDraft {
                title: args.title,
                series: args.series,
                episode_number: args.episode,
                description: args.description,
                before_notes: args.before_notes,
                after_notes: args.after_notes,
                status: args.status,
                priority: args.priority,
                tags: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
                scheduled_record_at: args
                    .record_at
                    .as_deref()
                    .map(projects::parse_schedule)
                    .transpose()?,
                scheduled_publish_at: args
                    .publish_at
                    .as_deref()
                    .map(projects::parse_schedule)
                    .transpose()?,
                duration_estimate_min: args.duration.filter(|m| *m > 0),
                guest_id: None,
                checklist: Checklist::default(),
            };
            for item in args.check {
                draft.checklist.set(item, true);
            }
            let project = projects::create_project(state, draft, args.guest.as_deref())?;
            printer.emit(&project, |w| {
                writeln!(w, "Created {} [{}]", project.episode_label(), project.id.short())
            });
        }
        ProjectsCommand::Update(args) => {
            let patch = projects::ProjectPatch {
                title: args.title,
                series: args.series,
                episode_number: args.episode,
                description: args.description,
                before_notes: args.before_notes,
                after_notes: args.after_notes,
                status: args.status,
                priority: args.priority,
                tags: args.tags.as_deref().map(parse_tags),
                scheduled_record_at: args.record_at,
                scheduled_publish_at: args.publish_at,
                duration_estimate_min: args.duration,
                guest: args.guest,
                check: args.check,
                uncheck: args.uncheck,
            };
            let project = projects::update_project(state, &args.id, patch)?;
            printer.emit(&project, |w| project_details(w, &project));
        }
        ProjectsCommand::Delete { id } => {
            let project = projects::delete_project(state, &id)?;
            printer.emit(&project, |w| writeln!(w, "Deleted {}", project.episode_label()));
        }
        ProjectsCommand::Ics { id } => {
            let ics = projects::export_calendar(state, &id)?;
            printer.emit(&ics, |w| write!(w, "{ics}"));
        }
        ProjectsCommand::NextNumber { series } => {
            let next = projects::propose_episode_number(state, &series);
            printer.emit(&next, |w| writeln!(w, "{series} #{next}"));
        }
    }
    Ok(())
}

fn run_team(
    state: &mut AppState,
    cmd: TeamCommand,
    printer: &mut Printer<'_, impl Write>,
) -> Result<(), CommandError> {
    match cmd {
        TeamCommand::List => {
            let roster = team::list_team(state);
            printer.emit(&roster, |w| {
                for u in &roster {
                    user_row(w, u)?;
                }
                Ok(())
            });
        }
        TeamCommand::Invite { name, email, role } => {
            let user = team::invite(state, &name, &email, role)?;
            printer.emit(&user, |w| user_row(w, &user));
        }
        TeamCommand::SetRole { id, role } => {
            let user = team::set_role(state, &id, role)?;
            printer.emit(&user, |w| user_row(w, &user));
        }
        TeamCommand::Remove { id } => {
            let user = team::remove(state, &id)?;
            printer.emit(&user, |w| writeln!(w, "Removed {}", user.email));
        }
    }
    Ok(())
}

fn run_guests(
    state: &mut AppState,
    cmd: GuestsCommand,
    printer: &mut Printer<'_, impl Write>,
) -> Result<(), CommandError> {
    match cmd {
        GuestsCommand::List { query } => {
            let rows = guests::list_guests(state, query.as_deref().unwrap_or_default());
            printer.emit(&rows, |w| {
                if rows.is_empty() {
                    return writeln!(w, "No guests match.");
                }
                for g in &rows {
                    guest_row(w, g)?;
                }
                Ok(())
            });
        }
        GuestsCommand::Show { id } => {
            let detail = guests::show_guest(state, &id)?;
            printer.emit(&detail, |w| {
                guest_row(w, &detail.guest)?;
                for (label, value) in [
                    ("email", &detail.guest.email),
                    ("bio", &detail.guest.bio),
                    ("socials", &detail.guest.socials),
                    ("topics", &detail.guest.topics),
                    ("questions", &detail.guest.planned_questions),
                    ("notes", &detail.guest.notes),
                ] {
                    if let Some(value) = value {
                        writeln!(w, "  {label:<10} {value}")?;
                    }
                }
                for p in &detail.episodes {
                    write!(w, "  ")?;
                    project_row(w, p)?;
                }
                Ok(())
            });
        }
        GuestsCommand::Add { name, fields } => {
            let draft = GuestDraft {
                name,
                company: fields.company,
                email: fields.email,
                bio: fields.bio,
                socials: fields.socials,
                notes: fields.notes,
                photo_data_url: fields.photo,
                planned_questions: fields.questions,
                topics: fields.topics,
            };
            let guest = guests::add_guest(state, draft)?;
            printer.emit(&guest, |w| guest_row(w, &guest));
        }
        GuestsCommand::Update { id, name, fields } => {
            let patch = guests::GuestPatch {
                name,
                company: fields.company,
                email: fields.email,
                bio: fields.bio,
                socials: fields.socials,
                notes: fields.notes,
                photo_data_url: fields.photo,
                planned_questions: fields.questions,
                topics: fields.topics,
            };
            let guest = guests::update_guest(state, &id, patch)?;
            printer.emit(&guest, |w| guest_row(w, &guest));
        }
        GuestsCommand::Remove { id } => {
            let guest = guests::remove_guest(state, &id)?;
            printer.emit(&guest, |w| writeln!(w, "Removed {}", guest.name));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

struct Printer<'a, W: Write> {
    out: &'a mut W,
    json: bool,
}

impl<W: Write> Printer<'_, W> {
    /// Write `value` as JSON, or run `text` to write the plain rendering.
    fn emit<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        text: impl FnOnce(&mut W) -> std::io::Result<()>,
    ) {
        let result = if self.json {
            serde_json::to_writer_pretty(&mut *self.out, value)
                .map_err(std::io::Error::from)
                .and_then(|_| writeln!(self.out))
        } else {
            text(&mut *self.out)
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to write output");
        }
    }

    fn dashboard(&mut self, board: &dashboard::Dashboard) {
        self.emit(board, |w| {
            if let Some(user) = &board.user {
                writeln!(w, "Signed in as {}", user.name)?;
            }
            writeln!(
                w,
                "Active: {}   Completed: {}   Avg progress: {}%",
                board.stats.active_count, board.stats.completed_count, board.stats.avg_progress
            )?;
            writeln!(w, "Upcoming sessions:")?;
            if board.upcoming.is_empty() {
                writeln!(w, "  (none scheduled)")?;
            }
            for s in &board.upcoming {
                writeln!(
                    w,
                    "  {}  {:<16} {}{}",
                    s.scheduled_record_at.format("%Y-%m-%d %H:%M"),
                    s.episode,
                    s.title,
                    s.guest_name
                        .as_deref()
                        .map(|g| format!(" with {g}"))
                        .unwrap_or_default()
                )?;
            }
            Ok(())
        });
    }
}

fn project_row(w: &mut impl Write, p: &Project) -> std::io::Result<()> {
    writeln!(
        w,
        "{}  {:<16} {:<9} {:<6} {:>3}%  {}",
        p.id.short(),
        p.episode_label(),
        p.status,
        p.priority,
        p.progress_pct,
        p.title
    )
}

fn project_details(w: &mut impl Write, p: &Project) -> std::io::Result<()> {
    writeln!(w, "{} {}: {}", p.id.short(), p.episode_label(), p.title)?;
    writeln!(w, "  status:    {} / {} priority", p.status, p.priority)?;
    writeln!(w, "  progress:  {}%", p.progress_pct)?;
    for (item, done) in p.checklist.items() {
        writeln!(w, "    [{}] {}", if done { "x" } else { " " }, item.as_str())?;
    }
    if !p.tags.is_empty() {
        writeln!(w, "  tags:      {}", p.tags.join(", "))?;
    }
    if let Some(at) = p.scheduled_record_at {
        writeln!(w, "  record:    {}", at.format("%Y-%m-%d %H:%M"))?;
    }
    if let Some(at) = p.scheduled_publish_at {
        writeln!(w, "  publish:   {}", at.format("%Y-%m-%d %H:%M"))?;
    }
    if let Some(minutes) = p.duration_estimate_min {
        writeln!(w, "  duration:  {minutes} min")?;
    }
    for (label, text) in [
        ("about", &p.description),
        ("before", &p.before_notes),
        ("after", &p.after_notes),
    ] {
        if let Some(text) = text {
            writeln!(w, "  {label:<10} {text}")?;
        }
    }
    Ok(())
}

fn user_row(w: &mut impl Write, u: &User) -> std::io::Result<()> {
    writeln!(w, "{}  {:<7} {:<20} {}", u.id.short(), u.role, u.name, u.email)
}

fn guest_row(w: &mut impl Write, g: &Guest) -> std::io::Result<()> {
    match &g.company {
        Some(company) => writeln!(w, "{}  {} ({})", g.id.short(), g.name, company),
        None => writeln!(w, "{}  {}", g.id.short(), g.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &mut AppState, args: &[&str]) -> Result<String, CommandError> {
        let cli = Cli::try_parse_from(std::iter::once("podboard").chain(args.iter().copied()))
            .expect("arguments should parse");
        let mut out = Vec::new();
        execute(state, cli.command, cli.json, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_create_then_list() {
        let mut state = AppState::in_memory();
        let out = run(
            &mut state,
            &["projects", "create", "Pilot", "--tags", "news, tech", "--check", "research"],
        )
        .unwrap();
        assert!(out.starts_with("Created Main #1"));

        let out = run(&mut state, &["projects", "list", "--query", "TECH"]).unwrap();
        assert!(out.contains("Main #1"));
        assert!(out.contains(" 25%"));

        let out = run(&mut state, &["projects", "list", "--status", "archived"]).unwrap();
        assert_eq!(out.trim(), "No episodes match.");
    }

    #[test]
    fn test_json_output_is_parseable() {
        let mut state = AppState::in_memory();
        run(&mut state, &["projects", "create", "Pilot", "--series", "Bonus"]).unwrap();
        let out = run(&mut state, &["--json", "projects", "list", "--sort", "episode"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["series"], "Bonus");
        assert_eq!(value[0]["episodeNumber"], 1);
    }

    #[test]
    fn test_dashboard_text() {
        let mut state = AppState::in_memory();
        run(
            &mut state,
            &["projects", "create", "Pilot", "--record-at", "2024-06-01 09:30"],
        )
        .unwrap();
        let out = run(&mut state, &["dashboard"]).unwrap();
        assert!(out.contains("Active: 1   Completed: 0   Avg progress: 0%"));
        assert!(out.contains("2024-06-01 09:30"));
    }

    #[test]
    fn test_invalid_enum_value_is_a_parse_error() {
        let bad_status = ["podboard", "projects", "list", "--status", "paused"];
        assert!(Cli::try_parse_from(bad_status).is_err());
        let bad_role = ["podboard", "team", "invite", "A", "a@b.c", "--role", "owner"];
        assert!(Cli::try_parse_from(bad_role).is_err());
    }

    #[test]
    fn test_validation_error_surfaces() {
        let mut state = AppState::in_memory();
        let err = run(&mut state, &["guests", "add", "  "]).unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_settings_never_print_key() {
        let mut state = AppState::in_memory();
        let out = run(&mut state, &["settings", "set-key", "sk-secret-abcd"]).unwrap();
        assert!(!out.contains("sk-secret"));
        assert!(out.contains("abcd"));
    }
}
