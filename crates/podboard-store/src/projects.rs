//! Episodes: creation with episode numbering, and the save path that keeps
//! `progress_pct` consistent with the checklist.

use chrono::Utc;
use podboard_shared::models::{Project, ProjectDraft};
use podboard_shared::types::GuestId;

use crate::error::Result;
use crate::repository::Repository;
use crate::sequences::SequenceAllocator;

impl Repository<Project> {
    /// Validate `draft` and insert it as a new episode.
    ///
    /// Without an explicit number the series' next number is taken from
    /// `sequences`. An explicit number is used as-is and consumes nothing;
    /// collisions within a series are allowed.
    pub fn create_project(
        &mut self,
        draft: ProjectDraft,
        sequences: &SequenceAllocator,
    ) -> Result<Project> {
        draft.validate()?;

        let episode_number = match draft.episode_number {
            Some(n) => n,
            None => sequences.next_episode_number(&draft.series),
        };

        let project = self
            .insert(Project::from_draft(draft, episode_number, Utc::now()))
            .clone();
        tracing::info!(
            project_id = %project.id,
            series = %project.series,
            episode = project.episode_number,
            "project created"
        );
        Ok(project)
    }

    /// Persist an edited project.
    ///
    /// This is the only path that recomputes `progress_pct` and refreshes
    /// `updated_at`. `created_at` is always taken from the stored record.
    pub fn save_project(&mut self, mut project: Project) -> Result<Project> {
        if project.title.trim().is_empty() {
            return Err(podboard_shared::ValidationError::MissingField("title").into());
        }

        let created_at = self.require(project.id)?.created_at;
        project.created_at = created_at;
        project.touch(Utc::now());

        self.replace(project.clone())?;
        tracing::info!(
            project_id = %project.id,
            progress = project.progress_pct,
            status = %project.status,
            "project saved"
        );
        Ok(project)
    }

    /// Episodes that reference `guest_id`.
    pub fn for_guest(&self, guest_id: GuestId) -> Vec<&Project> {
        self.all()
            .iter()
            .filter(|p| p.guest_id == Some(guest_id))
            .collect()
    }
}
