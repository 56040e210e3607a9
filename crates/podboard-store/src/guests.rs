use chrono::Utc;
use podboard_shared::models::{non_empty, Guest, GuestDraft};
use podboard_shared::types::GuestId;

use crate::error::Result;
use crate::repository::Repository;

impl Repository<Guest> {
    pub fn create_guest(&mut self, draft: GuestDraft) -> Result<Guest> {
        draft.validate()?;
        let guest = self.insert(Guest::from_draft(draft, Utc::now())).clone();
        tracing::info!(guest_id = %guest.id, "guest created");
        Ok(guest)
    }

    /// Overwrite every editable field of guest `id` with `draft`.
    pub fn update_guest(&mut self, id: GuestId, draft: GuestDraft) -> Result<Guest> {
        draft.validate()?;
        let existing = self.require(id)?;

        let guest = Guest {
            id,
            name: draft.name.trim().to_string(),
            company: non_empty(draft.company),
            email: non_empty(draft.email),
            bio: non_empty(draft.bio),
            socials: non_empty(draft.socials),
            notes: non_empty(draft.notes),
            photo_data_url: non_empty(draft.photo_data_url),
            planned_questions: non_empty(draft.planned_questions),
            topics: non_empty(draft.topics),
            created_at: existing.created_at,
        };
        self.replace(guest.clone())?;
        tracing::info!(guest_id = %id, "guest updated");
        Ok(guest)
    }
}
