//! Team members: lookup by email, provisioning, role changes, first-run seed.

use chrono::Utc;
use podboard_shared::models::User;
use podboard_shared::types::{Role, UserId};
use podboard_shared::ValidationError;

use crate::error::Result;
use crate::repository::Repository;

impl Repository<User> {
    /// Case-insensitive lookup by email.
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.all().iter().find(|u| u.has_email(email))
    }

    /// Validate and insert a new user.
    ///
    /// Email uniqueness is a check-then-insert, which is only sound because
    /// all mutations run on one thread.
    pub fn create_user(&mut self, name: &str, email: &str, role: Role) -> Result<User> {
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        if email.trim().is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }
        if self.find_by_email(email).is_some() {
            return Err(ValidationError::DuplicateEmail(email.trim().to_string()).into());
        }

        let user = self.insert(User::new(name, email, role, Utc::now())).clone();
        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    pub fn set_role(&mut self, id: UserId, role: Role) -> Result<User> {
        let mut user = self.require(id)?.clone();
        user.role = role;
        self.replace(user.clone())?;
        tracing::info!(user_id = %id, role = %role, "user role changed");
        Ok(user)
    }

    pub fn admin_count(&self) -> usize {
        self.all().iter().filter(|u| u.is_admin()).count()
    }

    /// Create the first admin when the collection is empty. Returns the new
    /// user, or `None` if users already exist.
    pub fn seed_admin(&mut self, name: &str, email: &str) -> Result<Option<User>> {
        if !self.is_empty() {
            return Ok(None);
        }
        let admin = self.create_user(name, email, Role::Admin)?;
        tracing::info!(email = %admin.email, "seeded first-run admin");
        Ok(Some(admin))
    }
}
