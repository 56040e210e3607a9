use podboard_shared::ValidationError;
use podboard_store::StoreError;
use thiserror::Error;

/// Why a command was refused. Nothing is mutated when one of these is
/// returned.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No {kind} matches '{input}'")]
    UnknownId { kind: &'static str, input: String },

    #[error("'{input}' matches more than one {kind}, use a longer id")]
    AmbiguousId { kind: &'static str, input: String },
}

impl CommandError {
    /// True when the user can fix the input and retry.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::UnknownId { .. }
                | Self::AmbiguousId { .. }
                | Self::Store(StoreError::Validation(_))
                | Self::Store(StoreError::NotFound { .. })
        )
    }
}
