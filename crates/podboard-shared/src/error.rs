use thiserror::Error;

/// Rejections raised before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("A team member with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}
