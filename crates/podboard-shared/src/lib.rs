//! # podboard-shared
//!
//! Data model and pure logic of the Podboard episode planner: identifiers,
//! persisted records, the checklist progress calculator, the derived views
//! behind the dashboard and list screens, and calendar export formatting.
//! Nothing in this crate performs I/O.

pub mod calendar;
pub mod constants;
pub mod error;
pub mod models;
pub mod progress;
pub mod types;
pub mod views;

pub use error::ValidationError;
