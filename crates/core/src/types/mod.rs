//! Core types for the business card.
//!
//! This module provides the profile entity and the small state types that
//! travel alongside it.

pub mod fetch_state;
pub mod record;
pub mod record_id;
pub mod theme;

pub use fetch_state::{FailureReason, FetchState};
pub use record::UserRecord;
pub use record_id::{RecordId, RecordIdError};
pub use theme::ThemePreference;
