//! Lifecycle of a single record lookup.

use serde::{Deserialize, Serialize};

use super::record::UserRecord;

/// Why a lookup settled without a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No identifier was available; the store was never called.
    MissingIdentifier,
    /// Bootstrap, network, permission or decoding failure.
    LoadFailure,
}

/// State of a record lookup for one identifier.
///
/// Starts in [`FetchState::Loading`] when an identifier becomes available and
/// settles into exactly one of the other variants. A new identifier starts a
/// fresh lookup; there is no automatic retry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum FetchState {
    /// Lookup in flight.
    #[default]
    Loading,
    /// The store returned the document.
    Ready(UserRecord),
    /// The store reported that no document exists for the key.
    NotFound,
    /// The lookup failed.
    Failed(FailureReason),
}

impl FetchState {
    /// Reason string for the not-found state.
    pub const NOT_FOUND_REASON: &'static str = "not found";

    /// Returns the record if the lookup succeeded.
    #[must_use]
    pub const fn record(&self) -> Option<&UserRecord> {
        match self {
            Self::Ready(record) => Some(record),
            _ => None,
        }
    }

    /// Returns `true` while the lookup is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns `true` once the lookup has settled.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    /// Reason string for settled states without a record.
    ///
    /// `"not found"` is the distinguished reason that selects the
    /// not-found view instead of the generic error view.
    #[must_use]
    pub const fn error_reason(&self) -> Option<&'static str> {
        match self {
            Self::Loading | Self::Ready(_) => None,
            Self::NotFound => Some(Self::NOT_FOUND_REASON),
            Self::Failed(reason) => Some(reason.as_str()),
        }
    }
}

impl FailureReason {
    /// Stable reason string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingIdentifier => "missing identifier",
            Self::LoadFailure => "load failure",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_loading() {
        let state = FetchState::default();
        assert!(state.is_loading());
        assert!(!state.is_settled());
        assert_eq!(state.error_reason(), None);
        assert!(state.record().is_none());
    }

    #[test]
    fn test_error_reasons() {
        assert_eq!(FetchState::NotFound.error_reason(), Some("not found"));
        assert_eq!(
            FetchState::Failed(FailureReason::MissingIdentifier).error_reason(),
            Some("missing identifier")
        );
        assert_eq!(
            FetchState::Failed(FailureReason::LoadFailure).error_reason(),
            Some("load failure")
        );
    }

    #[test]
    fn test_ready_exposes_record() {
        let record = UserRecord {
            given_names: Some("Ana".to_string()),
            ..UserRecord::default()
        };
        let state = FetchState::Ready(record.clone());
        assert!(state.is_settled());
        assert_eq!(state.record(), Some(&record));
        assert_eq!(state.error_reason(), None);
    }
}
