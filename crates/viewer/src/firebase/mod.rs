//! Firebase clients: anonymous identity and the Firestore record store.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; no Firebase SDK
//! - The record store is reachable only after the anonymous-identity
//!   handshake, so [`FirestoreClient`] borrows the bearer token from a shared
//!   [`AnonymousAuthClient`]
//! - Both sides sit behind traits ([`IdentityProvider`], [`RecordStore`]) so
//!   the fetcher can be driven by test doubles
//!
//! # Example
//!
//! ```rust,ignore
//! use bizcard_viewer::firebase::{AnonymousAuthClient, FirestoreClient};
//!
//! let auth = AnonymousAuthClient::new(&config.firebase)?;
//! let store = FirestoreClient::new(&config.firebase, auth.clone())?;
//!
//! ensure_identity(&auth).await;
//! let record = store.get_record(USERS_COLLECTION, &id).await?;
//! ```

mod firestore;
mod identity;

pub use firestore::{FirestoreClient, RecordStore, USERS_COLLECTION};
pub use identity::{AnonymousAuthClient, IdentityProvider, IdentitySession, ensure_identity};

use thiserror::Error;

/// Errors from the anonymous identity handshake.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The identity provider refused the sign-in.
    #[error("Sign-in rejected: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// Response could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors from the remote record store.
///
/// A missing document is not an error; see [`RecordStore::get_record`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unauthenticated or unauthorized read.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Store returned an unexpected status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Document could not be decoded into a record.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Identifier is not a valid document key.
    #[error("Invalid record id: {0}")]
    InvalidId(#[from] bizcard_core::RecordIdError),
}

/// Firebase REST error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Best-effort human message from a Firebase REST error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| body.chars().take(200).collect(),
        |envelope| match envelope.error.status {
            Some(status) if !envelope.error.message.is_empty() => {
                format!("{status}: {}", envelope.error.message)
            }
            Some(status) => status,
            None => envelope.error.message,
        },
    )
}
