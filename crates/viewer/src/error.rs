//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures internal errors to Sentry
//! before they are reported to the user. Command entry points return
//! `Result<T, AppError>` and map the error to a process exit code.

use bizcard_core::vcard::ExportError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::firebase::{IdentityError, StoreError};
use crate::preferences::PreferenceError;

/// Application-level error type for the viewer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Record store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Identity provider operation failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Persisted preferences could not be read or written.
    #[error("Preference error: {0}")]
    Preferences(#[from] PreferenceError),

    /// Contact export failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// A view template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Requested record is not available.
    #[error("Not available: {0}")]
    Unavailable(String),

    /// Bad command-line input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error.
    ///
    /// Follows the BSD `sysexits` conventions.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::BadRequest(_) => 64,
            Self::Unavailable(_) | Self::Store(_) | Self::Identity(_) => 69,
            Self::Render(_) => 70,
            Self::Export(ExportError::MissingPhone) => 65,
            Self::Export(ExportError::Io(_)) | Self::Preferences(_) | Self::Io(_) => 74,
            Self::Config(_) => 78,
        }
    }

    /// Whether this error points at a defect or an outage rather than at
    /// user input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Store(_)
                | Self::Identity(_)
                | Self::Render(_)
                | Self::Preferences(_)
                | Self::Io(_)
                | Self::Export(ExportError::Io(_))
        )
    }

    /// Log the error and capture internal failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::warn!(error = %self, "Command error");
        }
    }

    /// Message shown to the user.
    ///
    /// Internal details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(_) | Self::Identity(_) => "Error al cargar la información".to_string(),
            Self::Render(_) | Self::Io(_) => "Error interno".to_string(),
            Self::Export(ExportError::MissingPhone) => {
                "No se puede agregar el contacto: no hay número de teléfono".to_string()
            }
            Self::Export(ExportError::Io(_)) => {
                "No se pudo guardar el archivo de contacto".to_string()
            }
            Self::Unavailable(message) => message.clone(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("card", "Switched tab", Some(&[("tab", "company")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Unavailable("record abc".to_string());
        assert_eq!(err.to_string(), "Not available: record abc");

        let err = AppError::BadRequest("unknown tab".to_string());
        assert_eq!(err.to_string(), "Bad request: unknown tab");
    }

    #[test]
    fn test_app_error_exit_codes() {
        assert_eq!(AppError::BadRequest("x".to_string()).exit_code(), 64);
        assert_eq!(AppError::Export(ExportError::MissingPhone).exit_code(), 65);
        assert_eq!(AppError::Unavailable("x".to_string()).exit_code(), 69);
        assert_eq!(
            AppError::Store(StoreError::PermissionDenied("x".to_string())).exit_code(),
            69
        );
        assert_eq!(
            AppError::Config(ConfigError::MissingEnvVar("X".to_string())).exit_code(),
            78
        );
    }

    #[test]
    fn test_internal_details_not_shown_to_user() {
        let err = AppError::Store(StoreError::PermissionDenied("token abc123".to_string()));
        assert!(err.is_internal());
        assert!(!err.user_message().contains("abc123"));

        let err = AppError::Unavailable("Usuario no encontrado".to_string());
        assert_eq!(err.user_message(), "Usuario no encontrado");

        let err = AppError::Export(ExportError::MissingPhone);
        assert!(!err.is_internal());
        assert!(err.user_message().contains("teléfono"));
    }
}
