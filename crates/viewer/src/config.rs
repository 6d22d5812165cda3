//! Viewer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIREBASE_API_KEY` - Web API key of the Firebase project
//! - `FIREBASE_PROJECT_ID` - Firebase project holding the `users` collection
//!
//! ## Optional
//! - `FIRESTORE_DATABASE` - Database id (default: `(default)`)
//! - `FIRESTORE_BASE_URL` - Firestore REST root (default: <https://firestore.googleapis.com>)
//! - `IDENTITY_TOOLKIT_BASE_URL` - Identity Toolkit REST root (default: <https://identitytoolkit.googleapis.com>)
//! - `BIZCARD_DEMO_ID` - Record shown for the `demo` alias
//! - `BIZCARD_PREFERENCES_PATH` - Preference file (default: `<config dir>/bizcard/preferences.json`)
//! - `BIZCARD_LOGO_PATH` - Text logo shown on the back face
//! - `BIZCARD_HTTP_TIMEOUT_SECS` - Store client timeout (default: 30)
//! - `BIZCARD_ORG_NAME`, `BIZCARD_ORG_TAGLINE`, `BIZCARD_ORG_EMAIL`,
//!   `BIZCARD_ORG_PHONE`, `BIZCARD_ORG_WEBSITE` - Back face organization details
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Record behind the `demo` alias unless overridden.
pub const DEFAULT_DEMO_ID: &str = "QcsoVRnPirWZeFWgwm2Q";

const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_DATABASE: &str = "(default)";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Viewer configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Firebase connection parameters
    pub firebase: FirebaseConfig,
    /// Record shown for the `demo` alias
    pub demo_record_id: String,
    /// Explicit preference file location
    pub preferences_path: Option<PathBuf>,
    /// Text logo for the back face
    pub logo_path: Option<PathBuf>,
    /// Static organization details for the back face
    pub organization: OrganizationProfile,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Firebase project connection parameters.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Web API key
    pub api_key: SecretString,
    /// Project id
    pub project_id: String,
    /// Firestore database id
    pub database: String,
    /// Firestore REST root URL
    pub firestore_base_url: String,
    /// Identity Toolkit REST root URL
    pub identity_base_url: String,
    /// Timeout applied to every store and identity request
    pub http_timeout: Duration,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("firestore_base_url", &self.firestore_base_url)
            .field("identity_base_url", &self.identity_base_url)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Organization contact details printed on the back of the card.
///
/// Record values take precedence; these fill the gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationProfile {
    pub name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub website: String,
}

impl Default for OrganizationProfile {
    fn default() -> Self {
        Self {
            name: "AJE JOBS".to_string(),
            tagline: "PROFESSIONAL SERVICES".to_string(),
            email: "info@ajejobs.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            website: "www.ajejobs.com".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ViewerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let firebase = FirebaseConfig::from_env(&env)?;
        let organization = OrganizationProfile::from_env(&env);

        Ok(Self {
            firebase,
            demo_record_id: env.or_default("BIZCARD_DEMO_ID", DEFAULT_DEMO_ID),
            preferences_path: env.optional("BIZCARD_PREFERENCES_PATH").map(PathBuf::from),
            logo_path: env.optional("BIZCARD_LOGO_PATH").map(PathBuf::from),
            organization,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Read only the preference file location.
    ///
    /// Lets preference commands run when the Firebase settings are absent.
    #[must_use]
    pub fn preferences_path_from_env() -> Option<PathBuf> {
        let _ = dotenvy::dotenv();
        let lookup = |key: &str| std::env::var(key).ok();
        Env(&lookup)
            .optional("BIZCARD_PREFERENCES_PATH")
            .map(PathBuf::from)
    }
}

impl FirebaseConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let timeout_secs = env
            .or_default("BIZCARD_HTTP_TIMEOUT_SECS", &DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BIZCARD_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_key: env.validated_secret("FIREBASE_API_KEY")?,
            project_id: env.required("FIREBASE_PROJECT_ID")?,
            database: env.or_default("FIRESTORE_DATABASE", DEFAULT_DATABASE),
            firestore_base_url: env.base_url("FIRESTORE_BASE_URL", DEFAULT_FIRESTORE_BASE_URL)?,
            identity_base_url: env.base_url("IDENTITY_TOOLKIT_BASE_URL", DEFAULT_IDENTITY_BASE_URL)?,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Connection parameters for a project served from `base_url`.
    ///
    /// Both REST roots point at the same server, which is how the Firebase
    /// emulators and test doubles are addressed.
    #[must_use]
    pub fn for_base_url(api_key: &str, project_id: &str, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            api_key: SecretString::from(api_key.to_string()),
            project_id: project_id.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            firestore_base_url: base_url.clone(),
            identity_base_url: base_url,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl OrganizationProfile {
    fn from_env(env: &Env<'_>) -> Self {
        let defaults = Self::default();
        Self {
            name: env.optional("BIZCARD_ORG_NAME").unwrap_or(defaults.name),
            tagline: env.optional("BIZCARD_ORG_TAGLINE").unwrap_or(defaults.tagline),
            email: env.optional("BIZCARD_ORG_EMAIL").unwrap_or(defaults.email),
            phone: env.optional("BIZCARD_ORG_PHONE").unwrap_or(defaults.phone),
            website: env.optional("BIZCARD_ORG_WEBSITE").unwrap_or(defaults.website),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup shared by the `from_env` constructors.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a REST root URL, validated and without a trailing slash.
    fn base_url(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        let value = self.or_default(key, default);
        let parsed = url::Url::parse(&value)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !parsed.has_host() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "URL must have a host".to_string(),
            ));
        }
        Ok(value.trim_end_matches('/').to_string())
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let secret = SecretString::from(self.required(key)?);
        validate_not_placeholder(&secret, key)?;
        Ok(secret)
    }
}

/// Validate that a secret is not a copied placeholder.
fn validate_not_placeholder(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.expose_secret().to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
