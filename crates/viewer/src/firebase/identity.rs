//! Anonymous identity bootstrap.
//!
//! The record store only serves authenticated reads, so every lookup first
//! makes sure an anonymous session exists. Obtaining one is best effort: a
//! failed sign-in is logged and the read goes ahead without a credential,
//! letting the store enforce authorization.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

use super::{IdentityError, error_message};
use crate::config::FirebaseConfig;

/// Seconds before expiry at which a session stops counting as current.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Source of anonymous sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The session currently held, if it is still usable.
    async fn current_session(&self) -> Option<IdentitySession>;

    /// Start a new anonymous session.
    ///
    /// Concurrent callers that find no session must end up sharing one
    /// sign-in rather than creating an anonymous user each.
    async fn sign_in_anonymously(&self) -> Result<IdentitySession, IdentityError>;
}

/// Make sure an anonymous session exists before a read.
///
/// Never fails: an existing session returns immediately, otherwise one
/// sign-in is attempted and its outcome only logged.
pub async fn ensure_identity<P>(provider: &P)
where
    P: IdentityProvider + ?Sized,
{
    if provider.current_session().await.is_some() {
        tracing::debug!("Identity session already present");
        return;
    }

    match provider.sign_in_anonymously().await {
        Ok(session) => tracing::info!(uid = %session.uid, "Signed in anonymously"),
        Err(e) => tracing::warn!(error = %e, "Anonymous sign-in failed, continuing without identity"),
    }
}

/// Anonymous session returned by the identity provider.
#[derive(Debug, Clone)]
pub struct IdentitySession {
    /// Provider-assigned user id.
    pub uid: String,
    /// Bearer token for store requests.
    pub id_token: SecretString,
    /// Unix timestamp when the id token expires.
    pub expires_at: i64,
}

impl IdentitySession {
    /// Check if the id token has expired (or is about to).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - EXPIRY_MARGIN_SECS
    }
}

/// Request body for `accounts:signUp`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest {
    return_secure_token: bool,
}

/// Response from `accounts:signUp`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    id_token: String,
    /// Token lifetime in seconds, sent as a decimal string.
    expires_in: String,
    local_id: String,
}

/// Identity Toolkit client that signs in anonymously.
///
/// The session is cached in memory and shared by clones, so the store
/// client and the bootstrap see the same credential.
#[derive(Clone)]
pub struct AnonymousAuthClient {
    inner: Arc<AnonymousAuthClientInner>,
}

struct AnonymousAuthClientInner {
    client: reqwest::Client,
    sign_up_url: String,
    api_key: SecretString,
    /// In-memory session cache
    session: RwLock<Option<IdentitySession>>,
    /// Held for the whole sign-up round trip
    sign_in: Mutex<()>,
}

impl AnonymousAuthClient {
    /// Create a new client without a session.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &FirebaseConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(AnonymousAuthClientInner {
                client,
                sign_up_url: format!("{}/v1/accounts:signUp", config.identity_base_url),
                api_key: config.api_key.clone(),
                session: RwLock::new(None),
                sign_in: Mutex::new(()),
            }),
        })
    }

    /// Bearer token of the current session, if one is usable.
    pub async fn id_token(&self) -> Option<SecretString> {
        self.current_session().await.map(|s| s.id_token)
    }

    /// Drop the cached session.
    pub async fn clear_session(&self) {
        *self.inner.session.write().await = None;
    }
}

#[async_trait]
impl IdentityProvider for AnonymousAuthClient {
    async fn current_session(&self) -> Option<IdentitySession> {
        self.inner
            .session
            .read()
            .await
            .as_ref()
            .filter(|s| !s.is_expired())
            .cloned()
    }

    #[instrument(skip(self))]
    async fn sign_in_anonymously(&self) -> Result<IdentitySession, IdentityError> {
        let _guard = self.inner.sign_in.lock().await;

        // Another caller may have signed in while we waited
        if let Some(session) = self.current_session().await {
            return Ok(session);
        }

        let now = chrono::Utc::now().timestamp();
        let url = format!(
            "{}?key={}",
            self.inner.sign_up_url,
            urlencoding::encode(self.inner.api_key.expose_secret())
        );

        let response = self
            .inner
            .client
            .post(&url)
            .json(&SignUpRequest {
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: SignUpResponse =
            serde_json::from_str(&body).map_err(|e| IdentityError::Parse(e.to_string()))?;
        let lifetime = parsed
            .expires_in
            .trim()
            .parse::<i64>()
            .map_err(|e| IdentityError::Parse(format!("expiresIn: {e}")))?;

        let session = IdentitySession {
            uid: parsed.local_id,
            id_token: SecretString::from(parsed.id_token),
            expires_at: now + lifetime,
        };

        // Cache the session
        *self.inner.session.write().await = Some(session.clone());

        Ok(session)
    }
}
