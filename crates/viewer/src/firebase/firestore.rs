//! Firestore REST client for profile documents.

use std::sync::Arc;

use async_trait::async_trait;
use bizcard_core::{RecordId, UserRecord};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::instrument;

use super::identity::AnonymousAuthClient;
use super::{StoreError, error_message};
use crate::config::FirebaseConfig;

/// Collection holding one profile document per identifier.
pub const USERS_COLLECTION: &str = "users";

/// Read access to profile documents.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the document at `id` in `collection`.
    ///
    /// Returns `Ok(None)` when the store reports that no such document
    /// exists. Unauthorized reads fail closed with an error, never partial
    /// data.
    async fn get_record(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> Result<Option<UserRecord>, StoreError>;
}

/// Document resource as returned by `GET .../documents/{path}`.
#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Firestore REST client.
///
/// Reads are authorized with the id token held by the shared
/// [`AnonymousAuthClient`]; without a session the request goes out
/// unauthenticated and the store's rules decide.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    client: reqwest::Client,
    documents_url: String,
    identity: AnonymousAuthClient,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &FirebaseConfig, identity: AnonymousAuthClient) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let documents_url = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            config.firestore_base_url, config.project_id, config.database,
        );

        Ok(Self {
            inner: Arc::new(FirestoreClientInner {
                client,
                documents_url,
                identity,
            }),
        })
    }

    fn document_url(&self, collection: &str, id: &RecordId) -> String {
        format!(
            "{}/{}/{}",
            self.inner.documents_url,
            urlencoding::encode(collection),
            urlencoding::encode(id.as_str())
        )
    }
}

#[async_trait]
impl RecordStore for FirestoreClient {
    #[instrument(skip(self), fields(id = %id))]
    async fn get_record(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> Result<Option<UserRecord>, StoreError> {
        let mut request = self.inner.client.get(self.document_url(collection, id));
        if let Some(token) = self.inner.identity.id_token().await {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => decode_document(&body).map(Some),
            reqwest::StatusCode::NOT_FOUND => Ok(None),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(StoreError::PermissionDenied(error_message(&body)))
            }
            s => {
                tracing::error!(
                    status = %s,
                    body = %body.chars().take(500).collect::<String>(),
                    "Firestore returned non-success status"
                );
                Err(StoreError::Api {
                    status: s.as_u16(),
                    message: error_message(&body),
                })
            }
        }
    }
}

/// Decode a document body into a record.
fn decode_document(body: &str) -> Result<UserRecord, StoreError> {
    let document: Document =
        serde_json::from_str(body).map_err(|e| StoreError::Parse(e.to_string()))?;

    let flat: Map<String, Value> = document
        .fields
        .into_iter()
        .filter_map(|(name, value)| flatten_value(&value).map(|v| (name, Value::String(v))))
        .collect();

    serde_json::from_value(Value::Object(flat)).map_err(|e| StoreError::Parse(e.to_string()))
}

/// Collapse a typed Firestore value into the string a record field holds.
///
/// Scalars become their textual form; `nullValue` and composite values
/// (maps, arrays, references) are dropped, which the record reads as
/// "no value".
fn flatten_value(value: &Value) -> Option<String> {
    let Value::Object(typed) = value else {
        return None;
    };
    let (kind, inner) = typed.iter().next()?;

    match (kind.as_str(), inner) {
        ("stringValue" | "integerValue" | "timestampValue", Value::String(s)) => Some(s.clone()),
        ("integerValue" | "doubleValue", Value::Number(n)) => Some(n.to_string()),
        ("booleanValue", Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}
