//! Integration tests for bizcard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bizcard-integration-tests
//! ```
//!
//! Every test starts its own mock server standing in for both the Identity
//! Toolkit and Firestore REST APIs, then drives the real clients through
//! [`RecordFetcher`](bizcard_viewer::fetcher::RecordFetcher).

use bizcard_viewer::config::FirebaseConfig;
use bizcard_viewer::fetcher::FirebaseFetcher;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Project id used against the mock server.
pub const PROJECT_ID: &str = "unity-cards";

/// Path of the anonymous sign-up endpoint.
pub const SIGN_UP_PATH: &str = "/v1/accounts:signUp";

/// Mock Firebase backend plus a fetcher pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub config: FirebaseConfig,
}

impl TestContext {
    /// Start a fresh mock backend.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let config = FirebaseConfig::for_base_url("test-api-key", PROJECT_ID, &server.uri());
        Self { server, config }
    }

    /// Fetcher using the real REST clients.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP clients cannot be built.
    #[must_use]
    pub fn fetcher(&self) -> FirebaseFetcher {
        FirebaseFetcher::connect(&self.config).expect("clients should build")
    }

    /// Accept anonymous sign-ups, expecting `times` of them.
    pub async fn allow_sign_in(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path(SIGN_UP_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "idToken": "anon-id-token",
                "refreshToken": "anon-refresh",
                "expiresIn": "3600",
                "localId": "anon-uid"
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Reject anonymous sign-ups, as when the provider is disabled.
    pub async fn reject_sign_in(&self) {
        Mock::given(method("POST"))
            .and(path(SIGN_UP_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "ADMIN_ONLY_OPERATION" }
            })))
            .mount(&self.server)
            .await;
    }

    /// Serve `fields` as the document for `id`.
    pub async fn serve_document(&self, id: &str, fields: Value) {
        Mock::given(method("GET"))
            .and(path(document_path(id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": format!("projects/{PROJECT_ID}/databases/(default)/documents/users/{id}"),
                "fields": fields,
                "createTime": "2021-03-15T00:00:00Z",
                "updateTime": "2021-03-15T00:00:00Z"
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer reads for `id` with an error `status`.
    pub async fn fail_document(&self, id: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(document_path(id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "code": status, "message": "request failed" }
            })))
            .mount(&self.server)
            .await;
    }

    /// Fail the test if any document is read.
    pub async fn forbid_reads(&self) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}

/// REST path of the profile document `id`.
#[must_use]
pub fn document_path(id: &str) -> String {
    format!("/v1/projects/{PROJECT_ID}/databases/(default)/documents/users/{id}")
}

/// Firestore typed-value document fields for a complete profile.
#[must_use]
pub fn profile_fields() -> Value {
    json!({
        "Nombres": { "stringValue": "Pedro" },
        "Apellidos": { "stringValue": "García López" },
        "Cargo": { "stringValue": "Director De Tienda" },
        "Empresa": { "stringValue": "AJE" },
        "Email": { "stringValue": "pedro@aje.com" },
        "NroCelular": { "stringValue": "+51 999 888 777" },
        "WebSyte": { "stringValue": "https://aje.com" },
        "LinkedInUrl": { "stringValue": "https://linkedin.com/in/pedro" },
        "PhotoUrl": { "stringValue": "-------" },
        "FechaNac": { "stringValue": "15 de mayo" },
        "CreatedAt": { "integerValue": "1615766400000" },
        "City": { "stringValue": "Lima" },
        "IsActive": { "booleanValue": true }
    })
}
