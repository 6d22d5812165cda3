//! End-to-end lookups through the real identity and store clients.

use bizcard_core::{FailureReason, FetchState};
use bizcard_integration_tests::{PROJECT_ID, TestContext, profile_fields};
use bizcard_viewer::config::{DEFAULT_DEMO_ID, FirebaseConfig};
use bizcard_viewer::fetcher::FirebaseFetcher;
use bizcard_viewer::routes;

// =============================================================================
// Settled states
// =============================================================================

#[tokio::test]
async fn test_existing_document_is_ready() {
    let ctx = TestContext::new().await;
    ctx.allow_sign_in(1).await;
    ctx.serve_document("pedro123", profile_fields()).await;

    let fetcher = ctx.fetcher();
    let state = fetcher.load(Some("pedro123")).await;

    let record = state.record().expect("record should be loaded");
    assert_eq!(record.display_name().as_deref(), Some("Pedro García López"));
    assert_eq!(record.created_at(), Some("1615766400000"));
    assert_eq!(record.photo_url(), None, "placeholder should read as absent");
    assert_eq!(fetcher.state(), state);
}

#[tokio::test]
async fn test_missing_document_is_not_found() {
    let ctx = TestContext::new().await;
    ctx.allow_sign_in(1).await;
    ctx.fail_document("nobody", 404).await;

    let state = ctx.fetcher().load(Some("nobody")).await;
    assert_eq!(state, FetchState::NotFound);
}

#[tokio::test]
async fn test_permission_denied_is_load_failure() {
    let ctx = TestContext::new().await;
    ctx.reject_sign_in().await;
    ctx.fail_document("pedro123", 403).await;

    let state = ctx.fetcher().load(Some("pedro123")).await;
    assert_eq!(state, FetchState::Failed(FailureReason::LoadFailure));
}

#[tokio::test]
async fn test_unauthenticated_read_is_load_failure() {
    let ctx = TestContext::new().await;
    ctx.allow_sign_in(1).await;
    ctx.fail_document("pedro123", 401).await;

    let state = ctx.fetcher().load(Some("pedro123")).await;
    assert_eq!(state, FetchState::Failed(FailureReason::LoadFailure));
}

#[tokio::test]
async fn test_unreachable_backend_is_load_failure() {
    let config = FirebaseConfig::for_base_url("test-api-key", PROJECT_ID, "http://127.0.0.1:9");
    let fetcher = FirebaseFetcher::connect(&config).expect("clients should build");

    let state = fetcher.load(Some("pedro123")).await;
    assert_eq!(state, FetchState::Failed(FailureReason::LoadFailure));
    assert_ne!(state, FetchState::NotFound);
}

#[tokio::test]
async fn test_failed_sign_in_still_reads() {
    let ctx = TestContext::new().await;
    ctx.reject_sign_in().await;
    ctx.serve_document("pedro123", profile_fields()).await;

    let state = ctx.fetcher().load(Some("pedro123")).await;
    assert!(matches!(state, FetchState::Ready(_)));
}

#[tokio::test]
async fn test_server_error_is_load_failure() {
    let ctx = TestContext::new().await;
    ctx.allow_sign_in(1).await;
    ctx.fail_document("pedro123", 503).await;

    let state = ctx.fetcher().load(Some("pedro123")).await;
    assert_eq!(state.error_reason(), Some("load failure"));
}

#[tokio::test]
async fn test_missing_identifier_never_reaches_backend() {
    let ctx = TestContext::new().await;
    ctx.allow_sign_in(0).await;
    ctx.forbid_reads().await;

    let fetcher = ctx.fetcher();
    let id = routes::follow("/card/", DEFAULT_DEMO_ID);
    let state = fetcher.load(id.as_deref()).await;

    assert_eq!(state, FetchState::Failed(FailureReason::MissingIdentifier));
}

// =============================================================================
// Session reuse and routing
// =============================================================================

#[tokio::test]
async fn test_session_is_reused_across_lookups() {
    let ctx = TestContext::new().await;
    ctx.allow_sign_in(1).await;
    ctx.serve_document("pedro123", profile_fields()).await;
    ctx.fail_document("nobody", 404).await;

    let fetcher = ctx.fetcher();
    assert!(matches!(fetcher.load(Some("pedro123")).await, FetchState::Ready(_)));
    assert_eq!(fetcher.load(Some("nobody")).await, FetchState::NotFound);
    // Latest lookup wins
    assert_eq!(fetcher.state(), FetchState::NotFound);
}

#[tokio::test]
async fn test_concurrent_lookups_share_one_sign_in() {
    let ctx = TestContext::new().await;
    ctx.allow_sign_in(1).await;
    ctx.serve_document("pedro123", profile_fields()).await;
    ctx.fail_document("nobody", 404).await;

    let fetcher = ctx.fetcher();
    let (first, second) = tokio::join!(
        fetcher.load(Some("pedro123")),
        fetcher.load(Some("nobody"))
    );

    assert!(matches!(first, FetchState::Ready(_)));
    assert_eq!(second, FetchState::NotFound);
}

#[tokio::test]
async fn test_root_path_loads_demo_record() {
    let ctx = TestContext::new().await;
    ctx.allow_sign_in(1).await;
    ctx.serve_document(DEFAULT_DEMO_ID, profile_fields()).await;

    let id = routes::follow("/", DEFAULT_DEMO_ID);
    assert_eq!(id.as_deref(), Some(DEFAULT_DEMO_ID));

    let state = ctx.fetcher().load(id.as_deref()).await;
    assert!(matches!(state, FetchState::Ready(_)));
}

#[tokio::test]
async fn test_subscribers_see_settled_state() {
    let ctx = TestContext::new().await;
    ctx.allow_sign_in(1).await;
    ctx.fail_document("nobody", 404).await;

    let fetcher = ctx.fetcher();
    let mut rx = fetcher.subscribe();
    assert!(rx.borrow_and_update().is_loading());

    fetcher.load(Some("nobody")).await;
    assert!(rx.has_changed().expect("sender alive"));
    assert_eq!(*rx.borrow_and_update(), FetchState::NotFound);
}
