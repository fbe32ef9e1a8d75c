//! Server manager tests
//!
//! Project-manager caching, session lifecycle, and the read-only status
//! view, driven through the registry like production code.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use pretty_assertions::assert_eq;

use buildtray_core::{
    BuildResult, Credentials, ServerManager, ServerRegistry, SessionToken, TransportError,
};
use tests::fixtures;
use tests::mocks::{FakeApiClient, PlainHttpClientFactory, RecordingApiClientFactory};

fn server_with(client: FakeApiClient) -> (Arc<ServerManager>, Arc<FakeApiClient>) {
    let client = Arc::new(client);
    let registry = ServerRegistry::new();
    let manager = registry.get_or_create(
        &fixtures::identity("http://ci.local:8080"),
        &Credentials::anonymous(),
        &RecordingApiClientFactory::new(Arc::clone(&client)),
        &PlainHttpClientFactory,
    );
    (manager, client)
}

// ============================================================================
// Project manager caching
// ============================================================================

#[tokio::test]
async fn test_project_manager_is_cached_per_name() {
    let (manager, _client) = server_with(FakeApiClient::new().with_job("demo").with_job("other"));

    let first = manager.project_manager("demo").await.unwrap();
    let second = manager.project_manager("demo").await.unwrap();
    let other = manager.project_manager("other").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(manager.project_count(), 2);
    assert_eq!(first.project_name(), "demo");
}

#[tokio::test]
async fn test_empty_project_name_is_rejected() {
    let (manager, _client) = server_with(FakeApiClient::new());

    for name in ["", "   "] {
        let err = manager.project_manager(name).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidConfiguration(_)));
    }
    assert_eq!(manager.project_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_retrievals_share_one_project_manager() {
    let (manager, client) = server_with(FakeApiClient::new().with_job("shared"));
    client.set_response_delay(Duration::from_millis(10));

    let tasks = (0..8).map(|_| {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.project_manager("shared").await.unwrap() })
    });
    let projects: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    for project in &projects[1..] {
        assert!(Arc::ptr_eq(&projects[0], project));
    }
    assert_eq!(manager.project_count(), 1);
    // The handshake ran once even though every retrieval raced for it.
    assert_eq!(client.open_session_calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_session_is_established_once_and_cached() {
    let (manager, client) = server_with(FakeApiClient::new().with_job("demo"));
    assert!(manager.session_token().await.is_none());

    manager.project_manager("demo").await.unwrap();
    assert_eq!(
        manager.session_token().await,
        Some(SessionToken::new("fake-session"))
    );

    manager.project_manager("demo").await.unwrap();
    manager.project_manager("demo").await.unwrap();
    assert_eq!(client.open_session_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalidated_session_is_reacquired_on_next_use() {
    let (manager, client) = server_with(FakeApiClient::new().with_job("demo"));

    manager.project_manager("demo").await.unwrap();
    manager.invalidate_session().await;
    assert!(manager.session_token().await.is_none());

    manager.project_manager("demo").await.unwrap();
    assert!(manager.session_token().await.is_some());
    assert_eq!(client.open_session_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_handshake_failure_keeps_manager_usable() {
    let (manager, client) = server_with(FakeApiClient::new().with_job("demo"));
    client.set_session_failure(TransportError::RemoteUnavailable("handshake refused".into()));

    // Retrieval still succeeds; only the session slot stays empty.
    let project = manager.project_manager("demo").await.unwrap();
    assert!(manager.session_token().await.is_none());

    // Status polling works without a session.
    let status = project.status().await.unwrap();
    assert_eq!(status.name, "demo");
}

// ============================================================================
// Status view
// ============================================================================

#[tokio::test]
async fn test_project_statuses_starts_empty_and_fills_per_poll() {
    let (manager, client) = server_with(FakeApiClient::new().with_job("demo").with_job("other"));
    client.set_status(fixtures::status("demo", BuildResult::Success));

    let demo = manager.project_manager("demo").await.unwrap();
    manager.project_manager("other").await.unwrap();

    let before = manager.project_statuses().await;
    assert_eq!(before.len(), 2);
    assert_eq!(before.get("demo"), Some(&None));
    assert_eq!(before.get("other"), Some(&None));

    demo.status().await.unwrap();

    let after = manager.project_statuses().await;
    let demo_status = after.get("demo").and_then(|s| s.clone()).unwrap();
    assert_eq!(demo_status.last_result, BuildResult::Success);
    assert_eq!(after.get("other"), Some(&None));
}

#[tokio::test]
async fn test_project_statuses_never_triggers_a_poll() {
    let (manager, client) = server_with(FakeApiClient::new().with_job("demo"));
    manager.project_manager("demo").await.unwrap();

    manager.project_statuses().await;
    manager.project_statuses().await;

    assert_eq!(client.fetch_status_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_status_view_is_not_blocked_by_in_flight_poll() {
    let (manager, client) = server_with(FakeApiClient::new().with_job("slow"));
    let project = manager.project_manager("slow").await.unwrap();
    client.set_response_delay(Duration::from_secs(60));

    let poll = tokio::spawn({
        let project = Arc::clone(&project);
        async move { project.status().await }
    });
    tokio::task::yield_now().await;

    // The view completes while the poll is parked inside the fetch.
    let view = manager.project_statuses().await;
    assert_eq!(view.get("slow"), Some(&None));

    let fetched = poll.await.unwrap().unwrap();
    assert_eq!(fetched.name, "slow");
}

// ============================================================================
// Remote job listing
// ============================================================================

#[tokio::test]
async fn test_list_remote_projects_returns_current_listing() {
    let (manager, client) = server_with(FakeApiClient::new().with_job("alpha").with_job("beta"));

    let jobs = manager.list_remote_projects().await.unwrap();
    let names: Vec<_> = jobs.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);

    client.add_job("gamma");
    assert_eq!(manager.list_remote_projects().await.unwrap().len(), 3);
}
