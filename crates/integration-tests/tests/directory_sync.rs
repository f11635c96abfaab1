//! Roster synchronization against a mock document source.

use std::sync::Arc;
use std::time::Duration;

use httpmock::Method::{DELETE, GET, POST};
use httpmock::MockServer;
use serde_json::json;

use clubhouse_directory::backend::{CLUB_ATTRIBUTE, Query};
use clubhouse_directory::services::directory::{DirectoryStore, RosterStatus};
use clubhouse_directory::services::session::SessionManager;
use clubhouse_integration_tests::{
    DOCUMENTS_PATH, account_body, backend_for, document_list, identity_with_club, member_doc,
    session_body,
};

#[tokio::test]
async fn reload_sends_one_scoped_fetch() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(DOCUMENTS_PATH)
                .query_param("queries[]", Query::equal(CLUB_ATTRIBUTE, "sigma-rho").as_str());
            then.status(200).json_body(document_list(&[
                member_doc("1", "Ann", "Lee", "sigma-rho"),
                member_doc("2", "Dan", "Roe", "sigma-rho"),
            ]));
        })
        .await;

    let store = DirectoryStore::new(backend_for(&server));
    store
        .reload(Some(&identity_with_club(Some("sigma-rho"))))
        .await;

    assert_eq!(store.status(), RosterStatus::Loaded);
    assert_eq!(store.members().len(), 2);
    assert_eq!(list.hits_async().await, 1);
}

#[tokio::test]
async fn reload_without_identity_issues_no_fetch() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path(DOCUMENTS_PATH);
            then.status(200).json_body(document_list(&[]));
        })
        .await;

    let store = DirectoryStore::new(backend_for(&server));
    store.reload(None).await;

    assert_eq!(store.status(), RosterStatus::Empty);
    assert!(store.members().is_empty());
    assert_eq!(list.hits_async().await, 0);
}

#[tokio::test]
async fn unscoped_identity_fetches_the_full_set() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(DOCUMENTS_PATH);
            then.status(200).json_body(document_list(&[
                member_doc("1", "Ann", "Lee", "sigma-rho"),
                member_doc("3", "Sue", "Kim", "delta-nu"),
            ]));
        })
        .await;

    let store = DirectoryStore::new(backend_for(&server));
    store.reload(Some(&identity_with_club(None))).await;

    assert_eq!(store.members().len(), 2);
}

#[tokio::test]
async fn fetch_failure_is_reported_as_failed_not_propagated() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(DOCUMENTS_PATH);
            then.status(500).json_body(json!({
                "message": "Internal server error",
                "code": 500,
                "type": "general_server_error",
            }));
        })
        .await;

    let store = DirectoryStore::new(backend_for(&server));
    store
        .reload(Some(&identity_with_club(Some("sigma-rho"))))
        .await;

    assert!(matches!(store.status(), RosterStatus::Failed(_)));
    assert!(store.members().is_empty());
}

#[tokio::test]
async fn stale_reload_results_are_discarded() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(DOCUMENTS_PATH)
                .query_param("queries[]", Query::equal(CLUB_ATTRIBUTE, "alpha").as_str());
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(document_list(&[member_doc("1", "Ann", "Lee", "alpha")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(DOCUMENTS_PATH)
                .query_param("queries[]", Query::equal(CLUB_ATTRIBUTE, "beta").as_str());
            then.status(200)
                .json_body(document_list(&[member_doc("3", "Sue", "Kim", "beta")]));
        })
        .await;

    let store = DirectoryStore::new(backend_for(&server));
    let alpha_identity = identity_with_club(Some("alpha"));
    let slow = store.reload(Some(&alpha_identity));
    let fast = async {
        // Let the first reload take its generation before superseding it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.reload(Some(&identity_with_club(Some("beta")))).await;
    };
    tokio::join!(slow, fast);

    // The slow alpha result resolved last but must not overwrite beta's.
    let members = store.members();
    assert_eq!(members.len(), 1);
    assert_eq!(members.first().unwrap().first_name, "Sue");
    assert_eq!(store.status(), RosterStatus::Loaded);
}

#[tokio::test]
async fn watch_loop_follows_login_and_logout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/account/sessions/email");
            then.status(201).json_body(session_body("s3cr3t"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/account");
            then.status(200)
                .json_body(account_body("Ann Lee", "ann@example.com", Some("sigma-rho")));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v1/account/sessions/current");
            then.status(204);
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(DOCUMENTS_PATH)
                .query_param("queries[]", Query::equal(CLUB_ATTRIBUTE, "sigma-rho").as_str());
            then.status(200)
                .json_body(document_list(&[member_doc("1", "Ann", "Lee", "sigma-rho")]));
        })
        .await;

    let backend = backend_for(&server);
    let sessions = SessionManager::new(backend.clone());
    let store = Arc::new(DirectoryStore::new(backend));

    let watcher = {
        let store = Arc::clone(&store);
        let receiver = sessions.subscribe();
        tokio::spawn(async move { store.watch(receiver).await })
    };

    sessions.login("ann@example.com", "hunter2!").await.unwrap();
    wait_until(|| store.status() == RosterStatus::Loaded).await;
    assert_eq!(store.members().len(), 1);
    assert_eq!(list.hits_async().await, 1);

    sessions.logout().await;
    wait_until(|| store.status() == RosterStatus::Empty && store.members().is_empty()).await;

    drop(sessions);
    let _ = watcher.await;
}

/// Poll a condition until it holds or two seconds pass.
async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached within two seconds");
}
