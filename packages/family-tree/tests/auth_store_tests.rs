//! Session tracking in the auth store

mod common;

use crate::common::{TestHarness, ADMIN_EMAIL, ADMIN_PASSWORD};
use family_tree::backend::BackendCall;
use family_tree::types::{AuthEvent, Session};
use futures::{FutureExt, StreamExt};

fn remote_session(user_id: &str) -> Session {
    Session {
        access_token: "pushed-access".to_string(),
        refresh_token: "pushed-refresh".to_string(),
        user_id: user_id.to_string(),
        email: Some("other@example.com".to_string()),
        expires_at: None,
    }
}

#[tokio::test]
async fn starts_logged_out() {
    let harness = TestHarness::new();

    let _subscription = harness.auth.init_auth().await;

    assert!(!harness.auth.is_logged_in());
    assert_eq!(harness.auth.session(), None);
    assert_eq!(harness.backend.calls(), vec![BackendCall::GetSession]);
}

#[tokio::test]
async fn init_auth_picks_up_existing_session() {
    let harness = TestHarness::new();
    harness
        .backend
        .push_session(AuthEvent::SignedIn, Some(remote_session("user-1")));

    let _subscription = harness.auth.init_auth().await;

    assert!(harness.auth.is_logged_in());
    assert_eq!(
        harness.auth.session().map(|s| s.user_id),
        Some("user-1".to_string())
    );
}

#[tokio::test]
async fn session_lookup_failure_counts_as_logged_out() {
    let harness = TestHarness::new();
    harness
        .backend
        .fail_next(BackendCall::GetSession, "Failed to fetch");

    let _subscription = harness.auth.init_auth().await;

    assert!(!harness.auth.is_logged_in());
}

#[tokio::test]
async fn pushed_changes_update_the_store() {
    let harness = TestHarness::new();
    let _subscription = harness.auth.init_auth().await;

    harness
        .backend
        .push_session(AuthEvent::SignedIn, Some(remote_session("user-2")));
    assert_eq!(
        harness.auth.session().map(|s| s.user_id),
        Some("user-2".to_string())
    );

    harness.backend.push_session(AuthEvent::SignedOut, None);
    assert!(!harness.auth.is_logged_in());
}

#[tokio::test]
async fn unsubscribed_store_ignores_pushes() {
    let harness = TestHarness::new();
    let subscription = harness.auth.init_auth().await;
    assert_eq!(harness.backend.listener_count(), 1);

    subscription.unsubscribe();
    assert_eq!(harness.backend.listener_count(), 0);

    harness
        .backend
        .push_session(AuthEvent::SignedIn, Some(remote_session("user-3")));
    assert!(!harness.auth.is_logged_in());
}

#[tokio::test]
async fn dropping_the_subscription_stops_listening() {
    let harness = TestHarness::new();
    {
        let _subscription = harness.auth.init_auth().await;
        assert_eq!(harness.backend.listener_count(), 1);
    }
    assert_eq!(harness.backend.listener_count(), 0);
}

#[tokio::test]
async fn pushed_changes_are_reported_to_watchers() {
    let harness = TestHarness::new();
    let mut changes = harness.auth.changes();
    let subscription = harness.auth.init_auth().await;

    assert_eq!(
        changes.next().now_or_never(),
        Some(Some(AuthEvent::InitialSession))
    );

    harness.backend.push_session(AuthEvent::SignedOut, None);
    assert_eq!(
        changes.next().now_or_never(),
        Some(Some(AuthEvent::SignedOut))
    );

    harness
        .backend
        .push_session(AuthEvent::TokenRefreshed, Some(remote_session("user-4")));
    assert_eq!(
        changes.next().now_or_never(),
        Some(Some(AuthEvent::TokenRefreshed))
    );
    assert_eq!(changes.next().now_or_never(), None);

    subscription.unsubscribe();
    harness
        .backend
        .push_session(AuthEvent::SignedIn, Some(remote_session("user-5")));
    assert_eq!(changes.next().now_or_never(), None);
}

#[tokio::test]
async fn dropped_watcher_does_not_block_others() {
    let harness = TestHarness::new();
    let dropped = harness.auth.changes();
    let mut kept = harness.auth.changes();
    drop(dropped);
    let _subscription = harness.auth.init_auth().await;

    harness.backend.push_session(AuthEvent::SignedOut, None);

    assert_eq!(kept.next().now_or_never(), Some(Some(AuthEvent::InitialSession)));
    assert_eq!(kept.next().now_or_never(), Some(Some(AuthEvent::SignedOut)));
}

#[tokio::test]
async fn login_sets_session() {
    let harness = TestHarness::new();
    let _subscription = harness.auth.init_auth().await;

    harness
        .auth
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();

    let session = harness.auth.session().unwrap();
    assert_eq!(session.email.as_deref(), Some(ADMIN_EMAIL));
    assert!(!session.access_token.is_empty());
}

#[tokio::test]
async fn login_failure_propagates_and_keeps_logged_out() {
    let harness = TestHarness::new();
    let _subscription = harness.auth.init_auth().await;

    let err = harness
        .auth
        .login(ADMIN_EMAIL, "wrong password")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(!harness.auth.is_logged_in());
}

#[tokio::test]
async fn login_works_without_init() {
    let harness = TestHarness::new();

    harness
        .auth
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();

    assert!(harness.auth.is_logged_in());
}

#[tokio::test]
async fn logout_clears_session() {
    let harness = TestHarness::new();
    let _subscription = harness.auth.init_auth().await;
    harness
        .auth
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();

    harness.auth.logout().await.unwrap();

    assert!(!harness.auth.is_logged_in());
    assert!(harness.backend.calls().contains(&BackendCall::SignOut));
}

#[tokio::test]
async fn logout_failure_propagates_and_keeps_session() {
    let harness = TestHarness::new();
    harness
        .auth
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    harness
        .backend
        .fail_next(BackendCall::SignOut, "Auth session missing!");

    let err = harness.auth.logout().await.unwrap_err();

    assert_eq!(err.to_string(), "Auth session missing!");
    assert!(harness.auth.is_logged_in());
}
