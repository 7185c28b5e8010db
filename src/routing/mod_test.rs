use super::*;
use crate::net::error::ErrorClass;
use crate::state::auth::AuthStore;
use crate::test_helpers::{Harness, profile_json};
use serde_json::json;

fn router_for(harness: &Harness) -> Router {
    let auth = Arc::new(AuthStore::new(harness.client.clone()));
    Router::new(RouteGuard::new(auth), harness.location.clone())
}

// =============================================================================
// login_href / redirect_target
// =============================================================================

#[test]
fn login_href_encodes_return_path() {
    assert_eq!(login_href("/devices"), "/login?redirect=%2Fdevices");
    assert_eq!(login_href("/devices?page=2"), "/login?redirect=%2Fdevices%3Fpage%3D2");
}

#[test]
fn redirect_target_decodes_return_path() {
    assert_eq!(redirect_target(&login_href("/devices?page=2")).as_deref(), Some("/devices?page=2"));
    assert_eq!(redirect_target("/login"), None);
}

// =============================================================================
// Location
// =============================================================================

#[test]
fn force_moves_and_is_taken_once() {
    let location = Location::new("/devices");
    location.force(LOGIN_PATH);
    assert_eq!(location.current(), LOGIN_PATH);
    assert_eq!(location.take_forced().as_deref(), Some(LOGIN_PATH));
    assert!(location.take_forced().is_none());
}

// =============================================================================
// Router::navigate
// =============================================================================

#[tokio::test]
async fn cold_start_with_invalid_credential_lands_on_login_with_return_path() {
    let harness = Harness::with_token("expired");
    harness.transport.push_json(401, json!({"detail": "Could not validate credentials"}));
    let router = router_for(&harness);

    let nav = router.navigate("/devices").await;

    assert!(!nav.entered());
    assert_eq!(nav.location, "/login?redirect=%2Fdevices");
    assert_eq!(harness.location.current(), "/login?redirect=%2Fdevices");
    assert!(harness.store.peek().is_none());
    assert!(!harness.session.is_logged_in());
    assert_eq!(harness.notifier.notices()[0].class, ErrorClass::Unauthenticated);
}

#[tokio::test]
async fn non_admin_is_kept_out_of_admin_route() {
    let harness = Harness::with_token("abc");
    harness.transport.push_json(200, profile_json("ops", &["user"]));
    let router = router_for(&harness);

    let nav = router.navigate("/users").await;

    assert_eq!(nav.decision, GuardDecision::Forbidden);
    assert_eq!(nav.location, HOME_PATH);
    assert!(!nav.entered());
    assert_eq!(harness.notifier.notices()[0].message, "insufficient privilege");
}

#[tokio::test]
async fn logged_in_user_enters_protected_route() {
    let harness = Harness::with_token("abc");
    harness.transport.push_json(200, profile_json("ops", &[]));
    let router = router_for(&harness);

    let nav = router.navigate("/devices").await;
    assert!(nav.entered());
    assert_eq!(harness.location.current(), "/devices");

    // Profile is cached now; the next navigation needs no fetch.
    router.navigate("/ports").await;
    assert_eq!(harness.transport.count(), 1);
}

#[tokio::test]
async fn logged_in_user_visiting_login_goes_home() {
    let harness = Harness::with_token("abc");
    harness.transport.push_json(200, profile_json("ops", &[]));
    let router = router_for(&harness);

    let nav = router.navigate(LOGIN_PATH).await;
    assert_eq!(nav.decision, GuardDecision::RedirectHome);
    assert_eq!(nav.location, HOME_PATH);
}

#[tokio::test]
async fn logged_out_user_can_open_login() {
    let harness = Harness::new();
    let router = router_for(&harness);
    let nav = router.navigate(LOGIN_PATH).await;
    assert!(nav.entered());
}
