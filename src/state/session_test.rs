use super::*;
use crate::state::token::MemoryTokenStore;
use serde_json::json;

fn profile(username: &str, roles: &[&str]) -> Profile {
    serde_json::from_value(crate::test_helpers::profile_json(username, roles)).unwrap()
}

fn session_with(store: &Arc<MemoryTokenStore>) -> SessionContext {
    SessionContext::hydrate(store.clone()).unwrap()
}

fn assert_invariant(session: &SessionContext) {
    let snapshot = session.snapshot();
    assert!(snapshot.profile.is_none() || snapshot.has_credential, "profile without credential: {snapshot:?}");
}

// =============================================================================
// hydrate
// =============================================================================

#[test]
fn hydrate_without_token_is_logged_out() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_with(&store);
    assert_eq!(session.phase(), SessionPhase::LoggedOut);
    assert!(!session.is_logged_in());
    assert!(session.profile().is_none());
}

#[test]
fn hydrate_with_token_is_unverified_and_logged_in() {
    let store = Arc::new(MemoryTokenStore::with_token("abc"));
    let session = session_with(&store);
    assert_eq!(session.phase(), SessionPhase::Unverified);
    assert!(session.is_logged_in());
    assert!(session.snapshot().needs_profile());
    assert!(!session.is_admin());
}

// =============================================================================
// establish / attach_profile
// =============================================================================

#[test]
fn establish_persists_and_publishes() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_with(&store);
    let ticket = session.begin(SessionPhase::LoginInFlight);
    assert!(session.is_loading());

    assert!(session.establish(ticket, "abc", profile("admin", &["admin"])).unwrap());
    assert_eq!(store.peek().as_deref(), Some("abc"));
    assert_eq!(session.credential().as_deref(), Some("abc"));
    assert_eq!(session.phase(), SessionPhase::LoggedIn);
    assert!(session.is_admin());
    assert!(!session.is_loading());
}

#[test]
fn stale_establish_is_discarded() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_with(&store);
    let stale = session.begin(SessionPhase::LoginInFlight);
    session.clear().unwrap();

    assert!(!session.establish(stale, "abc", profile("ops", &[])).unwrap());
    assert!(store.peek().is_none());
    assert!(!session.is_logged_in());
}

#[test]
fn attach_profile_requires_current_generation() {
    let store = Arc::new(MemoryTokenStore::with_token("abc"));
    let session = session_with(&store);
    let stale = session.begin(SessionPhase::Restoring);
    let current = session.begin(SessionPhase::Restoring);

    assert!(!session.attach_profile(stale, profile("ops", &[])));
    assert!(session.profile().is_none());
    assert!(session.attach_profile(current, profile("ops", &[])));
    assert_eq!(session.phase(), SessionPhase::LoggedIn);
}

#[test]
fn attach_profile_after_expiry_is_rejected() {
    let store = Arc::new(MemoryTokenStore::with_token("abc"));
    let session = session_with(&store);
    let ticket = session.begin(SessionPhase::Restoring);
    session.expire();
    assert!(!session.attach_profile(ticket, profile("ops", &[])));
    assert_invariant(&session);
}

#[test]
fn abandon_settles_phase_from_data() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_with(&store);
    let ticket = session.begin(SessionPhase::LoginInFlight);
    session.abandon(ticket);
    assert_eq!(session.phase(), SessionPhase::LoggedOut);
    assert!(!session.is_loading());
}

// =============================================================================
// clear / expire / merge
// =============================================================================

#[test]
fn clear_drops_memory_and_storage() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_with(&store);
    let ticket = session.begin(SessionPhase::LoginInFlight);
    session.establish(ticket, "abc", profile("ops", &[])).unwrap();
    let before = session.generation();

    session.clear().unwrap();
    assert!(session.credential().is_none());
    assert!(session.profile().is_none());
    assert!(store.peek().is_none());
    assert_eq!(session.phase(), SessionPhase::LoggedOut);
    assert!(session.generation() > before);
}

#[test]
fn merge_profile_overlays_fields() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_with(&store);
    let ticket = session.begin(SessionPhase::LoginInFlight);
    session.establish(ticket, "abc", profile("ops", &["user"])).unwrap();

    assert!(session.merge_profile(&json!({"nickname": "X"})).unwrap());
    let merged = session.profile().unwrap();
    assert_eq!(merged.nickname.as_deref(), Some("X"));
    assert_eq!(merged.username, "ops");
    assert!(merged.has_role("user"));
}

#[test]
fn merge_profile_without_profile_is_noop() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_with(&store);
    assert!(!session.merge_profile(&json!({"nickname": "X"})).unwrap());
    assert!(session.profile().is_none());
}

#[test]
fn invalid_merge_keeps_previous_profile() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_with(&store);
    let ticket = session.begin(SessionPhase::LoginInFlight);
    session.establish(ticket, "abc", profile("ops", &[])).unwrap();

    assert!(session.merge_profile(&json!({"username": 5})).is_err());
    assert_eq!(session.profile().unwrap().username, "ops");
}

// =============================================================================
// invariant: profile implies credential
// =============================================================================

#[test]
fn profile_implies_credential_across_sequences() {
    let store = Arc::new(MemoryTokenStore::with_token("seed"));
    let session = session_with(&store);
    assert_invariant(&session);

    let restore = session.begin(SessionPhase::Restoring);
    assert_invariant(&session);
    let login = session.begin(SessionPhase::LoginInFlight);
    session.attach_profile(restore, profile("late", &[]));
    assert_invariant(&session);
    session.establish(login, "abc", profile("ops", &[])).unwrap();
    assert_invariant(&session);
    session.merge_profile(&json!({"nickname": "n"})).unwrap();
    assert_invariant(&session);
    session.expire();
    assert_invariant(&session);
    session.merge_profile(&json!({"nickname": "n"})).unwrap();
    assert_invariant(&session);
    let relogin = session.begin(SessionPhase::LoginInFlight);
    session.abandon(relogin);
    assert_invariant(&session);
    session.clear().unwrap();
    assert_invariant(&session);
}
