use super::*;
use serde_json::json;

fn sample_profile() -> Profile {
    serde_json::from_value(json!({
        "id": 7,
        "username": "ops",
        "nickname": "Ops",
        "avatar": "/avatars/ops.png",
        "is_superuser": false,
        "roles": [{"id": 2, "name": "user"}],
        "created_at": "2024-01-01T00:00:00"
    }))
    .unwrap()
}

// =============================================================================
// Profile authorization
// =============================================================================

#[test]
fn admin_role_grants_admin() {
    let mut profile = sample_profile();
    assert!(!profile.is_admin());
    profile.roles.push(Role::named("admin"));
    assert!(profile.is_admin());
}

#[test]
fn superuser_grants_admin_without_role() {
    let mut profile = sample_profile();
    profile.is_superuser = true;
    assert!(profile.is_admin());
}

#[test]
fn missing_roles_deserialize_as_empty() {
    let profile: Profile = serde_json::from_value(json!({"username": "bare"})).unwrap();
    assert!(profile.roles.is_empty());
    assert!(!profile.is_admin());
}

#[test]
fn display_name_falls_back_to_username() {
    let mut profile = sample_profile();
    assert_eq!(profile.display_name(), "Ops");
    profile.nickname = Some(String::new());
    assert_eq!(profile.display_name(), "ops");
    profile.nickname = None;
    assert_eq!(profile.display_name(), "ops");
}

// =============================================================================
// Profile::merge
// =============================================================================

#[test]
fn merge_changes_only_supplied_fields() {
    let mut profile = sample_profile();
    profile.merge(&json!({"nickname": "X"})).unwrap();
    assert_eq!(profile.nickname.as_deref(), Some("X"));
    assert_eq!(profile.username, "ops");
    assert_eq!(profile.avatar.as_deref(), Some("/avatars/ops.png"));
    assert_eq!(profile.roles.len(), 1);
}

#[test]
fn merge_preserves_unknown_server_fields() {
    let mut profile = sample_profile();
    profile.merge(&json!({"email": "ops@example.net"})).unwrap();
    assert_eq!(profile.email.as_deref(), Some("ops@example.net"));
    assert_eq!(profile.extra.get("created_at"), Some(&json!("2024-01-01T00:00:00")));
}

#[test]
fn merge_ignores_non_object_patch() {
    let mut profile = sample_profile();
    let before = profile.clone();
    profile.merge(&json!(["nickname"])).unwrap();
    assert_eq!(profile, before);
}

#[test]
fn merge_rejects_invalid_document() {
    let mut profile = sample_profile();
    assert!(profile.merge(&json!({"username": 42})).is_err());
}

// =============================================================================
// Login / batch payloads
// =============================================================================

#[test]
fn login_response_defaults_token_type() {
    let response: LoginResponse = serde_json::from_value(json!({
        "access_token": "abc",
        "user": {"username": "admin", "roles": [{"name": "admin"}]}
    }))
    .unwrap();
    assert_eq!(response.token_type, "bearer");
    assert!(response.user.is_admin());
}

#[test]
fn batch_result_tolerates_missing_counters() {
    let result: BatchOperationResult = serde_json::from_value(json!({"success": true})).unwrap();
    assert!(result.success);
    assert_eq!(result.total, 0);
    assert!(result.failed_devices.is_none());
}

#[test]
fn device_status_defaults_to_active() {
    let device: Device =
        serde_json::from_value(json!({"id": 1, "hostname": "core-1", "ip_address": "10.0.0.1", "sn": "X1"})).unwrap();
    assert!(device.is_active());
    assert_eq!(device.extra.get("sn"), Some(&json!("X1")));
}
