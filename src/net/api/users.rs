//! User administration and self-service profile endpoints.

use serde::Serialize;
use serde_json::{Value, json};

use super::Crud;
use crate::net::transport::ApiRequest;
use crate::net::types::{PasswordChange, ProfileUpdate};

const USERS: Crud = Crud::new("/users");
pub const MY_PROFILE_PATH: &str = "/users/me";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[must_use]
pub fn list(query: &UserQuery) -> ApiRequest {
    ApiRequest::get("/users").query_params(query)
}

#[must_use]
pub fn create(data: Value) -> ApiRequest {
    USERS.create(data)
}

#[must_use]
pub fn get(id: i64) -> ApiRequest {
    USERS.get(id)
}

#[must_use]
pub fn update(id: i64, data: Value) -> ApiRequest {
    USERS.update(id, data)
}

#[must_use]
pub fn delete(id: i64) -> ApiRequest {
    USERS.delete(id)
}

#[must_use]
pub fn reset_password(id: i64, new_password: &str) -> ApiRequest {
    ApiRequest::post(format!("{}/reset-password", USERS.item(id))).json(json!({ "new_password": new_password }))
}

#[must_use]
pub fn my_profile() -> ApiRequest {
    ApiRequest::get(MY_PROFILE_PATH)
}

#[must_use]
pub fn update_my_profile(update: &ProfileUpdate) -> ApiRequest {
    ApiRequest::put(MY_PROFILE_PATH).json(serde_json::to_value(update).unwrap_or_else(|_| json!({})))
}

#[must_use]
pub fn change_password(change: &PasswordChange) -> ApiRequest {
    ApiRequest::put(format!("{MY_PROFILE_PATH}/password")).json(json!({
        "old_password": change.old_password,
        "new_password": change.new_password,
    }))
}
