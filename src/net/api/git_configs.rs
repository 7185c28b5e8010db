//! Git repository settings used for configuration archival.

use serde_json::Value;

use super::Crud;
use crate::net::transport::ApiRequest;
use crate::net::types::ListQuery;

const GIT_CONFIGS: Crud = Crud::new("/git-configs");

#[must_use]
pub fn list(query: &ListQuery) -> ApiRequest {
    GIT_CONFIGS.list(query)
}

#[must_use]
pub fn get(id: i64) -> ApiRequest {
    GIT_CONFIGS.get(id)
}

#[must_use]
pub fn create(data: Value) -> ApiRequest {
    GIT_CONFIGS.create(data)
}

#[must_use]
pub fn update(id: i64, data: Value) -> ApiRequest {
    GIT_CONFIGS.update(id, data)
}

#[must_use]
pub fn delete(id: i64) -> ApiRequest {
    GIT_CONFIGS.delete(id)
}

#[must_use]
pub fn test_connection(id: i64) -> ApiRequest {
    ApiRequest::post(format!("{}/test", GIT_CONFIGS.item(id)))
}

#[must_use]
pub fn set_active(id: i64) -> ApiRequest {
    ApiRequest::post(format!("/git-configs/active/{id}"))
}
