//! Reusable command templates.

use serde_json::Value;

use super::Crud;
use crate::net::transport::ApiRequest;
use crate::net::types::ListQuery;

const TEMPLATES: Crud = Crud::new("/command-templates");

#[must_use]
pub fn list(query: &ListQuery) -> ApiRequest {
    TEMPLATES.list(query)
}

#[must_use]
pub fn get(id: i64) -> ApiRequest {
    TEMPLATES.get(id)
}

#[must_use]
pub fn create(data: Value) -> ApiRequest {
    TEMPLATES.create(data)
}

#[must_use]
pub fn update(id: i64, data: Value) -> ApiRequest {
    TEMPLATES.update(id, data)
}

#[must_use]
pub fn delete(id: i64) -> ApiRequest {
    TEMPLATES.delete(id)
}

#[must_use]
pub fn by_vendor(vendor: &str) -> ApiRequest {
    ApiRequest::get(format!("/command-templates/vendor/{vendor}"))
}

#[must_use]
pub fn by_device_type(device_type: &str) -> ApiRequest {
    ApiRequest::get(format!("/command-templates/device-type/{device_type}"))
}
