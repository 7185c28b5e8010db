//! Configuration backup endpoints.

use serde_json::Value;

use super::Crud;
use crate::net::transport::ApiRequest;
use crate::net::types::ListQuery;

const CONFIGURATIONS: Crud = Crud::new("/configurations");

#[must_use]
pub fn list(query: &ListQuery) -> ApiRequest {
    CONFIGURATIONS.list(query)
}

#[must_use]
pub fn get(id: i64) -> ApiRequest {
    CONFIGURATIONS.get(id)
}

#[must_use]
pub fn create(data: Value) -> ApiRequest {
    CONFIGURATIONS.create(data)
}

#[must_use]
pub fn latest(device_id: i64) -> ApiRequest {
    ApiRequest::get(format!("/configurations/device/{device_id}/latest"))
}

#[must_use]
pub fn delete(id: i64) -> ApiRequest {
    CONFIGURATIONS.delete(id)
}

#[must_use]
pub fn batch_delete(ids: &[i64]) -> ApiRequest {
    CONFIGURATIONS.batch_delete(ids)
}

/// Pull the running configuration from the device and store it.
#[must_use]
pub fn collect(device_id: i64) -> ApiRequest {
    ApiRequest::post(format!("/configurations/device/{device_id}/collect"))
}

#[must_use]
pub fn diff(first_id: i64, second_id: i64) -> ApiRequest {
    ApiRequest::get(format!("/configurations/diff/{first_id}/{second_id}"))
}
