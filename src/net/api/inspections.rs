//! Device inspection (health check) endpoints.

use serde_json::Value;

use super::Crud;
use crate::net::transport::ApiRequest;
use crate::net::types::ListQuery;

const INSPECTIONS: Crud = Crud::new("/inspections");

#[must_use]
pub fn list(query: &ListQuery) -> ApiRequest {
    INSPECTIONS.list(query)
}

#[must_use]
pub fn get(id: i64) -> ApiRequest {
    INSPECTIONS.get(id)
}

#[must_use]
pub fn create(data: Value) -> ApiRequest {
    INSPECTIONS.create(data)
}

#[must_use]
pub fn run(device_id: i64) -> ApiRequest {
    ApiRequest::post(format!("/inspections/run/{device_id}"))
}

#[must_use]
pub fn batch_run(device_ids: &[i64]) -> ApiRequest {
    ApiRequest::post("/inspections/batch/run").json(Value::from(device_ids.to_vec()))
}
