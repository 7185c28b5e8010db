//! Executed command history.

use super::Crud;
use crate::net::transport::ApiRequest;
use crate::net::types::ListQuery;

const HISTORY: Crud = Crud::new("/command-history");

#[must_use]
pub fn list(query: &ListQuery) -> ApiRequest {
    HISTORY.list(query)
}

#[must_use]
pub fn get(id: i64) -> ApiRequest {
    HISTORY.get(id)
}

#[must_use]
pub fn for_device(device_id: i64, query: &ListQuery) -> ApiRequest {
    ApiRequest::get(format!("/command-history/device/{device_id}")).query_params(query)
}

#[must_use]
pub fn delete(id: i64) -> ApiRequest {
    HISTORY.delete(id)
}

#[must_use]
pub fn delete_for_device(device_id: i64) -> ApiRequest {
    ApiRequest::delete(format!("/command-history/device/{device_id}"))
}

#[must_use]
pub fn clear() -> ApiRequest {
    ApiRequest::delete("/command-history")
}
