//! Switch port endpoints.

use serde_json::Value;

use super::Crud;
use crate::net::transport::ApiRequest;
use crate::net::types::ListQuery;

const PORTS: Crud = Crud::new("/ports");

#[must_use]
pub fn list(query: &ListQuery) -> ApiRequest {
    PORTS.list(query)
}

#[must_use]
pub fn get(id: i64) -> ApiRequest {
    PORTS.get(id)
}

#[must_use]
pub fn create(data: Value) -> ApiRequest {
    PORTS.create(data)
}

#[must_use]
pub fn update(id: i64, data: Value) -> ApiRequest {
    PORTS.update(id, data)
}

#[must_use]
pub fn delete(id: i64) -> ApiRequest {
    PORTS.delete(id)
}

#[must_use]
pub fn batch_delete(ids: &[i64]) -> ApiRequest {
    PORTS.batch_delete(ids)
}
