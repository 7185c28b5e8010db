//! VLAN endpoints.

use serde_json::Value;

use super::Crud;
use crate::net::transport::ApiRequest;
use crate::net::types::ListQuery;

const VLANS: Crud = Crud::new("/vlans");

#[must_use]
pub fn list(query: &ListQuery) -> ApiRequest {
    VLANS.list(query)
}

#[must_use]
pub fn get(id: i64) -> ApiRequest {
    VLANS.get(id)
}

#[must_use]
pub fn create(data: Value) -> ApiRequest {
    VLANS.create(data)
}

#[must_use]
pub fn update(id: i64, data: Value) -> ApiRequest {
    VLANS.update(id, data)
}

#[must_use]
pub fn delete(id: i64) -> ApiRequest {
    VLANS.delete(id)
}

#[must_use]
pub fn batch_delete(ids: &[i64]) -> ApiRequest {
    VLANS.batch_delete(ids)
}
