//! Resource facades.
//!
//! Each function maps one console operation onto a fixed
//! (method, path template, payload shape) triple and returns the
//! [`ApiRequest`](super::transport::ApiRequest) describing it. Nothing here
//! sends, retries or authenticates: callers hand the request to
//! [`ApiClient`](super::client::ApiClient), which owns all of that.

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub mod auth;
pub mod collection;
pub mod command_history;
pub mod command_templates;
pub mod configurations;
pub mod devices;
pub mod git_configs;
pub mod inspections;
pub mod ports;
pub mod users;
pub mod vlans;

use serde_json::Value;

use super::transport::ApiRequest;
use super::types::ListQuery;

/// Standard CRUD mapping for a collection rooted at `base`.
pub(crate) struct Crud {
    base: &'static str,
}

impl Crud {
    pub(crate) const fn new(base: &'static str) -> Self {
        Self { base }
    }

    pub(crate) fn list(&self, query: &ListQuery) -> ApiRequest {
        ApiRequest::get(self.base).query_params(query)
    }

    pub(crate) fn get(&self, id: i64) -> ApiRequest {
        ApiRequest::get(self.item(id))
    }

    pub(crate) fn create(&self, data: Value) -> ApiRequest {
        ApiRequest::post(self.base).json(data)
    }

    pub(crate) fn update(&self, id: i64, data: Value) -> ApiRequest {
        ApiRequest::put(self.item(id)).json(data)
    }

    pub(crate) fn delete(&self, id: i64) -> ApiRequest {
        ApiRequest::delete(self.item(id))
    }

    pub(crate) fn batch_delete(&self, ids: &[i64]) -> ApiRequest {
        ApiRequest::post(format!("{}/batch/delete", self.base)).json(Value::from(ids.to_vec()))
    }

    pub(crate) fn item(&self, id: i64) -> String {
        format!("{}/{id}", self.base)
    }
}
