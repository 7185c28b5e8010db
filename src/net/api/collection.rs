//! Live data collection from devices (version, serial, interfaces, MAC
//! tables) and the stored MAC address views.

use serde::Serialize;
use serde_json::json;

use crate::net::transport::ApiRequest;

/// What a collection run gathers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectKind {
    Version,
    Serial,
    Interfaces,
    MacTable,
}

impl CollectKind {
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Serial => "serial",
            Self::Interfaces => "interfaces",
            Self::MacTable => "mac-table",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MacQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

#[must_use]
pub fn collect(device_id: i64, kind: CollectKind) -> ApiRequest {
    ApiRequest::post(format!("/devices/{device_id}/collect/{}", kind.path_segment()))
}

#[must_use]
pub fn batch_collect(device_ids: &[i64], kinds: &[CollectKind]) -> ApiRequest {
    ApiRequest::post("/devices/batch/collect").json(json!({
        "device_ids": device_ids,
        "collect_types": kinds,
    }))
}

#[must_use]
pub fn mac_addresses(query: &MacQuery) -> ApiRequest {
    ApiRequest::get("/devices/mac-addresses").query_params(query)
}

#[must_use]
pub fn search_mac(mac_address: &str) -> ApiRequest {
    ApiRequest::post("/devices/mac-addresses/search").json(json!({ "mac_address": mac_address }))
}

#[must_use]
pub fn device_mac_addresses(device_id: i64, skip: Option<u64>, limit: Option<u64>) -> ApiRequest {
    ApiRequest::get(format!("/devices/{device_id}/mac-addresses")).query_params(&MacQuery {
        skip,
        limit,
        ..MacQuery::default()
    })
}
