//! Device inventory endpoints.

use serde_json::{Map, Value, json};

use super::Crud;
use crate::net::transport::{ApiRequest, FilePart};
use crate::net::types::ListQuery;

const DEVICES: Crud = Crud::new("/devices");

pub const IMPORT_PATH: &str = "/devices/batch/import";
pub const TEMPLATE_PATH: &str = "/devices/template";
const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[must_use]
pub fn list(query: &ListQuery) -> ApiRequest {
    DEVICES.list(query)
}

#[must_use]
pub fn get(id: i64) -> ApiRequest {
    DEVICES.get(id)
}

#[must_use]
pub fn create(data: Value) -> ApiRequest {
    DEVICES.create(data)
}

#[must_use]
pub fn update(id: i64, data: Value) -> ApiRequest {
    DEVICES.update(id, data)
}

#[must_use]
pub fn delete(id: i64) -> ApiRequest {
    DEVICES.delete(id)
}

#[must_use]
pub fn batch_delete(ids: &[i64]) -> ApiRequest {
    DEVICES.batch_delete(ids)
}

/// One request setting `status` on every listed device.
#[must_use]
pub fn batch_update_status(ids: &[i64], status: &str) -> ApiRequest {
    ApiRequest::post("/devices/batch/update-status")
        .json(Value::from(ids.to_vec()))
        .query("status", status)
}

#[must_use]
pub fn test_connectivity(id: i64) -> ApiRequest {
    ApiRequest::post(format!("{}/test-connectivity", DEVICES.item(id)))
}

/// Run a CLI command (or a rendered template) on the device.
#[must_use]
pub fn execute_command(id: i64, command: &str, variables: Map<String, Value>, template_id: Option<i64>) -> ApiRequest {
    ApiRequest::post(format!("{}/execute-command", DEVICES.item(id))).json(json!({
        "command": command,
        "variables": variables,
        "template_id": template_id,
    }))
}

/// Spreadsheet import; `skip_existing` makes the server skip devices whose
/// IP address is already registered.
#[must_use]
pub fn batch_import(file_name: &str, bytes: Vec<u8>, skip_existing: bool) -> ApiRequest {
    ApiRequest::post(IMPORT_PATH)
        .multipart(FilePart {
            field: "file".to_owned(),
            file_name: file_name.to_owned(),
            content_type: Some(XLSX_CONTENT_TYPE.to_owned()),
            bytes,
        })
        .query("skip_existing", skip_existing)
}

/// Import template download, returned whole so the caller can read the
/// announced file name.
#[must_use]
pub fn import_template() -> ApiRequest {
    ApiRequest::get(TEMPLATE_PATH).blob()
}
