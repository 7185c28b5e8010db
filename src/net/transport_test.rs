use super::*;
use serde_json::json;

#[test]
fn join_url_handles_slashes() {
    assert_eq!(join_url("http://h/api/v1", "/devices"), "http://h/api/v1/devices");
    assert_eq!(join_url("http://h/api/v1/", "/devices"), "http://h/api/v1/devices");
    assert_eq!(join_url("http://h/api/v1", "devices"), "http://h/api/v1/devices");
}

#[test]
fn builder_defaults_to_json_mode_without_body() {
    let req = ApiRequest::get("/devices");
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.body, RequestBody::Empty);
    assert_eq!(req.options, RequestOptions::default());
    assert_eq!(req.options.mode, ResponseMode::Json);
}

#[test]
fn builder_flags_blob_and_quiet() {
    let req = ApiRequest::get("/devices/template").blob().quiet();
    assert_eq!(req.options.mode, ResponseMode::Blob);
    assert!(req.options.quiet);
}

#[test]
fn query_params_skips_nulls_and_stringifies_scalars() {
    #[derive(serde::Serialize)]
    struct Params {
        skip: u32,
        keyword: Option<String>,
        vendor: Option<String>,
        active: bool,
    }
    let req = ApiRequest::get("/devices").query_params(&Params {
        skip: 20,
        keyword: None,
        vendor: Some("huawei".into()),
        active: true,
    });
    let mut query = req.query.clone();
    query.sort();
    assert_eq!(
        query,
        vec![
            ("active".to_owned(), "true".to_owned()),
            ("skip".to_owned(), "20".to_owned()),
            ("vendor".to_owned(), "huawei".to_owned()),
        ]
    );
}

#[test]
fn non_map_query_params_are_ignored() {
    let req = ApiRequest::get("/devices").query_params(&[1, 2]).query_params(&"keyword");
    assert!(req.query.is_empty());
    assert_eq!(json_kind(&json!([1])), "array");
}

#[test]
fn json_body_is_carried() {
    let req = ApiRequest::post("/devices").json(json!({"hostname": "sw1"}));
    assert_eq!(req.body, RequestBody::Json(json!({"hostname": "sw1"})));
}

#[test]
fn raw_response_header_lookup_is_case_insensitive() {
    let raw = RawResponse {
        status: 200,
        headers: vec![("content-type".into(), "application/json".into())],
        body: Vec::new(),
    };
    assert_eq!(raw.header("Content-Type"), Some("application/json"));
    assert_eq!(raw.header("x-missing"), None);
    assert!(raw.is_success());
}

#[test]
fn method_converts_to_reqwest() {
    assert_eq!(reqwest::Method::from(Method::Patch), reqwest::Method::PATCH);
    assert_eq!(Method::Delete.to_string(), "DELETE");
}
