//! End-to-end pipeline tests: the real `reqwest` transport against a local
//! `axum` backend that mimics the console API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router as HttpRouter;
use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};

use netconsole::config::{ClientConfig, DEFAULT_ORIGIN, Timeouts};
use netconsole::net::api::{auth, devices};
use netconsole::net::client::ApiClient;
use netconsole::net::error::{ApiError, ErrorClass};
use netconsole::net::notify::TracingNotifier;
use netconsole::net::types::{LoginRequest, Profile};
use netconsole::routing::guard::RouteGuard;
use netconsole::routing::{Location, Router};
use netconsole::state::auth::AuthStore;
use netconsole::state::session::SessionContext;
use netconsole::state::token::MemoryTokenStore;

const TOKEN: &str = "abc";

// =============================================================================
// Fake backend
// =============================================================================

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Could not validate credentials"}))).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["username"] == "admin" && body["password"] == "secret" {
        Json(json!({
            "access_token": TOKEN,
            "token_type": "bearer",
            "user": {"id": 1, "username": "admin", "roles": [{"name": "admin"}]}
        }))
        .into_response()
    } else {
        unauthorized()
    }
}

async fn me(headers: HeaderMap) -> Response {
    if bearer(&headers) == Some(TOKEN) {
        Json(json!({"id": 1, "username": "admin", "nickname": "Root", "roles": [{"name": "admin"}]})).into_response()
    } else {
        unauthorized()
    }
}

async fn list_devices(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if bearer(&headers) != Some(TOKEN) {
        return unauthorized();
    }
    let limit = params.get("limit").cloned().unwrap_or_default();
    Json(json!([{"id": 1, "hostname": "core-1", "ip_address": "10.0.0.1", "limit_seen": limit}])).into_response()
}

async fn template() -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"device_template.xlsx\""),
        ],
        vec![0x50_u8, 0x4b, 0x03, 0x04],
    )
        .into_response()
}

async fn import(headers: HeaderMap, Query(params): Query<HashMap<String, String>>, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let has_file = String::from_utf8_lossy(&body).contains("filename=\"devices.xlsx\"");
    Json(json!({
        "success": content_type.starts_with("multipart/form-data") && has_file,
        "skip_existing": params.get("skip_existing"),
    }))
    .into_response()
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(Value::Null)
}

async fn spawn_backend() -> SocketAddr {
    let app = HttpRouter::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/logout", post(|| async { Json(json!({"message": "ok"})) }))
        .route("/api/v1/devices", get(list_devices))
        .route("/api/v1/devices/template", get(template))
        .route("/api/v1/devices/batch/import", post(import))
        .route("/api/v1/slow", get(slow));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// =============================================================================
// Client wiring
// =============================================================================

struct Console {
    store: Arc<MemoryTokenStore>,
    session: Arc<SessionContext>,
    location: Arc<Location>,
    client: Arc<ApiClient>,
    auth: Arc<AuthStore>,
}

fn console(addr: SocketAddr, store: MemoryTokenStore, request_secs: u64) -> Console {
    let config = ClientConfig {
        api_base_url: format!("http://{addr}/api/v1"),
        origin: DEFAULT_ORIGIN.to_owned(),
        timeouts: Timeouts { request_secs, connect_secs: 1 },
        token_file: PathBuf::new(),
    };
    let store = Arc::new(store);
    let session = Arc::new(SessionContext::hydrate(store.clone()).unwrap());
    let location = Arc::new(Location::new("/"));
    let client = Arc::new(
        ApiClient::from_config(&config, session.clone(), Arc::new(TracingNotifier), location.clone()).unwrap(),
    );
    let auth = Arc::new(AuthStore::new(client.clone()));
    Console { store, session, location, client, auth }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn login_then_authenticated_calls() {
    let addr = spawn_backend().await;
    let console = console(addr, MemoryTokenStore::new(), 10);

    let response = console
        .auth
        .login(&LoginRequest {
            username: "admin".into(),
            password: "secret".into(),
            captcha_id: String::new(),
            captcha_code: String::new(),
            remember: false,
        })
        .await
        .unwrap();
    assert_eq!(response.access_token, TOKEN);
    assert!(console.session.is_admin());
    assert_eq!(console.store.peek().as_deref(), Some(TOKEN));

    let me: Profile = console.client.send_json(auth::me()).await.unwrap();
    assert_eq!(me.display_name(), "Root");

    let list: Value = console
        .client
        .send_json(devices::list(&netconsole::net::types::ListQuery {
            limit: Some(25),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(list[0]["limit_seen"], "25");

    console.auth.logout().await.unwrap();
    assert!(console.store.peek().is_none());
}

#[tokio::test]
async fn template_download_keeps_headers() {
    let addr = spawn_backend().await;
    let console = console(addr, MemoryTokenStore::with_token(TOKEN), 10);

    let blob = console.client.send_blob(devices::import_template()).await.unwrap();
    assert_eq!(blob.file_name().as_deref(), Some("device_template.xlsx"));
    assert_eq!(blob.bytes, vec![0x50, 0x4b, 0x03, 0x04]);
}

#[tokio::test]
async fn batch_import_is_sent_as_multipart() {
    let addr = spawn_backend().await;
    let console = console(addr, MemoryTokenStore::with_token(TOKEN), 10);

    let result: Value = console
        .client
        .send_json(devices::batch_import("devices.xlsx", b"PK".to_vec(), true))
        .await
        .unwrap();
    assert_eq!(result["success"], true);
    assert_eq!(result["skip_existing"], "true");
}

#[tokio::test]
async fn cold_start_with_stale_token_redirects_to_login() {
    let addr = spawn_backend().await;
    let console = console(addr, MemoryTokenStore::with_token("stale"), 10);
    let router = Router::new(RouteGuard::new(console.auth.clone()), console.location.clone());

    let nav = router.navigate("/devices").await;
    assert_eq!(nav.location, "/login?redirect=%2Fdevices");
    assert!(console.store.peek().is_none());
    assert!(!console.session.is_logged_in());
}

#[tokio::test]
async fn slow_backend_times_out_as_connectivity() {
    let addr = spawn_backend().await;
    let console = console(addr, MemoryTokenStore::new(), 1);

    let err = console
        .client
        .send(netconsole::net::transport::ApiRequest::get("/slow"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network { timed_out: true, .. }));
    assert_eq!(err.class(), ErrorClass::Connectivity);
}
