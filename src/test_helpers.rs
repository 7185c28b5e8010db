//! Shared test doubles: a scripted transport, a recording notifier and a
//! builder wiring them into a client/session/location bundle.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use crate::net::client::ApiClient;
use crate::net::notify::{Notice, Notifier};
use crate::net::transport::{ApiRequest, RawResponse, Transport, TransportError};
use crate::routing::Location;
use crate::state::session::SessionContext;
use crate::state::token::MemoryTokenStore;

// =========================================================================
// ScriptedTransport
// =========================================================================

/// One request as the transport saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub request: ApiRequest,
    pub bearer: Option<String>,
}

enum Scripted {
    Respond(Result<RawResponse, TransportError>),
    Delayed(Duration, Result<RawResponse, TransportError>),
}

/// Returns queued responses in order; an empty queue answers `200 null`.
#[derive(Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Scripted>>,
    recorded: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: Result<RawResponse, TransportError>) {
        self.queue.lock().unwrap().push_back(Scripted::Respond(response));
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push(Ok(json_response(status, &body)));
    }

    /// Queue a response that is only returned after `delay`.
    pub fn push_delayed(&self, delay: Duration, status: u16, body: Value) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Scripted::Delayed(delay, Ok(json_response(status, &body))));
    }

    #[must_use]
    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.recorded().into_iter().map(|r| r.request.path).collect()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse, TransportError> {
        self.recorded
            .lock()
            .unwrap()
            .push(Recorded { request: request.clone(), bearer: bearer.map(str::to_owned) });
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            None => Ok(json_response(200, &Value::Null)),
            Some(Scripted::Respond(response)) => response,
            Some(Scripted::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                response
            }
        }
    }
}

#[must_use]
pub fn json_response(status: u16, body: &Value) -> RawResponse {
    RawResponse {
        status,
        headers: vec![("content-type".into(), "application/json".into())],
        body: serde_json::to_vec(body).unwrap(),
    }
}

// =========================================================================
// RecordingNotifier
// =========================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

// =========================================================================
// Harness
// =========================================================================

/// Everything a pipeline-level test needs, wired together.
pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<MemoryTokenStore>,
    pub session: Arc<SessionContext>,
    pub location: Arc<Location>,
    pub client: Arc<ApiClient>,
}

impl Harness {
    /// Harness with an empty token store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryTokenStore::new())
    }

    /// Harness whose session is hydrated from a stored `token`.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self::with_store(MemoryTokenStore::with_token(token))
    }

    fn with_store(store: MemoryTokenStore) -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let store = Arc::new(store);
        let session = Arc::new(SessionContext::hydrate(store.clone()).unwrap());
        let location = Arc::new(Location::new("/"));
        let client = Arc::new(ApiClient::new(
            transport.clone(),
            session.clone(),
            notifier.clone(),
            location.clone(),
        ));
        Self { transport, notifier, store, session, location, client }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// A `/auth/me`-shaped profile body.
#[must_use]
pub fn profile_json(username: &str, roles: &[&str]) -> Value {
    let roles = roles.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>();
    json!({ "id": 1, "username": username, "nickname": null, "roles": roles })
}

/// A `/auth/login`-shaped response body.
#[must_use]
pub fn login_json(token: &str, username: &str, roles: &[&str]) -> Value {
    json!({ "access_token": token, "token_type": "bearer", "user": profile_json(username, roles) })
}
