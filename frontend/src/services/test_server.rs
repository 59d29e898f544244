//! In-process fake of the CrediWise API for tests.
//!
//! Responses are scripted per `(method, path)`; every request is recorded so
//! tests can assert on what was (or was not) sent. Routes are scripted with
//! percent-decoded paths. Unscripted routes answer 404 with a FastAPI-style
//! `detail`.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Percent-decoded path, matched against scripted routes
    pub path: String,
    /// Path exactly as it arrived on the wire
    pub raw_path: String,
    pub body: Value,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Clone)]
struct Scripted {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
struct FakeState {
    routes: HashMap<(String, String), Scripted>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeApi {
    pub base_url: String,
    state: Shared,
}

impl FakeApi {
    /// Bind an ephemeral port and serve until the test's runtime shuts down
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake api");
        let addr = listener.local_addr().expect("fake api address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake api server");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.script(method, path, status, body.to_string(), None);
    }

    pub fn respond_after(&self, method: &str, path: &str, status: u16, body: Value, delay: Duration) {
        self.script(method, path, status, body.to_string(), Some(delay));
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.script(method, path, status, body.to_string(), None);
    }

    fn script(&self, method: &str, path: &str, status: u16, body: String, delay: Option<Duration>) {
        self.state.lock().unwrap().routes.insert(
            (method.to_string(), path.to_string()),
            Scripted { status, body, delay },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Recorded requests for one method + path
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = RecordedRequest {
        method: method.to_string(),
        path: urlencoding::decode(uri.path())
            .map(|path| path.into_owned())
            .unwrap_or_else(|_| uri.path().to_string()),
        raw_path: uri.path().to_string(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
    };

    let scripted = {
        let mut state = state.lock().unwrap();
        let key = (recorded.method.clone(), recorded.path.clone());
        state.requests.push(recorded);
        state.routes.get(&key).cloned()
    };

    match scripted {
        Some(scripted) => {
            if let Some(delay) = scripted.delay {
                tokio::time::sleep(delay).await;
            }
            let status = StatusCode::from_u16(scripted.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, "application/json")], scripted.body).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            json!({"detail": "Not Found"}).to_string(),
        )
            .into_response(),
    }
}
