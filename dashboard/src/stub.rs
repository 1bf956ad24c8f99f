//! In-process stand-in for the recognition backend, used by the tests.
//!
//! Serves canned `(status, body)` pairs by path and records every request it
//! receives so tests can assert on call counts, query strings and bodies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone, Default)]
struct StubState {
    responses: Arc<HashMap<String, (u16, String)>>,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[derive(Default)]
pub struct StubBuilder {
    responses: HashMap<String, (u16, String)>,
}

impl StubBuilder {
    pub fn respond(mut self, path: &str, status: u16, body: &str) -> Self {
        self.responses.insert(path.to_string(), (status, body.to_string()));
        self
    }

    pub async fn spawn(self) -> StubBackend {
        let state = StubState {
            responses: Arc::new(self.responses),
            log: Arc::default(),
        };
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubBackend {
            url: format!("http://{addr}"),
            log: state.log,
        }
    }
}

pub struct StubBackend {
    pub url: String,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubBackend {
    pub fn builder() -> StubBuilder {
        StubBuilder::default()
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn last_request(&self, path: &str) -> Option<RecordedRequest> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }
}

async fn handle(State(state): State<StubState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let path = parts.uri.path().to_string();

    state.log.lock().unwrap().push(RecordedRequest {
        method: parts.method.to_string(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        content_type: parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    match state.responses.get(&path) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            Body::from(body.clone()),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
