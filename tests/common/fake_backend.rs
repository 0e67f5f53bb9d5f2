//! Fake movie search backend for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `POST /api/gethint` — canned hint response
//! - `POST /api/search` — canned search response
//!
//! Every request body is recorded so tests can assert on the exact JSON the
//! client sent. Responses default to `{"code":0,"payload":[]}` until set.
//!
//! # Example
//!
//! ```rust,no_run
//! let backend = FakeBackend::start().await.unwrap();
//! backend.respond_json(SEARCH_PATH, ok_response(&sample_movies())).await;
//! // Point the client at backend.base_url()
//! ```

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const HINT_PATH: &str = "/api/gethint";
pub const SEARCH_PATH: &str = "/api/search";

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: &'static str,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl Default for Canned {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            body: r#"{"code":0,"payload":[]}"#.to_string(),
            delay: Duration::ZERO,
        }
    }
}

/// State shared between the router and test code.
#[derive(Default)]
struct BackendState {
    canned: HashMap<&'static str, Canned>,
    recorded: Vec<Recorded>,
}

/// Handle to the running fake backend.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(BackendState::default()));

        let app = Router::new()
            .route(
                HINT_PATH,
                post(|st: State<Arc<Mutex<BackendState>>>, h: HeaderMap, b: Bytes| {
                    answer(HINT_PATH, st, h, b)
                }),
            )
            .route(
                SEARCH_PATH,
                post(|st: State<Arc<Mutex<BackendState>>>, h: HeaderMap, b: Bytes| {
                    answer(SEARCH_PATH, st, h, b)
                }),
            )
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer `path` with `body` and HTTP 200.
    pub async fn respond_json(&self, path: &'static str, body: serde_json::Value) {
        self.respond_raw(path, StatusCode::OK, body.to_string()).await;
    }

    /// Answer `path` with an arbitrary status and body.
    pub async fn respond_raw(&self, path: &'static str, status: StatusCode, body: String) {
        let mut state = self.state.lock().await;
        let canned = state.canned.entry(path).or_default();
        canned.status = status;
        canned.body = body;
    }

    /// Hold every answer on `path` for `delay` before replying.
    pub async fn delay(&self, path: &'static str, delay: Duration) {
        self.state.lock().await.canned.entry(path).or_default().delay = delay;
    }

    /// Requests received so far, oldest first.
    pub async fn recorded(&self) -> Vec<Recorded> {
        self.state.lock().await.recorded.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handler
// ---------------------------------------------------------------------------

async fn answer(
    path: &'static str,
    State(state): State<Arc<Mutex<BackendState>>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let canned = {
        let mut state = state.lock().await;
        state.recorded.push(Recorded {
            path,
            content_type: headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
        });
        state.canned.get(path).cloned().unwrap_or_default()
    };

    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }

    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
}
