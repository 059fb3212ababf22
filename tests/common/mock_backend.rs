//! In-process form endpoint.
//!
//! Answers every path with the next queued response (or `success` once the
//! queue is empty) and records what was asked.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{OriginalUri, State};
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

impl CapturedRequest {
    /// Decoded query parameter by name.
    pub fn param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        reqwest::Url::parse(&format!("http://localhost/?{query}"))
            .ok()?
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// Canned answer for one poll.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self::status("success")
    }
}

impl MockResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: &str) -> Self {
        Self::json(format!(r#"{{"status":"{status}"}}"#))
    }

    pub fn progress(timeout_ms: u64) -> Self {
        Self::json(format!(r#"{{"status":"progress","timeout":{timeout_ms}}}"#))
    }

    pub fn error(reason: &str) -> Self {
        Self::json(format!(r#"{{"status":"error","reason":"{reason}"}}"#))
    }

    pub fn http_error(status: u16) -> Self {
        Self {
            status,
            ..Self::status("success")
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

#[derive(Default)]
struct Exchange {
    requests: Vec<CapturedRequest>,
    queue: VecDeque<MockResponse>,
}

type Shared = Arc<Mutex<Exchange>>;

pub struct MockBackend {
    pub addr: SocketAddr,
    shared: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let shared = Shared::default();
        let app = Router::new()
            .route("/{*path}", any(answer))
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock form server");
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            shared,
            server,
        }
    }

    pub async fn enqueue_response(&self, resp: MockResponse) {
        self.shared.lock().await.queue.push_back(resp);
    }

    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.shared.lock().await.requests.clone()
    }

    /// Base URL with a trailing slash, so relative actions join under it.
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn answer(
    State(shared): State<Shared>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> impl IntoResponse {
    let reply = {
        let mut exchange = shared.lock().await;
        exchange.requests.push(CapturedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
        });
        exchange.queue.pop_front().unwrap_or_default()
    };

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [("content-type", "application/json")], reply.body)
}
