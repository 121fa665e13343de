//! Mock Replicate predictions API for integration tests
//!
//! Replies are scripted per model key: `owner/name` for model endpoints and
//! the version hash for pinned versions. Scripted replies are consumed in
//! order and the last one repeats. Unscripted models answer with a unique
//! image URL per call.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// One scripted answer to a prediction request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Prediction succeeds immediately with this output
    Output(Value),
    /// Prediction starts as `processing` and succeeds with this output on the first poll
    Deferred(Value),
    /// Prediction never leaves `processing`
    Stuck,
    /// Prediction settles as `failed` with this error
    Failed(String),
    /// Request is rejected with this HTTP status
    Status(u16),
    /// Prediction is accepted but the response is held back for this long
    Slow(Duration, Value),
}

/// A prediction request as the mock received it
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub key: String,
    pub input: Value,
    pub authorization: Option<String>,
}

/// Mock Replicate backend
pub struct MockReplicate {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    addr: SocketAddr,
    next_id: AtomicU32,
    scripts: Mutex<HashMap<String, VecDeque<MockReply>>>,
    calls: Mutex<Vec<RecordedCall>>,
    pending: Mutex<HashMap<String, Option<Value>>>,
}

impl MockReplicate {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockState {
            addr,
            next_id: AtomicU32::new(0),
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            pending: Mutex::new(HashMap::new()),
        });

        let app = Router::new()
            .route("/v1/models/{owner}/{name}/predictions", routing::post(handle_model_prediction))
            .route("/v1/predictions", routing::post(handle_version_prediction))
            .route("/v1/predictions/{id}", routing::get(handle_poll))
            .with_state(Arc::clone(&state));

        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL to configure as the provider base URL
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Queue a reply for a model key
    pub fn script(&self, key: &str, reply: MockReply) -> &Self {
        self.state
            .scripts
            .lock()
            .unwrap()
            .entry(key.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a successful output for a model key
    pub fn reply(&self, key: &str, output: Value) -> &Self {
        self.script(key, MockReply::Output(output))
    }

    /// Every prediction request received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Prediction requests received for one model key
    pub fn calls_to(&self, key: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|call| call.key == key).collect()
    }

    /// Number of prediction requests received for one model key
    pub fn count(&self, key: &str) -> usize {
        self.calls_to(key).len()
    }
}

impl Drop for MockReplicate {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl MockState {
    fn next_reply(&self, key: &str) -> MockReply {
        let mut scripts = self.scripts.lock().unwrap();

        match scripts.get_mut(key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => {
                let n = self.next_id.load(Ordering::SeqCst);
                MockReply::Output(json!([format!("https://replicate.delivery/mock/{n}.png")]))
            }
        }
    }

    fn prediction(&self, status: &str, output: &Value, error: Option<&str>) -> (String, Value) {
        let id = format!("p{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let body = json!({
            "id": id,
            "status": status,
            "output": output,
            "error": error,
            "urls": { "get": format!("http://{}/v1/predictions/{id}", self.addr) },
        });
        (id, body)
    }

    async fn respond(&self, key: String, body: &Value, authorization: Option<String>) -> Response {
        let input = body.get("input").cloned().unwrap_or(Value::Null);
        self.calls.lock().unwrap().push(RecordedCall {
            key: key.clone(),
            input,
            authorization,
        });

        match self.next_reply(&key) {
            MockReply::Output(output) => {
                let (_, body) = self.prediction("succeeded", &output, None);
                (StatusCode::CREATED, Json(body)).into_response()
            }
            MockReply::Deferred(output) => {
                let (id, body) = self.prediction("processing", &Value::Null, None);
                self.pending.lock().unwrap().insert(id, Some(output));
                (StatusCode::CREATED, Json(body)).into_response()
            }
            MockReply::Stuck => {
                let (id, body) = self.prediction("starting", &Value::Null, None);
                self.pending.lock().unwrap().insert(id, None);
                (StatusCode::CREATED, Json(body)).into_response()
            }
            MockReply::Failed(error) => {
                let (_, body) = self.prediction("failed", &Value::Null, Some(&error));
                (StatusCode::CREATED, Json(body)).into_response()
            }
            MockReply::Status(status) => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Json(json!({ "detail": "mock failure" }))).into_response()
            }
            MockReply::Slow(delay, output) => {
                let (_, body) = self.prediction("succeeded", &output, None);
                tokio::time::sleep(delay).await;
                (StatusCode::CREATED, Json(body)).into_response()
            }
        }
    }
}

fn authorization(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn handle_model_prediction(
    State(state): State<Arc<MockState>>,
    Path((owner, name)): Path<(String, String)>,
    headers: axum::http::HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state
        .respond(format!("{owner}/{name}"), &body, authorization(&headers))
        .await
}

async fn handle_version_prediction(
    State(state): State<Arc<MockState>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let version = body
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    state.respond(version, &body, authorization(&headers)).await
}

async fn handle_poll(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    let pending = state.pending.lock().unwrap().get(&id).cloned();

    match pending {
        Some(Some(output)) => Json(json!({ "id": id, "status": "succeeded", "output": output })).into_response(),
        Some(None) => Json(json!({
            "id": id,
            "status": "processing",
            "output": null,
            "urls": { "get": format!("http://{}/v1/predictions/{id}", state.addr) },
        }))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
