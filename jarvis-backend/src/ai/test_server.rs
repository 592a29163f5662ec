//! Fake Ollama server for tests

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct FakeState {
    hits: AtomicUsize,
    tags: Mutex<(u16, String)>,
    generate: Mutex<(u16, String)>,
    generate_requests: Mutex<Vec<Value>>,
}

pub struct FakeBackend {
    pub url: String,
    state: Arc<FakeState>,
}

pub struct FakeBackendBuilder {
    tags: (u16, String),
    generate: (u16, String),
}

impl FakeBackend {
    pub fn builder() -> FakeBackendBuilder {
        FakeBackendBuilder {
            tags: (200, r#"{"models": []}"#.to_string()),
            generate: (200, r#"{"response": "ok"}"#.to_string()),
        }
    }

    /// Requests received on any route
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn generate_requests(&self) -> Vec<Value> {
        self.state.generate_requests.lock().clone()
    }

    pub fn set_tags(&self, status: u16, body: &str) {
        *self.state.tags.lock() = (status, body.to_string());
    }

    pub fn set_generate(&self, status: u16, body: &str) {
        *self.state.generate.lock() = (status, body.to_string());
    }
}

impl FakeBackendBuilder {
    pub fn tags(mut self, status: u16, body: &str) -> Self {
        self.tags = (status, body.to_string());
        self
    }

    pub fn generate(mut self, status: u16, body: &str) -> Self {
        self.generate = (status, body.to_string());
        self
    }

    pub async fn start(self) -> FakeBackend {
        let state = Arc::new(FakeState {
            tags: Mutex::new(self.tags),
            generate: Mutex::new(self.generate),
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/tags", get(tags))
            .route("/api/generate", post(generate))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        FakeBackend {
            url: format!("http://{}", addr),
            state,
        }
    }
}

/// URL of a local port with nothing listening on it
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{}", addr)
}

fn reply(slot: &Mutex<(u16, String)>) -> (StatusCode, String) {
    let (status, body) = slot.lock().clone();
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        body,
    )
}

async fn tags(State(state): State<Arc<FakeState>>) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    reply(&state.tags)
}

async fn generate(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.generate_requests.lock().push(body);
    reply(&state.generate)
}
