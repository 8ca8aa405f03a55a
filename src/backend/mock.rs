//! In-process stand-in for the messenger backend, used by the async tests.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use super::config::Config;

#[derive(Default)]
struct MockState {
    messages: Vec<Value>,
    raw_listing: Option<String>,
    list_status: Option<u16>,
    send_status: Option<u16>,
    listing_delays: VecDeque<Duration>,
    send_delay: Option<Duration>,
    requests: Vec<String>,
    payloads: Vec<Value>,
}

#[derive(Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    base_url: String,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new()
            .route("/", get(status))
            .route("/messages", get(list_messages))
            .route("/send", post(send_message))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { state, base_url: format!("http://{addr}") }
    }

    /// Config pointing at a port nothing listens on.
    pub async fn unreachable_config() -> Config {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Config::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap()
    }

    pub fn config(&self) -> Config {
        Config::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    pub fn set_messages(&self, messages: Vec<Value>) {
        self.state.lock().unwrap().messages = messages;
    }

    pub fn set_raw_listing(&self, body: &str) {
        self.state.lock().unwrap().raw_listing = Some(body.to_string());
    }

    pub fn set_list_status(&self, status: u16) {
        self.state.lock().unwrap().list_status = Some(status);
    }

    pub fn set_send_status(&self, status: u16) {
        self.state.lock().unwrap().send_status = Some(status);
    }

    pub fn delay_next_listing(&self, delay: Duration) {
        self.state.lock().unwrap().listing_delays.push_back(delay);
    }

    pub fn set_send_delay(&self, delay: Duration) {
        self.state.lock().unwrap().send_delay = Some(delay);
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn received_payloads(&self) -> Vec<Value> {
        self.state.lock().unwrap().payloads.clone()
    }
}

type Shared = Arc<Mutex<MockState>>;

async fn status() -> Json<Value> {
    Json(json!({"status": "Quantum Blockchain Backend Running"}))
}

async fn list_messages(State(state): State<Shared>) -> impl IntoResponse {
    let delay = {
        let mut s = state.lock().unwrap();
        s.requests.push("GET /messages".into());
        s.listing_delays.pop_front()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let s = state.lock().unwrap();
    let status = StatusCode::from_u16(s.list_status.unwrap_or(200)).unwrap();
    let body = match &s.raw_listing {
        Some(raw) => raw.clone(),
        None => Value::Array(s.messages.clone()).to_string(),
    };
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

async fn send_message(State(state): State<Shared>, Json(payload): Json<Value>) -> impl IntoResponse {
    let delay = {
        let mut s = state.lock().unwrap();
        s.requests.push("POST /send".into());
        s.payloads.push(payload.clone());
        s.send_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut s = state.lock().unwrap();
    let status = StatusCode::from_u16(s.send_status.unwrap_or(200)).unwrap();
    if status.is_success() {
        let text = payload.get("message").cloned().unwrap_or(Value::String(String::new()));
        s.messages.push(json!({
            "sender": "Node 1",
            "receiver": "Node 2",
            "message": text,
            "timestamp": "2025-01-01 12:00:00",
        }));
        (status, Json(json!({"status": "success"})))
    } else {
        (status, Json(json!({"error": "send rejected"})))
    }
}
