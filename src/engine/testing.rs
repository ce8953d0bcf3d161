// Test doubles: an in-memory Backend with canned routes and a chat channel
// that records every outgoing turn.

use crate::atoms::error::{ClientError, ClientResult};
use crate::atoms::traits::{Backend, ChatChannel};
use crate::atoms::types::{ChatRequest, UploadFile};
use crate::engine::client::ChatClient;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Default)]
pub struct MockBackend {
    routes: Mutex<HashMap<String, Value>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<(String, Value)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned body for a route key: `GET /path?k=v`, `POST /path`, `UPLOAD /path`.
    pub fn route(self, key: &str, body: Value) -> Self {
        self.set(key, body);
        self
    }

    pub fn set(&self, key: &str, body: Value) {
        self.routes.lock().insert(key.to_string(), body);
    }

    /// Make a route fail with a transport error.
    pub fn fail(&self, key: &str) {
        self.failing.lock().insert(key.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, key: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == key).count()
    }

    pub fn last_body(&self, path: &str) -> Option<Value> {
        self.bodies
            .lock()
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, b)| b.clone())
    }

    fn answer(&self, key: String, default: Option<Value>) -> ClientResult<Value> {
        self.calls.lock().push(key.clone());
        if self.failing.lock().contains(&key) {
            return Err(ClientError::transport(format!("{} failed", key)));
        }
        self.routes
            .lock()
            .get(&key)
            .cloned()
            .or(default)
            .ok_or_else(|| ClientError::transport(format!("no route for {}", key)))
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<Value> {
        let mut key = format!("GET {}", path);
        if !query.is_empty() {
            let q: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            key = format!("{}?{}", key, q.join("&"));
        }
        self.answer(key, None)
    }

    async fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
        self.bodies.lock().push((path.to_string(), body.clone()));
        self.answer(format!("POST {}", path), Some(json!({"success": true})))
    }

    async fn upload(&self, path: &str, files: &[UploadFile]) -> ClientResult<Value> {
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        self.answer(
            format!("UPLOAD {}", path),
            Some(json!({"success": true, "details": names})),
        )
    }
}

pub struct RecordingChannel {
    pub sent: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ChatChannel for RecordingChannel {
    fn is_open(&self) -> bool {
        true
    }

    fn send(&self, request: &ChatRequest) -> ClientResult<()> {
        self.sent.lock().push(request.clone());
        Ok(())
    }
}

pub fn client_with_channel(
    backend: MockBackend,
) -> (ChatClient<MockBackend>, Arc<Mutex<Vec<ChatRequest>>>) {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let mut client = ChatClient::new(backend);
    client.attach_channel(Box::new(RecordingChannel { sent: sent.clone() }));
    (client, sent)
}
