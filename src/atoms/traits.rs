// ── DocChat Atoms: Seam Traits ─────────────────────────────────────────────
// The two collaborators the controllers talk to. Production code plugs in
// `engine::http::HttpBackend` and `engine::transport::Transport`.

use crate::atoms::error::ClientResult;
use crate::atoms::types::{ChatRequest, UploadFile};
use async_trait::async_trait;
use serde_json::Value;

/// Request/response calls to the backend. Implementations return the
/// decoded JSON body; a non-OK status or non-JSON body is a transport error.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<Value>;

    async fn post(&self, path: &str, body: &Value) -> ClientResult<Value>;

    /// Multipart POST with one part per file.
    async fn upload(&self, path: &str, files: &[UploadFile]) -> ClientResult<Value>;
}

/// The outgoing half of the real-time chat connection.
pub trait ChatChannel: Send {
    fn is_open(&self) -> bool;

    fn send(&self, request: &ChatRequest) -> ClientResult<()>;
}
