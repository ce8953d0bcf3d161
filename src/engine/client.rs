// DocChat Engine — ChatClient
//
// The single controller object. Owns the application state, the backend
// used for request/response calls and (once connected) the chat channel.
// Controller operations live in chat.rs, sessions.rs, groups.rs and
// upload.rs as further `impl ChatClient` blocks.

use crate::atoms::error::{ClientError, ClientResult, ErrorKind};
use crate::atoms::traits::{Backend, ChatChannel};
use crate::atoms::types::ApiReply;
use crate::engine::state::AppState;
use crate::engine::view::ViewEvent;
use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub struct ChatClient<B: Backend> {
    pub(crate) backend: B,
    pub(crate) channel: Option<Box<dyn ChatChannel>>,
    pub(crate) state: AppState,
}

impl<B: Backend> ChatClient<B> {
    pub fn new(backend: B) -> Self {
        ChatClient { backend, channel: None, state: AppState::default() }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn attach_channel(&mut self, channel: Box<dyn ChatChannel>) {
        self.channel = Some(channel);
    }

    pub fn is_connected(&self) -> bool {
        self.channel.as_ref().is_some_and(|c| c.is_open())
    }

    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        self.state.view.drain_events()
    }

    /// Route a failure to the view according to its kind.
    pub fn surface(&mut self, err: &ClientError) {
        match err.kind() {
            ErrorKind::Connection => {
                warn!("[client] {}", err);
                self.state.view.show_connection_error(err.user_message());
            }
            ErrorKind::Transport => {
                warn!("[client] {}", err);
                self.state.view.notice(err.user_message());
            }
            ErrorKind::Logical | ErrorKind::Validation => {
                self.state.view.notice(err.user_message());
            }
        }
    }

    // ── Backend helpers ────────────────────────────────────────────────

    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let body = self.backend.get(path, query).await?;
        decode(path, body)
    }

    /// POST and branch on the `success` envelope.
    pub(crate) async fn post_checked(&self, path: &str, body: &Value) -> ClientResult<ApiReply> {
        let reply = self.backend.post(path, body).await?;
        decode_reply(path, reply)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(path: &str, body: Value) -> ClientResult<T> {
    serde_json::from_value(body)
        .map_err(|e| ClientError::transport(format!("Malformed response from {}: {}", path, e)))
}

/// A mutating call must answer an object carrying `success`.
pub(crate) fn decode_reply(path: &str, body: Value) -> ClientResult<ApiReply> {
    if !body.is_object() {
        return Err(ClientError::transport(format!("{} did not answer an object", path)));
    }
    decode::<ApiReply>(path, body)?.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_reply_is_transport_error() {
        let err = decode_reply("/create_file_group", json!("ok")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn object_without_success_is_transport_error() {
        let err = decode_reply("/rename_session", json!({"status": "done"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn success_false_is_logical_error() {
        let err = decode_reply("/rename_session", json!({"success": false, "error": "nope"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Logical);
        assert_eq!(err.to_string(), "nope");
    }
}
