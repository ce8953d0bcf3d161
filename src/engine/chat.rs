// DocChat Engine — Chat turns
//
// connect → send_message → (on_reply | check_timeout) → on_reply ...
// The guard is advisory: expiry warns but a later reply still renders.

use crate::atoms::error::{ClientError, ClientResult};
use crate::atoms::traits::Backend;
use crate::atoms::types::{ChatRequest, Message};
use crate::engine::client::ChatClient;
use crate::engine::transport::{Transport, TransportEvent};
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::Instant;

impl<B: Backend> ChatClient<B> {
    /// Open the chat channel. On failure the connection banner is shown and
    /// the error returned; nothing retries.
    pub async fn connect(&mut self, ws_url: &str) -> ClientResult<mpsc::UnboundedReceiver<TransportEvent>> {
        match Transport::connect(ws_url).await {
            Ok((transport, events)) => {
                self.attach_channel(Box::new(transport));
                self.state.view.clear_connection_error();
                Ok(events)
            }
            Err(e) => {
                self.surface(&e);
                Err(e)
            }
        }
    }

    /// Send one chat turn. Whitespace-only input does nothing and returns
    /// `Ok(false)`. Otherwise exactly one user bubble is appended before the
    /// request goes out; with no current session a new one is created.
    pub fn send_message(&mut self, text: &str, now: Instant) -> ClientResult<bool> {
        if text.trim().is_empty() {
            return Ok(false);
        }

        let session_id = match self.state.current_session.clone() {
            Some(id) => id,
            None => self.create_session(),
        };

        let message = Message::user(text).stamped();
        self.state.view.append(message.clone());
        self.state.store.append(&session_id, message);

        let request = ChatRequest {
            session_id,
            message: text.to_string(),
            group_ids: self.state.selected_group_ids.clone(),
        };

        let channel = self
            .channel
            .as_ref()
            .ok_or_else(|| ClientError::Connection("chat channel was never opened".into()))?;
        channel.send(&request)?;

        debug!(
            "[chat] Sent turn for {} ({} groups)",
            request.session_id,
            request.group_ids.len()
        );
        self.state.guard.begin(now);
        self.state.view.set_spinner(true);
        Ok(true)
    }

    pub fn on_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Reply(text) => self.on_reply(text),
            TransportEvent::Closed => {
                info!("[chat] Chat channel closed");
                self.surface(&ClientError::Connection("closed by server".into()));
            }
            TransportEvent::Failed(reason) => {
                self.surface(&ClientError::Connection(reason));
            }
        }
    }

    /// One backend reply: one bot bubble, whether or not the guard expired.
    pub fn on_reply(&mut self, text: String) {
        let message = Message::bot(text).stamped();
        if let Some(id) = self.state.current_session.clone() {
            self.state.store.append(&id, message.clone());
        }
        self.state.view.append(message);

        if !self.state.guard.resolve() {
            debug!("[chat] Reply arrived after the response guard expired");
        }
        self.state.view.set_spinner(false);
        self.state.view.clear_timeout_warning();
    }

    /// Called when the front-end's timer reaches `pending_deadline`.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        if !self.state.guard.expire(now) {
            return false;
        }
        warn!("[chat] No reply within the response window");
        self.state.view.set_spinner(false);
        self.state.view.show_timeout_warning();
        true
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.state.guard.deadline()
    }
}
