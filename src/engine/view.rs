// DocChat Engine — Chat View model
//
// Holds what a front-end draws: message bubbles, the progress spinner,
// the upload busy indicator, the persistent connection banner, the timeout
// warning and one-shot notices. Every mutation is also queued as a
// `ViewEvent` so a renderer can redraw incrementally via `drain_events`.

use crate::atoms::constants::TIMEOUT_WARNING;
use crate::atoms::types::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Cleared,
    Replaced(Vec<Message>),
    Appended(Message),
    Spinner(bool),
    Busy(bool),
    ConnectionBanner(Option<String>),
    TimeoutWarning(Option<String>),
    Notice(String),
    SessionsChanged,
    GroupsChanged,
}

#[derive(Debug, Default)]
pub struct ChatView {
    bubbles: Vec<Message>,
    spinner: bool,
    busy: bool,
    connection_banner: Option<String>,
    timeout_warning: bool,
    events: Vec<ViewEvent>,
}

impl ChatView {
    pub fn bubbles(&self) -> &[Message] {
        &self.bubbles
    }

    pub fn spinner(&self) -> bool {
        self.spinner
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn connection_banner(&self) -> Option<&str> {
        self.connection_banner.as_deref()
    }

    pub fn timeout_warning(&self) -> bool {
        self.timeout_warning
    }

    // ── Bubbles ────────────────────────────────────────────────────────

    pub fn append(&mut self, message: Message) {
        self.bubbles.push(message.clone());
        self.events.push(ViewEvent::Appended(message));
    }

    pub fn replace(&mut self, transcript: Vec<Message>) {
        self.bubbles = transcript.clone();
        self.events.push(ViewEvent::Replaced(transcript));
    }

    pub fn clear(&mut self) {
        self.bubbles.clear();
        self.events.push(ViewEvent::Cleared);
    }

    // ── Indicators ─────────────────────────────────────────────────────

    pub fn set_spinner(&mut self, on: bool) {
        if self.spinner != on {
            self.spinner = on;
            self.events.push(ViewEvent::Spinner(on));
        }
    }

    pub fn set_busy(&mut self, on: bool) {
        if self.busy != on {
            self.busy = on;
            self.events.push(ViewEvent::Busy(on));
        }
    }

    // ── Banners & notices ──────────────────────────────────────────────

    pub fn show_connection_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.connection_banner = Some(text.clone());
        self.events.push(ViewEvent::ConnectionBanner(Some(text)));
    }

    pub fn clear_connection_error(&mut self) {
        if self.connection_banner.take().is_some() {
            self.events.push(ViewEvent::ConnectionBanner(None));
        }
    }

    pub fn show_timeout_warning(&mut self) {
        self.timeout_warning = true;
        self.events.push(ViewEvent::TimeoutWarning(Some(TIMEOUT_WARNING.to_string())));
    }

    pub fn clear_timeout_warning(&mut self) {
        if self.timeout_warning {
            self.timeout_warning = false;
            self.events.push(ViewEvent::TimeoutWarning(None));
        }
    }

    pub fn notice(&mut self, text: impl Into<String>) {
        self.events.push(ViewEvent::Notice(text.into()));
    }

    pub fn mark(&mut self, event: ViewEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }
}
