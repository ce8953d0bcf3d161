// DocChat Engine
//
// Module layout:
//   state      — AppState: the one mutable object every controller works on
//   client     — ChatClient: owns AppState, the Backend and the chat channel
//   store      — SessionStore: cached transcripts per session
//   view       — ChatView: bubbles, spinner, banners, notices
//   guard      — PendingGuard: 10 s advisory response timer
//   chat       — chat turns: connect, send, reply, timeout
//   sessions   — Session List Controller
//   groups     — File Group Controller (+ editor and filter dialogs)
//   upload     — Upload Controller
//   http       — reqwest-backed Backend
//   transport  — tokio-tungstenite chat channel
//   config     — TOML configuration + server URL handling

pub mod chat;
pub mod client;
pub mod config;
pub mod groups;
pub mod guard;
pub mod http;
pub mod sessions;
pub mod state;
pub mod store;
pub mod transport;
pub mod upload;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;
