// DocChat — headless client for the document-chat backend.
//
// Layering (inner layers never import outer ones):
//   atoms     — constants, error taxonomy, wire/data types, seam traits
//   engine    — application state, transport, controllers, view model
//   commands  — declarative action table bound to controller methods

pub mod atoms;
pub mod commands;
pub mod engine;

pub use atoms::error::{ClientError, ClientResult, ErrorKind};
pub use atoms::types::{ExportFile, FileGroup, Message, Sender, SessionEntry, UploadFile};
pub use engine::client::ChatClient;
pub use engine::config::ClientConfig;
pub use engine::http::HttpBackend;
pub use engine::transport::{Transport, TransportEvent};
pub use engine::view::ViewEvent;
