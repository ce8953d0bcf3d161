// ── DocChat Atoms: Error Types ─────────────────────────────────────────────
// Single canonical error enum for the client, built with `thiserror`.
//
// Design rules:
//   • Every variant maps onto exactly one user-facing kind (see `ErrorKind`).
//   • `Rejected` carries the backend's own detail text, shown verbatim.
//   • Transport-kind variants keep their detail for the log only; the user
//     sees a generic message.

use crate::atoms::constants::{CONNECTION_LOST, GENERIC_TRANSPORT_ERROR};
use thiserror::Error;

// ── Taxonomy ───────────────────────────────────────────────────────────────

/// How a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Real-time channel down: persistent banner, never retried.
    Connection,
    /// Backend answered `success: false`: one-shot notice with its detail.
    Logical,
    /// Non-OK status or malformed body: one-shot generic notice.
    Transport,
    /// Rejected before any request was issued.
    Validation,
}

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ClientError {
    /// The chat channel is closed, failed, or was never opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// WebSocket handshake failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The backend processed the call and reported `success: false`.
    #[error("{detail}")]
    Rejected { detail: String },

    /// Non-OK status, non-JSON body, or a body of the wrong shape.
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP / network failure (reqwest layer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON encoding failure on an outgoing payload.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client-side check failed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// Local filesystem failure (reading uploads, writing exports).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file or server URL is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl ClientError {
    pub fn rejected(detail: impl Into<String>) -> Self {
        Self::Rejected { detail: detail.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) | Self::WebSocket(_) => ErrorKind::Connection,
            Self::Rejected { .. } => ErrorKind::Logical,
            Self::Transport(_) | Self::Network(_) | Self::Serialization(_) => ErrorKind::Transport,
            Self::Validation(_) | Self::Io(_) | Self::Config(_) => ErrorKind::Validation,
        }
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Connection => CONNECTION_LOST.to_string(),
            ErrorKind::Transport => GENERIC_TRANSPORT_ERROR.to_string(),
            ErrorKind::Logical | ErrorKind::Validation => self.to_string(),
        }
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

pub type ClientResult<T> = Result<T, ClientError>;
