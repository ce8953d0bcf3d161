// ── DocChat Atoms: Data & Wire Types ──────────────────────────────────────────
// Plain structs/enums shared by the engine and front-ends.
// Wire records mirror the backend's JSON; domain types are what the
// controllers store and render.

use crate::atoms::constants::GENERIC_REJECTION;
use crate::atoms::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

// ── Messages ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Label used in rendered bubbles and exported transcripts.
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Bot => "Bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Message { sender: Sender::User, text: text.into(), timestamp: None }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Message { sender: Sender::Bot, text: text.into(), timestamp: None }
    }

    pub fn stamped(mut self) -> Self {
        self.timestamp = Some(chrono::Utc::now().to_rfc3339());
        self
    }
}

/// One row of `/chat_history`. Two field spellings exist in the wild:
/// `sender`/`message` and `is_user_message`/`message_text`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub is_user_message: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl TryFrom<HistoryRecord> for Message {
    type Error = ClientError;

    fn try_from(record: HistoryRecord) -> ClientResult<Self> {
        let sender = match (record.is_user_message, record.sender.as_deref()) {
            (Some(true), _) => Sender::User,
            (Some(false), _) => Sender::Bot,
            (None, Some(s)) if s.eq_ignore_ascii_case("user") => Sender::User,
            (None, Some(_)) => Sender::Bot,
            (None, None) => return Err(ClientError::transport("history entry has no sender")),
        };
        let text = record
            .message
            .or(record.message_text)
            .ok_or_else(|| ClientError::transport("history entry has no message text"))?;
        Ok(Message { sender, text, timestamp: record.timestamp })
    }
}

// ── Sessions ───────────────────────────────────────────────────────────────

/// One row of `/sessions/active` or `/sessions/archived`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    #[serde(default)]
    pub session_name: Option<String>,
}

/// A sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEntry {
    pub id: String,
    pub name: Option<String>,
    pub archived: bool,
    /// Stored name, or `Chat N` from the entry's position in its list.
    pub display_name: String,
}

/// Outgoing frame on the chat channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
    pub group_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

// ── File groups ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileGroup {
    pub id: i64,
    #[serde(rename = "group_name")]
    pub name: String,
    #[serde(default, alias = "file_names")]
    pub files: Vec<String>,
}

/// `/existing_files` answers either a bare list or `{ "files": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FileListing {
    Bare(Vec<String>),
    Wrapped { files: Vec<String> },
}

impl FileListing {
    pub fn into_names(self) -> Vec<String> {
        match self {
            FileListing::Bare(names) | FileListing::Wrapped { files: names } => names,
        }
    }
}

// ── Uploads ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

// ── Mutating-call envelope ─────────────────────────────────────────────────

/// `{ success, error?, details?, message? }` returned by every mutating call.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiReply {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl ApiReply {
    /// Branch on `success`; a failure keeps the backend's detail verbatim.
    pub fn into_result(self) -> ClientResult<Self> {
        if self.success {
            return Ok(self);
        }
        let detail = self
            .error
            .clone()
            .or_else(|| self.details.as_ref().and_then(details_text))
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());
        Err(ClientError::rejected(detail))
    }

    /// File names reported in `details` (strings or `{file_name|filename|name}`
    /// records) plus the single-file `filename` field.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match &self.details {
            Some(Value::Array(items)) => items.iter().filter_map(detail_name).collect(),
            Some(other) => detail_name(other).into_iter().collect(),
            None => Vec::new(),
        };
        if let Some(single) = &self.filename {
            names.push(single.clone());
        }
        names
    }
}

fn detail_name(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ["file_name", "filename", "name"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

fn details_text(details: &Value) -> Option<String> {
    match details {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => Some(other.to_string()),
    }
}
