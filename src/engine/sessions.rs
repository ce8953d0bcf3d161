// DocChat Engine — Session List Controller
//
// Sidebar of sessions in two groups (active / archived). Every mutating
// operation is one backend call followed by a local update; a failed call
// leaves state untouched and returns the error for the caller to surface.

use crate::atoms::constants::{
    ACTIVE_SESSIONS_PATH, ARCHIVED_SESSIONS_PATH, ARCHIVE_SESSION_PATH, CHAT_HISTORY_PATH,
    DELETE_SESSION_PATH, NOTHING_TO_EXPORT, RENAME_SESSION_PATH, UNARCHIVE_SESSION_PATH,
};
use crate::atoms::error::{ClientError, ClientResult};
use crate::atoms::traits::Backend;
use crate::atoms::types::{ExportFile, HistoryRecord, Message, SessionEntry, SessionRecord};
use crate::engine::client::ChatClient;
use crate::engine::view::ViewEvent;
use log::{info, warn};
use serde_json::json;

/// Fill `display_name` for unnamed entries from their 1-based position.
/// Positional, so numbers shift whenever the list changes.
pub fn renumber(entries: &mut [SessionEntry]) {
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.display_name = match &entry.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Chat {}", i + 1),
        };
    }
}

fn entries_from(records: Vec<SessionRecord>, archived: bool) -> Vec<SessionEntry> {
    let mut entries: Vec<SessionEntry> = records
        .into_iter()
        .map(|r| SessionEntry {
            id: r.session_id,
            name: r.session_name,
            archived,
            display_name: String::new(),
        })
        .collect();
    renumber(&mut entries);
    entries
}

/// `"<Sender>: <text>"` per message, one per line.
pub fn format_transcript(transcript: &[Message]) -> String {
    transcript
        .iter()
        .map(|m| format!("{}: {}", m.sender.label(), m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

impl<B: Backend> ChatClient<B> {
    /// New local session: top of the active list, selected, empty transcript.
    pub fn create_session(&mut self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.state.active.insert(
            0,
            SessionEntry { id: id.clone(), name: None, archived: false, display_name: String::new() },
        );
        renumber(&mut self.state.active);
        self.state.store.init(&id);
        self.state.current_session = Some(id.clone());
        self.state.view.clear();
        self.state.view.mark(ViewEvent::SessionsChanged);
        info!("[sessions] Created {}", id);
        id
    }

    pub async fn list_sessions(&mut self) -> ClientResult<()> {
        let active: Vec<SessionRecord> = self.fetch(ACTIVE_SESSIONS_PATH, &[]).await?;
        let archived: Vec<SessionRecord> = self.fetch(ARCHIVED_SESSIONS_PATH, &[]).await?;

        self.state.active = entries_from(active, false);
        self.state.archived = entries_from(archived, true);

        if self.state.active.is_empty() && self.state.archived.is_empty() {
            self.state.clear_current();
        }
        self.state.view.mark(ViewEvent::SessionsChanged);
        Ok(())
    }

    pub async fn fetch_transcript(&self, session_id: &str) -> ClientResult<Vec<Message>> {
        let records: Vec<HistoryRecord> =
            self.fetch(CHAT_HISTORY_PATH, &[("session_id", session_id)]).await?;
        records.into_iter().map(Message::try_from).collect()
    }

    /// Replace the view with the session's fetched transcript and make it
    /// current. If the fetch fails but a cached transcript exists, that is
    /// shown instead and the error still returned.
    pub async fn select_session(&mut self, session_id: &str) -> ClientResult<()> {
        match self.fetch_transcript(session_id).await {
            Ok(transcript) => {
                self.state.store.replace(session_id, transcript.clone());
                self.state.view.replace(transcript);
                self.state.current_session = Some(session_id.to_string());
                Ok(())
            }
            Err(e) => {
                if let Some(cached) = self.state.store.get(session_id).map(<[Message]>::to_vec) {
                    warn!("[sessions] History fetch failed for {}, showing cache: {}", session_id, e);
                    self.state.view.replace(cached);
                    self.state.current_session = Some(session_id.to_string());
                }
                Err(e)
            }
        }
    }

    pub async fn rename_session(&mut self, session_id: &str, new_name: &str) -> ClientResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ClientError::validation("Session name cannot be empty."));
        }
        self.post_checked(
            RENAME_SESSION_PATH,
            &json!({ "session_id": session_id, "new_name": new_name }),
        )
        .await?;

        if let Some(entry) = self.state.session_mut(session_id) {
            entry.name = Some(new_name.to_string());
            entry.display_name = new_name.to_string();
        }
        self.state.view.mark(ViewEvent::SessionsChanged);
        info!("[sessions] Renamed {} to {:?}", session_id, new_name);
        Ok(())
    }

    pub async fn delete_session(&mut self, session_id: &str) -> ClientResult<()> {
        self.post_checked(DELETE_SESSION_PATH, &json!({ "session_id": session_id })).await?;

        self.state.active.retain(|s| s.id != session_id);
        self.state.archived.retain(|s| s.id != session_id);
        self.state.store.remove(session_id);
        if self.state.is_current(session_id) {
            self.state.clear_current();
        }
        self.state.view.mark(ViewEvent::SessionsChanged);
        info!("[sessions] Deleted {}", session_id);
        Ok(())
    }

    pub async fn archive_session(&mut self, session_id: &str) -> ClientResult<()> {
        self.post_checked(ARCHIVE_SESSION_PATH, &json!({ "session_id": session_id })).await?;
        if self.state.is_current(session_id) {
            self.state.clear_current();
        }
        self.list_sessions().await
    }

    pub async fn unarchive_session(&mut self, session_id: &str) -> ClientResult<()> {
        self.post_checked(UNARCHIVE_SESSION_PATH, &json!({ "session_id": session_id })).await?;
        self.list_sessions().await
    }

    pub async fn export_session(&self, session_id: &str) -> ClientResult<ExportFile> {
        let transcript = self.fetch_transcript(session_id).await?;
        if transcript.is_empty() {
            return Err(ClientError::validation(NOTHING_TO_EXPORT));
        }
        Ok(ExportFile {
            file_name: format!("chat_{}.txt", session_id),
            contents: format_transcript(&transcript),
        })
    }
}
