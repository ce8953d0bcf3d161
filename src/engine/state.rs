// engine/state.rs — The application state object.
// Owned by ChatClient and handed to controllers by `&mut`; no ambient globals.

use crate::atoms::types::{FileGroup, SessionEntry};
use crate::engine::groups::{FilterDialog, GroupEditor};
use crate::engine::guard::PendingGuard;
use crate::engine::store::SessionStore;
use crate::engine::view::ChatView;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct AppState {
    /// At most one session is current; the view mirrors its transcript.
    pub current_session: Option<String>,
    /// File groups that scope the next chat turns.
    pub selected_group_ids: Vec<i64>,
    pub store: SessionStore,
    pub active: Vec<SessionEntry>,
    pub archived: Vec<SessionEntry>,
    pub groups: Vec<FileGroup>,
    pub known_files: BTreeSet<String>,
    pub group_editor: Option<GroupEditor>,
    pub filter: Option<FilterDialog>,
    pub view: ChatView,
    pub guard: PendingGuard,
}

impl AppState {
    pub fn is_current(&self, session_id: &str) -> bool {
        self.current_session.as_deref() == Some(session_id)
    }

    /// Drop the current-session pointer and the transcript shown for it.
    pub fn clear_current(&mut self) {
        if self.current_session.take().is_some() {
            self.view.clear();
        }
    }

    pub fn session(&self, session_id: &str) -> Option<&SessionEntry> {
        self.active.iter().chain(self.archived.iter()).find(|s| s.id == session_id)
    }

    pub fn session_mut(&mut self, session_id: &str) -> Option<&mut SessionEntry> {
        self.active
            .iter_mut()
            .chain(self.archived.iter_mut())
            .find(|s| s.id == session_id)
    }

    pub fn group(&self, group_id: i64) -> Option<&FileGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Merge names into the known-files set; returns how many were new.
    pub fn merge_known_files<I: IntoIterator<Item = String>>(&mut self, names: I) -> usize {
        names.into_iter().filter(|n| self.known_files.insert(n.clone())).count()
    }
}
