// DocChat Engine — File Group Controller
//
// Named, server-persisted sets of uploaded file names. Two transient
// dialogs live on AppState:
//   GroupEditor  — checklist over the full file universe; submit replaces
//                  the group's whole membership
//   FilterDialog — multi-select of groups that scope the next chat turns

use crate::atoms::constants::{
    CREATE_GROUP_PATH, DELETE_GROUP_PATH, EXISTING_FILES_PATH, FILE_GROUPS_PATH, RENAME_GROUP_PATH,
    UPDATE_GROUP_PATH,
};
use crate::atoms::error::{ClientError, ClientResult};
use crate::atoms::traits::Backend;
use crate::atoms::types::{FileGroup, FileListing};
use crate::engine::client::ChatClient;
use crate::engine::view::ViewEvent;
use log::info;
use serde_json::json;
use std::collections::BTreeSet;

// ── Dialogs ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEditor {
    pub group_id: i64,
    /// Sent back unchanged on submit.
    pub name: String,
    pub universe: BTreeSet<String>,
    pub checked: Vec<String>,
}

impl GroupEditor {
    pub fn toggle(&mut self, file: &str) {
        if self.checked.iter().any(|f| f == file) {
            self.checked.retain(|f| f != file);
        } else {
            self.checked.push(file.to_string());
        }
    }

    pub fn set_checked<I: IntoIterator<Item = String>>(&mut self, files: I) {
        self.checked = files.into_iter().collect();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterDialog {
    pub options: Vec<(i64, String)>,
    pub checked: BTreeSet<i64>,
}

impl FilterDialog {
    pub fn toggle(&mut self, group_id: i64) {
        if !self.checked.remove(&group_id) {
            self.checked.insert(group_id);
        }
    }
}

/// Outcome of an inline rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// Empty or unchanged input: the old name stays and nothing is sent.
    Reverted,
}

impl<B: Backend> ChatClient<B> {
    pub async fn list_groups(&mut self) -> ClientResult<()> {
        self.state.groups = self.fetch(FILE_GROUPS_PATH, &[]).await?;
        self.state.view.mark(ViewEvent::GroupsChanged);
        Ok(())
    }

    /// Refresh the known-files set from the backend.
    pub async fn list_files(&mut self) -> ClientResult<()> {
        let listing: FileListing = self.fetch(EXISTING_FILES_PATH, &[]).await?;
        self.state.merge_known_files(listing.into_names());
        Ok(())
    }

    pub async fn create_group(&mut self, name: &str, files: &[String]) -> ClientResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::validation("Group name cannot be empty."));
        }
        if files.is_empty() {
            return Err(ClientError::validation("Select at least one file for the group."));
        }
        self.post_checked(
            CREATE_GROUP_PATH,
            &json!({ "group_name": name, "file_names": files }),
        )
        .await?;
        info!("[groups] Created {:?} with {} files", name, files.len());
        self.list_groups().await
    }

    pub async fn rename_group(&mut self, group_id: i64, new_name: &str) -> ClientResult<RenameOutcome> {
        let new_name = new_name.trim();
        if self.state.group(group_id).is_none() {
            self.list_groups().await?;
        }
        let current = self
            .state
            .group(group_id)
            .map(|g| g.name.clone())
            .ok_or_else(|| ClientError::validation(format!("Unknown file group {}.", group_id)))?;
        if new_name.is_empty() || new_name == current {
            return Ok(RenameOutcome::Reverted);
        }

        self.post_checked(
            RENAME_GROUP_PATH,
            &json!({ "group_id": group_id, "new_name": new_name }),
        )
        .await?;

        if let Some(group) = self.state.groups.iter_mut().find(|g| g.id == group_id) {
            group.name = new_name.to_string();
        }
        self.state.view.mark(ViewEvent::GroupsChanged);
        Ok(RenameOutcome::Renamed)
    }

    /// Fetch membership and the file universe, then open the checklist.
    pub async fn open_group_editor(&mut self, group_id: i64) -> ClientResult<&mut GroupEditor> {
        let group: FileGroup = self.fetch(&format!("{}/{}", FILE_GROUPS_PATH, group_id), &[]).await?;
        self.list_files().await?;

        let mut universe = self.state.known_files.clone();
        universe.extend(group.files.iter().cloned());
        Ok(self.state.group_editor.insert(GroupEditor {
            group_id,
            name: group.name,
            universe,
            checked: group.files,
        }))
    }

    /// Replace the group's full membership with the checked files.
    pub async fn submit_group_editor(&mut self) -> ClientResult<()> {
        let editor = self
            .state
            .group_editor
            .clone()
            .ok_or_else(|| ClientError::validation("No file group is being edited."))?;
        self.post_checked(
            UPDATE_GROUP_PATH,
            &json!({
                "group_id": editor.group_id,
                "group_name": editor.name,
                "file_names": editor.checked,
            }),
        )
        .await?;
        self.state.group_editor = None;
        info!("[groups] Updated group {} ({} files)", editor.group_id, editor.checked.len());
        self.list_groups().await
    }

    pub async fn delete_group(&mut self, group_id: i64) -> ClientResult<()> {
        self.post_checked(DELETE_GROUP_PATH, &json!({ "group_id": group_id })).await?;
        self.state.selected_group_ids.retain(|id| *id != group_id);
        info!("[groups] Deleted group {}", group_id);
        self.list_groups().await
    }

    // ── Query scoping ──────────────────────────────────────────────────

    pub fn open_filter(&mut self) -> &mut FilterDialog {
        let dialog = FilterDialog {
            options: self.state.groups.iter().map(|g| (g.id, g.name.clone())).collect(),
            checked: self.state.selected_group_ids.iter().copied().collect(),
        };
        self.state.filter.insert(dialog)
    }

    /// Record the checked groups and close the dialog. An empty selection
    /// is rejected and the dialog stays open.
    pub fn apply_filter(&mut self) -> ClientResult<&[i64]> {
        let dialog = self
            .state
            .filter
            .as_ref()
            .ok_or_else(|| ClientError::validation("The group filter is not open."))?;
        if dialog.checked.is_empty() {
            return Err(ClientError::validation("Select at least one file group."));
        }
        self.state.selected_group_ids = dialog.checked.iter().copied().collect();
        self.state.filter = None;
        Ok(&self.state.selected_group_ids)
    }

    pub fn clear_filter(&mut self) {
        self.state.selected_group_ids.clear();
        self.state.filter = None;
    }
}
