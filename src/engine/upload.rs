// DocChat Engine — Upload Controller
//
// Client-side limits are checked first; nothing is sent when they fail.
// A passing batch goes out as one multipart request. The busy indicator
// is cleared whatever the outcome.

use crate::atoms::constants::{MAX_UPLOAD_BYTES, MAX_UPLOAD_FILES, UPLOAD_PATH};
use crate::atoms::error::{ClientError, ClientResult};
use crate::atoms::traits::Backend;
use crate::atoms::types::UploadFile;
use crate::engine::client::{decode_reply, ChatClient};
use log::info;
use std::path::Path;

const MIB: u64 = 1024 * 1024;

impl UploadFile {
    /// Name and size from the filesystem.
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await?;
        if !meta.is_file() {
            return Err(ClientError::validation(format!("{} is not a file.", path.display())));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ClientError::validation(format!("{} has no file name.", path.display())))?;
        Ok(UploadFile { path: path.to_path_buf(), name, size: meta.len() })
    }
}

pub fn validate(files: &[UploadFile]) -> ClientResult<()> {
    if files.is_empty() {
        return Err(ClientError::validation("Select at least one file to upload."));
    }
    if files.len() > MAX_UPLOAD_FILES {
        return Err(ClientError::validation(format!(
            "You can upload at most {} files at a time ({} selected).",
            MAX_UPLOAD_FILES,
            files.len()
        )));
    }
    if let Some(big) = files.iter().find(|f| f.size > MAX_UPLOAD_BYTES) {
        return Err(ClientError::validation(format!(
            "{} exceeds the {} MB per-file limit.",
            big.name,
            MAX_UPLOAD_BYTES / MIB
        )));
    }
    let total: u64 = files.iter().map(|f| f.size).sum();
    if total > MAX_UPLOAD_BYTES {
        return Err(ClientError::validation(format!(
            "Selected files total {} MB, above the {} MB limit.",
            total.div_ceil(MIB),
            MAX_UPLOAD_BYTES / MIB
        )));
    }
    Ok(())
}

impl<B: Backend> ChatClient<B> {
    /// Validate and upload; returns the file names the backend accepted.
    pub async fn upload_files(&mut self, files: &[UploadFile]) -> ClientResult<Vec<String>> {
        validate(files)?;

        self.state.view.set_busy(true);
        let outcome = match self.backend.upload(UPLOAD_PATH, files).await {
            Ok(body) => decode_reply(UPLOAD_PATH, body),
            Err(e) => Err(e),
        };
        self.state.view.set_busy(false);

        let reply = outcome?;
        let names = reply.file_names();
        let added = self.state.merge_known_files(names.iter().cloned());
        if let Some(editor) = self.state.group_editor.as_mut() {
            editor.universe.extend(names.iter().cloned());
        }
        info!("[upload] {} files accepted, {} new", names.len(), added);
        self.state.view.notice(format!("Uploaded {} file(s).", names.len()));
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::error::ErrorKind;
    use crate::engine::groups::GroupEditor;
    use crate::engine::testing::MockBackend;
    use crate::engine::view::ViewEvent;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn file(name: &str, size: u64) -> UploadFile {
        UploadFile { path: name.into(), name: name.into(), size }
    }

    #[test]
    fn eleven_files_rejected() {
        let files: Vec<_> = (0..11).map(|i| file(&format!("f{}.pdf", i), 10)).collect();
        assert_eq!(validate(&files).unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn ten_small_files_accepted() {
        let files: Vec<_> = (0..10).map(|i| file(&format!("f{}.pdf", i), 40 * MIB)).collect();
        assert!(validate(&files).is_ok());
    }

    #[test]
    fn single_oversized_file_rejected() {
        let err = validate(&[file("huge.pdf", MAX_UPLOAD_BYTES + 1)]).unwrap_err();
        assert!(err.to_string().contains("huge.pdf"));
    }

    #[test]
    fn aggregate_over_limit_rejected() {
        let files = vec![file("a.pdf", 300 * MIB), file("b.pdf", 300 * MIB)];
        assert!(validate(&files).unwrap_err().to_string().contains("total"));
    }

    #[test]
    fn exactly_at_limit_accepted() {
        assert!(validate(&[file("edge.pdf", MAX_UPLOAD_BYTES)]).is_ok());
    }

    #[tokio::test]
    async fn ten_file_batch_goes_out_in_one_request() {
        let mut client = ChatClient::new(MockBackend::new());
        let files: Vec<_> = (0..10).map(|i| file(&format!("f{}.pdf", i), 40 * MIB)).collect();
        let names = client.upload_files(&files).await.unwrap();
        assert_eq!(names.len(), 10);
        assert_eq!(client.backend().calls(), vec!["UPLOAD /upload".to_string()]);
        assert_eq!(client.state().known_files.len(), 10);
    }

    #[tokio::test]
    async fn rejected_batch_sends_no_request() {
        let mut client = ChatClient::new(MockBackend::new());
        let files: Vec<_> = (0..11).map(|i| file(&format!("f{}", i), 1)).collect();
        assert!(client.upload_files(&files).await.is_err());
        assert!(client.backend().calls().is_empty());
        assert!(!client.state().view.busy());
    }

    #[tokio::test]
    async fn success_merges_names_and_refreshes_editor() {
        let mut client = ChatClient::new(MockBackend::new());
        client.state_mut().known_files.insert("a.pdf".into());
        client.state_mut().group_editor = Some(GroupEditor {
            group_id: 1,
            name: "Leases".into(),
            universe: BTreeSet::new(),
            checked: vec![],
        });

        let names = client.upload_files(&[file("a.pdf", 5), file("b.pdf", 5)]).await.unwrap();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
        assert_eq!(client.state().known_files.len(), 2);
        let editor = client.state().group_editor.as_ref().unwrap();
        assert!(editor.universe.contains("b.pdf"));

        let events = client.drain_events();
        assert!(events.contains(&ViewEvent::Busy(true)));
        assert!(events.contains(&ViewEvent::Busy(false)));
        assert!(!client.state().view.busy());
    }

    #[tokio::test]
    async fn failure_surfaces_detail_and_clears_busy() {
        let backend = MockBackend::new().route(
            "UPLOAD /upload",
            json!({"success": false, "message": "Unsupported file type"}),
        );
        let mut client = ChatClient::new(backend);
        let err = client.upload_files(&[file("x.exe", 5)]).await.unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type");
        assert!(!client.state().view.busy());
        assert!(client.state().known_files.is_empty());
    }

    #[tokio::test]
    async fn transport_exception_clears_busy() {
        let backend = MockBackend::new();
        backend.fail("UPLOAD /upload");
        let mut client = ChatClient::new(backend);
        let err = client.upload_files(&[file("a.pdf", 5)]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!client.state().view.busy());
    }

    #[tokio::test]
    async fn from_path_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"twelve bytes").unwrap();
        let upload = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(upload.name, "notes.txt");
        assert_eq!(upload.size, 12);
    }
}
