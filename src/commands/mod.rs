// DocChat Commands — declarative action table
//
// Typed input → Action (via BINDINGS) → exactly one controller method
// (via dispatch). Front-ends never call controllers ad hoc; adding a UI
// action means adding one row here and one match arm below.
//
//   plain text      → Action::Send
//   /name args...   → looked up in BINDINGS

use crate::atoms::error::{ClientError, ClientResult};
use crate::atoms::traits::Backend;
use crate::atoms::types::{ExportFile, UploadFile};
use crate::engine::client::ChatClient;
use crate::engine::groups::RenameOutcome;
use std::path::PathBuf;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(String),
    NewSession,
    ListSessions,
    Select(String),
    Rename { session_id: String, name: String },
    Delete { session_id: String, confirmed: bool },
    Archive(String),
    Unarchive(String),
    Export(String),
    ListGroups,
    ListFiles,
    CreateGroup { name: String, files: Vec<String> },
    RenameGroup { group_id: i64, name: String },
    EditGroup { group_id: i64, files: Vec<String> },
    DeleteGroup { group_id: i64, confirmed: bool },
    Filter(Vec<i64>),
    ClearFilter,
    Upload(Vec<PathBuf>),
    Help,
}

/// What the front-end should do after an action ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Exported(ExportFile),
    /// Destructive action held back; ask, then re-dispatch with `confirmed`.
    NeedsConfirmation(String),
    Help,
}

pub struct Binding {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    parse: fn(&[&str]) -> ClientResult<Action>,
}

pub const CONFIRM_FLAG: &str = "--yes";

fn usage(binding: &str) -> ClientError {
    let usage = BINDINGS
        .iter()
        .find(|b| b.name == binding)
        .map(|b| b.usage)
        .unwrap_or(binding);
    ClientError::validation(format!("Usage: {}", usage))
}

fn one_id(name: &'static str, args: &[&str]) -> ClientResult<String> {
    match args {
        [id] => Ok(id.to_string()),
        _ => Err(usage(name)),
    }
}

fn group_id(name: &'static str, raw: &str) -> ClientResult<i64> {
    raw.parse().map_err(|_| usage(name))
}

fn confirmed<'a>(args: &[&'a str]) -> (Vec<&'a str>, bool) {
    let yes = args.contains(&CONFIRM_FLAG);
    (args.iter().copied().filter(|a| *a != CONFIRM_FLAG).collect(), yes)
}

pub static BINDINGS: &[Binding] = &[
    Binding {
        name: "new",
        usage: "/new",
        summary: "start a new chat session",
        parse: |_| Ok(Action::NewSession),
    },
    Binding {
        name: "sessions",
        usage: "/sessions",
        summary: "refresh the session list",
        parse: |_| Ok(Action::ListSessions),
    },
    Binding {
        name: "select",
        usage: "/select <session-id>",
        summary: "open a session's transcript",
        parse: |args| one_id("select", args).map(Action::Select),
    },
    Binding {
        name: "rename",
        usage: "/rename <session-id> <new name>",
        summary: "rename a session",
        parse: |args| match args {
            [id, rest @ ..] if !rest.is_empty() => Ok(Action::Rename {
                session_id: id.to_string(),
                name: rest.join(" "),
            }),
            _ => Err(usage("rename")),
        },
    },
    Binding {
        name: "delete",
        usage: "/delete <session-id> [--yes]",
        summary: "delete a session",
        parse: |args| {
            let (rest, yes) = confirmed(args);
            one_id("delete", &rest).map(|id| Action::Delete { session_id: id, confirmed: yes })
        },
    },
    Binding {
        name: "archive",
        usage: "/archive <session-id>",
        summary: "move a session to the archive",
        parse: |args| one_id("archive", args).map(Action::Archive),
    },
    Binding {
        name: "unarchive",
        usage: "/unarchive <session-id>",
        summary: "restore an archived session",
        parse: |args| one_id("unarchive", args).map(Action::Unarchive),
    },
    Binding {
        name: "export",
        usage: "/export <session-id>",
        summary: "save a transcript as text",
        parse: |args| one_id("export", args).map(Action::Export),
    },
    Binding {
        name: "groups",
        usage: "/groups",
        summary: "list file groups",
        parse: |_| Ok(Action::ListGroups),
    },
    Binding {
        name: "files",
        usage: "/files",
        summary: "list uploaded files",
        parse: |_| Ok(Action::ListFiles),
    },
    Binding {
        name: "group-create",
        usage: "/group-create <name> <file>...",
        summary: "create a file group",
        parse: |args| match args {
            [name, files @ ..] => Ok(Action::CreateGroup {
                name: name.to_string(),
                files: files.iter().map(|f| f.to_string()).collect(),
            }),
            _ => Err(usage("group-create")),
        },
    },
    Binding {
        name: "group-rename",
        usage: "/group-rename <group-id> <new name>",
        summary: "rename a file group",
        parse: |args| match args {
            [id, rest @ ..] => Ok(Action::RenameGroup {
                group_id: group_id("group-rename", id)?,
                name: rest.join(" "),
            }),
            _ => Err(usage("group-rename")),
        },
    },
    Binding {
        name: "group-edit",
        usage: "/group-edit <group-id> <file>...",
        summary: "replace a group's files",
        parse: |args| match args {
            [id, files @ ..] => Ok(Action::EditGroup {
                group_id: group_id("group-edit", id)?,
                files: files.iter().map(|f| f.to_string()).collect(),
            }),
            _ => Err(usage("group-edit")),
        },
    },
    Binding {
        name: "group-delete",
        usage: "/group-delete <group-id> [--yes]",
        summary: "delete a file group",
        parse: |args| {
            let (rest, yes) = confirmed(args);
            match rest.as_slice() {
                [id] => Ok(Action::DeleteGroup { group_id: group_id("group-delete", id)?, confirmed: yes }),
                _ => Err(usage("group-delete")),
            }
        },
    },
    Binding {
        name: "filter",
        usage: "/filter <group-id>...",
        summary: "scope chat turns to file groups",
        parse: |args| {
            args.iter()
                .map(|a| group_id("filter", a))
                .collect::<ClientResult<Vec<_>>>()
                .map(Action::Filter)
        },
    },
    Binding {
        name: "unfilter",
        usage: "/unfilter",
        summary: "stop scoping chat turns",
        parse: |_| Ok(Action::ClearFilter),
    },
    Binding {
        name: "upload",
        usage: "/upload <path>...",
        summary: "upload documents (max 10, 500 MB total)",
        parse: |args| Ok(Action::Upload(args.iter().map(PathBuf::from).collect())),
    },
    Binding {
        name: "help",
        usage: "/help",
        summary: "show this table",
        parse: |_| Ok(Action::Help),
    },
];

/// Parse one line of input. Empty input yields `None`.
pub fn parse_line(line: &str) -> ClientResult<Option<Action>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Ok(Some(Action::Send(line.trim_end_matches(['\r', '\n']).to_string())));
    };
    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();
    let binding = BINDINGS
        .iter()
        .find(|b| b.name == name)
        .ok_or_else(|| ClientError::validation(format!("Unknown command /{}. Try /help.", name)))?;
    (binding.parse)(&args).map(Some)
}

pub fn help_text() -> String {
    let width = BINDINGS.iter().map(|b| b.usage.len()).max().unwrap_or(0);
    BINDINGS
        .iter()
        .map(|b| format!("  {:width$}  {}", b.usage, b.summary, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run one action against the client. Errors are returned, not surfaced;
/// the caller decides whether to `surface` them.
pub async fn dispatch<B: Backend>(
    client: &mut ChatClient<B>,
    action: Action,
    now: Instant,
) -> ClientResult<Outcome> {
    match action {
        Action::Send(text) => {
            client.send_message(&text, now)?;
        }
        Action::NewSession => {
            client.create_session();
        }
        Action::ListSessions => client.list_sessions().await?,
        Action::Select(id) => client.select_session(&id).await?,
        Action::Rename { session_id, name } => client.rename_session(&session_id, &name).await?,
        Action::Delete { session_id, confirmed: false } => {
            return Ok(Outcome::NeedsConfirmation(format!(
                "Delete session {}? This cannot be undone.",
                session_id
            )));
        }
        Action::Delete { session_id, confirmed: true } => client.delete_session(&session_id).await?,
        Action::Archive(id) => client.archive_session(&id).await?,
        Action::Unarchive(id) => client.unarchive_session(&id).await?,
        Action::Export(id) => return Ok(Outcome::Exported(client.export_session(&id).await?)),
        Action::ListGroups => client.list_groups().await?,
        Action::ListFiles => client.list_files().await?,
        Action::CreateGroup { name, files } => client.create_group(&name, &files).await?,
        Action::RenameGroup { group_id, name } => {
            if client.rename_group(group_id, &name).await? == RenameOutcome::Reverted {
                client.state_mut().view.notice("Group name unchanged.");
            }
        }
        Action::EditGroup { group_id, files } => {
            client.open_group_editor(group_id).await?.set_checked(files);
            client.submit_group_editor().await?;
        }
        Action::DeleteGroup { group_id, confirmed: false } => {
            return Ok(Outcome::NeedsConfirmation(format!(
                "Delete file group {}? This cannot be undone.",
                group_id
            )));
        }
        Action::DeleteGroup { group_id, confirmed: true } => client.delete_group(group_id).await?,
        Action::Filter(ids) => {
            client.open_filter().checked = ids.into_iter().collect();
            client.apply_filter()?;
        }
        Action::ClearFilter => client.clear_filter(),
        Action::Upload(paths) => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                files.push(UploadFile::from_path(path).await?);
            }
            client.upload_files(&files).await?;
        }
        Action::Help => return Ok(Outcome::Help),
    }
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::error::ErrorKind;
    use crate::engine::testing::{client_with_channel, MockBackend};
    use serde_json::json;

    #[test]
    fn every_binding_name_is_unique() {
        let mut names: Vec<_> = BINDINGS.iter().map(|b| b.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), BINDINGS.len());
    }

    #[test]
    fn plain_text_is_a_send() {
        assert_eq!(parse_line("hello there").unwrap(), Some(Action::Send("hello there".into())));
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn rename_joins_remaining_words() {
        assert_eq!(
            parse_line("/rename abc Q3 lease review").unwrap(),
            Some(Action::Rename { session_id: "abc".into(), name: "Q3 lease review".into() })
        );
    }

    #[test]
    fn delete_confirmation_flag() {
        assert_eq!(
            parse_line("/delete abc").unwrap(),
            Some(Action::Delete { session_id: "abc".into(), confirmed: false })
        );
        assert_eq!(
            parse_line("/delete --yes abc").unwrap(),
            Some(Action::Delete { session_id: "abc".into(), confirmed: true })
        );
    }

    #[test]
    fn bad_arguments_show_usage() {
        let err = parse_line("/select").unwrap_err();
        assert_eq!(err.to_string(), "Usage: /select <session-id>");
        let err = parse_line("/filter one").unwrap_err();
        assert_eq!(err.to_string(), "Usage: /filter <group-id>...");
    }

    #[test]
    fn unknown_command_is_validation_error() {
        assert_eq!(parse_line("/frobnicate").unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn help_lists_every_binding() {
        let help = help_text();
        for binding in BINDINGS {
            assert!(help.contains(binding.usage));
        }
    }

    #[tokio::test]
    async fn unconfirmed_delete_sends_nothing() {
        let (mut client, _) = client_with_channel(MockBackend::new());
        let outcome = dispatch(
            &mut client,
            Action::Delete { session_id: "s1".into(), confirmed: false },
            Instant::now(),
        )
        .await
        .unwrap();
        assert!(matches!(outcome, Outcome::NeedsConfirmation(_)));
        assert!(client.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn empty_filter_keeps_dialog_open() {
        let (mut client, _) = client_with_channel(MockBackend::new());
        let err = dispatch(&mut client, Action::Filter(vec![]), Instant::now()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(client.state().filter.is_some());
    }

    #[tokio::test]
    async fn export_returns_file() {
        let backend = MockBackend::new().route(
            "GET /chat_history?session_id=s1",
            json!([{"sender": "user", "message": "hi"}]),
        );
        let (mut client, _) = client_with_channel(backend);
        let outcome = dispatch(&mut client, Action::Export("s1".into()), Instant::now()).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Exported(ExportFile { file_name: "chat_s1.txt".into(), contents: "User: hi".into() })
        );
    }

    #[tokio::test]
    async fn edit_group_replaces_membership() {
        let backend = MockBackend::new()
            .route("GET /file_groups/4", json!({"id": 4, "group_name": "Memos", "files": ["a.txt"]}))
            .route("GET /existing_files", json!({"files": ["a.txt", "b.txt"]}))
            .route("GET /file_groups", json!([{"id": 4, "group_name": "Memos"}]));
        let (mut client, _) = client_with_channel(backend);
        dispatch(
            &mut client,
            Action::EditGroup { group_id: 4, files: vec!["b.txt".into()] },
            Instant::now(),
        )
        .await
        .unwrap();
        assert_eq!(
            client.backend().last_body("/update_file_group"),
            Some(json!({"group_id": 4, "group_name": "Memos", "file_names": ["b.txt"]}))
        );
    }

    #[tokio::test]
    async fn group_rename_works_without_prior_listing() {
        let backend = MockBackend::new().route("GET /file_groups", json!([{"id": 3, "group_name": "Leases"}]));
        let (mut client, _) = client_with_channel(backend);
        let outcome = dispatch(
            &mut client,
            Action::RenameGroup { group_id: 3, name: "Rentals".into() },
            Instant::now(),
        )
        .await
        .unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert_eq!(client.backend().count("POST /rename_file_group"), 1);
        assert_eq!(client.state().group(3).unwrap().name, "Rentals");
    }

    #[tokio::test]
    async fn send_through_dispatch_reaches_channel() {
        let (mut client, sent) = client_with_channel(MockBackend::new());
        dispatch(&mut client, Action::Send("question".into()), Instant::now()).await.unwrap();
        assert_eq!(sent.lock().len(), 1);
    }
}
