// ── DocChat Atoms: Constants ───────────────────────────────────────────────
// Named limits, user-facing texts and backend routes.

use std::time::Duration;

// ── Upload limits ──────────────────────────────────────────────────────────
// Checked client-side before any request is issued.
pub const MAX_UPLOAD_FILES: usize = 10;
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

// ── Pending-request guard ──────────────────────────────────────────────────
// Advisory only: expiry shows a warning, the in-flight turn is never cancelled.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

// ── Defaults ───────────────────────────────────────────────────────────────
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const SERVER_URL_ENV: &str = "DOCCHAT_SERVER_URL";

// ── User-facing texts ──────────────────────────────────────────────────────
pub const TIMEOUT_WARNING: &str = "The response is taking longer than expected.";
pub const CONNECTION_LOST: &str =
    "Connection to the chat server is unavailable. Restart the client to reconnect.";
pub const GENERIC_TRANSPORT_ERROR: &str = "An error occurred while contacting the server.";
pub const GENERIC_REJECTION: &str = "The server reported a failure.";
pub const NOTHING_TO_EXPORT: &str = "No data to export.";

// ── Backend routes ─────────────────────────────────────────────────────────
pub const WS_CHAT_PATH: &str = "/ws/chat";
pub const CHAT_HISTORY_PATH: &str = "/chat_history";
pub const ACTIVE_SESSIONS_PATH: &str = "/sessions/active";
pub const ARCHIVED_SESSIONS_PATH: &str = "/sessions/archived";
pub const RENAME_SESSION_PATH: &str = "/rename_session";
pub const DELETE_SESSION_PATH: &str = "/delete_session";
pub const ARCHIVE_SESSION_PATH: &str = "/archive_session";
pub const UNARCHIVE_SESSION_PATH: &str = "/unarchive_session";
pub const FILE_GROUPS_PATH: &str = "/file_groups";
pub const CREATE_GROUP_PATH: &str = "/create_file_group";
pub const RENAME_GROUP_PATH: &str = "/rename_file_group";
pub const UPDATE_GROUP_PATH: &str = "/update_file_group";
pub const DELETE_GROUP_PATH: &str = "/delete_file_group";
pub const EXISTING_FILES_PATH: &str = "/existing_files";
pub const UPLOAD_PATH: &str = "/upload";

/// Multipart field name used for every uploaded file.
pub const UPLOAD_FIELD: &str = "files";
