// DocChat Engine — Client configuration
//
// Resolution order (later wins):
//   1. built-in defaults
//   2. $CONFIG_DIR/docchat/config.toml (or an explicit --config path)
//   3. DOCCHAT_SERVER_URL
//   4. command-line flags (applied by the front-end)
//
// Server URLs are normalized once here: trailing slashes stripped,
// http:// assumed when no scheme is given, anything but http(s) rejected.

use crate::atoms::constants::{DEFAULT_LOG_FILTER, DEFAULT_SERVER_URL, SERVER_URL_ENV, WS_CHAT_PATH};
use crate::atoms::error::{ClientError, ClientResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    /// Directory exported transcripts are written to.
    pub export_dir: PathBuf,
    /// env_logger filter used when RUST_LOG is unset.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: DEFAULT_SERVER_URL.into(),
            export_dir: PathBuf::from("."),
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

/// `$CONFIG_DIR/docchat/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("docchat").join("config.toml"))
}

impl ClientConfig {
    /// Load from `path` (or the default location). A missing default file
    /// yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                config.server_url = url;
            }
        }
        config.server_url = normalize_server_url(&config.server_url)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("TOML parse error in {}: {}", path.display(), e)))?;
        info!("[config] Loaded {}", path.display());
        Ok(config)
    }

    pub fn with_server_url(mut self, raw: &str) -> ClientResult<Self> {
        self.server_url = normalize_server_url(raw)?;
        Ok(self)
    }

    /// `ws(s)://host[:port][/prefix]/ws/chat` for the configured server.
    pub fn ws_url(&self) -> ClientResult<String> {
        let mut url = Url::parse(&self.server_url)
            .map_err(|e| ClientError::Config(format!("Invalid server URL {}: {}", self.server_url, e)))?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| ClientError::Config(format!("Cannot derive WebSocket URL from {}", self.server_url)))?;
        let path = format!("{}{}", url.path().trim_end_matches('/'), WS_CHAT_PATH);
        url.set_path(&path);
        Ok(url.to_string())
    }
}

pub fn normalize_server_url(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::Config("Server URL is required.".into()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        warn!("[config] No URL scheme provided, assuming http://{}", trimmed);
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ClientError::Config(format!("Invalid server URL {}: {}", candidate, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(candidate),
        other => Err(ClientError::Config(format!(
            "Unsupported URL scheme '{}://'. Use http:// or https://.",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_slash_and_adds_scheme() {
        assert_eq!(normalize_server_url("localhost:8000/").unwrap(), "http://localhost:8000");
        assert_eq!(normalize_server_url(" https://chat.example.com// ").unwrap(), "https://chat.example.com");
    }

    #[test]
    fn normalize_rejects_other_schemes() {
        assert!(normalize_server_url("ftp://files.example.com").is_err());
        assert!(normalize_server_url("   ").is_err());
    }

    #[test]
    fn ws_url_follows_scheme() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.ws_url().unwrap(), "ws://127.0.0.1:8000/ws/chat");

        let cfg = ClientConfig::default().with_server_url("https://chat.example.com/app").unwrap();
        assert_eq!(cfg.ws_url().unwrap(), "wss://chat.example.com/app/ws/chat");
    }

    #[test]
    fn from_file_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server_url = \"http://10.0.0.5:9000\"\n").unwrap();
        let cfg = ClientConfig::from_file(&path).unwrap();
        assert_eq!(cfg.server_url, "http://10.0.0.5:9000");
        assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(cfg.export_dir, PathBuf::from("."));
    }

    #[test]
    fn missing_explicit_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn bad_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server_url = [").unwrap();
        assert!(matches!(ClientConfig::from_file(&path), Err(ClientError::Config(_))));
    }
}
