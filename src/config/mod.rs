//! Daemon configuration.
//!
//! Runtime switches come from CLI flags and environment variables; the
//! admin credential, session lifetime, and media base path live in an
//! optional `config.toml` inside the data directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// The name of the folio data folder under the home directory.
pub const FOLIO_FOLDER: &str = ".folio";

/// The name of the config file inside the data directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn default_admin_uid() -> String {
    "admin".to_string()
}

/// Five days, matching the session cookie lifetime of the admin UI.
fn default_session_ttl_hours() -> i64 {
    120
}

fn default_public_base() -> String {
    "/media".to_string()
}

/// Admin credential and session settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Credential accepted by the identity provider. With no credential
    /// configured, every sign-in is rejected.
    #[serde(default)]
    pub admin_token: Option<String>,
    #[serde(default = "default_admin_uid")]
    pub admin_uid: String,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_token: None,
            admin_uid: default_admin_uid(),
            admin_email: None,
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

/// Media serving settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaConfig {
    /// Public base path (or absolute URL) media URLs are built from.
    #[serde(default = "default_public_base")]
    pub public_base: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            public_base: default_public_base(),
        }
    }
}

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

impl AppConfig {
    /// Default configuration rooted at the given data directory.
    #[must_use]
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Self::default()
        }
    }
}

/// Resolve the data directory.
///
/// Priority: explicit override, then the `FOLIO_HOME` environment
/// variable (used by tests and CI to stay off the real `~/.folio`),
/// then `~/.folio`.
#[must_use]
pub fn data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    if let Ok(folio_home) = std::env::var("FOLIO_HOME") {
        return PathBuf::from(folio_home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(FOLIO_FOLDER)
}

/// Load `config.toml` from the data directory.
///
/// Returns defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or
/// parsed.
pub fn load_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILENAME);
    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(AppConfig::with_data_dir(data_dir.to_path_buf()));
    }
    let content = std::fs::read_to_string(&path)?;
    let mut config: AppConfig = toml::from_str(&content)?;
    config.data_dir = data_dir.to_path_buf();
    if config.auth.admin_token.is_none() {
        warn!("No admin token configured; mutating endpoints will reject every session");
    }
    debug!("Loaded config from {}", path.display());
    Ok(config)
}
