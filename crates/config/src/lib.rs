//! Connection settings for the DX explorer.
//!
//! The explorer persists the operator's server, API path, OAuth client, and
//! credentials in a small JSON file. This crate owns that file's shape and
//! its validation; nothing here touches the network.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default file name the explorer saves its settings under.
pub const CONFIG_FILE_NAME: &str = "dx_api_explorer_config.json";

/// Number of selectable font sizes; `font_index` must stay below this.
pub const FONT_SIZE_COUNT: i32 = 6;

/// Errors that can occur when loading, validating, or saving a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON deserialization or serialization failed.
    #[error("invalid config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Reading or writing the settings file failed.
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Operator connection settings.
///
/// `server`, `dx_api_path`, and `token_endpoint` are required in the JSON;
/// credentials may be left out and filled in interactively.
///
/// # Example
/// ```
/// let cfg = dx_explorer_config::ExplorerConfig {
///     server: "https://cases.example.com".into(),
///     dx_api_path: "/prweb/api/application/v2".into(),
///     token_endpoint: "/prweb/PRRestService/oauth2/v1/token".into(),
///     ..Default::default()
/// };
/// assert!(dx_explorer_config::validate(&cfg).is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Operator login name.
    #[serde(default)]
    pub user_id: String,
    /// Operator password.
    #[serde(default)]
    pub password: String,
    /// Scheme and host of the case-management server (e.g. `"https://host:8443"`).
    pub server: String,
    /// Path prefix of the DX API (e.g. `"/prweb/api/application/v2"`).
    pub dx_api_path: String,
    /// Path of the OAuth 2 token endpoint.
    pub token_endpoint: String,
    /// OAuth 2 client id.
    #[serde(default)]
    pub client_id: String,
    /// OAuth 2 client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Selected font size index; `-1` picks a size from the screen width.
    #[serde(default = "auto_font_index")]
    pub font_index: i32,
}

fn auto_font_index() -> i32 {
    -1
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            password: String::new(),
            server: String::new(),
            dx_api_path: String::new(),
            token_endpoint: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            font_index: auto_font_index(),
        }
    }
}

impl ExplorerConfig {
    /// Full URL of the token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}{}", self.server, self.token_endpoint)
    }

    /// True once both halves of the OAuth client and the operator
    /// credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.user_id.is_empty()
    }
}

/// Check structural rules on an already-deserialized configuration:
/// - `server` must be non-empty and start with `http://` or `https://`
/// - `dx_api_path` and `token_endpoint` must start with `/`
/// - `font_index` must be `-1` or a valid font size index
pub fn validate(cfg: &ExplorerConfig) -> Result<(), ConfigError> {
    let server = cfg.server.trim();
    if server.is_empty() {
        return Err(ConfigError::InvalidField {
            field: "server".into(),
            reason: "must not be empty".into(),
        });
    }
    if !(server.starts_with("http://") || server.starts_with("https://")) {
        return Err(ConfigError::InvalidField {
            field: "server".into(),
            reason: format!("{server:?} must start with http:// or https://"),
        });
    }
    for (field, value) in [
        ("dx_api_path", &cfg.dx_api_path),
        ("token_endpoint", &cfg.token_endpoint),
    ] {
        if !value.starts_with('/') {
            return Err(ConfigError::InvalidField {
                field: field.into(),
                reason: format!("{value:?} must start with '/'"),
            });
        }
    }
    if cfg.font_index < -1 || cfg.font_index >= FONT_SIZE_COUNT {
        return Err(ConfigError::InvalidField {
            field: "font_index".into(),
            reason: format!(
                "{} is outside -1..={}",
                cfg.font_index,
                FONT_SIZE_COUNT - 1
            ),
        });
    }
    Ok(())
}

/// Load and validate an [`ExplorerConfig`] from a JSON string.
pub fn load_config_from_str(s: &str) -> Result<ExplorerConfig, ConfigError> {
    let cfg: ExplorerConfig = serde_json::from_str(s)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Load and validate an [`ExplorerConfig`] from a file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ExplorerConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    load_config_from_str(&text)
}

/// Write a configuration as pretty JSON with a 2-space indent.
pub fn save_config(path: impl AsRef<Path>, cfg: &ExplorerConfig) -> Result<(), ConfigError> {
    let mut text = serde_json::to_string_pretty(cfg)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}
