//! Bridge configuration.
//!
//! Read from `filebridge.json` in the app config directory when present.
//! Every field has a default so a partial file is enough.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::types::ApiError;

/// File name looked up in the app config directory
pub const CONFIG_FILE_NAME: &str = "filebridge.json";

/// Environment variable overriding the workspace root
pub const ENV_WORKSPACE_ROOT: &str = "FILEBRIDGE_WORKSPACE_ROOT";

pub const DEFAULT_MAX_READ_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Directory every bridged path is scoped to. `None` means the caller picks.
    pub workspace_root: Option<PathBuf>,
    /// Largest file `read_file` will return
    pub max_read_bytes: u64,
    /// Emit a `FileUpdate` on the `update` channel after each successful write
    pub notify_on_write: bool,
    /// Log level for the desktop logger (`error`..`trace`)
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
            notify_on_write: true,
            log_level: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load from a JSON file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ApiError::IoError {
                    message: format!("Failed to read config '{}': {e}", path.display()),
                })
            }
        };

        let config: Self = serde_json::from_str(&raw).map_err(|e| ApiError::InvalidInput {
            message: format!("Invalid config '{}': {e}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var_os(key))
    }

    /// Apply overrides read through `lookup`. An empty value is ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        if let Some(root) = lookup(ENV_WORKSPACE_ROOT) {
            if !root.is_empty() {
                self.workspace_root = Some(PathBuf::from(root));
            }
        }
        self
    }

    /// Parsed log level, `Info` when the configured value is unknown.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level
            .trim()
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.max_read_bytes == 0 {
            return Err(ApiError::InvalidInput {
                message: "maxReadBytes must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
