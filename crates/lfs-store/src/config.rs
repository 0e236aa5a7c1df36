use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default creation mode for written files (before umask).
pub const DEFAULT_FILE_MODE: u32 = 0o666;

/// Default creation mode for created directories (before umask).
pub const DEFAULT_DIR_MODE: u32 = 0o777;

/// Flush strategy after a write completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` every written file before returning.
    EveryWrite,
    /// Rely on OS page-cache buffering.
    #[default]
    OsDefault,
}

/// Configuration for a [`DiskStore`](crate::DiskStore).
///
/// Loadable from TOML:
///
/// ```toml
/// root = "/var/lib/lfs"
/// file_mode = 0o644
/// sync_mode = "every_write"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory all keys resolve under.
    pub root: PathBuf,
    /// Unix mode for files created by uploads, appends and downloads.
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
    /// Unix mode for directories created on demand.
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,
    #[serde(default)]
    pub sync_mode: SyncMode,
    /// Reject keys whose `..` segments would climb above `root`.
    #[serde(default = "default_confine_keys")]
    pub confine_keys: bool,
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}

fn default_dir_mode() -> u32 {
    DEFAULT_DIR_MODE
}

fn default_confine_keys() -> bool {
    true
}

impl StoreConfig {
    /// Default configuration bound to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            sync_mode: SyncMode::default(),
            confine_keys: true,
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::from_io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Fails with [`StoreError::InvalidArgument`] when `root` is empty.
    pub fn validate(&self) -> StoreResult<()> {
        if self.root.as_os_str().is_empty() {
            return Err(StoreError::InvalidArgument(
                "store root must not be empty".into(),
            ));
        }
        Ok(())
    }
}
