use std::io;
use std::path::{Path, PathBuf};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A constructor or key argument was rejected before touching the disk.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The resolved path does not exist.
    #[error("not found: {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other failure reported by the underlying filesystem call.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl StoreError {
    /// Classify a filesystem error raised while operating on `path`.
    ///
    /// `NotFound` errors keep their own variant; everything else is `Io`.
    /// The original error is always kept as the source.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path, source }
        } else {
            Self::Io { path, source }
        }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The underlying I/O error, if this error came from the filesystem.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::NotFound { source, .. } | Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
