use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{StoreConfig, SyncMode};
use crate::error::{StoreError, StoreResult};
use crate::key::relative_path;
use crate::traits::{DirEntry, ObjectStore};

/// Object store backed by plain files beneath a root directory.
///
/// Each key maps to `root/<normalized key>`. Writes create missing parent
/// directories; nothing else is cached or coordinated. The store holds no
/// state besides its immutable configuration, so it can be shared freely
/// across threads. Two writers racing on the same key race at the filesystem
/// level, and concurrent appends interleave according to the platform's
/// append-mode guarantees.
#[derive(Clone, Debug)]
pub struct DiskStore {
    config: StoreConfig,
}

impl DiskStore {
    /// Create a store rooted at `root` with default settings.
    ///
    /// The root directory is not created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::with_config(StoreConfig::new(root))
    }

    /// Create a store from an explicit configuration.
    pub fn with_config(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        debug!(root = %config.root.display(), "disk store opened");
        Ok(Self { config })
    }

    /// The root exactly as supplied at construction.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Map a key to its path beneath the root.
    pub fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        let relative = relative_path(key, self.config.confine_keys)?;
        Ok(self.config.root.join(relative))
    }

    /// Create the parent directory of `path` and all missing ancestors.
    /// An existing directory is not an error.
    fn ensure_parent(&self, path: &Path) -> StoreResult<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.config.dir_mode);
        }
        builder
            .create(parent)
            .map_err(|e| StoreError::from_io(parent, e))
    }

    fn write_file(&self, path: &Path, data: &[u8], append: bool) -> StoreResult<()> {
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.config.file_mode);
        }

        let io_err = |e| StoreError::from_io(path, e);
        let mut file = options.open(path).map_err(io_err)?;
        file.write_all(data).map_err(io_err)?;
        if matches!(self.config.sync_mode, SyncMode::EveryWrite) {
            file.sync_all().map_err(io_err)?;
        }
        Ok(())
    }

    fn read_path(path: &Path) -> StoreResult<Vec<u8>> {
        fs::read(path).map_err(|e| StoreError::from_io(path, e))
    }
}

impl ObjectStore for DiskStore {
    type Reader = File;

    fn upload_from_path(&self, source: &Path, key: &str) -> StoreResult<()> {
        let dest = self.resolve(key)?;
        // Read first so a missing source leaves no directories behind.
        let content = Self::read_path(source)?;
        self.ensure_parent(&dest)?;
        self.write_file(&dest, &content, false)?;
        debug!(key, source = %source.display(), len = content.len(), "uploaded file");
        Ok(())
    }

    fn upload_buffer(&self, data: &[u8], key: &str) -> StoreResult<()> {
        let dest = self.resolve(key)?;
        self.ensure_parent(&dest)?;
        self.write_file(&dest, data, false)?;
        debug!(key, len = data.len(), "uploaded buffer");
        Ok(())
    }

    fn append_buffer(&self, data: &[u8], key: &str) -> StoreResult<()> {
        let dest = self.resolve(key)?;
        self.ensure_parent(&dest)?;
        self.write_file(&dest, data, true)?;
        debug!(key, len = data.len(), "appended buffer");
        Ok(())
    }

    fn open_for_read(&self, key: &str) -> StoreResult<File> {
        let path = self.resolve(key)?;
        let io_err = |e| StoreError::from_io(&path, e);
        let file = File::open(&path).map_err(io_err)?;
        if file.metadata().map_err(io_err)?.is_dir() {
            return Err(io_err(io::Error::new(
                io::ErrorKind::IsADirectory,
                "is a directory",
            )));
        }
        debug!(key, "opened for read");
        Ok(file)
    }

    fn read_all(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.resolve(key)?;
        let content = Self::read_path(&path)?;
        debug!(key, len = content.len(), "read object");
        Ok(content)
    }

    fn download_to_path(&self, key: &str, dest: &Path) -> StoreResult<()> {
        let source = self.resolve(key)?;
        let content = Self::read_path(&source)?;
        self.write_file(dest, &content, false)?;
        debug!(key, dest = %dest.display(), len = content.len(), "downloaded object");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let relative = relative_path(key, self.config.confine_keys)?;
        if self.config.confine_keys && relative.as_os_str().is_empty() {
            return Err(StoreError::InvalidArgument(format!(
                "key resolves to the store root: {key:?}"
            )));
        }
        let path = self.config.root.join(relative);
        match fs::remove_file(&path) {
            Ok(()) => {}
            // Empty directories are removable too.
            Err(_) if path.is_dir() => {
                fs::remove_dir(&path).map_err(|e| StoreError::from_io(&path, e))?
            }
            Err(e) => return Err(StoreError::from_io(&path, e)),
        }
        debug!(key, "removed object");
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<DirEntry>> {
        let dir = self.resolve(prefix)?;
        let io_err = |e| StoreError::from_io(&dir, e);

        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let is_dir = entry.file_type().map_err(io_err)?.is_dir();
            // Keys are strings, so a name that is not UTF-8 cannot be addressed.
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(prefix, name = ?raw, "skipping non-UTF-8 entry");
                    continue;
                }
            };
            entries.push(DirEntry { name, is_dir });
        }
        debug!(prefix, count = entries.len(), "listed prefix");
        Ok(entries)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        let path = self.resolve(key)?;
        let exists = path.try_exists().map_err(|e| StoreError::from_io(&path, e))?;
        debug!(key, exists, "checked existence");
        Ok(exists)
    }
}
