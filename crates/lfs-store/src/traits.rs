use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// A direct child of a listed prefix.
///
/// `name` is always valid UTF-8; children whose names are not are skipped
/// by [`DiskStore::list`](crate::DiskStore), since no key can address them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }
}

/// Key-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Writes create any missing parent "directories" of the key.
/// - Every call is synchronous and self-contained; nothing is cached.
/// - Concurrent writers to the same key are not coordinated. Ordering and
///   atomicity across them is the caller's responsibility.
/// - Failures are returned immediately. Nothing is retried or rolled back.
pub trait ObjectStore: Send + Sync {
    /// Readable handle returned by [`ObjectStore::open_for_read`].
    type Reader: Read + Send;

    /// Copy the local file at `source` into `key`, replacing any previous
    /// content.
    fn upload_from_path(&self, source: &Path, key: &str) -> StoreResult<()>;

    /// Store `data` under `key`, replacing any previous content.
    fn upload_buffer(&self, data: &[u8], key: &str) -> StoreResult<()>;

    /// Append `data` after the existing content of `key`, creating it if
    /// absent.
    fn append_buffer(&self, data: &[u8], key: &str) -> StoreResult<()>;

    /// Open `key` for reading from offset 0. The caller owns the handle.
    /// A key naming a directory fails with `Io` before any handle is returned.
    fn open_for_read(&self, key: &str) -> StoreResult<Self::Reader>;

    /// Read the full content of `key`.
    fn read_all(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Copy the content of `key` to the local file `dest`.
    fn download_to_path(&self, key: &str, dest: &Path) -> StoreResult<()>;

    /// Delete `key`. Fails with `NotFound` if it does not exist, and with
    /// `InvalidArgument` for a key that resolves to the root itself.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Direct children of `prefix`, in no particular order.
    fn list(&self, prefix: &str) -> StoreResult<Vec<DirEntry>>;

    /// Check whether `key` exists.
    fn exists(&self, key: &str) -> StoreResult<bool>;
}
