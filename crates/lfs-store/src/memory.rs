//! In-memory object store for tests and embedding.
//!
//! [`InMemoryObjectStore`] keeps every object in a `BTreeMap` keyed by the
//! normalized key, behind a `RwLock`. Directories are implicit: a prefix is a
//! directory while some stored key lies beneath it.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::key::canonical_key;
use crate::traits::{DirEntry, ObjectStore};

/// In-memory, `BTreeMap`-based object store.
///
/// Follows the same key normalization and error taxonomy as
/// [`DiskStore`](crate::DiskStore). Local paths passed to
/// [`upload_from_path`](ObjectStore::upload_from_path) and
/// [`download_to_path`](ObjectStore::download_to_path) still go to disk.
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

fn not_found(key: &str) -> StoreError {
    StoreError::NotFound {
        path: PathBuf::from(key),
        source: io::Error::new(io::ErrorKind::NotFound, "no such object"),
    }
}

fn conflict(key: &str, kind: io::ErrorKind, reason: &str) -> StoreError {
    StoreError::Io {
        path: PathBuf::from(key),
        source: io::Error::new(kind, reason.to_string()),
    }
}

/// Prefix every child of `dir` starts with.
fn child_prefix(dir: &str) -> String {
    if dir.is_empty() {
        String::new()
    } else {
        format!("{dir}/")
    }
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    /// All stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    fn is_dir(map: &BTreeMap<String, Vec<u8>>, key: &str) -> bool {
        let prefix = child_prefix(key);
        map.range(prefix.clone()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(&prefix))
    }

    /// Reject writes onto a directory or beneath an existing object.
    fn check_writable(map: &BTreeMap<String, Vec<u8>>, key: &str) -> StoreResult<()> {
        if key.is_empty() || Self::is_dir(map, key) {
            return Err(conflict(key, io::ErrorKind::IsADirectory, "is a directory"));
        }
        let mut ancestor = key;
        while let Some((parent, _)) = ancestor.rsplit_once('/') {
            if map.contains_key(parent) {
                return Err(conflict(key, io::ErrorKind::NotADirectory, "parent is not a directory"));
            }
            ancestor = parent;
        }
        Ok(())
    }

    fn write(&self, key: &str, data: &[u8], append: bool) -> StoreResult<()> {
        let key = canonical_key(key, true)?;
        let mut map = self.objects.write().expect("lock poisoned");
        Self::check_writable(&map, &key)?;
        let slot = map.entry(key).or_default();
        if !append {
            slot.clear();
        }
        slot.extend_from_slice(data);
        Ok(())
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    type Reader = Cursor<Vec<u8>>;

    fn upload_from_path(&self, source: &Path, key: &str) -> StoreResult<()> {
        let content = std::fs::read(source).map_err(|e| StoreError::from_io(source, e))?;
        self.write(key, &content, false)
    }

    fn upload_buffer(&self, data: &[u8], key: &str) -> StoreResult<()> {
        self.write(key, data, false)
    }

    fn append_buffer(&self, data: &[u8], key: &str) -> StoreResult<()> {
        self.write(key, data, true)
    }

    fn open_for_read(&self, key: &str) -> StoreResult<Self::Reader> {
        self.read_all(key).map(Cursor::new)
    }

    fn read_all(&self, key: &str) -> StoreResult<Vec<u8>> {
        let key = canonical_key(key, true)?;
        let map = self.objects.read().expect("lock poisoned");
        match map.get(&key) {
            Some(data) => Ok(data.clone()),
            None if key.is_empty() || Self::is_dir(&map, &key) => {
                Err(conflict(&key, io::ErrorKind::IsADirectory, "is a directory"))
            }
            None => Err(not_found(&key)),
        }
    }

    fn download_to_path(&self, key: &str, dest: &Path) -> StoreResult<()> {
        let content = self.read_all(key)?;
        std::fs::write(dest, content).map_err(|e| StoreError::from_io(dest, e))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let key = canonical_key(key, true)?;
        if key.is_empty() {
            return Err(StoreError::InvalidArgument(
                "key resolves to the store root".into(),
            ));
        }
        let mut map = self.objects.write().expect("lock poisoned");
        if map.remove(&key).is_some() {
            return Ok(());
        }
        if Self::is_dir(&map, &key) {
            return Err(conflict(&key, io::ErrorKind::DirectoryNotEmpty, "directory not empty"));
        }
        Err(not_found(&key))
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<DirEntry>> {
        let dir = canonical_key(prefix, true)?;
        let map = self.objects.read().expect("lock poisoned");
        if map.contains_key(&dir) {
            return Err(conflict(&dir, io::ErrorKind::NotADirectory, "not a directory"));
        }

        let start = child_prefix(&dir);
        let mut files = BTreeSet::new();
        let mut dirs = BTreeSet::new();
        for key in map.range(start.clone()..).map(|(k, _)| k) {
            let Some(rest) = key.strip_prefix(&start) else {
                break;
            };
            match rest.split_once('/') {
                Some((child, _)) => dirs.insert(child.to_string()),
                None => files.insert(rest.to_string()),
            };
        }

        if files.is_empty() && dirs.is_empty() && !dir.is_empty() {
            return Err(not_found(&dir));
        }
        Ok(dirs
            .into_iter()
            .map(|name| DirEntry::new(name, true))
            .chain(files.into_iter().map(|name| DirEntry::new(name, false)))
            .collect())
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        let key = canonical_key(key, true)?;
        let map = self.objects.read().expect("lock poisoned");
        Ok(key.is_empty() || map.contains_key(&key) || Self::is_dir(&map, &key))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}
