//! Key-addressed object storage on the local disk.
//!
//! A [`DiskStore`] maps string keys to plain files beneath a root directory
//! and exposes the usual object-store verbs over them: upload (from a path or
//! a buffer), append, open, read, download, remove and list. Every operation
//! is a direct pass-through to the filesystem, preceded by creation of any
//! missing parent directories for writes.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`DiskStore`] -- files under a root directory
//! - [`InMemoryObjectStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Keys are normalized lexically; a leading `/` never escapes the root.
//! 2. Keys climbing above the root with `..` are rejected unless
//!    [`StoreConfig::confine_keys`] is turned off.
//! 3. Writers to the same key are not coordinated. Callers serialize them.
//! 4. Calls block until the filesystem returns; nothing is retried.
//! 5. Filesystem errors are propagated with their original cause attached.
//!
//! # Example
//!
//! ```no_run
//! use lfs_store::{DiskStore, ObjectStore};
//!
//! let store = DiskStore::new("baseDir")?;
//! store.upload_buffer(b"hello world", "test.txt")?;
//! store.append_buffer(b"!", "test.txt")?;
//! assert_eq!(store.read_all("test.txt")?, b"hello world!");
//! for entry in store.list("")? {
//!     println!("{} dir={}", entry.name, entry.is_dir);
//! }
//! store.remove("test.txt")?;
//! # Ok::<(), lfs_store::StoreError>(())
//! ```

pub mod config;
pub mod disk;
pub mod error;
pub mod key;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{StoreConfig, SyncMode};
pub use disk::DiskStore;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use traits::{DirEntry, ObjectStore};
