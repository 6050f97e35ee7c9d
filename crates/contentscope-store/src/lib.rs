//! contentscope asset stores
//!
//! Provides the two external oracles the dependency index is built over:
//! - [`DependencyStore`]: direct and transitive dependencies of an asset
//! - [`ContentFs`]: existence and size of an asset's file on disk
//!
//! Implementations:
//! - [`ManifestStore`]: edges declared in a JSON or YAML manifest
//! - [`ProjectStore`]: edges read from a project directory (`.meta` GUIDs
//!   and text-serialized assets)
//! - [`FilesystemRoot`] / [`MemoryFs`]: on-disk and in-memory file oracles
//! - [`MemoizedStore`]: caches answers of any store for one refresh
//!
//! # Example
//! ```no_run
//! use contentscope_store::{DependencyStore, ManifestStore};
//!
//! let store = ManifestStore::load("deps.yaml").unwrap();
//! let deps = store.dependencies("Assets/Scenes/Main.unity", true).unwrap();
//! println!("{} assets reachable", deps.len());
//! ```

pub mod cache;
pub mod fs;
pub mod manifest;
pub mod path;
pub mod project;
pub mod sanitize;
pub mod store;

pub use cache::MemoizedStore;
pub use fs::{ContentFs, FilesystemRoot, MemoryFs};
pub use manifest::{Manifest, ManifestStore};
pub use project::ProjectStore;
pub use sanitize::{RenamePlan, sanitize_file_name};
pub use store::{DependencyStore, transitive_closure};
