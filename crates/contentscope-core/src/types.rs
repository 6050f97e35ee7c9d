//! Common types used across contentscope
//!
//! This module provides the asset and table types shared by the store,
//! index, and export crates.

use serde::{Deserialize, Serialize};

/// Classification of an asset path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// Script source or compiled code
    Script,
    /// Lives under an editor-only path segment
    EditorOnly,
    /// Entry node of a build (scene)
    Scene,
    /// Anything that ships as content
    Content,
}

impl AssetKind {
    /// Whether assets of this kind can become table rows
    pub fn is_shippable(&self) -> bool {
        matches!(self, AssetKind::Scene | AssetKind::Content)
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AssetKind::Script => "script",
            AssetKind::EditorOnly => "editor",
            AssetKind::Scene => "scene",
            AssetKind::Content => "content",
        };
        f.write_str(label)
    }
}

/// Asset reference by logical path within a content store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    /// Logical path, forward slashes (e.g. `Assets/Textures/rock.png`)
    pub path: String,
    /// Last path segment
    pub file_name: String,
    /// Size on disk, once looked up
    pub size_bytes: Option<u64>,
    /// Classification
    pub kind: AssetKind,
}

impl AssetRef {
    /// Create a content asset reference for a path
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let file_name = display_name(&path).to_string();
        Self {
            path,
            file_name,
            size_bytes: None,
            kind: AssetKind::Content,
        }
    }

    pub fn with_kind(mut self, kind: AssetKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// Display name of an asset path: its last segment
pub fn display_name(path: &str) -> &str {
    const SEPARATORS: &[char] = &['/', '\\'];
    let path = path.trim_end_matches(SEPARATORS);
    match path.rfind(SEPARATORS) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// One row of the build contents table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRow {
    /// Full logical path (navigation key)
    pub path: String,
    /// Display name
    pub file_name: String,
    /// Size on disk in bytes
    pub size_bytes: u64,
    /// Display names of the assets that directly reference this one
    pub referenced_by: Vec<String>,
}

impl ContentRow {
    pub fn new(asset: &AssetRef, size_bytes: u64) -> Self {
        Self {
            path: asset.path.clone(),
            file_name: asset.file_name.clone(),
            size_bytes,
            referenced_by: Vec::new(),
        }
    }

    /// Size in kibibytes
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    /// Whether nothing in the build references this asset
    pub fn is_unreferenced(&self) -> bool {
        self.referenced_by.is_empty()
    }
}

/// The full result of one refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTable {
    pub rows: Vec<ContentRow>,
}

impl ContentTable {
    pub fn new(rows: Vec<ContentRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentRow> {
        self.rows.iter()
    }

    /// Sum of all row sizes in bytes
    pub fn total_bytes(&self) -> u64 {
        self.rows.iter().map(|r| r.size_bytes).sum()
    }

    /// Sum of all row sizes in mebibytes
    pub fn total_mb(&self) -> f64 {
        self.total_bytes() as f64 / (1024.0 * 1024.0)
    }

    /// Find a row by full path
    pub fn get(&self, path: &str) -> Option<&ContentRow> {
        self.rows.iter().find(|r| r.path == path)
    }

    /// Find rows by display name
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ContentRow> + 'a {
        self.rows.iter().filter(move |r| r.file_name == name)
    }
}

impl<'a> IntoIterator for &'a ContentTable {
    type Item = &'a ContentRow;
    type IntoIter = std::slice::Iter<'a, ContentRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
