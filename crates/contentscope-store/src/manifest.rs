//! Manifest-backed dependency store
//!
//! A manifest declares direct edges explicitly:
//!
//! ```yaml
//! assets:
//!   Assets/Scenes/Main.unity: [Assets/Materials/Stone.mat, Assets/Textures/rock.png]
//!   Assets/Materials/Stone.mat: [Assets/Textures/rock.png]
//! files:
//!   Assets/Materials/Stone.mat: 812
//!   Assets/Textures/rock.png: 40960
//! ```
//!
//! Assets that only appear as dependencies are leaves. The optional `files`
//! table lets a manifest stand in for the filesystem as well.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use contentscope_core::{Error, Result, ResultExt};

use crate::fs::MemoryFs;
use crate::path::normalize_asset_path;
use crate::store::{DependencyStore, transitive_closure};

/// On-disk manifest document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Direct dependencies per asset
    #[serde(default)]
    pub assets: BTreeMap<String, Vec<String>>,
    /// Optional file sizes in bytes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<String, u64>,
}

impl Manifest {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::invalid_manifest(e.to_string()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::invalid_manifest(e.to_string()))
    }

    /// Load a manifest file; format chosen by extension (`json`, `yaml`, `yml`)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(Error::from)
            .with_context(|| format!("reading manifest {}", path.display()))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "json" => Self::from_json_str(&text),
            "yaml" | "yml" => Self::from_yaml_str(&text),
            other => Err(Error::invalid_manifest(format!(
                "unsupported manifest extension '{}'",
                other
            ))),
        }
    }

    /// File sizes as an in-memory filesystem oracle, if the manifest has any
    pub fn memory_fs(&self) -> Option<MemoryFs> {
        if self.files.is_empty() {
            return None;
        }
        Some(self.files.iter().map(|(p, s)| (p.clone(), *s)).collect())
    }
}

/// Dependency store over explicitly declared edges
#[derive(Debug, Clone, Default)]
pub struct ManifestStore {
    /// Direct edges, normalized paths
    edges: HashMap<String, Vec<String>>,
    /// Every known asset in first-seen order
    order: Vec<String>,
}

impl ManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut store = Self::new();
        for (asset, deps) in &manifest.assets {
            store.add_asset(asset, deps.iter().map(String::as_str));
        }
        for file in manifest.files.keys() {
            store.ensure_node(&normalize_asset_path(file));
        }
        debug!(assets = store.order.len(), "Manifest store built");
        store
    }

    /// Load a manifest file into a store
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_manifest(&Manifest::load(path)?))
    }

    /// Declare an asset and its direct dependencies
    pub fn add_asset<'a>(&mut self, asset: &str, deps: impl IntoIterator<Item = &'a str>) {
        let asset = normalize_asset_path(asset);
        self.ensure_node(&asset);

        for dep in deps {
            self.add_edge_normalized(&asset, normalize_asset_path(dep));
        }
    }

    /// Declare one direct edge `from -> to`
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = normalize_asset_path(from);
        self.ensure_node(&from);
        self.add_edge_normalized(&from, normalize_asset_path(to));
    }

    /// Builder form of [`add_asset`](Self::add_asset)
    pub fn with_asset(mut self, asset: &str, deps: &[&str]) -> Self {
        self.add_asset(asset, deps.iter().copied());
        self
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn ensure_node(&mut self, path: &str) {
        if !self.edges.contains_key(path) {
            self.edges.insert(path.to_string(), Vec::new());
            self.order.push(path.to_string());
        }
    }

    fn add_edge_normalized(&mut self, from: &str, to: String) {
        if to.is_empty() || to == from {
            return;
        }
        self.ensure_node(&to);
        if let Some(deps) = self.edges.get_mut(from) {
            if !deps.contains(&to) {
                deps.push(to);
            }
        }
    }

    fn direct(&self, node: &str) -> &[String] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl DependencyStore for ManifestStore {
    fn name(&self) -> &str {
        "manifest"
    }

    fn dependencies(&self, node: &str, transitive: bool) -> Result<Vec<String>> {
        let node = normalize_asset_path(node);
        if !self.edges.contains_key(&node) {
            return Err(Error::AssetNotFound { path: node });
        }

        if transitive {
            Ok(transitive_closure(&node, |n| self.direct(n)))
        } else {
            Ok(self.direct(&node).to_vec())
        }
    }

    fn contains(&self, node: &str) -> bool {
        self.edges.contains_key(&normalize_asset_path(node))
    }

    fn asset_paths(&self) -> Vec<String> {
        self.order.clone()
    }
}
