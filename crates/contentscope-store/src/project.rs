//! Project directory dependency store
//!
//! Reads a project laid out the way the editor writes it:
//! - every asset `X` has a sibling `X.meta` carrying a `guid: <32 hex>` line
//! - text-serialized assets (scenes, materials, prefabs...) start with
//!   `%YAML` and reference other assets as `{fileID: .., guid: <32 hex>, ..}`
//!
//! Binary assets (textures, audio, models) have no outgoing edges.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use contentscope_core::{Error, Result, ResultExt};

use crate::path::{normalize_asset_path, to_logical};
use crate::store::{DependencyStore, transitive_closure};

/// Default content folder under the project root
pub const DEFAULT_CONTENT_DIR: &str = "Assets";

const GUID_KEY: &str = "guid:";
const GUID_LEN: usize = 32;
const YAML_HEADER: &[u8] = b"%YAML";

/// Dependency store built by scanning a project directory
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
    guid_to_path: HashMap<String, String>,
    edges: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl ProjectStore {
    /// Scan `root/Assets`
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_content_dir(root, DEFAULT_CONTENT_DIR)
    }

    /// Scan `root/<content_dir>`
    pub fn open_with_content_dir(root: impl AsRef<Path>, content_dir: &str) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let content_root = root.join(content_dir);

        if !content_root.is_dir() {
            return Err(Error::FileNotFound(content_root));
        }

        info!(root = %root.display(), content_dir, "Scanning project");

        let mut meta_files = Vec::new();
        for entry in WalkDir::new(&content_root).into_iter() {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if entry.file_type().is_file() && is_meta(entry.path()) {
                meta_files.push(entry.into_path());
            }
        }

        // .meta parsing is independent per file; any read failure fails the scan
        let assets: Vec<(String, String)> = meta_files
            .par_iter()
            .map(|meta| -> Result<Option<(String, String)>> {
                let asset = meta.with_extension("");
                if !asset.is_file() {
                    return Ok(None);
                }
                let Some(logical) = to_logical(&root, &asset) else {
                    return Ok(None);
                };
                let guid = read_meta_guid(meta)
                    .with_context(|| format!("reading meta file {}", meta.display()))?;
                if guid.is_none() {
                    warn!(meta = %meta.display(), "Meta file has no guid");
                }
                Ok(guid.map(|guid| (guid, logical)))
            })
            .collect::<Result<Vec<Option<_>>>>()?
            .into_iter()
            .flatten()
            .collect();

        let mut order: Vec<String> = assets.iter().map(|(_, path)| path.clone()).collect();
        order.sort();
        let guid_to_path: HashMap<String, String> = assets.into_iter().collect();

        let edges: HashMap<String, Vec<String>> = order
            .par_iter()
            .map(|path| -> Result<(String, Vec<String>)> {
                let deps = read_references(&root, path, &guid_to_path)
                    .with_context(|| format!("reading asset {}", path))?;
                Ok((path.clone(), deps))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        debug!(assets = order.len(), guids = guid_to_path.len(), "Project scan complete");

        Ok(Self {
            root,
            guid_to_path,
            edges,
            order,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Asset path for a GUID
    pub fn path_for_guid(&self, guid: &str) -> Option<&str> {
        self.guid_to_path.get(&guid.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn direct(&self, node: &str) -> &[String] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl DependencyStore for ProjectStore {
    fn name(&self) -> &str {
        "project"
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

fn is_meta(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("meta")
}

fn read_meta_guid(meta: &Path) -> Result<Option<String>> {
    let text = std::fs::read_to_string(meta)?;
    Ok(text
        .lines()
        .filter_map(|line| line.trim().strip_prefix(GUID_KEY))
        .map(str::trim)
        .find(|guid| is_guid(guid))
        .map(str::to_ascii_lowercase))
}

/// Direct references of one asset, in order of first appearance
fn read_references(
    root: &Path,
    logical: &str,
    guid_to_path: &HashMap<String, String>,
) -> Result<Vec<String>> {
    let abs = logical.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part));
    let bytes = std::fs::read(&abs)?;
    if !bytes.starts_with(YAML_HEADER) {
        return Ok(Vec::new());
    }

    let text = String::from_utf8_lossy(&bytes);
    let mut seen = HashSet::new();
    let mut deps = Vec::new();

    for guid in extract_guids(&text) {
        let Some(path) = guid_to_path.get(&guid.to_ascii_lowercase()) else {
            continue;
        };
        if path != logical && seen.insert(path.as_str()) {
            deps.push(path.clone());
        }
    }

    Ok(deps)
}

/// Every well-formed GUID following a `guid:` key
pub fn extract_guids(text: &str) -> Vec<&str> {
    let mut guids = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(GUID_KEY) {
        rest = rest[pos + GUID_KEY.len()..].trim_start_matches(' ');
        if let Some(candidate) = rest.get(..GUID_LEN) {
            if is_guid(candidate) {
                guids.push(candidate);
                rest = &rest[GUID_LEN..];
            }
        }
    }

    guids
}

fn is_guid(text: &str) -> bool {
    text.len() == GUID_LEN && text.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCENE_GUID: &str = "0123456789abcdef0123456789abcdef";
    const MAT_GUID: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const TEX_GUID: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn write_asset(root: &Path, logical: &str, guid: &str, body: &[u8]) {
        let abs = root.join(logical);
        std::fs::create_dir_all(abs.parent().unwrap()).unwrap();
        std::fs::write(&abs, body).unwrap();
        std::fs::write(
            abs.with_file_name(format!("{}.meta", abs.file_name().unwrap().to_str().unwrap())),
            format!("fileFormatVersion: 2\nguid: {}\n", guid),
        )
        .unwrap();
    }

    fn yaml_referencing(guids: &[&str]) -> Vec<u8> {
        let mut body = String::from("%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n--- !u!21 &2100000\n");
        for guid in guids {
            body.push_str(&format!("  m_Ref: {{fileID: 2800000, guid: {}, type: 3}}\n", guid));
        }
        body.into_bytes()
    }

    fn sample_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_asset(root, "Assets/Scenes/Main.unity", SCENE_GUID, &yaml_referencing(&[MAT_GUID, TEX_GUID]));
        write_asset(root, "Assets/Materials/Stone.mat", MAT_GUID, &yaml_referencing(&[TEX_GUID, TEX_GUID]));
        write_asset(root, "Assets/Textures/rock.png", TEX_GUID, &[0x89, b'P', b'N', b'G', 0, 0]);
        dir
    }

    #[test]
    fn test_scan_project() {
        let dir = sample_project();
        let store = ProjectStore::open(dir.path()).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.path_for_guid(MAT_GUID), Some("Assets/Materials/Stone.mat"));
        assert_eq!(
            store.dependencies("Assets/Scenes/Main.unity", false).unwrap(),
            vec!["Assets/Materials/Stone.mat", "Assets/Textures/rock.png"]
        );
        assert_eq!(
            store.dependencies("Assets/Materials/Stone.mat", false).unwrap(),
            vec!["Assets/Textures/rock.png"]
        );
        assert!(store.dependencies("Assets/Textures/rock.png", false).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_guids_ignored() {
        let dir = TempDir::new().unwrap();
        write_asset(
            dir.path(),
            "Assets/Prefabs/Crate.prefab",
            MAT_GUID,
            &yaml_referencing(&["cccccccccccccccccccccccccccccccc", MAT_GUID]),
        );

        let store = ProjectStore::open(dir.path()).unwrap();
        assert!(store.dependencies("Assets/Prefabs/Crate.prefab", true).unwrap().is_empty());
    }

    #[test]
    fn test_orphan_meta_skipped() {
        let dir = sample_project();
        std::fs::write(
            dir.path().join("Assets/Textures/gone.png.meta"),
            "guid: dddddddddddddddddddddddddddddddd\n",
        )
        .unwrap();

        let store = ProjectStore::open(dir.path()).unwrap();
        assert!(!store.contains("Assets/Textures/gone.png"));
    }

    #[test]
    fn test_meta_without_guid_skipped() {
        let dir = sample_project();
        std::fs::write(dir.path().join("Assets/Textures/noise.png"), b"png").unwrap();
        std::fs::write(dir.path().join("Assets/Textures/noise.png.meta"), "fileFormatVersion: 2\n").unwrap();

        let store = ProjectStore::open(dir.path()).unwrap();
        assert_eq!(store.len(), 3);
        assert!(!store.contains("Assets/Textures/noise.png"));
    }

    #[test]
    fn test_unreadable_meta_fails_scan() {
        let dir = sample_project();
        std::fs::write(dir.path().join("Assets/Textures/noise.png"), b"png").unwrap();
        std::fs::write(dir.path().join("Assets/Textures/noise.png.meta"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let err = ProjectStore::open(dir.path()).unwrap_err();
        assert!(err.to_string().contains("noise.png.meta"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unreadable_asset_fails_scan() {
        let dir = TempDir::new().unwrap();
        let scenes = dir.path().join("Assets/Scenes");
        std::fs::create_dir_all(&scenes).unwrap();
        // Looks like a regular file but every read fails with EIO
        std::os::unix::fs::symlink("/proc/self/mem", scenes.join("Main.unity")).unwrap();
        std::fs::write(scenes.join("Main.unity.meta"), format!("guid: {}\n", SCENE_GUID)).unwrap();

        let err = ProjectStore::open(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Assets/Scenes/Main.unity"));
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = TempDir::new().unwrap();
        assert!(ProjectStore::open(dir.path()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_extract_guids() {
        let text = "a: {fileID: 1, guid: 0123456789abcdef0123456789ABCDEF, type: 2}\nguid: short\n";
        assert_eq!(extract_guids(text), vec!["0123456789abcdef0123456789ABCDEF"]);
        assert!(extract_guids("no references").is_empty());
    }
}
