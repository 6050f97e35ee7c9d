//! Filesystem oracles
//!
//! The index only needs two answers about an asset's backing file: does it
//! exist, and how large is it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use contentscope_core::{Error, Result};

use crate::path::normalize_asset_path;

/// Filesystem oracle rooted at a project's content root
pub trait ContentFs: Send + Sync {
    /// Check if the file backing `path` exists
    fn exists(&self, path: &str) -> bool;

    /// Byte length of the file backing `path`
    fn size(&self, path: &str) -> Result<u64>;
}

impl<F: ContentFs + ?Sized> ContentFs for &F {
    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn size(&self, path: &str) -> Result<u64> {
        (**self).size(path)
    }
}

impl<F: ContentFs + ?Sized> ContentFs for Box<F> {
    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn size(&self, path: &str) -> Result<u64> {
        (**self).size(path)
    }
}

/// Local filesystem oracle
#[derive(Debug, Clone)]
pub struct FilesystemRoot {
    root_path: PathBuf,
}

impl FilesystemRoot {
    /// Create a new oracle rooted at an existing directory
    pub fn new(root_path: impl AsRef<Path>) -> Result<Self> {
        let root_path = root_path.as_ref().to_path_buf();

        if !root_path.exists() {
            return Err(Error::FileNotFound(root_path));
        }

        if !root_path.is_dir() {
            return Err(Error::invalid_config(format!(
                "{} is not a directory",
                root_path.display()
            )));
        }

        Ok(Self { root_path })
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Absolute path for a logical asset path
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let logical = normalize_asset_path(path);
        logical
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root_path.clone(), |acc, part| acc.join(part))
    }
}

impl ContentFs for FilesystemRoot {
    fn exists(&self, path: &str) -> bool {
        self.resolve_path(path).is_file()
    }

    fn size(&self, path: &str) -> Result<u64> {
        let abs_path = self.resolve_path(path);

        if !abs_path.is_file() {
            return Err(Error::FileNotFound(abs_path));
        }

        Ok(std::fs::metadata(&abs_path)?.len())
    }
}

/// In-memory filesystem oracle: a map of logical path to byte length
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<String, u64>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file of the given size
    pub fn with_file(mut self, path: &str, size: u64) -> Self {
        self.insert(path, size);
        self
    }

    pub fn insert(&mut self, path: &str, size: u64) {
        self.files.insert(normalize_asset_path(path), size);
    }

    pub fn remove(&mut self, path: &str) -> Option<u64> {
        self.files.remove(&normalize_asset_path(path))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<(String, u64)> for MemoryFs {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut fs = MemoryFs::new();
        for (path, size) in iter {
            fs.insert(&path, size);
        }
        fs
    }
}

impl ContentFs for MemoryFs {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(&normalize_asset_path(path))
    }

    fn size(&self, path: &str) -> Result<u64> {
        self.files
            .get(&normalize_asset_path(path))
            .copied()
            .ok_or_else(|| Error::FileNotFound(PathBuf::from(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filesystem_root_size() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("Assets/Textures")).unwrap();
        std::fs::write(dir.path().join("Assets/Textures/rock.png"), vec![0u8; 300]).unwrap();

        let fs = FilesystemRoot::new(dir.path()).unwrap();
        assert!(fs.exists("Assets/Textures/rock.png"));
        assert!(fs.exists("Assets\\Textures\\rock.png"));
        assert_eq!(fs.size("Assets/Textures/rock.png").unwrap(), 300);
        assert!(!fs.exists("Assets/Textures/missing.png"));
        assert!(fs.size("Assets/Textures/missing.png").unwrap_err().is_not_found());
    }

    #[test]
    fn test_directories_are_not_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("Assets/Folder")).unwrap();

        let fs = FilesystemRoot::new(dir.path()).unwrap();
        assert!(!fs.exists("Assets/Folder"));
    }

    #[test]
    fn test_filesystem_root_requires_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();

        assert!(FilesystemRoot::new(&file).is_err());
        assert!(FilesystemRoot::new(dir.path().join("nope")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_memory_fs() {
        let fs = MemoryFs::new().with_file("Assets/a.png", 10);
        assert!(fs.exists("Assets/a.png"));
        assert!(fs.exists("/Assets/a.png"));
        assert_eq!(fs.size("Assets/a.png").unwrap(), 10);
        assert!(!fs.exists("Assets/b.png"));
    }
}
