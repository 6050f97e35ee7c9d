//! Project configuration (`contentscope.yaml`)
//!
//! ```yaml
//! project_root: .
//! content_dir: Assets
//! scenes:
//!   - path: Assets/Scenes/Main.unity
//!   - path: Assets/Scenes/Debug.unity
//!     enabled: false
//! manifest: deps.yaml        # optional; scan the project when absent
//! exclusions:
//!   script_extensions: [cs, js, lua]
//!   editor_segments: [Editor]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use contentscope_core::{Error, Result, ResultExt};
use contentscope_index::ExclusionRules;
use contentscope_store::project::DEFAULT_CONTENT_DIR;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "contentscope.yaml";

/// One build scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntry {
    pub path: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project root; relative paths resolve against the config file's directory
    pub project_root: PathBuf,
    /// Content folder under the project root
    pub content_dir: String,
    /// Build scenes, in build order
    pub scenes: Vec<SceneEntry>,
    /// Dependency manifest used instead of scanning the project
    pub manifest: Option<PathBuf>,
    pub exclusions: ExclusionRules,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            content_dir: DEFAULT_CONTENT_DIR.to_string(),
            scenes: Vec::new(),
            manifest: None,
            exclusions: ExclusionRules::default(),
        }
    }
}

impl ProjectConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::invalid_config(e.to_string()))
    }

    /// Load a config file and anchor relative paths at its directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(Error::from)
            .with_context(|| format!("reading config {}", path.display()))?;

        let mut config = Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.anchor(base);
        debug!(config = %path.display(), root = %config.project_root.display(), "Loaded config");

        Ok(config)
    }

    /// `explicit` if given, else `./contentscope.yaml` if present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Paths of the enabled scenes, in order
    pub fn enabled_scenes(&self) -> Vec<String> {
        self.scenes
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.path.clone())
            .collect()
    }

    fn anchor(&mut self, base: &Path) {
        if self.project_root.is_relative() {
            self.project_root = base.join(&self.project_root);
        }
        if let Some(manifest) = self.manifest.as_mut() {
            if manifest.is_relative() {
                *manifest = base.join(&*manifest);
            }
        }
    }
}
