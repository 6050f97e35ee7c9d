//! Asset file name sanitization
//!
//! Replaces every character outside `[A-Za-z0-9_-.]` with `_`. Renames are
//! planned first and applied separately; a planned rename whose target
//! already exists is skipped.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use contentscope_core::{Error, Result};

use crate::path::{join_paths, parent_path, to_logical};

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &["Library", ".git"];

/// One planned rename, logical paths relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub from: String,
    pub to: String,
}

/// Sanitized form of a file name
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Plan renames for every file under `root/content_dir` whose name needs sanitizing
pub fn plan_renames(root: impl AsRef<Path>, content_dir: &str) -> Result<Vec<RenamePlan>> {
    let root = root.as_ref();
    let content_root = root.join(content_dir);
    if !content_root.is_dir() {
        return Err(Error::FileNotFound(content_root));
    }

    let mut plans = Vec::new();
    let walker = WalkDir::new(&content_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.file_name().to_str().is_some_and(|n| SKIPPED_DIRS.contains(&n)))
        });

    for entry in walker {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.ends_with(".meta") {
            continue;
        }

        let sanitized = sanitize_file_name(name);
        if sanitized == name {
            continue;
        }

        let Some(from) = to_logical(root, entry.path()) else {
            continue;
        };
        let to = join_paths(&parent_path(&from).unwrap_or_default(), &sanitized);
        let target = entry.path().with_file_name(&sanitized);

        if target.exists() || plans.iter().any(|p: &RenamePlan| p.to == to) {
            warn!(from = %from, to = %to, "Sanitized name already taken, skipping");
            continue;
        }

        debug!(from = %from, to = %to, "Planned rename");
        plans.push(RenamePlan { from, to });
    }

    Ok(plans)
}

/// Perform planned renames, moving each asset's `.meta` sibling along with it
///
/// Returns the number of assets renamed.
pub fn apply_renames(root: impl AsRef<Path>, plans: &[RenamePlan]) -> Result<usize> {
    let root = root.as_ref();
    let mut renamed = 0;

    for plan in plans {
        let from = absolute(root, &plan.from);
        let to = absolute(root, &plan.to);

        if to.exists() {
            warn!(to = %plan.to, "Target appeared since planning, skipping");
            continue;
        }

        std::fs::rename(&from, &to)?;

        let from_meta = meta_sibling(&from);
        if from_meta.is_file() {
            std::fs::rename(&from_meta, meta_sibling(&to))?;
        }

        info!(from = %plan.from, to = %plan.to, "Renamed");
        renamed += 1;
    }

    info!(renamed, "Sanitize finished");
    Ok(renamed)
}

fn absolute(root: &Path, logical: &str) -> PathBuf {
    logical.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part))
}

fn meta_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".meta");
    path.with_file_name(name)
}
