//! Reverse dependency index construction
//!
//! Given the build's root scenes, a dependency oracle and a filesystem
//! oracle, produce one [`ContentRow`] per shippable asset reachable from the
//! roots, listing the roots and other rows that reference it directly.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info_span, trace};

use contentscope_core::{AssetRef, ContentRow, ContentTable, Result, ResultExt, display_name};
use contentscope_store::{ContentFs, DependencyStore, MemoizedStore};

use crate::filter::ExclusionRules;

/// Builds a [`ContentTable`] from a root set
#[derive(Debug, Clone)]
pub struct DependencyIndexBuilder {
    rules: ExclusionRules,
    memoize: bool,
}

impl Default for DependencyIndexBuilder {
    fn default() -> Self {
        Self::new(ExclusionRules::default())
    }
}

impl DependencyIndexBuilder {
    /// Create a builder; direct-dependency answers are memoized per build
    pub fn new(rules: ExclusionRules) -> Self {
        Self { rules, memoize: true }
    }

    /// Enable or disable per-build memoization of store answers
    pub fn with_memoization(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    /// Build the table; any store or filesystem error aborts the whole build
    pub fn build<S, F>(&self, roots: &[String], store: &S, fs: &F) -> Result<ContentTable>
    where
        S: DependencyStore + ?Sized,
        F: ContentFs + ?Sized,
    {
        let span = info_span!("build_index", store = store.name(), roots = roots.len());
        let _guard = span.enter();
        let start = Instant::now();

        let table = if self.memoize {
            let memo = MemoizedStore::new(store);
            let table = self.build_with(roots, &memo, fs)?;
            debug!(queries = memo.misses(), "Store queries issued");
            table
        } else {
            self.build_with(roots, store, fs)?
        };

        debug!(
            rows = table.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Index built"
        );
        Ok(table)
    }

    fn build_with<S, F>(&self, roots: &[String], store: &S, fs: &F) -> Result<ContentTable>
    where
        S: DependencyStore + ?Sized,
        F: ContentFs + ?Sized,
    {
        let candidates = reachable_from(roots, store)?;
        let mut rows = self.materialize(&candidates, fs)?;

        let row_paths: Vec<String> = rows.iter().map(|r| r.path.clone()).collect();
        for row in rows.iter_mut() {
            row.referenced_by = referencing_names(&row.path, &row.file_name, roots, &row_paths, store)?;
        }

        Ok(ContentTable::new(rows))
    }

    /// Filter candidates down to shippable assets backed by a file
    fn materialize<F>(&self, candidates: &[String], fs: &F) -> Result<Vec<ContentRow>>
    where
        F: ContentFs + ?Sized,
    {
        let mut rows = Vec::new();

        for path in candidates {
            let kind = self.rules.classify(path);
            if !kind.is_shippable() {
                trace!(path = %path, kind = %kind, "Excluded");
                continue;
            }
            if !fs.exists(path) {
                debug!(path = %path, "No backing file, skipping");
                continue;
            }

            let size = fs
                .size(path)
                .with_context(|| format!("reading size of {}", path))?;
            let asset = AssetRef::new(path.as_str()).with_kind(kind).with_size(size);
            rows.push(ContentRow::new(&asset, size));
        }

        Ok(rows)
    }
}

/// Union of the roots' transitive dependencies, first-seen order
fn reachable_from<S>(roots: &[String], store: &S) -> Result<Vec<String>>
where
    S: DependencyStore + ?Sized,
{
    let mut seen = HashSet::new();
    let mut all = Vec::new();

    for root in roots {
        let deps = store
            .dependencies(root, true)
            .with_context(|| format!("resolving dependencies of {}", root))?;
        for dep in deps {
            if seen.insert(dep.clone()) {
                all.push(dep);
            }
        }
    }

    Ok(all)
}

/// Display names of the roots and rows that reference `path` directly
///
/// Roots come first in root order, then rows in row order. Names are
/// deduplicated and the row's own name is never listed.
fn referencing_names<S>(
    path: &str,
    own_name: &str,
    roots: &[String],
    row_paths: &[String],
    store: &S,
) -> Result<Vec<String>>
where
    S: DependencyStore + ?Sized,
{
    let mut names: Vec<String> = Vec::new();
    let mut push = |referrer: &str| {
        let name = display_name(referrer);
        if name != own_name && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };

    for root in roots {
        if references(store, root, path)? {
            push(root.as_str());
        }
    }

    for other in row_paths {
        if other != path && references(store, other, path)? {
            push(other.as_str());
        }
    }

    Ok(names)
}

fn references<S>(store: &S, referrer: &str, path: &str) -> Result<bool>
where
    S: DependencyStore + ?Sized,
{
    let direct = store
        .dependencies(referrer, false)
        .with_context(|| format!("resolving direct dependencies of {}", referrer))?;
    Ok(direct.iter().any(|d| d == path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentscope_store::{ManifestStore, MemoryFs};

    fn roots(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    fn names(row: &ContentRow) -> Vec<&str> {
        row.referenced_by.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_scene_material_texture() {
        let store = ManifestStore::new()
            .with_asset("SceneA", &["TextureX", "MaterialY"])
            .with_asset("MaterialY", &["TextureX"]);
        let fs = MemoryFs::new()
            .with_file("TextureX", 2048)
            .with_file("MaterialY", 512);

        let table = DependencyIndexBuilder::default()
            .build(&roots(&["SceneA"]), &store, &fs)
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(names(table.get("TextureX").unwrap()), vec!["SceneA", "MaterialY"]);
        assert_eq!(names(table.get("MaterialY").unwrap()), vec!["SceneA"]);
        assert_eq!(table.get("TextureX").unwrap().size_bytes, 2048);
    }

    #[test]
    fn test_missing_file_excluded_even_if_referenced() {
        let store = ManifestStore::new()
            .with_asset("Assets/Main.unity", &["Assets/ghost.png", "Assets/real.mat"])
            .with_asset("Assets/real.mat", &["Assets/ghost.png"]);
        let fs = MemoryFs::new().with_file("Assets/real.mat", 10);

        let table = DependencyIndexBuilder::default()
            .build(&roots(&["Assets/Main.unity"]), &store, &fs)
            .unwrap();

        assert!(table.get("Assets/ghost.png").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_scripts_and_editor_assets_never_rows() {
        let store = ManifestStore::new()
            .with_asset("Assets/Main.unity", &["Assets/Player.cs", "Assets/Editor/icon.png", "Assets/rock.png"])
            .with_asset("Assets/Player.cs", &["Assets/rock.png"]);
        let fs = MemoryFs::new()
            .with_file("Assets/Player.cs", 1)
            .with_file("Assets/Editor/icon.png", 1)
            .with_file("Assets/rock.png", 1);

        let table = DependencyIndexBuilder::default()
            .build(&roots(&["Assets/Main.unity"]), &store, &fs)
            .unwrap();

        assert_eq!(table.len(), 1);
        // Excluded assets are not rows, so they never count as referrers either
        assert_eq!(names(table.get("Assets/rock.png").unwrap()), vec!["Main.unity"]);
    }

    #[test]
    fn test_native_plugin_ships() {
        let store = ManifestStore::new().with_asset(
            "Assets/Main.unity",
            &["Assets/Plugins/Native.dll", "Assets/Config.asmdef", "Assets/rock.png"],
        );
        let fs = MemoryFs::new()
            .with_file("Assets/Plugins/Native.dll", 500 * 1024)
            .with_file("Assets/Config.asmdef", 200)
            .with_file("Assets/rock.png", 64);

        let table = DependencyIndexBuilder::default()
            .build(&roots(&["Assets/Main.unity"]), &store, &fs)
            .unwrap();

        assert_eq!(table.len(), 3);
        let plugin = table.get("Assets/Plugins/Native.dll").unwrap();
        assert_eq!(plugin.size_bytes, 500 * 1024);
        assert_eq!(names(plugin), vec!["Main.unity"]);
    }

    #[test]
    fn test_unreferenced_row_has_empty_list() {
        // `leaf` is reachable only through an excluded script
        let store = ManifestStore::new()
            .with_asset("Main.unity", &["Logic.cs"])
            .with_asset("Logic.cs", &["leaf.png"]);
        let fs = MemoryFs::new().with_file("leaf.png", 4);

        let table = DependencyIndexBuilder::default()
            .build(&roots(&["Main.unity"]), &store, &fs)
            .unwrap();

        assert!(table.get("leaf.png").unwrap().is_unreferenced());
    }

    #[test]
    fn test_same_name_referrers_deduplicated() {
        let store = ManifestStore::new()
            .with_asset("A/Main.unity", &["A/shared.mat", "B/shared.mat", "tex.png"])
            .with_asset("A/shared.mat", &["tex.png"])
            .with_asset("B/shared.mat", &["tex.png"]);
        let fs = MemoryFs::new()
            .with_file("A/shared.mat", 1)
            .with_file("B/shared.mat", 1)
            .with_file("tex.png", 1);

        let table = DependencyIndexBuilder::default()
            .build(&roots(&["A/Main.unity"]), &store, &fs)
            .unwrap();

        assert_eq!(names(table.get("tex.png").unwrap()), vec!["Main.unity", "shared.mat"]);
        // A same-named sibling is never listed as a referrer of itself
        assert!(table.get("B/shared.mat").unwrap().referenced_by.iter().all(|n| n != "shared.mat"));
    }

    #[test]
    fn test_multiple_roots_share_rows() {
        let store = ManifestStore::new()
            .with_asset("Menu.unity", &["ui.png"])
            .with_asset("Game.unity", &["ui.png", "Menu.unity"]);
        let fs = MemoryFs::new()
            .with_file("ui.png", 1)
            .with_file("Menu.unity", 1);

        let table = DependencyIndexBuilder::default()
            .build(&roots(&["Menu.unity", "Game.unity"]), &store, &fs)
            .unwrap();

        assert_eq!(names(table.get("ui.png").unwrap()), vec!["Menu.unity", "Game.unity"]);
        // A root reachable from another root becomes a row, without itself as referrer
        assert_eq!(names(table.get("Menu.unity").unwrap()), vec!["Game.unity"]);
    }

    #[test]
    fn test_memoization_does_not_change_output() {
        let store = ManifestStore::new()
            .with_asset("S.unity", &["a.mat", "b.mat", "t.png"])
            .with_asset("a.mat", &["t.png"])
            .with_asset("b.mat", &["t.png", "a.mat"]);
        let fs = MemoryFs::new()
            .with_file("a.mat", 1)
            .with_file("b.mat", 2)
            .with_file("t.png", 3);
        let r = roots(&["S.unity"]);

        let memoized = DependencyIndexBuilder::default().build(&r, &store, &fs).unwrap();
        let plain = DependencyIndexBuilder::default()
            .with_memoization(false)
            .build(&r, &store, &fs)
            .unwrap();

        assert_eq!(memoized, plain);
    }

    #[test]
    fn test_unknown_root_aborts() {
        let store = ManifestStore::new().with_asset("S.unity", &["a.png"]);
        let fs = MemoryFs::new().with_file("a.png", 1);

        let err = DependencyIndexBuilder::default()
            .build(&roots(&["Missing.unity"]), &store, &fs)
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Missing.unity"));
    }
}
