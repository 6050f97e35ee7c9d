//! Dependency oracle abstraction

use std::collections::HashSet;
use std::sync::Arc;

use contentscope_core::Result;

/// Dependency oracle
/// Answers "what does this asset depend on" for a content store.
///
/// Results never include the queried node itself. Transitive results must
/// terminate on cyclic graphs.
pub trait DependencyStore: Send + Sync {
    /// Store label used in logs
    fn name(&self) -> &str {
        "store"
    }

    /// Direct (`transitive == false`) or full transitive dependencies of `node`
    fn dependencies(&self, node: &str, transitive: bool) -> Result<Vec<String>>;

    /// Check if the store knows about `node`
    fn contains(&self, node: &str) -> bool;

    /// Every asset path known to the store
    fn asset_paths(&self) -> Vec<String>;
}

impl<S: DependencyStore + ?Sized> DependencyStore for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dependencies(&self, node: &str, transitive: bool) -> Result<Vec<String>> {
        (**self).dependencies(node, transitive)
    }

    fn contains(&self, node: &str) -> bool {
        (**self).contains(node)
    }

    fn asset_paths(&self) -> Vec<String> {
        (**self).asset_paths()
    }
}

impl<S: DependencyStore + ?Sized> DependencyStore for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dependencies(&self, node: &str, transitive: bool) -> Result<Vec<String>> {
        (**self).dependencies(node, transitive)
    }

    fn contains(&self, node: &str) -> bool {
        (**self).contains(node)
    }

    fn asset_paths(&self) -> Vec<String> {
        (**self).asset_paths()
    }
}

impl<S: DependencyStore + ?Sized> DependencyStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dependencies(&self, node: &str, transitive: bool) -> Result<Vec<String>> {
        (**self).dependencies(node, transitive)
    }

    fn contains(&self, node: &str) -> bool {
        (**self).contains(node)
    }

    fn asset_paths(&self) -> Vec<String> {
        (**self).asset_paths()
    }
}

/// Breadth-first closure of `start` over a direct-edge lookup
///
/// Returns nodes in discovery order, each once, excluding `start`.
pub fn transitive_closure<'a, F>(start: &'a str, direct: F) -> Vec<String>
where
    F: Fn(&str) -> &'a [String],
{
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(start);

    let mut order = Vec::new();
    let mut cursor = 0;
    let mut frontier: Vec<&'a str> = vec![start];

    while cursor < frontier.len() {
        let node = frontier[cursor];
        cursor += 1;

        for dep in direct(node) {
            if visited.insert(dep.as_str()) {
                order.push(dep.clone());
                frontier.push(dep.as_str());
            }
        }
    }

    order
}
