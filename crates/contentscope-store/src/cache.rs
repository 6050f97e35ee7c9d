//! Query memoization for dependency stores

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use contentscope_core::Result;

use crate::store::DependencyStore;

/// Caches every successful answer of an inner store
///
/// Meant to live for a single refresh: the inner store is assumed not to
/// change while the cache is alive. Errors are never cached.
pub struct MemoizedStore<S> {
    inner: S,
    answers: Mutex<HashMap<(String, bool), Vec<String>>>,
    misses: AtomicUsize,
}

impl<S: DependencyStore> MemoizedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            answers: Mutex::new(HashMap::new()),
            misses: AtomicUsize::new(0),
        }
    }

    /// Number of queries forwarded to the inner store
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached answers
    pub fn cached(&self) -> usize {
        self.answers.lock().len()
    }

    /// Drop every cached answer
    pub fn clear(&self) {
        self.answers.lock().clear();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DependencyStore> DependencyStore for MemoizedStore<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dependencies(&self, node: &str, transitive: bool) -> Result<Vec<String>> {
        let key = (node.to_string(), transitive);
        if let Some(hit) = self.answers.lock().get(&key) {
            return Ok(hit.clone());
        }

        // The lock is not held across the inner query
        self.misses.fetch_add(1, Ordering::Relaxed);
        let answer = self.inner.dependencies(node, transitive)?;
        self.answers.lock().insert(key, answer.clone());
        Ok(answer)
    }

    fn contains(&self, node: &str) -> bool {
        self.inner.contains(node)
    }

    fn asset_paths(&self) -> Vec<String> {
        self.inner.asset_paths()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestStore;

    #[test]
    fn test_repeated_queries_hit_cache() {
        let store = MemoizedStore::new(ManifestStore::new().with_asset("a", &["b", "c"]));

        for _ in 0..5 {
            assert_eq!(store.dependencies("a", false).unwrap(), vec!["b", "c"]);
        }
        assert_eq!(store.misses(), 1);

        store.dependencies("a", true).unwrap();
        assert_eq!(store.misses(), 2);
        assert_eq!(store.cached(), 2);

        store.clear();
        assert_eq!(store.cached(), 0);
    }

    #[test]
    fn test_errors_not_cached() {
        let store = MemoizedStore::new(ManifestStore::new());

        assert!(store.dependencies("missing", false).is_err());
        assert!(store.dependencies("missing", false).is_err());
        assert_eq!(store.misses(), 2);
        assert_eq!(store.cached(), 0);
    }
}
