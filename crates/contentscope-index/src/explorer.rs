//! Build contents explorer
//!
//! Holds the most recent [`ContentTable`] for a root set and the current
//! selection. A refresh either replaces the table wholesale or leaves it
//! empty with the failure recorded; partial tables are never exposed.

use tracing::{debug, error, info};

use contentscope_core::{ContentRow, ContentTable, Result, display_name};
use contentscope_store::{ContentFs, DependencyStore};

use crate::builder::DependencyIndexBuilder;
use crate::search::RowQuery;

/// Explorer over one dependency store and filesystem
pub struct ContentsExplorer<S, F> {
    store: S,
    fs: F,
    roots: Vec<String>,
    builder: DependencyIndexBuilder,
    table: ContentTable,
    last_error: Option<String>,
    selected: Option<String>,
}

impl<S, F> ContentsExplorer<S, F>
where
    S: DependencyStore,
    F: ContentFs,
{
    /// Create an explorer; the table stays empty until [`refresh`](Self::refresh)
    pub fn new(store: S, fs: F, roots: Vec<String>) -> Self {
        Self {
            store,
            fs,
            roots,
            builder: DependencyIndexBuilder::default(),
            table: ContentTable::default(),
            last_error: None,
            selected: None,
        }
    }

    pub fn with_builder(mut self, builder: DependencyIndexBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Rebuild the table from the current roots
    ///
    /// On failure the table is emptied, the error is logged once and kept
    /// for [`last_error`](Self::last_error).
    pub fn refresh(&mut self) -> Result<usize> {
        match self.builder.build(&self.roots, &self.store, &self.fs) {
            Ok(table) => {
                info!(
                    assets = table.len(),
                    total_bytes = table.total_bytes(),
                    "Build contents refreshed"
                );
                self.table = table;
                self.last_error = None;
                Ok(self.table.len())
            }
            Err(e) => {
                error!(error = %e, "Failed to build contents table");
                self.table = ContentTable::default();
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn table(&self) -> &ContentTable {
        &self.table
    }

    pub fn rows(&self) -> &[ContentRow] {
        &self.table.rows
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Sum of row sizes from the last refresh
    pub fn total_size_bytes(&self) -> u64 {
        self.table.total_bytes()
    }

    /// Message of the last failed refresh, cleared by a successful one
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Replace the root set; takes effect on the next refresh
    pub fn set_roots(&mut self, roots: Vec<String>) {
        self.roots = roots;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Select the asset at `path`; does nothing if no file backs it
    pub fn select(&mut self, path: &str) -> bool {
        if !self.fs.exists(path) {
            debug!(path = %path, "Selection target missing, ignoring");
            return false;
        }
        self.selected = Some(path.to_string());
        true
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select the first store asset whose display name is `name`
    ///
    /// Used to jump from a "referenced by" entry to that asset. Returns the
    /// selected path, or `None` (selection unchanged) when nothing matches.
    pub fn navigate(&mut self, name: &str) -> Option<String> {
        let target = self
            .store
            .asset_paths()
            .into_iter()
            .find(|p| display_name(p) == name && self.fs.exists(p))?;

        self.selected = Some(target.clone());
        Some(target)
    }

    /// Rows of the current table matching `query`
    pub fn search(&self, query: &RowQuery) -> Vec<&ContentRow> {
        query.filter(&self.table.rows)
    }
}
