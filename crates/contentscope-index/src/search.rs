//! Row filtering and ordering

use contentscope_core::ContentRow;
use contentscope_store::path::{get_extension, glob_match_ignore_case};

/// Row query builder
#[derive(Debug, Clone, Default)]
pub struct RowQuery {
    /// Full path pattern (glob, case-insensitive)
    pub pattern: Option<String>,
    /// File extension filter
    pub extension: Option<String>,
    /// Minimum size in bytes
    pub min_size: Option<u64>,
    /// Maximum size in bytes
    pub max_size: Option<u64>,
    /// Only rows referenced by this display name
    pub referenced_by: Option<String>,
    /// Only rows nothing references
    pub unreferenced_only: bool,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }

    pub fn with_size_range(mut self, min: u64, max: u64) -> Self {
        self.min_size = Some(min);
        self.max_size = Some(max);
        self
    }

    pub fn with_referrer(mut self, name: impl Into<String>) -> Self {
        self.referenced_by = Some(name.into());
        self
    }

    pub fn unreferenced(mut self) -> Self {
        self.unreferenced_only = true;
        self
    }

    /// Check if a row matches every set filter
    pub fn matches(&self, row: &ContentRow) -> bool {
        if let Some(ref pattern) = self.pattern {
            if !glob_match_ignore_case(pattern, &row.path) {
                return false;
            }
        }

        if let Some(ref ext) = self.extension {
            let ext = ext.trim_start_matches('.');
            if !get_extension(&row.path).is_some_and(|e| e.eq_ignore_ascii_case(ext)) {
                return false;
            }
        }

        if self.min_size.is_some_and(|min| row.size_bytes < min) {
            return false;
        }

        if self.max_size.is_some_and(|max| row.size_bytes > max) {
            return false;
        }

        if let Some(ref name) = self.referenced_by {
            if !row.referenced_by.iter().any(|r| r == name) {
                return false;
            }
        }

        !(self.unreferenced_only && !row.is_unreferenced())
    }

    /// Rows of `rows` matching this query, original order
    pub fn filter<'a>(&self, rows: &'a [ContentRow]) -> Vec<&'a ContentRow> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Row ordering for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Discovery order (no sort)
    #[default]
    Discovery,
    /// File name, then full path
    Name,
    /// Largest first
    Size,
    /// Most referenced first
    References,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "discovery" => Ok(SortKey::Discovery),
            "name" => Ok(SortKey::Name),
            "size" => Ok(SortKey::Size),
            "refs" | "references" => Ok(SortKey::References),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

/// Sort rows in place; stable, so ties keep discovery order
pub fn sort_rows(rows: &mut [ContentRow], key: SortKey) {
    match key {
        SortKey::Discovery => {}
        SortKey::Name => rows.sort_by(|a, b| a.file_name.cmp(&b.file_name).then_with(|| a.path.cmp(&b.path))),
        SortKey::Size => rows.sort_by_key(|r| std::cmp::Reverse(r.size_bytes)),
        SortKey::References => rows.sort_by_key(|r| std::cmp::Reverse(r.referenced_by.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentscope_core::AssetRef;

    fn row(path: &str, size: u64, refs: &[&str]) -> ContentRow {
        let mut row = ContentRow::new(&AssetRef::new(path), size);
        row.referenced_by = refs.iter().map(|s| s.to_string()).collect();
        row
    }

    fn sample() -> Vec<ContentRow> {
        vec![
            row("Assets/Textures/rock.png", 4096, &["Main.unity", "Stone.mat"]),
            row("Assets/Materials/Stone.mat", 512, &["Main.unity"]),
            row("Assets/Audio/theme.ogg", 1 << 20, &[]),
        ]
    }

    #[test]
    fn test_pattern_and_extension() {
        let rows = sample();
        assert_eq!(RowQuery::new().with_pattern("*textures*").filter(&rows).len(), 1);
        assert_eq!(RowQuery::new().with_extension(".MAT").filter(&rows).len(), 1);
        assert_eq!(RowQuery::new().filter(&rows).len(), 3);
    }

    #[test]
    fn test_size_and_references() {
        let rows = sample();
        assert_eq!(RowQuery::new().with_size_range(1000, 10_000).filter(&rows).len(), 1);
        assert_eq!(RowQuery::new().with_referrer("Main.unity").filter(&rows).len(), 2);

        let orphans = RowQuery::new().unreferenced().filter(&rows);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].file_name, "theme.ogg");
    }

    #[test]
    fn test_sort_rows() {
        let mut rows = sample();
        sort_rows(&mut rows, SortKey::Size);
        assert_eq!(rows[0].file_name, "theme.ogg");

        sort_rows(&mut rows, SortKey::Name);
        assert_eq!(rows[0].file_name, "Stone.mat");

        sort_rows(&mut rows, SortKey::References);
        assert_eq!(rows[0].file_name, "rock.png");

        assert_eq!("refs".parse::<SortKey>().unwrap(), SortKey::References);
        assert!("bogus".parse::<SortKey>().is_err());
    }
}
