//! contentscope-export
//!
//! Renders a [`ContentTable`] for people and tools:
//! - text (aligned columns with a totals footer)
//! - JSON (rows plus optional metadata)
//! - CSV (one line per row, referrers joined by `;`)

pub mod csv;
pub mod json;
pub mod text;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use contentscope_core::ContentTable;

pub use json::{JsonExportOptions, JsonExporter};

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Writes tables in one format
#[derive(Debug, Clone, Default)]
pub struct TableExporter {
    format: ExportFormat,
    json: JsonExportOptions,
}

impl TableExporter {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            json: JsonExportOptions::default(),
        }
    }

    /// Options used when the format is JSON
    pub fn with_json_options(mut self, options: JsonExportOptions) -> Self {
        self.json = options;
        self
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn write<W: Write>(&self, table: &ContentTable, writer: W) -> ExportResult<()> {
        match self.format {
            ExportFormat::Text => text::write_table(table, writer),
            ExportFormat::Json => JsonExporter::with_options(self.json.clone()).write_table(table, writer),
            ExportFormat::Csv => csv::write_table(table, writer),
        }
    }

    /// Render to a string
    pub fn render(&self, table: &ContentTable) -> ExportResult<String> {
        let mut buf = Vec::new();
        self.write(table, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write to a file, replacing it
    pub fn export_to_file(&self, table: &ContentTable, output_path: impl AsRef<Path>) -> ExportResult<()> {
        let mut writer = BufWriter::new(File::create(output_path)?);
        self.write(table, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Csv.extension(), "csv");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contents.csv");

        TableExporter::new(ExportFormat::Csv)
            .export_to_file(&fixtures::table(), &path)
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 4);
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let table = fixtures::table();
        let text = TableExporter::new(ExportFormat::Text).render(&table).unwrap();
        let json = TableExporter::new(ExportFormat::Json).render(&table).unwrap();

        assert!(text.starts_with("File Name"));
        assert!(json.trim_start().starts_with('{'));
    }
}
