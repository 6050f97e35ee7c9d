//! JSON export of build contents

use std::io::Write;

use serde_json::json;

use contentscope_core::{ContentRow, ContentTable};

use crate::ExportResult;

/// JSON export options
#[derive(Debug, Clone)]
pub struct JsonExportOptions {
    /// Use pretty-print formatting
    pub pretty: bool,

    /// Wrap rows in an object with asset count and total size
    pub include_metadata: bool,
}

impl Default for JsonExportOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            include_metadata: true,
        }
    }
}

/// JSON table exporter
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    options: JsonExportOptions,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: JsonExportOptions) -> Self {
        Self { options }
    }

    /// Build the JSON document for a table
    pub fn to_value(&self, table: &ContentTable) -> ExportResult<serde_json::Value> {
        let rows: Vec<serde_json::Value> = table.rows.iter().map(row_value).collect();

        Ok(if self.options.include_metadata {
            json!({
                "metadata": {
                    "asset_count": table.len(),
                    "total_bytes": table.total_bytes(),
                },
                "rows": rows,
            })
        } else {
            serde_json::Value::Array(rows)
        })
    }

    pub fn write_table<W: Write>(&self, table: &ContentTable, mut writer: W) -> ExportResult<()> {
        let value = self.to_value(table)?;

        if self.options.pretty {
            serde_json::to_writer_pretty(&mut writer, &value)?;
        } else {
            serde_json::to_writer(&mut writer, &value)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

/// One row as JSON: the row's fields plus `size_kb`
pub fn row_value(row: &ContentRow) -> serde_json::Value {
    json!({
        "file_name": row.file_name,
        "size_kb": row.size_kb(),
        "size_bytes": row.size_bytes,
        "referenced_by": row.referenced_by,
        "path": row.path,
    })
}
