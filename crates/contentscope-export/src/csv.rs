//! CSV export
//!
//! Header: `file_name,size_kb,referenced_by,full_path`. Referrers are joined
//! with `;` inside a single field.

use std::borrow::Cow;
use std::io::Write;

use contentscope_core::ContentTable;

use crate::ExportResult;

pub const HEADER: &str = "file_name,size_kb,referenced_by,full_path";

pub fn write_table<W: Write>(table: &ContentTable, mut writer: W) -> ExportResult<()> {
    writeln!(writer, "{}", HEADER)?;

    for row in table {
        writeln!(
            writer,
            "{},{:.1},{},{}",
            escape(&row.file_name),
            row.size_kb(),
            escape(&row.referenced_by.join(";")),
            escape(&row.path),
        )?;
    }

    Ok(())
}

/// Quote a field containing a comma, quote or line break
pub fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
