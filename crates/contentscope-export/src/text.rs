//! Aligned text table

use std::io::Write;

use contentscope_core::{ContentRow, ContentTable};

use crate::ExportResult;

const HEADERS: [&str; 4] = ["File Name", "Referenced By", "Size", "Full Path"];

/// "Referenced By" cell; `-` for unreferenced rows
pub fn referenced_by_cell(row: &ContentRow) -> String {
    if row.referenced_by.is_empty() {
        "-".to_string()
    } else {
        row.referenced_by.join(", ")
    }
}

pub fn size_cell(row: &ContentRow) -> String {
    format!("{:.1} KB", row.size_kb())
}

/// Footer line, e.g. `Total: 3 assets, 1.00 MB`
pub fn summary_line(table: &ContentTable) -> String {
    format!("Total: {} assets, {:.2} MB", table.len(), table.total_mb())
}

pub fn write_table<W: Write>(table: &ContentTable, mut writer: W) -> ExportResult<()> {
    let cells: Vec<[String; 4]> = table
        .iter()
        .map(|row| {
            [
                row.file_name.clone(),
                referenced_by_cell(row),
                size_cell(row),
                row.path.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let [name_w, refs_w, size_w, _] = widths;

    writeln!(
        writer,
        "{:<name_w$}  {:<refs_w$}  {:>size_w$}  {}",
        HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3]
    )?;
    writeln!(
        writer,
        "{:-<name_w$}  {:-<refs_w$}  {:->size_w$}  {:-<9}",
        "", "", "", ""
    )?;

    for [name, refs, size, path] in &cells {
        writeln!(writer, "{:<name_w$}  {:<refs_w$}  {:>size_w$}  {}", name, refs, size, path)?;
    }

    writeln!(writer)?;
    writeln!(writer, "{}", summary_line(table))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn render(table: &ContentTable) -> String {
        let mut buf = Vec::new();
        write_table(table, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_rows_and_footer() {
        let text = render(&fixtures::table());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("File Name"));
        assert!(lines[2].contains("Main.unity, stone.mat"));
        assert!(lines[2].contains("2.0 KB"));
        assert!(lines[2].ends_with("Assets/Textures/rock.png"));
        assert_eq!(lines.last().copied(), Some("Total: 3 assets, 1.00 MB"));
    }

    #[test]
    fn test_unreferenced_shows_dash() {
        let table = fixtures::table();
        assert_eq!(referenced_by_cell(&table.rows[2]), "-");
        assert_eq!(size_cell(&table.rows[1]), "0.5 KB");
    }

    #[test]
    fn test_empty_table() {
        let text = render(&ContentTable::default());
        assert!(text.ends_with("Total: 0 assets, 0.00 MB\n"));
    }
}
