//! XLSX handler

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

/// Extract spreadsheet text sheet by sheet, row by row.
///
/// For every row with populated cells the comma-joined row comes first (only
/// when two or more cells are populated), followed by each populated cell on
/// its own. A row of `John Jones | 336-555-1212` therefore yields
/// `"John Jones,336-555-1212"`, `"John Jones"`, `"336-555-1212"`.
pub fn extract(bytes: &[u8]) -> Result<Vec<String>, String> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut lines = Vec::new();

    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| format!("sheet '{}': {}", sheet_name, e))?;

        for row in range.rows() {
            let cells: Vec<String> = row.iter().filter_map(cell_text).collect();
            if cells.len() > 1 {
                lines.push(cells.join(","));
            }
            lines.extend(cells);
        }
    }

    Ok(lines)
}

/// Textual value of a populated cell
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        // f64 Display drops the fractional part of integral values
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => Some(dt.to_string()),
    }
}
