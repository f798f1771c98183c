use calamine::{Data, Reader, open_workbook_auto};

use crate::core::error::{MerchsumError, Result};
use crate::core::types::DataTable;

use std::path::Path;

/// Read the first worksheet of a spreadsheet export into a table.
pub fn read_sheet_table(path: &Path, headerless: bool) -> Result<DataTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            MerchsumError::Parse(format!("No worksheets in {}", path.display()))
        })??;

    let mut rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    if headerless {
        return Ok(DataTable::headerless(rows));
    }

    if rows.is_empty() {
        return Ok(DataTable::new(Vec::new(), Vec::new()));
    }

    let headers = rows.remove(0);
    Ok(DataTable::new(headers, rows))
}

/// Spreadsheet cells carry types; tables are stringly. Whole-number
/// floats lose their trailing `.0` so they look the way the same value
/// would in a CSV export.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_cell_to_string__empty() {
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn test_cell_to_string__string() {
        assert_eq!(
            cell_to_string(&Data::String("Acme LLC".to_string())),
            "Acme LLC"
        );
    }

    #[test]
    fn test_cell_to_string__whole_float_drops_fraction() {
        assert_eq!(cell_to_string(&Data::Float(1500.0)), "1500");
        assert_eq!(cell_to_string(&Data::Float(-42.0)), "-42");
    }

    #[test]
    fn test_cell_to_string__fractional_float_kept() {
        assert_eq!(cell_to_string(&Data::Float(19.99)), "19.99");
    }

    #[test]
    fn test_cell_to_string__int() {
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
    }

    #[test]
    fn test_cell_to_string__bool() {
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
        assert_eq!(cell_to_string(&Data::Bool(false)), "false");
    }

    #[test]
    fn test_cell_to_string__iso_datetime_passthrough() {
        assert_eq!(
            cell_to_string(&Data::DateTimeIso("2024-06-01T00:00:00".to_string())),
            "2024-06-01T00:00:00"
        );
    }

    #[test]
    fn test_read_sheet_table__missing_file() {
        let result = read_sheet_table(Path::new("definitely-not-here.xlsx"), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_sheet_table__rejects_non_spreadsheet_content() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("fake.xlsx");
        std::fs::write(&path, "this is not a spreadsheet")?;

        let result = read_sheet_table(&path, false);
        assert!(result.is_err());

        Ok(())
    }
}
