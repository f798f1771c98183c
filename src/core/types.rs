//! Fundamental data types shared across the pipeline

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The role a data export plays in the pipeline, derived from its file name.
///
/// Business lists are matched before individual customers so that files like
/// `customer_list.xlsx` land in the business bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Customer,
    Sales,
    Business,
    Inventory,
    Unknown,
}

impl DatasetKind {
    /// Classify a file by its name alone. Matching is case-insensitive
    /// and purely substring based.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();

        if lower.contains("customer_list") || lower.contains("business") {
            DatasetKind::Business
        } else if lower.contains("customer") {
            DatasetKind::Customer
        } else if lower.contains("revenue") || lower.contains("sales") {
            DatasetKind::Sales
        } else if lower.contains("inventory") {
            DatasetKind::Inventory
        } else {
            DatasetKind::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Customer => "customer",
            DatasetKind::Sales => "sales",
            DatasetKind::Business => "business",
            DatasetKind::Inventory => "inventory",
            DatasetKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discovered input file together with its classified kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: DatasetKind,
}

impl SourceFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let kind = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(DatasetKind::from_file_name)
            .unwrap_or(DatasetKind::Unknown);
        Self { path, kind }
    }

    /// File name component as a displayable string
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl Ord for SourceFile {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.path.cmp(&other.path)
    }
}

impl PartialOrd for SourceFile {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// In-memory tabular data parsed from a CSV or XLSX file.
///
/// Columnar kinds carry a header row; sales reports are headerless because
/// revenue exports are free-form line documents rather than uniform tables.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Build a table with headers, padding or truncating every row
    /// to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build a headerless table. Rows keep their original widths.
    pub fn headerless(rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: Vec::new(),
            rows,
        }
    }

    pub fn is_headerless(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of an exactly-named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the first column present out of several candidate names
    pub fn first_column_index(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.column_index(name))
    }

    /// Cell content, if the coordinates exist
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }

    /// True when every cell of the row is blank after trimming
    pub fn is_blank_row(row: &[String]) -> bool {
        row.iter().all(|cell| cell.trim().is_empty())
    }
}
