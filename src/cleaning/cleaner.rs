use async_trait::async_trait;
use chrono::NaiveDate;
use futures::{StreamExt, stream};
use rustc_hash::FxHashSet;
use serde::Serialize;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use crate::cleaning::rules;
use crate::config::Config;
use crate::core::constants::{defaults, quality};
use crate::core::error::Result;
use crate::core::types::{DataTable, DatasetKind, SourceFile};
use crate::ingest;
use crate::reporting::logging;
use crate::ui::progress::ProgressReporter;

/// Why a row was removed during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCategory {
    BlankKeyFields,
    Duplicate,
    NonItemRow,
    MissingBusinessName,
    MissingItemName,
    NegativeAmount,
    EmptyRow,
}

impl IssueCategory {
    pub fn description(&self) -> &'static str {
        match self {
            IssueCategory::BlankKeyFields => "no usable contact fields",
            IssueCategory::Duplicate => "duplicate of an earlier row",
            IssueCategory::NonItemRow => "not an item row",
            IssueCategory::MissingBusinessName => "missing legal business name",
            IssueCategory::MissingItemName => "missing item name",
            IssueCategory::NegativeAmount => "negative amount",
            IssueCategory::EmptyRow => "empty row",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// One removed row. Row numbers are 1-based positions among the data
/// rows of the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanIssue {
    pub row: usize,
    pub category: IssueCategory,
    pub detail: String,
}

impl CleanIssue {
    fn new(row: usize, category: IssueCategory) -> Self {
        Self {
            row,
            category,
            detail: String::new(),
        }
    }

    fn with_detail(row: usize, category: IssueCategory, detail: impl Into<String>) -> Self {
        Self {
            row,
            category,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for CleanIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "row {} - {}", self.row, self.category)
        } else {
            write!(f, "row {} - {} ({})", self.row, self.category, self.detail)
        }
    }
}

/// Per-file summary, serialized into the cleaning report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCleanDetail {
    pub file_type: String,
    pub original_rows: usize,
    pub cleaned_rows: usize,
    pub rows_removed: usize,
    pub removal_rate: f64,
}

impl FileCleanDetail {
    pub fn new(kind: DatasetKind, original_rows: usize, cleaned_rows: usize) -> Self {
        let rows_removed = original_rows.saturating_sub(cleaned_rows);
        let removal_rate = if original_rows > 0 {
            rows_removed as f64 / original_rows as f64 * 100.0
        } else {
            0.0
        };

        Self {
            file_type: kind.as_str().to_string(),
            original_rows,
            cleaned_rows,
            rows_removed,
            removal_rate,
        }
    }
}

/// Aggregate statistics over one cleaning run, serialized as the
/// `summary` section of the cleaning report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanStats {
    pub files_processed: usize,
    pub files_cleaned: usize,
    pub total_rows_before: usize,
    pub total_rows_after: usize,
    pub errors: Vec<String>,
    pub cleaning_details: BTreeMap<String, FileCleanDetail>,
}

impl CleanStats {
    pub fn overall_removal_rate(&self) -> f64 {
        if self.total_rows_before == 0 {
            return 0.0;
        }
        (self.total_rows_before - self.total_rows_after) as f64 / self.total_rows_before as f64
            * 100.0
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A cleaned table plus the rows that were removed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TableClean {
    pub table: DataTable,
    pub issues: Vec<CleanIssue>,
}

/// Result of cleaning a single file end to end.
#[derive(Debug, Clone)]
pub struct CleanedFile {
    pub source: SourceFile,
    pub table: DataTable,
    pub detail: FileCleanDetail,
    pub issues: Vec<CleanIssue>,
    pub output_path: Option<PathBuf>,
}

/// Everything a cleaning run produced, with per-file tables retained
/// for the analytics stage.
#[derive(Debug, Clone, Default)]
pub struct CleanRun {
    pub files: Vec<CleanedFile>,
    pub stats: CleanStats,
}

impl CleanRun {
    /// Cleaned tables of one dataset kind, in stable file order.
    pub fn tables_of_kind(&self, kind: DatasetKind) -> Vec<&CleanedFile> {
        self.files.iter().filter(|f| f.source.kind == kind).collect()
    }
}

/// Data-quality recommendations derived from run statistics.
pub fn generate_recommendations(stats: &CleanStats) -> Vec<String> {
    let mut recommendations = Vec::new();

    if stats.has_errors() {
        recommendations
            .push("Review and fix files that encountered errors during cleaning".to_string());
    }

    let total_removal_rate = stats.overall_removal_rate();

    if total_removal_rate > quality::REMOVAL_WARN_PERCENT {
        recommendations
            .push("High data removal rate detected - review data collection processes".to_string());
    }

    if total_removal_rate > quality::REMOVAL_CRITICAL_PERCENT {
        recommendations
            .push("CRITICAL: Over 50% of data removed - investigate data quality issues".to_string());
    }

    for (filename, details) in &stats.cleaning_details {
        if details.removal_rate > quality::FILE_REMOVAL_WARN_PERCENT {
            recommendations.push(format!(
                "High removal rate in {filename} ({:.1}%) - review data quality",
                details.removal_rate
            ));
        }
    }

    if recommendations.is_empty() {
        recommendations.push("Data quality looks good - minimal cleaning required".to_string());
    }

    recommendations
}

#[async_trait]
pub trait CleanFiles {
    async fn clean_files_with_config(
        &self,
        sources: Vec<SourceFile>,
        config: &Config,
        write_outputs: bool,
        progress: Option<&mut ProgressReporter>,
    ) -> Result<CleanRun>;
}

#[derive(Default, Debug)]
pub struct Cleaner {}

#[async_trait]
impl CleanFiles for Cleaner {
    async fn clean_files_with_config(
        &self,
        sources: Vec<SourceFile>,
        config: &Config,
        write_outputs: bool,
        mut progress: Option<&mut ProgressReporter>,
    ) -> Result<CleanRun> {
        let total = sources.len();

        if let Some(ref mut prog) = progress {
            prog.start_file_cleaning(total);
        }

        let out_dir = config.out_dir_path();
        let backup_dir = config.backup_dir_path();
        let backup = !config.no_backup.unwrap_or(false);

        if write_outputs {
            tokio::fs::create_dir_all(&out_dir).await?;
            if backup {
                tokio::fs::create_dir_all(&backup_dir).await?;
            }
        }

        // Parsing happens up front on the CPU pool, the async stage
        // only does file IO
        let tables = ingest::read_tables(&sources);
        let today = chrono::Local::now().date_naive();

        let thread_count = config.threads.unwrap_or_else(num_cpus::get);
        let concurrency = Self::calculate_concurrency(total, thread_count);
        let progress_counter = Arc::new(AtomicUsize::new(0));
        let progress_ref = progress.as_ref();

        let mut outcomes = stream::iter(tables)
            .map(|(source, read_result)| {
                let out_dir = &out_dir;
                let backup_dir = &backup_dir;
                let progress_counter = Arc::clone(&progress_counter);
                async move {
                    let outcome = match read_result {
                        Ok(table) => {
                            Self::process_file(
                                &source,
                                table,
                                today,
                                out_dir,
                                backup_dir,
                                backup,
                                write_outputs,
                            )
                            .await
                        }
                        Err(err) => Err(err),
                    };

                    let current = progress_counter.fetch_add(1, AtomicOrdering::Relaxed) + 1;
                    if let Some(prog) = progress_ref {
                        prog.update_file_progress(current, &source.file_name());
                    }

                    (source, outcome)
                }
            })
            .buffer_unordered(concurrency);

        let mut results = Vec::with_capacity(total);
        while let Some(outcome) = outcomes.next().await {
            results.push(outcome);
        }

        // buffer_unordered completes in arbitrary order
        results.sort_by(|a, b| a.0.path.cmp(&b.0.path));

        let mut run = CleanRun::default();
        for (source, outcome) in results {
            run.stats.files_processed += 1;
            match outcome {
                Ok(cleaned) => {
                    logging::log_file_result(
                        &source.file_name(),
                        cleaned.detail.original_rows,
                        cleaned.detail.cleaned_rows,
                    );
                    run.stats.files_cleaned += 1;
                    run.stats.total_rows_before += cleaned.detail.original_rows;
                    run.stats.total_rows_after += cleaned.detail.cleaned_rows;
                    run.stats
                        .cleaning_details
                        .insert(source.file_name(), cleaned.detail.clone());
                    run.files.push(cleaned);
                }
                Err(err) => {
                    run.stats
                        .errors
                        .push(format!("Error processing {}: {err}", source.file_name()));
                }
            }
        }

        if let Some(prog) = progress_ref {
            prog.update_file_progress(total, "");
            prog.finish_file_cleaning(run.stats.files_cleaned, run.stats.files_processed);
        }

        Ok(run)
    }
}

impl Cleaner {
    /// Apply the cleaning rules for one dataset kind to a table.
    pub fn clean_table(kind: DatasetKind, table: &DataTable, today: NaiveDate) -> TableClean {
        match kind {
            DatasetKind::Customer => Self::clean_customer_table(table, today),
            DatasetKind::Sales => Self::clean_sales_table(table),
            DatasetKind::Business => Self::clean_business_table(table),
            DatasetKind::Inventory => Self::clean_inventory_table(table),
            DatasetKind::Unknown => Self::clean_unknown_table(table),
        }
    }

    async fn process_file(
        source: &SourceFile,
        table: DataTable,
        today: NaiveDate,
        out_dir: &std::path::Path,
        backup_dir: &std::path::Path,
        backup: bool,
        write_outputs: bool,
    ) -> Result<CleanedFile> {
        if write_outputs && backup {
            let backup_path = backup_dir.join(source.file_name());
            if !tokio::fs::try_exists(&backup_path).await.unwrap_or(false) {
                tokio::fs::copy(&source.path, &backup_path).await?;
            }
        }

        let original_rows = table.row_count();
        let TableClean { table, issues } = Self::clean_table(source.kind, &table, today);
        let detail = FileCleanDetail::new(source.kind, original_rows, table.row_count());

        let output_path = if write_outputs {
            // Cleaned artifacts are always CSV, whatever the source was
            let stem = source
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| source.file_name());
            let path = out_dir.join(format!("{stem}.csv"));
            let bytes = ingest::csv::write_csv_bytes(&table)?;
            tokio::fs::write(&path, bytes).await?;
            Some(path)
        } else {
            None
        };

        Ok(CleanedFile {
            source: source.clone(),
            table,
            detail,
            issues,
            output_path,
        })
    }

    fn calculate_concurrency(file_count: usize, thread_count: usize) -> usize {
        let base = thread_count.max(1);
        match file_count {
            0..=4 => base.min(2),
            5..=64 => base.min(8),
            _ => base.min(16),
        }
    }

    fn clean_customer_table(table: &DataTable, today: NaiveDate) -> TableClean {
        let key_columns: Vec<usize> = [
            "First Name",
            "Last Name",
            "Email Address",
            "Phone Number",
        ]
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();

        let phone_col = table.column_index("Phone Number");
        let email_col = table.column_index("Email Address");
        let name_cols: Vec<usize> = ["First Name", "Last Name"]
            .iter()
            .filter_map(|name| table.column_index(name))
            .collect();
        let since_col = table.column_index("Customer Since");

        let mut issues = Vec::new();
        let mut kept: Vec<(usize, Vec<String>)> = Vec::new();

        for (idx, row) in table.rows.iter().enumerate() {
            let row_number = idx + 1;

            if !key_columns.is_empty()
                && key_columns.iter().all(|&col| cell_is_blank(row, col))
            {
                issues.push(CleanIssue::new(row_number, IssueCategory::BlankKeyFields));
                continue;
            }

            let mut row = row.clone();

            if let Some(col) = phone_col {
                row[col] = rules::clean_phone(&row[col]).unwrap_or_default();
            }
            if let Some(col) = email_col {
                row[col] = rules::clean_email(&row[col]).unwrap_or_default();
            }
            for &col in &name_cols {
                row[col] = rules::clean_name(&row[col]).unwrap_or_default();
            }
            if let Some(col) = since_col {
                row[col] = match rules::parse_loose_date(&row[col]) {
                    Some(date) if date > today => String::new(),
                    Some(date) => date.format("%Y-%m-%d").to_string(),
                    None => String::new(),
                };
            }

            kept.push((row_number, row));
        }

        // Deduplicate on email when the column exists, otherwise on
        // phone. Blank keys never count as duplicates of each other.
        let dedup_col = email_col.or(phone_col);
        let rows = match dedup_col {
            Some(col) => {
                let mut seen = FxHashSet::default();
                let mut rows = Vec::with_capacity(kept.len());
                for (row_number, row) in kept {
                    let key = row[col].clone();
                    if key.is_empty() || seen.insert(key.clone()) {
                        rows.push(row);
                    } else {
                        issues.push(CleanIssue::with_detail(
                            row_number,
                            IssueCategory::Duplicate,
                            key,
                        ));
                    }
                }
                rows
            }
            None => kept.into_iter().map(|(_, row)| row).collect(),
        };

        TableClean {
            table: DataTable::new(table.headers.clone(), rows),
            issues,
        }
    }

    fn clean_sales_table(table: &DataTable) -> TableClean {
        let widest_row = table.rows.iter().map(|row| row.len()).max().unwrap_or(0);
        if widest_row <= 1 {
            return TableClean {
                table: table.clone(),
                issues: Vec::new(),
            };
        }

        let item_flags: Vec<bool> = table
            .rows
            .iter()
            .map(|row| row.get(1).map(|cell| rules::is_numeric_like(cell)).unwrap_or(false))
            .collect();

        // A report with no recognizable item rows passes through
        // untouched rather than being reduced to its preamble
        if !item_flags.iter().any(|&flag| flag) {
            return TableClean {
                table: table.clone(),
                issues: Vec::new(),
            };
        }

        let mut issues = Vec::new();
        let mut rows = Vec::with_capacity(table.rows.len());
        for (idx, row) in table.rows.iter().enumerate() {
            if idx < defaults::SALES_PREAMBLE_ROWS || item_flags[idx] {
                rows.push(row.clone());
            } else {
                issues.push(CleanIssue::new(idx + 1, IssueCategory::NonItemRow));
            }
        }

        TableClean {
            table: DataTable::headerless(rows),
            issues,
        }
    }

    fn clean_business_table(table: &DataTable) -> TableClean {
        let name_col = table.column_index("Legal Business Name");
        let volume_cols: Vec<usize> = ["MTD Volume", "Last Month Volume", "Total Volume"]
            .iter()
            .filter_map(|name| table.column_index(name))
            .collect();
        let registration_col = table.column_index("Registration Date");

        let mut issues = Vec::new();
        let mut kept: Vec<(usize, Vec<String>)> = Vec::new();

        for (idx, row) in table.rows.iter().enumerate() {
            let row_number = idx + 1;

            if let Some(col) = name_col
                && cell_is_blank(row, col)
            {
                issues.push(CleanIssue::new(
                    row_number,
                    IssueCategory::MissingBusinessName,
                ));
                continue;
            }

            let mut row = row.clone();

            for &col in &volume_cols {
                row[col] = rules::parse_number(&row[col])
                    .map(|value| value.to_string())
                    .unwrap_or_default();
            }
            if let Some(col) = registration_col {
                row[col] = rules::parse_loose_date(&row[col])
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
            }

            kept.push((row_number, row));
        }

        let rows = match name_col {
            Some(col) => {
                let mut seen = FxHashSet::default();
                let mut rows = Vec::with_capacity(kept.len());
                for (row_number, row) in kept {
                    let key = row[col].trim().to_string();
                    if key.is_empty() || seen.insert(key.clone()) {
                        rows.push(row);
                    } else {
                        issues.push(CleanIssue::with_detail(
                            row_number,
                            IssueCategory::Duplicate,
                            key,
                        ));
                    }
                }
                rows
            }
            None => kept.into_iter().map(|(_, row)| row).collect(),
        };

        TableClean {
            table: DataTable::new(table.headers.clone(), rows),
            issues,
        }
    }

    fn clean_inventory_table(table: &DataTable) -> TableClean {
        let name_col = table.first_column_index(&["Name", "Item Name", "Product Name"]);
        let price_cols: Vec<usize> = ["Price", "Cost", "Sale Price"]
            .iter()
            .filter_map(|name| table.column_index(name))
            .collect();

        let mut issues = Vec::new();
        let mut kept: Vec<(usize, Vec<String>)> = Vec::new();

        'rows: for (idx, row) in table.rows.iter().enumerate() {
            let row_number = idx + 1;

            if let Some(col) = name_col
                && cell_is_blank(row, col)
            {
                issues.push(CleanIssue::new(row_number, IssueCategory::MissingItemName));
                continue;
            }

            let mut row = row.clone();

            for &col in &price_cols {
                match rules::parse_number(&row[col]) {
                    Some(value) if value.is_sign_negative() && !value.is_zero() => {
                        issues.push(CleanIssue::with_detail(
                            row_number,
                            IssueCategory::NegativeAmount,
                            table.headers[col].clone(),
                        ));
                        continue 'rows;
                    }
                    Some(value) => row[col] = value.to_string(),
                    None => row[col] = String::new(),
                }
            }

            kept.push((row_number, row));
        }

        let rows = match name_col {
            Some(col) => {
                let mut seen = FxHashSet::default();
                let mut rows = Vec::with_capacity(kept.len());
                for (row_number, row) in kept {
                    let key = row[col].trim().to_string();
                    if key.is_empty() || seen.insert(key.clone()) {
                        rows.push(row);
                    } else {
                        issues.push(CleanIssue::with_detail(
                            row_number,
                            IssueCategory::Duplicate,
                            key,
                        ));
                    }
                }
                rows
            }
            None => kept.into_iter().map(|(_, row)| row).collect(),
        };

        TableClean {
            table: DataTable::new(table.headers.clone(), rows),
            issues,
        }
    }

    fn clean_unknown_table(table: &DataTable) -> TableClean {
        let mut issues = Vec::new();
        let mut rows = Vec::with_capacity(table.rows.len());

        for (idx, row) in table.rows.iter().enumerate() {
            if DataTable::is_blank_row(row) {
                issues.push(CleanIssue::new(idx + 1, IssueCategory::EmptyRow));
            } else {
                rows.push(row.clone());
            }
        }

        let table = if table.is_headerless() {
            DataTable::headerless(rows)
        } else {
            DataTable::new(table.headers.clone(), rows)
        };

        TableClean { table, issues }
    }
}

fn cell_is_blank(row: &[String], col: usize) -> bool {
    row.get(col).map(|cell| cell.trim().is_empty()).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn customer_table(rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::new(
            vec![
                "First Name".to_string(),
                "Last Name".to_string(),
                "Email Address".to_string(),
                "Phone Number".to_string(),
                "Customer Since".to_string(),
            ],
            rows.into_iter()
                .map(|row| row.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    #[test]
    fn test_clean_customer_table__drops_rows_with_all_key_fields_blank() {
        let table = customer_table(vec![
            vec!["jane", "doe", "jane@example.com", "3035550123", "2024-01-01"],
            vec!["", "", "", "", "2024-01-01"],
        ]);

        let result = Cleaner::clean_table(DatasetKind::Customer, &table, today());

        assert_eq!(result.table.row_count(), 1);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].category, IssueCategory::BlankKeyFields);
        assert_eq!(result.issues[0].row, 2);
    }

    #[test]
    fn test_clean_customer_table__normalizes_fields() {
        let table = customer_table(vec![vec![
            "jane",
            "DOE",
            " Jane.Doe@Example.COM ",
            " (303) 555-0123 ",
            "01/15/2024",
        ]]);

        let result = Cleaner::clean_table(DatasetKind::Customer, &table, today());

        let row = &result.table.rows[0];
        assert_eq!(row[0], "Jane");
        assert_eq!(row[1], "Doe");
        assert_eq!(row[2], "jane.doe@example.com");
        assert_eq!(row[3], "(303) 555-0123");
        assert_eq!(row[4], "2024-01-15");
    }

    #[test]
    fn test_clean_customer_table__blanks_invalid_fields_but_keeps_row() {
        let table = customer_table(vec![vec![
            "j",
            "12345",
            "not-an-email",
            "555",
            "garbage-date",
        ]]);

        let result = Cleaner::clean_table(DatasetKind::Customer, &table, today());

        assert_eq!(result.table.row_count(), 1);
        let row = &result.table.rows[0];
        assert_eq!(row, &vec!["", "", "", "", ""]);
    }

    #[test]
    fn test_clean_customer_table__clears_future_signup_dates() {
        let table = customer_table(vec![vec![
            "jane",
            "doe",
            "jane@example.com",
            "3035550123",
            "2030-01-01",
        ]]);

        let result = Cleaner::clean_table(DatasetKind::Customer, &table, today());

        assert_eq!(result.table.rows[0][4], "");
    }

    #[test]
    fn test_clean_customer_table__deduplicates_by_email_keeping_first() {
        let table = customer_table(vec![
            vec!["jane", "doe", "jane@example.com", "3035550123", ""],
            vec!["janet", "doe", "JANE@example.com", "3035550124", ""],
            vec!["john", "smith", "john@example.com", "3035550125", ""],
        ]);

        let result = Cleaner::clean_table(DatasetKind::Customer, &table, today());

        assert_eq!(result.table.row_count(), 2);
        assert_eq!(result.table.rows[0][0], "Jane");
        assert_eq!(result.table.rows[1][0], "John");
        let dupes: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.category == IssueCategory::Duplicate)
            .collect();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].detail, "jane@example.com");
    }

    #[test]
    fn test_clean_customer_table__blank_emails_are_not_duplicates() {
        let table = customer_table(vec![
            vec!["jane", "doe", "", "3035550123", ""],
            vec!["john", "smith", "", "3035550124", ""],
        ]);

        let result = Cleaner::clean_table(DatasetKind::Customer, &table, today());

        assert_eq!(result.table.row_count(), 2);
    }

    #[test]
    fn test_clean_customer_table__dedups_by_phone_without_email_column() {
        let table = DataTable::new(
            vec!["First Name".to_string(), "Phone Number".to_string()],
            vec![
                vec!["jane".to_string(), "3035550123".to_string()],
                vec!["janet".to_string(), "3035550123".to_string()],
            ],
        );

        let result = Cleaner::clean_table(DatasetKind::Customer, &table, today());

        assert_eq!(result.table.row_count(), 1);
    }

    #[test]
    fn test_clean_sales_table__keeps_preamble_and_item_rows() {
        let mut rows: Vec<Vec<String>> = (0..10)
            .map(|i| vec![format!("preamble {i}"), String::new()])
            .collect();
        rows.push(vec!["Burger".to_string(), "$10.00".to_string()]);
        rows.push(vec!["A note".to_string(), "not numeric".to_string()]);
        rows.push(vec!["Fries".to_string(), "250".to_string()]);
        let table = DataTable::headerless(rows);

        let result = Cleaner::clean_table(DatasetKind::Sales, &table, today());

        assert_eq!(result.table.row_count(), 12);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].category, IssueCategory::NonItemRow);
        assert_eq!(result.issues[0].row, 12);
    }

    #[test]
    fn test_clean_sales_table__single_column_passes_through() {
        let table = DataTable::headerless(vec![
            vec!["line one".to_string()],
            vec!["line two".to_string()],
        ]);

        let result = Cleaner::clean_table(DatasetKind::Sales, &table, today());

        assert_eq!(result.table.row_count(), 2);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_clean_sales_table__no_item_rows_passes_through() {
        let rows: Vec<Vec<String>> = (0..15)
            .map(|i| vec![format!("text {i}"), "more text".to_string()])
            .collect();
        let table = DataTable::headerless(rows);

        let result = Cleaner::clean_table(DatasetKind::Sales, &table, today());

        assert_eq!(result.table.row_count(), 15);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_clean_business_table__requires_legal_name() {
        let table = DataTable::new(
            vec![
                "Legal Business Name".to_string(),
                "MTD Volume".to_string(),
            ],
            vec![
                vec!["Acme LLC".to_string(), "1500".to_string()],
                vec!["  ".to_string(), "900".to_string()],
            ],
        );

        let result = Cleaner::clean_table(DatasetKind::Business, &table, today());

        assert_eq!(result.table.row_count(), 1);
        assert_eq!(
            result.issues[0].category,
            IssueCategory::MissingBusinessName
        );
    }

    #[test]
    fn test_clean_business_table__coerces_volumes_and_dates() {
        let table = DataTable::new(
            vec![
                "Legal Business Name".to_string(),
                "MTD Volume".to_string(),
                "Total Volume".to_string(),
                "Registration Date".to_string(),
            ],
            vec![vec![
                "Acme LLC".to_string(),
                "$1,500.00".to_string(),
                "not-a-number".to_string(),
                "01/15/2024".to_string(),
            ]],
        );

        let result = Cleaner::clean_table(DatasetKind::Business, &table, today());

        let row = &result.table.rows[0];
        assert_eq!(row[1], "1500.00");
        assert_eq!(row[2], "");
        assert_eq!(row[3], "2024-01-15");
    }

    #[test]
    fn test_clean_business_table__deduplicates_by_legal_name() {
        let table = DataTable::new(
            vec!["Legal Business Name".to_string()],
            vec![
                vec!["Acme LLC".to_string()],
                vec!["Acme LLC".to_string()],
                vec!["Other Inc".to_string()],
            ],
        );

        let result = Cleaner::clean_table(DatasetKind::Business, &table, today());

        assert_eq!(result.table.row_count(), 2);
    }

    #[test]
    fn test_clean_inventory_table__requires_item_name() {
        let table = DataTable::new(
            vec!["Name".to_string(), "Price".to_string()],
            vec![
                vec!["Cola".to_string(), "1.99".to_string()],
                vec!["".to_string(), "2.99".to_string()],
            ],
        );

        let result = Cleaner::clean_table(DatasetKind::Inventory, &table, today());

        assert_eq!(result.table.row_count(), 1);
        assert_eq!(result.issues[0].category, IssueCategory::MissingItemName);
    }

    #[test]
    fn test_clean_inventory_table__alternate_name_columns() {
        let table = DataTable::new(
            vec!["Item Name".to_string(), "Price".to_string()],
            vec![vec!["Cola".to_string(), "1.99".to_string()]],
        );

        let result = Cleaner::clean_table(DatasetKind::Inventory, &table, today());

        assert_eq!(result.table.row_count(), 1);
    }

    #[test]
    fn test_clean_inventory_table__drops_negative_prices_keeps_unparseable() {
        let table = DataTable::new(
            vec!["Name".to_string(), "Price".to_string(), "Cost".to_string()],
            vec![
                vec!["Cola".to_string(), "1.99".to_string(), "0.50".to_string()],
                vec!["Refund".to_string(), "-1.99".to_string(), "0.50".to_string()],
                vec!["Mystery".to_string(), "n/a".to_string(), "0.50".to_string()],
            ],
        );

        let result = Cleaner::clean_table(DatasetKind::Inventory, &table, today());

        assert_eq!(result.table.row_count(), 2);
        assert_eq!(result.table.rows[1][1], "");
        let negative: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.category == IssueCategory::NegativeAmount)
            .collect();
        assert_eq!(negative.len(), 1);
        assert_eq!(negative[0].detail, "Price");
    }

    #[test]
    fn test_clean_inventory_table__deduplicates_by_name() {
        let table = DataTable::new(
            vec!["Name".to_string()],
            vec![
                vec!["Cola".to_string()],
                vec!["Cola".to_string()],
            ],
        );

        let result = Cleaner::clean_table(DatasetKind::Inventory, &table, today());

        assert_eq!(result.table.row_count(), 1);
    }

    #[test]
    fn test_clean_unknown_table__drops_fully_blank_rows() {
        let table = DataTable::new(
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec!["1".to_string(), "2".to_string()],
                vec!["".to_string(), "  ".to_string()],
                vec!["3".to_string(), "".to_string()],
            ],
        );

        let result = Cleaner::clean_table(DatasetKind::Unknown, &table, today());

        assert_eq!(result.table.row_count(), 2);
        assert_eq!(result.issues[0].category, IssueCategory::EmptyRow);
    }

    #[test]
    fn test_file_clean_detail__removal_rate() {
        let detail = FileCleanDetail::new(DatasetKind::Customer, 10, 7);
        assert_eq!(detail.rows_removed, 3);
        assert!((detail.removal_rate - 30.0).abs() < f64::EPSILON);
        assert_eq!(detail.file_type, "customer");
    }

    #[test]
    fn test_file_clean_detail__empty_table_has_zero_rate() {
        let detail = FileCleanDetail::new(DatasetKind::Unknown, 0, 0);
        assert_eq!(detail.removal_rate, 0.0);
    }

    #[test]
    fn test_clean_stats__overall_removal_rate() {
        let stats = CleanStats {
            total_rows_before: 200,
            total_rows_after: 150,
            ..Default::default()
        };
        assert!((stats.overall_removal_rate() - 25.0).abs() < f64::EPSILON);

        let empty = CleanStats::default();
        assert_eq!(empty.overall_removal_rate(), 0.0);
    }

    #[test]
    fn test_generate_recommendations__clean_run() {
        let stats = CleanStats {
            total_rows_before: 100,
            total_rows_after: 95,
            ..Default::default()
        };

        let recommendations = generate_recommendations(&stats);

        assert_eq!(
            recommendations,
            vec!["Data quality looks good - minimal cleaning required"]
        );
    }

    #[test]
    fn test_generate_recommendations__errors_listed_first() {
        let stats = CleanStats {
            errors: vec!["Error processing broken.csv: oops".to_string()],
            ..Default::default()
        };

        let recommendations = generate_recommendations(&stats);

        assert_eq!(
            recommendations[0],
            "Review and fix files that encountered errors during cleaning"
        );
    }

    #[test]
    fn test_generate_recommendations__critical_includes_both_thresholds() {
        let stats = CleanStats {
            total_rows_before: 100,
            total_rows_after: 40,
            ..Default::default()
        };

        let recommendations = generate_recommendations(&stats);

        assert!(recommendations.contains(
            &"High data removal rate detected - review data collection processes".to_string()
        ));
        assert!(recommendations.contains(
            &"CRITICAL: Over 50% of data removed - investigate data quality issues".to_string()
        ));
    }

    #[test]
    fn test_generate_recommendations__per_file_high_removal() {
        let mut details = BTreeMap::new();
        details.insert(
            "customers.csv".to_string(),
            FileCleanDetail::new(DatasetKind::Customer, 100, 60),
        );
        let stats = CleanStats {
            total_rows_before: 1000,
            total_rows_after: 960,
            cleaning_details: details,
            ..Default::default()
        };

        let recommendations = generate_recommendations(&stats);

        assert_eq!(
            recommendations,
            vec!["High removal rate in customers.csv (40.0%) - review data quality"]
        );
    }

    #[test]
    fn test_clean_issue__display() {
        let plain = CleanIssue::new(5, IssueCategory::EmptyRow);
        assert_eq!(plain.to_string(), "row 5 - empty row");

        let detailed =
            CleanIssue::with_detail(3, IssueCategory::Duplicate, "jane@example.com");
        assert_eq!(
            detailed.to_string(),
            "row 3 - duplicate of an earlier row (jane@example.com)"
        );
    }

    #[test]
    fn test_calculate_concurrency() {
        assert_eq!(Cleaner::calculate_concurrency(2, 16), 2);
        assert_eq!(Cleaner::calculate_concurrency(20, 16), 8);
        assert_eq!(Cleaner::calculate_concurrency(200, 16), 16);
        assert_eq!(Cleaner::calculate_concurrency(200, 0), 1);
    }

    #[tokio::test]
    async fn test_clean_files_with_config__end_to_end() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let data_dir = temp_dir.path().join("data");
        std::fs::create_dir_all(&data_dir)?;

        let customer_path = data_dir.join("customer-export.csv");
        std::fs::write(
            &customer_path,
            "First Name,Last Name,Email Address,Phone Number\n\
             jane,doe,jane@example.com,3035550123\n\
             janet,doe,jane@example.com,3035550124\n\
             ,,,\n",
        )?;

        let out_dir = temp_dir.path().join("cleaned");
        let backup_dir = temp_dir.path().join("backup");
        let config = Config {
            out_dir: Some(out_dir.display().to_string()),
            backup_dir: Some(backup_dir.display().to_string()),
            threads: Some(2),
            ..Default::default()
        };

        let cleaner = Cleaner::default();
        let run = cleaner
            .clean_files_with_config(
                vec![SourceFile::new(&customer_path)],
                &config,
                true,
                None,
            )
            .await?;

        assert_eq!(run.stats.files_processed, 1);
        assert_eq!(run.stats.files_cleaned, 1);
        assert_eq!(run.stats.total_rows_before, 3);
        assert_eq!(run.stats.total_rows_after, 1);
        assert!(run.stats.errors.is_empty());

        let detail = &run.stats.cleaning_details["customer-export.csv"];
        assert_eq!(detail.file_type, "customer");
        assert_eq!(detail.rows_removed, 2);

        // Cleaned artifact and backup are both on disk
        let cleaned_text = std::fs::read_to_string(out_dir.join("customer-export.csv"))?;
        assert!(cleaned_text.contains("Jane"));
        assert!(!cleaned_text.contains("janet"));
        assert!(backup_dir.join("customer-export.csv").exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_clean_files_with_config__records_read_errors() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let missing = temp_dir.path().join("missing.csv");

        let config = Config {
            out_dir: Some(temp_dir.path().join("cleaned").display().to_string()),
            backup_dir: Some(temp_dir.path().join("backup").display().to_string()),
            ..Default::default()
        };

        let cleaner = Cleaner::default();
        let run = cleaner
            .clean_files_with_config(vec![SourceFile::new(&missing)], &config, true, None)
            .await?;

        assert_eq!(run.stats.files_processed, 1);
        assert_eq!(run.stats.files_cleaned, 0);
        assert_eq!(run.stats.errors.len(), 1);
        assert!(run.stats.errors[0].starts_with("Error processing missing.csv:"));

        Ok(())
    }

    #[tokio::test]
    async fn test_clean_files_with_config__analyze_only_writes_nothing() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let data_path = temp_dir.path().join("inventory-export.csv");
        std::fs::write(&data_path, "Name,Price\nCola,1.99\n")?;

        let out_dir = temp_dir.path().join("cleaned");
        let config = Config {
            out_dir: Some(out_dir.display().to_string()),
            backup_dir: Some(temp_dir.path().join("backup").display().to_string()),
            ..Default::default()
        };

        let cleaner = Cleaner::default();
        let run = cleaner
            .clean_files_with_config(vec![SourceFile::new(&data_path)], &config, false, None)
            .await?;

        assert_eq!(run.stats.files_cleaned, 1);
        assert!(run.files[0].output_path.is_none());
        assert!(!out_dir.exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_clean_files_with_config__no_backup() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let data_path = temp_dir.path().join("inventory-export.csv");
        std::fs::write(&data_path, "Name,Price\nCola,1.99\n")?;

        let backup_dir = temp_dir.path().join("backup");
        let config = Config {
            out_dir: Some(temp_dir.path().join("cleaned").display().to_string()),
            backup_dir: Some(backup_dir.display().to_string()),
            no_backup: Some(true),
            ..Default::default()
        };

        let cleaner = Cleaner::default();
        cleaner
            .clean_files_with_config(vec![SourceFile::new(&data_path)], &config, true, None)
            .await?;

        assert!(!backup_dir.exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_clean_files_with_config__results_in_path_order() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let mut sources = Vec::new();
        for name in ["c-customer.csv", "a-customer.csv", "b-customer.csv"] {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, "First Name\nJane\n")?;
            sources.push(SourceFile::new(&path));
        }

        let config = Config {
            out_dir: Some(temp_dir.path().join("cleaned").display().to_string()),
            backup_dir: Some(temp_dir.path().join("backup").display().to_string()),
            ..Default::default()
        };

        let cleaner = Cleaner::default();
        let run = cleaner
            .clean_files_with_config(sources, &config, true, None)
            .await?;

        let names: Vec<String> = run.files.iter().map(|f| f.source.file_name()).collect();
        assert_eq!(
            names,
            vec!["a-customer.csv", "b-customer.csv", "c-customer.csv"]
        );

        Ok(())
    }

    #[test]
    fn test_tables_of_kind_filters() {
        let run = CleanRun {
            files: vec![
                CleanedFile {
                    source: SourceFile::new("customer.csv"),
                    table: DataTable::new(Vec::new(), Vec::new()),
                    detail: FileCleanDetail::new(DatasetKind::Customer, 0, 0),
                    issues: Vec::new(),
                    output_path: None,
                },
                CleanedFile {
                    source: SourceFile::new("Shop-Revenue.csv"),
                    table: DataTable::headerless(Vec::new()),
                    detail: FileCleanDetail::new(DatasetKind::Sales, 0, 0),
                    issues: Vec::new(),
                    output_path: None,
                },
            ],
            stats: CleanStats::default(),
        };

        assert_eq!(run.tables_of_kind(DatasetKind::Customer).len(), 1);
        assert_eq!(run.tables_of_kind(DatasetKind::Sales).len(), 1);
        assert_eq!(run.tables_of_kind(DatasetKind::Inventory).len(), 0);
    }
}
