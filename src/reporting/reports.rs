// JSON report artifacts written at the end of a run

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analytics::engine::AnalyticsReport;
use crate::cleaning::cleaner::{self, CleanStats};
use crate::core::constants::files;
use crate::core::error::Result;

/// Payload of `cleaning_report.json`.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    pub cleaning_date: String,
    pub summary: CleanStats,
    pub recommendations: Vec<String>,
}

impl CleaningReport {
    pub fn new(summary: CleanStats) -> Self {
        Self {
            cleaning_date: timestamp(),
            recommendations: cleaner::generate_recommendations(&summary),
            summary,
        }
    }
}

/// Write the cleaning report into `out_dir`, returning the path written.
pub fn write_cleaning_report(report: &CleaningReport, out_dir: &Path) -> Result<PathBuf> {
    write_json(out_dir, files::CLEANING_REPORT, report)
}

/// Write the analytics report into `out_dir`, returning the path written.
pub fn write_refined_report(report: &AnalyticsReport, out_dir: &Path) -> Result<PathBuf> {
    write_json(out_dir, files::REFINED_REPORT, report)
}

fn write_json<T: Serialize>(out_dir: &Path, file_name: &str, payload: &T) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(file_name);
    let json = serde_json::to_string_pretty(payload)?;
    fs::write(&path, json)?;
    Ok(path)
}

fn timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
