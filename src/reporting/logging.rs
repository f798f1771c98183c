use crate::config::Config;
use log::{debug, error, info, warn};
use std::path::Path;

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off // Only show structured logs in verbose mode
    };

    // A second init in the same process is a no-op
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config, actual_threads: usize) {
    let active_window = config.active_window_days();
    let no_backup = config.no_backup.unwrap_or(false);
    let monthly_growth = config.monthly_growth_rate() * 100.0;
    let annual_growth = config.annual_growth_rate() * 100.0;
    let forecast_months = config.forecast_months();

    info!("Configuration: threads={actual_threads}, active_window={active_window}d, no_backup={no_backup}");
    info!(
        "Output: out_dir={}, backup_dir={}",
        config.out_dir_path().display(),
        config.backup_dir_path().display()
    );
    info!(
        "Forecast: monthly_growth={monthly_growth:.1}%, annual_growth={annual_growth:.1}%, horizon={forecast_months} months"
    );
}

/// Log file processing information
pub fn log_file_info<P: AsRef<Path>>(file_count: usize, files: &[P]) {
    info!("Processing {file_count} file(s)");
    for (i, file) in files.iter().enumerate() {
        debug!("  {}. {}", i + 1, file.as_ref().display());
    }
}

/// Log data file discovery information
pub fn log_discovery(selected: usize, total_entries: usize) {
    info!("Selected {selected} data files (from {total_entries} candidate paths)");
}

/// Log cleaning progress
pub fn log_cleaning_start(file_count: usize) {
    info!("Starting cleaning of {file_count} files");
}

/// Log cleaning completion
pub fn log_cleaning_complete(
    files_cleaned: usize,
    files_processed: usize,
    rows_removed: usize,
    duration_ms: u128,
) {
    if files_cleaned == files_processed {
        info!(
            "✅ Cleaning complete: {files_cleaned}/{files_processed} files cleaned, {rows_removed} rows removed ({duration_ms}ms)"
        );
    } else {
        warn!(
            "❌ Cleaning complete: {files_cleaned}/{files_processed} files cleaned, {} failed, {rows_removed} rows removed ({duration_ms}ms)",
            files_processed - files_cleaned,
        );
    }
}

/// Log individual file cleaning results for debugging
pub fn log_file_result(file: &str, rows_before: usize, rows_after: usize) {
    if rows_before == rows_after {
        debug!("✓ {file} -> unchanged ({rows_before} rows)");
    } else {
        debug!(
            "✗ {file} -> {} rows removed ({rows_before} -> {rows_after})",
            rows_before - rows_after
        );
    }
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
