//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::core::constants::{defaults, files, output_formats};
use crate::core::error::{MerchsumError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of files cleaned concurrently
    pub threads: Option<usize>,

    /// File extensions to process
    pub file_types: Option<Vec<String>>,

    /// File name patterns to exclude (regex)
    pub exclude_patterns: Option<Vec<String>>,

    /// Directory for cleaned artifacts and reports
    pub out_dir: Option<String>,

    /// Directory for backups of original files
    pub backup_dir: Option<String>,

    /// Skip backing up originals
    pub no_backup: Option<bool>,

    /// Days of trailing activity that count an entity as active
    pub active_window_days: Option<i64>,

    /// Fixed signup date (YYYY-MM-DD); overrides the active window
    /// for individual customers when set
    pub signup_cutoff: Option<String>,

    /// Assumed month-over-month growth used by forecasts, in percent
    pub monthly_growth_percent: Option<f64>,

    /// Assumed year-over-year growth used by forecasts, in percent
    pub annual_growth_percent: Option<f64>,

    /// Months projected by the short-term forecast
    pub forecast_months: Option<u32>,

    /// Fail the run when the overall removal rate exceeds this percentage
    pub failure_threshold: Option<f64>,

    /// Output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// Suppress non-essential output
    pub quiet: Option<bool>,

    /// Disable progress bars
    pub no_progress: Option<bool>,

    /// Show performance analysis after the run
    pub show_performance: Option<bool>,

    /// Inventory file to merchant mapping: file-name substring -> merchant name
    pub inventory_map: Option<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: None,
            file_types: None,
            exclude_patterns: None,
            out_dir: Some(files::DEFAULT_OUT_DIR.to_string()),
            backup_dir: Some(files::DEFAULT_BACKUP_DIR.to_string()),
            no_backup: Some(false),
            active_window_days: Some(defaults::ACTIVE_WINDOW_DAYS),
            signup_cutoff: None,
            monthly_growth_percent: Some(defaults::MONTHLY_GROWTH_PERCENT),
            annual_growth_percent: Some(defaults::ANNUAL_GROWTH_PERCENT),
            forecast_months: Some(defaults::FORECAST_MONTHS),
            failure_threshold: None,
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            quiet: Some(false),
            no_progress: Some(false),
            show_performance: Some(false),
            inventory_map: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MerchsumError::Config(format!("Could not read config file {}: {e}", path.display()))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Look for `.merchsum.toml` in the current directory and up to
    /// three parent levels, returning the first one that parses.
    pub fn load_from_standard_locations() -> Option<Self> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir: Option<&Path> = Some(current_dir.as_path());

        for _ in 0..=files::CONFIG_SEARCH_DEPTH {
            let candidate = dir?.join(files::CONFIG_FILE_NAME);
            if candidate.is_file()
                && let Ok(config) = Self::load_from_file(&candidate)
            {
                return Some(config);
            }
            dir = dir?.parent();
        }

        None
    }

    /// Merge CLI arguments into this configuration. CLI values win.
    pub fn merge_with_cli(&mut self, cli: &CliConfig) {
        if let Some(threads) = cli.threads {
            self.threads = Some(threads);
        }
        if let Some(ref file_types) = cli.file_types {
            self.file_types = Some(file_types.clone());
        }
        if let Some(ref patterns) = cli.exclude_patterns {
            self.exclude_patterns = Some(patterns.clone());
        }
        if let Some(ref out_dir) = cli.out_dir {
            self.out_dir = Some(out_dir.clone());
        }
        if let Some(ref backup_dir) = cli.backup_dir {
            self.backup_dir = Some(backup_dir.clone());
        }
        if cli.no_backup {
            self.no_backup = Some(true);
        }
        if let Some(days) = cli.active_window_days {
            self.active_window_days = Some(days);
        }
        if let Some(ref cutoff) = cli.signup_cutoff {
            self.signup_cutoff = Some(cutoff.clone());
        }
        if let Some(growth) = cli.monthly_growth_percent {
            self.monthly_growth_percent = Some(growth);
        }
        if let Some(growth) = cli.annual_growth_percent {
            self.annual_growth_percent = Some(growth);
        }
        if let Some(months) = cli.forecast_months {
            self.forecast_months = Some(months);
        }
        if let Some(threshold) = cli.failure_threshold {
            self.failure_threshold = Some(threshold);
        }
        if let Some(ref format) = cli.output_format {
            self.output_format = Some(format.clone());
        }
        if cli.verbose {
            self.verbose = Some(true);
        }
        if cli.quiet {
            self.quiet = Some(true);
        }
        if cli.no_progress {
            self.no_progress = Some(true);
        }
        if cli.show_performance {
            self.show_performance = Some(true);
        }
    }

    /// Compile exclude patterns into regexes
    pub fn compile_exclude_patterns(&self) -> Result<Vec<Regex>> {
        let mut compiled = Vec::new();
        if let Some(ref patterns) = self.exclude_patterns {
            for pattern in patterns {
                compiled.push(Regex::new(pattern)?);
            }
        }
        Ok(compiled)
    }

    /// Convert file_types to HashSet for extension filtering
    pub fn file_types_as_set(&self) -> Option<HashSet<String>> {
        self.file_types
            .as_ref()
            .map(|types| types.iter().map(|t| t.to_lowercase()).collect())
    }

    pub fn out_dir_path(&self) -> PathBuf {
        PathBuf::from(
            self.out_dir
                .clone()
                .unwrap_or_else(|| files::DEFAULT_OUT_DIR.to_string()),
        )
    }

    pub fn backup_dir_path(&self) -> PathBuf {
        PathBuf::from(
            self.backup_dir
                .clone()
                .unwrap_or_else(|| files::DEFAULT_BACKUP_DIR.to_string()),
        )
    }

    pub fn active_window_days(&self) -> i64 {
        self.active_window_days
            .unwrap_or(defaults::ACTIVE_WINDOW_DAYS)
    }

    /// Parsed signup cutoff date, if configured
    pub fn signup_cutoff_date(&self) -> Result<Option<NaiveDate>> {
        match self.signup_cutoff {
            None => Ok(None),
            Some(ref raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    MerchsumError::Config(format!(
                        "Signup cutoff '{raw}' is not a valid date. Expected YYYY-MM-DD."
                    ))
                }),
        }
    }

    /// Monthly growth as a fraction (5.0 percent -> 0.05)
    pub fn monthly_growth_rate(&self) -> f64 {
        self.monthly_growth_percent
            .unwrap_or(defaults::MONTHLY_GROWTH_PERCENT)
            / 100.0
    }

    /// Annual growth as a fraction
    pub fn annual_growth_rate(&self) -> f64 {
        self.annual_growth_percent
            .unwrap_or(defaults::ANNUAL_GROWTH_PERCENT)
            / 100.0
    }

    pub fn forecast_months(&self) -> u32 {
        self.forecast_months.unwrap_or(defaults::FORECAST_MONTHS)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(threads) = self.threads {
            if threads == 0 {
                return Err(MerchsumError::Config(
                    "Thread count cannot be 0. Expected a positive integer.".to_string(),
                ));
            }
            if threads > 1000 {
                return Err(MerchsumError::Config(format!(
                    "Thread count of {threads} is extremely high and may cause system instability. Consider using a smaller value."
                )));
            }
        }

        if let Some(days) = self.active_window_days
            && days < 1
        {
            return Err(MerchsumError::Config(format!(
                "Active window of {days} days is invalid. Expected a positive number of days."
            )));
        }

        if let Some(ref format) = self.output_format {
            match format.as_str() {
                f if output_formats::ALL.contains(&f) => {}
                _ => {
                    return Err(MerchsumError::Config(format!(
                        "Invalid output format '{format}'. Expected one of: {}.",
                        output_formats::ALL.join(", ")
                    )));
                }
            }
        }

        if let Some(threshold) = self.failure_threshold {
            const EPSILON: f64 = 1e-10;
            if !(-EPSILON..=100.0 + EPSILON).contains(&threshold) {
                return Err(MerchsumError::Config(format!(
                    "Failure threshold {threshold}% is invalid. Expected a value between 0-100."
                )));
            }
        }

        for (name, value) in [
            ("Monthly growth", self.monthly_growth_percent),
            ("Annual growth", self.annual_growth_percent),
        ] {
            if let Some(percent) = value
                && !(-100.0..=1000.0).contains(&percent)
            {
                return Err(MerchsumError::Config(format!(
                    "{name} of {percent}% is outside the supported range (-100 to 1000)."
                )));
            }
        }

        if let Some(months) = self.forecast_months
            && !(1..=24).contains(&months)
        {
            return Err(MerchsumError::Config(format!(
                "Forecast horizon of {months} months is invalid. Expected 1-24."
            )));
        }

        // Fails on malformed dates
        self.signup_cutoff_date()?;

        // Validate exclude patterns by trying to compile them
        self.compile_exclude_patterns()?;

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Core options
    pub out_dir: Option<String>,            // --out-dir
    pub backup_dir: Option<String>,         // --backup-dir
    pub no_backup: bool,                    // --no-backup
    pub threads: Option<usize>,             // --concurrency

    // Filtering & content
    pub file_types: Option<Vec<String>>,    // --include
    pub exclude_patterns: Option<Vec<String>>, // --exclude-pattern

    // Data quality
    pub active_window_days: Option<i64>,    // --active-window
    pub signup_cutoff: Option<String>,      // --signup-cutoff
    pub failure_threshold: Option<f64>,     // --failure-threshold

    // Analytics
    pub monthly_growth_percent: Option<f64>, // --growth-rate
    pub annual_growth_percent: Option<f64>,  // --annual-growth
    pub forecast_months: Option<u32>,        // --forecast-months

    // Output & format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format
    pub no_progress: bool,             // --no-progress

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config

    // Performance Analysis
    pub show_performance: bool, // --show-performance
}
