// Command-line interface definitions and parsing for merchsum

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Files or directories containing data exports
    pub inputs: Vec<String>,

    // Core Options
    /// Recursively process directories
    #[arg(short = 'r', long, help_heading = "Core Options")]
    pub recursive: bool,

    /// Directory for cleaned files and reports (default: data_cleaned)
    #[arg(short = 'o', long, value_name = "DIR", help_heading = "Core Options")]
    pub out_dir: Option<String>,

    /// Directory for backups of original files (default: data_backup)
    #[arg(long, value_name = "DIR", help_heading = "Core Options")]
    pub backup_dir: Option<String>,

    /// Skip backing up original files
    #[arg(long, help_heading = "Core Options")]
    pub no_backup: bool,

    /// Files cleaned concurrently (default: CPU cores)
    #[arg(long, value_name = "COUNT", help_heading = "Core Options")]
    pub concurrency: Option<usize>,

    /// Clean files only, skip analytics and refined_data.json
    #[arg(long, help_heading = "Core Options")]
    pub clean_only: bool,

    /// Compute analytics only, do not write cleaned files or backups
    #[arg(long, conflicts_with = "clean_only", help_heading = "Core Options")]
    pub analyze_only: bool,

    // Filtering & Content
    /// File extensions to process (e.g., csv,xlsx)
    #[arg(long, value_name = "EXTENSIONS", help_heading = "Filtering & Content")]
    pub include: Option<String>,

    /// File name patterns to exclude (regex)
    #[arg(long, value_name = "REGEX", help_heading = "Filtering & Content")]
    pub exclude_pattern: Vec<String>,

    // Data Quality
    /// Days of trailing activity that count an entity as active (default: 30)
    #[arg(long, value_name = "DAYS", help_heading = "Data Quality")]
    pub active_window: Option<i64>,

    /// Count customers active when signed up after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", help_heading = "Data Quality")]
    pub signup_cutoff: Option<String>,

    /// Failure threshold - fail only if more than X% of rows are removed (0-100)
    #[arg(long, value_name = "PERCENT", help_heading = "Data Quality")]
    pub failure_threshold: Option<f64>,

    // Analytics
    /// Assumed month-over-month revenue growth in percent (default: 5)
    #[arg(long, value_name = "PERCENT", help_heading = "Analytics")]
    pub growth_rate: Option<f64>,

    /// Assumed year-over-year revenue growth in percent (default: 15)
    #[arg(long, value_name = "PERCENT", help_heading = "Analytics")]
    pub annual_growth: Option<f64>,

    /// Months projected by the short-term forecast (default: 2)
    #[arg(long, value_name = "MONTHS", help_heading = "Analytics")]
    pub forecast_months: Option<u32>,

    // Output & Verbosity
    /// Suppress progress output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, default_value = output_formats::DEFAULT, help_heading = "Output & Verbosity")]
    pub format: String,

    /// Disable progress bars
    #[arg(long, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,

    // Performance Analysis
    /// Show memory usage and optimization suggestions
    #[arg(long, help_heading = "Performance Analysis")]
    pub show_performance: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    #[command(name = "completion-generate", arg_required_else_help = true)]
    CompletionGenerate {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Install shell completions to standard location
    #[command(name = "completion-install", arg_required_else_help = true)]
    CompletionInstall {
        /// The shell to install completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Run interactive configuration wizard
    #[command(name = "config-wizard")]
    ConfigWizard,
}

/// Convert derive-based CLI arguments directly to CliConfig structure
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    let mut cli_config = CliConfig::default();

    // Core options
    cli_config.out_dir = cli.out_dir.clone();
    cli_config.backup_dir = cli.backup_dir.clone();
    cli_config.no_backup = cli.no_backup;

    if let Some(concurrency) = cli.concurrency {
        if concurrency == 0 {
            eprintln!(
                "Error: Concurrency cannot be 0. Expected a positive integer representing the number of files cleaned in parallel."
            );
            std::process::exit(1);
        }
        if concurrency > 100 {
            eprintln!(
                "Warning: Concurrency of {concurrency} is quite high and may exhaust file handles. Consider using a smaller value."
            );
        }
        cli_config.threads = Some(concurrency);
    }

    // Filtering & inclusion
    if let Some(ref include_str) = cli.include {
        cli_config.file_types = Some(
            include_str
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        );
    }

    if !cli.exclude_pattern.is_empty() {
        cli_config.exclude_patterns = Some(cli.exclude_pattern.clone());
    }

    // Data quality
    if let Some(days) = cli.active_window {
        if days < 1 {
            eprintln!(
                "Error: Active window of {days} days is invalid. Expected a positive number of days."
            );
            std::process::exit(1);
        }
        cli_config.active_window_days = Some(days);
    }

    cli_config.signup_cutoff = cli.signup_cutoff.clone();

    if let Some(threshold) = cli.failure_threshold {
        if !(0.0..=100.0).contains(&threshold) {
            eprintln!(
                "Error: Failure threshold {threshold}% is invalid. Expected a value between 0-100."
            );
            std::process::exit(1);
        }
        cli_config.failure_threshold = Some(threshold);
    }

    // Analytics
    if let Some(growth) = cli.growth_rate {
        if !(-100.0..=1000.0).contains(&growth) {
            eprintln!(
                "Error: Growth rate of {growth}% is outside the supported range (-100 to 1000)."
            );
            std::process::exit(1);
        }
        cli_config.monthly_growth_percent = Some(growth);
    }

    if let Some(growth) = cli.annual_growth {
        if !(-100.0..=1000.0).contains(&growth) {
            eprintln!(
                "Error: Annual growth of {growth}% is outside the supported range (-100 to 1000)."
            );
            std::process::exit(1);
        }
        cli_config.annual_growth_percent = Some(growth);
    }

    if let Some(months) = cli.forecast_months {
        if !(1..=24).contains(&months) {
            eprintln!("Error: Forecast horizon of {months} months is invalid. Expected 1-24.");
            std::process::exit(1);
        }
        cli_config.forecast_months = Some(months);
    }

    // Output & format
    cli_config.quiet = cli.quiet;
    cli_config.verbose = cli.verbose;
    cli_config.no_progress = cli.no_progress;
    cli_config.output_format = Some(cli.format.clone());

    // Configuration
    cli_config.config_file = cli.config.clone();
    cli_config.no_config = cli.no_config;

    // Performance Analysis
    cli_config.show_performance = cli.show_performance;

    cli_config
}

/// Validate CLI arguments using the derive-based CLI structure
pub fn validate_cli_args(cli: &Cli) {
    if let Some(concurrency) = cli.concurrency {
        if concurrency == 0 {
            eprintln!(
                "Error: Concurrency cannot be 0. Expected a positive integer representing the number of files cleaned in parallel."
            );
            std::process::exit(1);
        }
        if concurrency > 100 {
            eprintln!(
                "Warning: Concurrency of {concurrency} is quite high and may exhaust file handles. Consider using a smaller value."
            );
        }
    }

    if let Some(days) = cli.active_window
        && days < 1
    {
        eprintln!(
            "Error: Active window of {days} days is invalid. Expected a positive number of days."
        );
        std::process::exit(1);
    }

    // Validate signup cutoff date format
    if let Some(ref cutoff) = cli.signup_cutoff
        && chrono::NaiveDate::parse_from_str(cutoff, "%Y-%m-%d").is_err()
    {
        eprintln!("Error: Signup cutoff '{cutoff}' is not a valid date. Expected YYYY-MM-DD.");
        std::process::exit(1);
    }

    // Validate failure threshold
    if let Some(threshold) = cli.failure_threshold
        && !(0.0..=100.0).contains(&threshold)
    {
        eprintln!(
            "Error: Failure threshold {threshold}% is invalid. Expected a value between 0-100."
        );
        std::process::exit(1);
    }
}
