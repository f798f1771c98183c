//! Application-wide constants for merchsum
//!
//! Centralizes magic numbers, default values, and fixed strings
//! used throughout the application.

/// Output format constants
pub mod output_formats {
    pub const TEXT: &str = "text";
    pub const JSON: &str = "json";
    pub const MINIMAL: &str = "minimal";

    /// All supported output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];

    /// Default output format
    pub const DEFAULT: &str = TEXT;
}

/// Default configuration values
pub mod defaults {
    /// Days of trailing activity that count an entity as active
    pub const ACTIVE_WINDOW_DAYS: i64 = 30;

    /// Window used for the recent-signups metric, independent of the
    /// configurable active window
    pub const RECENT_SIGNUP_DAYS: i64 = 30;

    /// Assumed month-over-month revenue growth, in percent
    pub const MONTHLY_GROWTH_PERCENT: f64 = 5.0;

    /// Assumed year-over-year revenue growth, in percent
    pub const ANNUAL_GROWTH_PERCENT: f64 = 15.0;

    /// Months covered by a single revenue report
    pub const REPORT_PERIOD_MONTHS: u32 = 3;

    /// Months projected by the short-term forecast
    pub const FORECAST_MONTHS: u32 = 2;

    /// Entries kept in top-N listings (merchants, items, accounts)
    pub const TOP_LIST_SIZE: usize = 3;

    /// Rows of a sales report always retained as preamble
    pub const SALES_PREAMBLE_ROWS: usize = 10;

    /// Phone numbers must contain this many digits to be kept
    pub const MIN_PHONE_DIGITS: usize = 10;
    pub const MAX_PHONE_DIGITS: usize = 11;

    /// Shortest email address considered plausible
    pub const MIN_EMAIL_LENGTH: usize = 5;

    /// Shortest name considered plausible
    pub const MIN_NAME_LENGTH: usize = 2;
}

/// Data-quality thresholds for recommendations and exit codes
pub mod quality {
    /// Overall removal rate above which collection processes should be reviewed
    pub const REMOVAL_WARN_PERCENT: f64 = 20.0;

    /// Overall removal rate treated as critical
    pub const REMOVAL_CRITICAL_PERCENT: f64 = 50.0;

    /// Per-file removal rate worth calling out
    pub const FILE_REMOVAL_WARN_PERCENT: f64 = 30.0;
}

/// File names and locations
pub mod files {
    /// Configuration file name looked up in standard locations
    pub const CONFIG_FILE_NAME: &str = ".merchsum.toml";

    /// Default directory for cleaned artifacts and reports
    pub const DEFAULT_OUT_DIR: &str = "data_cleaned";

    /// Default directory for backups of original files
    pub const DEFAULT_BACKUP_DIR: &str = "data_backup";

    /// Cleaning report artifact name
    pub const CLEANING_REPORT: &str = "cleaning_report.json";

    /// Refined analytics artifact name
    pub const REFINED_REPORT: &str = "refined_data.json";

    /// Extensions processed when no --include filter is given
    pub const DEFAULT_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];

    /// How many parent directories are searched for a config file
    pub const CONFIG_SEARCH_DEPTH: usize = 3;
}

/// User-facing error message templates
pub mod error_messages {
    pub const NO_INPUTS: &str =
        "No input paths provided. Pass files or directories containing data exports.";
    pub const CONFIG_NOT_FOUND: &str = "Config file not found";
    pub const UNSUPPORTED_EXTENSION: &str = "Unsupported file extension";
}

/// Emoji and symbols for display
pub mod display {
    pub const EMOJI_BROOM: &str = "\u{1f9f9}"; // broom
    pub const EMOJI_CHART: &str = "\u{1f4ca}"; // bar chart
    pub const EMOJI_BULB: &str = "\u{1f4a1}"; // light bulb
    pub const EMOJI_SAVE: &str = "\u{1f4be}"; // floppy disk
    pub const CHECK_MARK: &str = "\u{2713}";
    pub const CROSS_MARK: &str = "\u{2717}";
}
