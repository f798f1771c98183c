use std::fmt;

/// Result type alias for merchsum operations
pub type Result<T> = std::result::Result<T, MerchsumError>;

/// Comprehensive error type for merchsum operations
#[derive(Debug)]
pub enum MerchsumError {
    /// IO operation failed
    Io(std::io::Error),
    /// Configuration error
    Config(String),
    /// CSV parsing or writing failed
    Csv(csv::Error),
    /// Spreadsheet (XLSX) reading failed
    Sheet(calamine::Error),
    /// Data file could not be interpreted
    Parse(String),
    /// Regex compilation error
    Regex(regex::Error),
    /// TOML parsing error
    TomlParsing(toml::de::Error),
    /// JSON report serialization failed
    Json(serde_json::Error),
    /// File not found
    FileNotFound(String),
    /// Invalid CLI arguments
    InvalidArgument(String),
    /// File walking error
    FileWalking(ignore::Error),
}

impl fmt::Display for MerchsumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MerchsumError::Io(err) => write!(f, "IO error: {err}"),
            MerchsumError::Config(msg) => write!(f, "Configuration error: {msg}"),
            MerchsumError::Csv(err) => write!(f, "CSV error: {err}"),
            MerchsumError::Sheet(err) => write!(f, "Spreadsheet error: {err}"),
            MerchsumError::Parse(msg) => write!(f, "Parse error: {msg}"),
            MerchsumError::Regex(err) => write!(f, "Regex error: {err}"),
            MerchsumError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            MerchsumError::Json(err) => write!(f, "JSON serialization error: {err}"),
            MerchsumError::FileNotFound(path) => write!(f, "File not found: {path}"),
            MerchsumError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            MerchsumError::FileWalking(err) => write!(f, "File walking error: {err}"),
        }
    }
}

impl std::error::Error for MerchsumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MerchsumError::Io(err) => Some(err),
            MerchsumError::Csv(err) => Some(err),
            MerchsumError::Sheet(err) => Some(err),
            MerchsumError::Regex(err) => Some(err),
            MerchsumError::TomlParsing(err) => Some(err),
            MerchsumError::Json(err) => Some(err),
            MerchsumError::FileWalking(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MerchsumError {
    fn from(err: std::io::Error) -> Self {
        MerchsumError::Io(err)
    }
}

impl From<csv::Error> for MerchsumError {
    fn from(err: csv::Error) -> Self {
        MerchsumError::Csv(err)
    }
}

impl From<calamine::Error> for MerchsumError {
    fn from(err: calamine::Error) -> Self {
        MerchsumError::Sheet(err)
    }
}

impl From<regex::Error> for MerchsumError {
    fn from(err: regex::Error) -> Self {
        MerchsumError::Regex(err)
    }
}

impl From<toml::de::Error> for MerchsumError {
    fn from(err: toml::de::Error) -> Self {
        MerchsumError::TomlParsing(err)
    }
}

impl From<serde_json::Error> for MerchsumError {
    fn from(err: serde_json::Error) -> Self {
        MerchsumError::Json(err)
    }
}

impl From<ignore::Error> for MerchsumError {
    fn from(err: ignore::Error) -> Self {
        MerchsumError::FileWalking(err)
    }
}
