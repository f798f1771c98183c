//! Analysis and reporting
//!
//! This module handles the JSON report artifacts, performance
//! analysis, and structured logging for the application.

pub mod logging;
pub mod performance;
pub mod reports;

// Re-export commonly used items
pub use performance::PerformanceProfiler;
pub use reports::CleaningReport;
