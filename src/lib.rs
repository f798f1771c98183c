//! merchsum - merchant data cleaning and analytics
//!
//! A CLI tool that takes raw merchant platform exports (customer lists,
//! revenue reports, business-account lists, inventory exports), cleans
//! them with per-kind data-quality rules, and derives a combined
//! analytics report over the cleaned data.
//!
//! The pipeline has three stages:
//! 1. Discovery - expand input paths and classify each file into a
//!    dataset kind by file-name heuristics ([`discovery`])
//! 2. Cleaning - apply field and row rules, back up originals, write
//!    cleaned CSV artifacts ([`ingest`], [`cleaning`])
//! 3. Analytics - compute customer, business, merchant and inventory
//!    metrics plus revenue forecasts, and write the JSON report
//!    artifacts ([`analytics`], [`reporting`])

pub mod analytics;
pub mod cleaning;
pub mod config;
pub mod core;
pub mod discovery;
pub mod ingest;
pub mod reporting;
pub mod ui;

// Re-export commonly used items at the crate root
pub use cleaning::cleaner::{CleanFiles, CleanRun, CleanStats, Cleaner};
pub use core::error::{MerchsumError, Result};
pub use core::types::{DataTable, DatasetKind, SourceFile};
