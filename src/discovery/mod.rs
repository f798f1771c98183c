//! File discovery and classification
//!
//! This module handles finding data export files and assigning each
//! one a dataset kind before ingestion.

pub mod finder;
pub mod path_utils;

// Re-export commonly used items
pub use finder::{Classifier, ClassifySources};
pub use path_utils::expand_paths;
