//! Data cleaning stage.
//!
//! [`rules`] holds the pure field-level cleaners and parsers,
//! [`cleaner`] applies them table by table and drives the async
//! backup-clean-write pipeline over all discovered files.

pub mod cleaner;
pub mod rules;
