use regex::Regex;

use crate::core::types::{DatasetKind, SourceFile};

use std::path::Path;

pub trait ClassifySources {
    fn classify_sources(&self, paths: Vec<&Path>) -> Vec<SourceFile>;
}

/// Assigns a dataset kind to each discovered file based on its name.
///
/// Files matching an exclude pattern are dropped here, before any
/// ingestion work happens.
#[derive(Default, Debug)]
pub struct Classifier {
    exclude_patterns: Vec<Regex>,
}

impl ClassifySources for Classifier {
    fn classify_sources(&self, paths: Vec<&Path>) -> Vec<SourceFile> {
        paths
            .into_iter()
            .filter(|path| !self.is_excluded(path))
            .map(SourceFile::new)
            .collect()
    }
}

impl Classifier {
    pub fn new(exclude_patterns: Vec<Regex>) -> Self {
        Self { exclude_patterns }
    }

    /// Patterns match against the file name and the full path, so both
    /// `^archived-` and `.*/old/.*` style patterns work.
    fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude_patterns.is_empty() {
            return false;
        }

        let full_path = path.display().to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(&file_name) || pattern.is_match(&full_path))
    }

    /// Count sources per dataset kind, used for the run summary.
    pub fn kind_counts(sources: &[SourceFile]) -> Vec<(DatasetKind, usize)> {
        let mut counts: Vec<(DatasetKind, usize)> = Vec::new();
        for source in sources {
            match counts.iter_mut().find(|(kind, _)| *kind == source.kind) {
                Some((_, count)) => *count += 1,
                None => counts.push((source.kind, 1)),
            }
        }
        counts
    }
}
