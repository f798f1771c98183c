use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::error::{MerchsumError, Result};

pub fn expand_paths(
    input_paths: Vec<&Path>,
    recursive: bool,
    file_types: Option<&HashSet<String>>,
) -> Result<Vec<PathBuf>> {
    let mut result_paths = Vec::new();

    for path in input_paths {
        if path.is_file() {
            if matches_file_types(path, file_types) {
                result_paths.push(path.to_path_buf());
            }
        } else if path.is_dir() && recursive {
            let mut builder = ignore::WalkBuilder::new(path);
            builder.hidden(false); // Include hidden files

            for entry in builder.build() {
                let entry = entry?;
                let entry_path = entry.path();

                if entry_path.is_file() && matches_file_types(entry_path, file_types) {
                    result_paths.push(entry_path.to_path_buf());
                }
            }
        } else if path.is_dir() && !recursive {
            return Err(MerchsumError::InvalidArgument(format!(
                "'{}' is a directory. Use --recursive to process directories.",
                path.display()
            )));
        }
    }

    // Stable order keeps report output reproducible across runs
    result_paths.sort();
    result_paths.dedup();

    Ok(result_paths)
}

/// Extension filtering. Export tools disagree about extension casing,
/// so matching ignores case. An empty string in the set matches files
/// without an extension.
fn matches_file_types(path: &Path, file_types: Option<&HashSet<String>>) -> bool {
    let Some(extensions) = file_types else {
        return true;
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.contains(&ext.to_lowercase()),
        None => extensions.contains(""),
    }
}
