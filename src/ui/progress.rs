use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

pub struct ProgressReporter {
    multi_progress: Arc<MultiProgress>,
    file_progress: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: Arc::new(MultiProgress::new()),
            file_progress: None,
            enabled,
        }
    }

    pub fn start_file_cleaning(&mut self, total_files: usize) {
        if !self.enabled {
            return;
        }

        let pb = self
            .multi_progress
            .add(ProgressBar::new(total_files as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files cleaned ({eta}) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("Cleaning data files");
        pb.enable_steady_tick(Duration::from_millis(120));
        self.file_progress = Some(pb);
    }

    pub fn update_file_progress(&self, current: usize, file_name: &str) {
        if let Some(ref pb) = self.file_progress {
            pb.set_position(current as u64);
            pb.set_message(file_name.to_string());
        }
    }

    pub fn finish_file_cleaning(&self, cleaned_count: usize, total_count: usize) {
        if let Some(ref pb) = self.file_progress {
            let message = if cleaned_count == total_count {
                "✓ All files cleaned successfully".to_string()
            } else {
                format!("✓ Cleaning complete ({cleaned_count}/{total_count} cleaned)")
            };
            pb.finish_with_message(message);
        }
    }

    pub fn finish_and_clear(&self) {
        if self.enabled {
            // Clear the progress bars and add a blank line
            self.multi_progress.clear().unwrap_or(());
            println!();
        }
    }

    pub fn log_info(&self, message: &str) {
        if self.enabled {
            self.multi_progress
                .println(format!("ℹ {message}"))
                .unwrap_or(());
        }
    }

    pub fn log_warning(&self, message: &str) {
        if self.enabled {
            self.multi_progress
                .println(format!("⚠ {message}"))
                .unwrap_or(());
        }
    }

    pub fn log_error(&self, message: &str) {
        if self.enabled {
            self.multi_progress
                .println(format!("✗ {message}"))
                .unwrap_or(());
        }
    }

    /// Create a simple spinner for indeterminate progress
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }
}
