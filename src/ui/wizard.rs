//! Interactive configuration wizard for merchsum
//!
//! Provides a step-by-step guided setup for new users to create
//! a `.merchsum.toml` tuned to their kind of business data.

use crate::config::Config;
use crate::ui::color::{Colors, colorize};
use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};
use std::fmt;
use std::path::PathBuf;

/// Errors that can occur during wizard execution
#[derive(Debug)]
pub enum WizardError {
    /// IO error during file operations
    Io(std::io::Error),
    /// Dialoguer interaction error
    Dialog(dialoguer::Error),
}

impl fmt::Display for WizardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Dialog(e) => write!(f, "Dialog error: {}", e),
        }
    }
}

impl std::error::Error for WizardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Dialog(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for WizardError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<dialoguer::Error> for WizardError {
    fn from(error: dialoguer::Error) -> Self {
        Self::Dialog(error)
    }
}

/// Result type for wizard operations
type WizardResult<T> = Result<T, WizardError>;

/// Business templates with pre-configured settings
#[derive(Debug, Clone)]
pub struct BusinessTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub config: Config,
    pub file_types: Vec<&'static str>,
}

impl fmt::Display for BusinessTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

/// Available business templates
pub fn get_business_templates() -> Vec<BusinessTemplate> {
    vec![
        BusinessTemplate {
            name: "Retail Storefront",
            description: "Single shop with customer lists and sales exports",
            config: Config {
                active_window_days: Some(90),
                monthly_growth_percent: Some(5.0),
                annual_growth_percent: Some(15.0),
                failure_threshold: Some(20.0),
                ..Config::default()
            },
            file_types: vec!["csv", "xlsx"],
        },
        BusinessTemplate {
            name: "Restaurant / Food Service",
            description: "POS exports with messy item-level sales data",
            config: Config {
                active_window_days: Some(60), // Diners lapse faster than shoppers
                monthly_growth_percent: Some(3.0),
                annual_growth_percent: Some(10.0),
                failure_threshold: Some(30.0), // POS exports need heavier cleaning
                ..Config::default()
            },
            file_types: vec!["csv"],
        },
        BusinessTemplate {
            name: "Multi-Location Portfolio",
            description: "Many merchants, inventory workbooks, batch reporting",
            config: Config {
                active_window_days: Some(90),
                forecast_months: Some(6), // Longer planning horizon
                failure_threshold: Some(10.0),
                monthly_growth_percent: Some(4.0),
                annual_growth_percent: Some(12.0),
                ..Config::default()
            },
            file_types: vec!["csv", "xlsx"],
        },
        BusinessTemplate {
            name: "Custom Setup",
            description: "Configure everything manually",
            config: Config::default(),
            file_types: vec!["csv"],
        },
    ]
}

/// Configuration wizard builder for step-by-step setup
pub struct ConfigurationWizard {
    theme: ColorfulTheme,
}

impl Default for ConfigurationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationWizard {
    /// Create a new configuration wizard
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Run the interactive configuration wizard
    pub fn run(&self) -> WizardResult<()> {
        self.display_welcome();

        let template = self.select_business_template()?;
        let mut config = template.config.clone();
        let mut file_types = template.file_types.clone();

        if template.name != "Custom Setup" {
            file_types = self.select_file_types(&file_types)?;
        }

        let should_customize = self.should_customize_settings(template.name == "Custom Setup")?;
        if should_customize {
            config = self.configure_advanced_settings(config)?;
        }

        let should_setup_filters = self.should_setup_filters()?;
        if should_setup_filters {
            config = self.configure_file_filters(config)?;
        }

        self.generate_and_save_config(&config, &file_types)?;
        self.show_completion_message(&file_types);

        Ok(())
    }

    /// Display welcome message
    fn display_welcome(&self) {
        println!(
            "\n{}",
            colorize("🧙 merchsum Configuration Wizard", Colors::BRIGHT_CYAN)
        );
        println!(
            "{}\n",
            colorize("Let's set up merchsum for your business data!", Colors::CYAN)
        );
    }

    /// Select business template
    fn select_business_template(&self) -> WizardResult<BusinessTemplate> {
        let templates = get_business_templates();
        let template_names: Vec<&str> = templates.iter().map(|t| t.name).collect();

        println!(
            "{}",
            colorize(
                "📋 What kind of business data are you working with?",
                Colors::BRIGHT_WHITE
            )
        );
        let selection = Select::with_theme(&self.theme)
            .items(&template_names)
            .default(0)
            .interact()?;

        let selected_template = templates[selection].clone();
        println!(
            "\n{} {}",
            colorize("✓", Colors::BRIGHT_GREEN),
            colorize(
                &format!("Selected: {}", selected_template.name),
                Colors::GREEN
            )
        );
        println!("{}\n", colorize(selected_template.description, Colors::DIM));

        Ok(selected_template)
    }

    /// Select file types to process
    fn select_file_types(&self, current_types: &[&str]) -> WizardResult<Vec<&'static str>> {
        println!(
            "{}",
            colorize("📁 Which export formats should we process?", Colors::BRIGHT_WHITE)
        );
        println!(
            "{}",
            colorize(
                "(Select the formats your systems export data in)",
                Colors::DIM
            )
        );

        const AVAILABLE_TYPES: &[&str] = &["csv", "xlsx", "xlsm", "xlsb", "xls", "ods"];

        let defaults: Vec<bool> = AVAILABLE_TYPES
            .iter()
            .map(|&ext| current_types.contains(&ext))
            .collect();

        let selected_indices = MultiSelect::with_theme(&self.theme)
            .items(AVAILABLE_TYPES)
            .defaults(&defaults)
            .interact()?;

        Ok(selected_indices
            .iter()
            .map(|&i| AVAILABLE_TYPES[i])
            .collect())
    }

    /// Ask if user wants to customize settings
    fn should_customize_settings(&self, is_custom: bool) -> WizardResult<bool> {
        if is_custom {
            Ok(true)
        } else {
            println!(
                "\n{}",
                colorize(
                    "🔧 Would you like to customize the advanced settings?",
                    Colors::BRIGHT_WHITE
                )
            );
            Ok(Confirm::with_theme(&self.theme)
                .with_prompt("Customize advanced settings")
                .default(false)
                .interact()?)
        }
    }

    /// Ask if user wants to setup file filters
    fn should_setup_filters(&self) -> WizardResult<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(format!(
                "{} Set up file exclusions or inventory mappings?",
                colorize("🎯", Colors::BRIGHT_YELLOW)
            ))
            .default(false)
            .interact()?)
    }

    /// Generate and save configuration file
    fn generate_and_save_config(&self, config: &Config, file_types: &[&str]) -> WizardResult<()> {
        println!(
            "\n{}",
            colorize("💾 Generating configuration...", Colors::BRIGHT_CYAN)
        );

        let config_content = ConfigFileGenerator::new(config, file_types).generate();
        let config_path = PathBuf::from(".merchsum.toml");

        if config_path.exists() {
            let overwrite = Confirm::with_theme(&self.theme)
                .with_prompt(format!(
                    "{} .merchsum.toml already exists. Overwrite?",
                    colorize("⚠️", Colors::BRIGHT_YELLOW)
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", colorize("Configuration not saved.", Colors::YELLOW));
                return Ok(());
            }
        }

        std::fs::write(&config_path, config_content)?;

        println!(
            "\n{} {}",
            colorize("✅", Colors::BRIGHT_GREEN),
            colorize("Configuration saved to .merchsum.toml", Colors::BRIGHT_GREEN)
        );

        Ok(())
    }

    /// Show completion message and usage examples
    fn show_completion_message(&self, file_types: &[&str]) {
        UsageExamples::new(file_types).display();
        println!(
            "\n{}",
            colorize(
                "🎉 Setup complete! Happy data cleaning!",
                Colors::BRIGHT_GREEN
            )
        );
    }

    /// Configure advanced settings interactively
    fn configure_advanced_settings(&self, mut config: Config) -> WizardResult<Config> {
        println!(
            "\n{}",
            colorize("⚙️ Advanced Configuration", Colors::BRIGHT_WHITE)
        );

        // Active window
        let active_window: i64 = Input::with_theme(&self.theme)
            .with_prompt("Days of trailing activity that count an entity as active")
            .default(config.active_window_days.unwrap_or(90))
            .validate_with(Self::validate_active_window)
            .interact()?;
        config.active_window_days = Some(active_window);

        // Concurrency
        let default_threads = num_cpus::get().min(16);
        let threads: usize = Input::with_theme(&self.theme)
            .with_prompt("Number of files cleaned concurrently")
            .default(default_threads)
            .validate_with(Self::validate_thread_count)
            .interact()?;
        if threads != default_threads {
            config.threads = Some(threads);
        }

        // Backups
        let skip_backups = Confirm::with_theme(&self.theme)
            .with_prompt("Skip backing up original files before cleaning")
            .default(config.no_backup.unwrap_or(false))
            .interact()?;
        config.no_backup = Some(skip_backups);

        // Growth assumptions
        let monthly_growth: f64 = Input::with_theme(&self.theme)
            .with_prompt("Assumed month-over-month growth (%)")
            .default(config.monthly_growth_percent.unwrap_or(5.0))
            .validate_with(Self::validate_growth_percent)
            .interact()?;
        config.monthly_growth_percent = Some(monthly_growth);

        let annual_growth: f64 = Input::with_theme(&self.theme)
            .with_prompt("Assumed year-over-year growth (%)")
            .default(config.annual_growth_percent.unwrap_or(15.0))
            .validate_with(Self::validate_growth_percent)
            .interact()?;
        config.annual_growth_percent = Some(annual_growth);

        let forecast_months: u32 = Input::with_theme(&self.theme)
            .with_prompt("Months projected by the short-term forecast")
            .default(config.forecast_months.unwrap_or(2))
            .validate_with(Self::validate_forecast_months)
            .interact()?;
        config.forecast_months = Some(forecast_months);

        // Failure threshold
        let use_threshold = Confirm::with_theme(&self.theme)
            .with_prompt("Fail the run when too much data gets removed")
            .default(config.failure_threshold.is_some())
            .interact()?;

        if use_threshold {
            let threshold: f64 = Input::with_theme(&self.theme)
                .with_prompt("Removal rate threshold percentage (0-100)")
                .default(config.failure_threshold.unwrap_or(20.0))
                .validate_with(Self::validate_failure_threshold)
                .interact()?;
            config.failure_threshold = Some(threshold);
        }

        Ok(config)
    }

    /// Validation function for thread count
    fn validate_thread_count(input: &usize) -> Result<(), &'static str> {
        if *input > 0 && *input <= 100 {
            Ok(())
        } else {
            Err("Must be between 1 and 100")
        }
    }

    /// Validation function for the active window
    fn validate_active_window(input: &i64) -> Result<(), &'static str> {
        if *input >= 1 && *input <= 3650 {
            Ok(())
        } else {
            Err("Must be between 1 and 3650 days")
        }
    }

    /// Validation function for growth percentages
    fn validate_growth_percent(input: &f64) -> Result<(), &'static str> {
        if (-100.0..=1000.0).contains(input) {
            Ok(())
        } else {
            Err("Must be between -100 and 1000")
        }
    }

    /// Validation function for the forecast horizon
    fn validate_forecast_months(input: &u32) -> Result<(), &'static str> {
        if (1..=24).contains(input) {
            Ok(())
        } else {
            Err("Must be between 1 and 24 months")
        }
    }

    /// Validation function for failure threshold
    fn validate_failure_threshold(input: &f64) -> Result<(), &'static str> {
        if *input >= 0.0 && *input <= 100.0 {
            Ok(())
        } else {
            Err("Must be between 0 and 100")
        }
    }

    /// Configure file exclusions and inventory mappings
    fn configure_file_filters(&self, mut config: Config) -> WizardResult<Config> {
        println!("\n{}", colorize("🎯 File Filtering", Colors::BRIGHT_WHITE));

        // Exclusion patterns
        let setup_exclusions = Confirm::with_theme(&self.theme)
            .with_prompt("Set up file exclusion patterns (regex patterns to skip)")
            .default(false)
            .interact()?;

        if setup_exclusions {
            let exclusions = self.collect_patterns("regex patterns")?;
            if !exclusions.is_empty() {
                config.exclude_patterns = Some(exclusions);
            }
        }

        // Inventory mapping
        let setup_inventory = Confirm::with_theme(&self.theme)
            .with_prompt("Map inventory export files to merchant names")
            .default(config.inventory_map.is_some())
            .interact()?;

        if setup_inventory {
            config.inventory_map = self.collect_inventory_map()?;
        }

        Ok(config)
    }

    /// Collect patterns from user input
    fn collect_patterns(&self, pattern_type: &str) -> WizardResult<Vec<String>> {
        println!(
            "{}",
            colorize(
                &format!(
                    "Enter {} (one per line, empty line to finish):",
                    pattern_type
                ),
                Colors::DIM
            )
        );
        let mut patterns = Vec::new();

        loop {
            let pattern: String = Input::with_theme(&self.theme)
                .with_prompt(pattern_type.trim_end_matches('s')) // Remove plural
                .allow_empty(true)
                .interact()?;

            if pattern.is_empty() {
                break;
            }
            patterns.push(pattern);
        }

        Ok(patterns)
    }

    /// Collect inventory file stem to merchant name pairs
    fn collect_inventory_map(
        &self,
    ) -> WizardResult<Option<std::collections::HashMap<String, String>>> {
        println!(
            "{}",
            colorize(
                "Enter file-name fragment and merchant pairs (empty fragment to finish):",
                Colors::DIM
            )
        );
        let mut map = std::collections::HashMap::new();

        loop {
            let fragment: String = Input::with_theme(&self.theme)
                .with_prompt("inventory file fragment")
                .allow_empty(true)
                .interact()?;

            if fragment.is_empty() {
                break;
            }

            let merchant: String = Input::with_theme(&self.theme)
                .with_prompt("merchant name")
                .interact()?;
            map.insert(fragment, merchant);
        }

        if map.is_empty() { Ok(None) } else { Ok(Some(map)) }
    }
}

/// Configuration file generator
struct ConfigFileGenerator<'a> {
    config: &'a Config,
    file_types: &'a [&'a str],
}

impl<'a> ConfigFileGenerator<'a> {
    /// Create a new config file generator
    fn new(config: &'a Config, file_types: &'a [&'a str]) -> Self {
        Self { config, file_types }
    }

    /// Generate the configuration file content
    fn generate(&self) -> String {
        let mut content = String::new();

        content.push_str("# merchsum configuration file\n");
        content.push_str("# Generated by the configuration wizard\n\n");

        self.add_basic_settings(&mut content);
        self.add_file_types(&mut content);

        content.push('\n');

        self.add_quality_settings(&mut content);
        self.add_analytics_settings(&mut content);
        self.add_filtering_settings(&mut content);
        self.add_output_settings(&mut content);
        self.add_inventory_map(&mut content);

        content
    }

    /// Add basic settings section
    fn add_basic_settings(&self, content: &mut String) {
        content.push_str("# Basic settings\n");

        if let Some(ref out_dir) = self.config.out_dir {
            content.push_str(&format!("out_dir = \"{}\"\n", out_dir));
        }
        if let Some(ref backup_dir) = self.config.backup_dir {
            content.push_str(&format!("backup_dir = \"{}\"\n", backup_dir));
        }
        if let Some(no_backup) = self.config.no_backup {
            content.push_str(&format!("no_backup = {}\n", no_backup));
        }
        if let Some(threads) = self.config.threads {
            content.push_str(&format!("threads = {}\n", threads));
        }
    }

    /// Add file types section
    fn add_file_types(&self, content: &mut String) {
        if !self.file_types.is_empty() {
            content.push_str(&format!("file_types = {:?}\n", self.file_types));
        }
    }

    /// Add data quality settings
    fn add_quality_settings(&self, content: &mut String) {
        if self.config.active_window_days.is_some()
            || self.config.signup_cutoff.is_some()
            || self.config.failure_threshold.is_some()
        {
            content.push_str("# Data quality settings\n");

            if let Some(days) = self.config.active_window_days {
                content.push_str(&format!("active_window_days = {}\n", days));
            }
            if let Some(ref cutoff) = self.config.signup_cutoff {
                content.push_str(&format!("signup_cutoff = \"{}\"\n", cutoff));
            }
            if let Some(threshold) = self.config.failure_threshold {
                content.push_str(&format!("failure_threshold = {:.1}\n", threshold));
            }
            content.push('\n');
        }
    }

    /// Add analytics settings
    fn add_analytics_settings(&self, content: &mut String) {
        if self.config.monthly_growth_percent.is_some()
            || self.config.annual_growth_percent.is_some()
            || self.config.forecast_months.is_some()
        {
            content.push_str("# Analytics settings\n");

            if let Some(growth) = self.config.monthly_growth_percent {
                content.push_str(&format!("monthly_growth_percent = {:.1}\n", growth));
            }
            if let Some(growth) = self.config.annual_growth_percent {
                content.push_str(&format!("annual_growth_percent = {:.1}\n", growth));
            }
            if let Some(months) = self.config.forecast_months {
                content.push_str(&format!("forecast_months = {}\n", months));
            }
            content.push('\n');
        }
    }

    /// Add filtering settings
    fn add_filtering_settings(&self, content: &mut String) {
        if let Some(ref patterns) = self.config.exclude_patterns {
            content.push_str("# File filtering\n");
            content.push_str(&format!("exclude_patterns = {:?}\n", patterns));
            content.push('\n');
        }
    }

    /// Add output settings
    fn add_output_settings(&self, content: &mut String) {
        if let Some(ref format) = self.config.output_format {
            content.push_str("# Output settings\n");
            content.push_str(&format!("output_format = \"{}\"\n", format));
            content.push('\n');
        }
    }

    /// Add inventory mapping table
    fn add_inventory_map(&self, content: &mut String) {
        if let Some(ref map) = self.config.inventory_map {
            content.push_str("# Inventory file to merchant mapping\n");
            content.push_str("[inventory_map]\n");
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by_key(|(fragment, _)| fragment.as_str());
            for (fragment, merchant) in entries {
                content.push_str(&format!("\"{}\" = \"{}\"\n", fragment, merchant));
            }
            content.push('\n');
        }
    }
}

/// Usage examples display helper
struct UsageExamples<'a> {
    file_types: &'a [&'a str],
}

impl<'a> UsageExamples<'a> {
    /// Create new usage examples helper
    fn new(file_types: &'a [&'a str]) -> Self {
        Self { file_types }
    }

    /// Display usage examples
    fn display(&self) {
        println!("\n{}", colorize("📚 Usage Examples", Colors::BRIGHT_WHITE));

        self.show_basic_usage();
        self.show_file_type_usage();
        self.show_advanced_usage();
    }

    /// Show basic usage examples
    fn show_basic_usage(&self) {
        println!("\n{}", colorize("Basic usage:", Colors::CYAN));
        println!("  {}", colorize("merchsum data_exports/", Colors::WHITE));
    }

    /// Show file type specific usage
    fn show_file_type_usage(&self) {
        if self.file_types.len() > 1 {
            let extensions = self.file_types.join(",");
            println!(
                "\n{}",
                colorize("Process all configured export formats:", Colors::CYAN)
            );
            println!(
                "  {}",
                colorize(
                    &format!("merchsum --recursive --include {} .", extensions),
                    Colors::WHITE
                )
            );
        }
    }

    /// Show advanced usage examples
    fn show_advanced_usage(&self) {
        let examples = [
            ("With custom options:", "merchsum --verbose data_exports/"),
            (
                "JSON output for automation:",
                "merchsum --format json data_exports/",
            ),
            (
                "Performance analysis:",
                "merchsum --show-performance --recursive data_exports/",
            ),
        ];

        for (description, command) in &examples {
            println!("\n{}", colorize(description, Colors::CYAN));
            println!("  {}", colorize(command, Colors::WHITE));
        }
    }
}

/// Run the interactive configuration wizard (public API)
pub fn run_configuration_wizard() -> Result<(), Box<dyn std::error::Error>> {
    ConfigurationWizard::new()
        .run()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}
