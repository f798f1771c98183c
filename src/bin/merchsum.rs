use clap::{CommandFactory, Parser};
use merchsum::analytics::engine::{AnalyticsEngine, AnalyticsReport};
use merchsum::cleaning::cleaner::{CleanFiles, CleanRun, CleanStats, Cleaner};
use merchsum::config::Config;
use merchsum::core::constants::{error_messages, files, output_formats};
use merchsum::discovery::path_utils::expand_paths;
use merchsum::discovery::{Classifier, ClassifySources};
use merchsum::reporting::logging;
use merchsum::reporting::{CleaningReport, PerformanceProfiler, reports};
use merchsum::ui::ProgressReporter;
use merchsum::ui::cli::validate_cli_args;
use merchsum::ui::completion::{install_completion, print_completions};
use merchsum::ui::output;
use merchsum::ui::wizard::run_configuration_wizard;
use merchsum::ui::{Cli, Commands, cli_to_config};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle completion and wizard commands first
    if let Some(exit_code) = handle_completion_commands(&cli) {
        std::process::exit(exit_code);
    }

    validate_cli_args(&cli);

    // Validate that inputs are provided when not running a subcommand
    if cli.inputs.is_empty() {
        eprintln!("Error: {}", error_messages::NO_INPUTS);
        eprintln!("\nFor more information, try '--help'.");
        std::process::exit(2);
    }

    // Run the main cleaning and analytics pipeline
    match run_merchsum_logic(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}

/// Handle subcommands and return exit code if one was processed
pub fn handle_completion_commands(cli: &Cli) -> Option<i32> {
    match cli.command {
        Some(Commands::CompletionGenerate { shell }) => {
            let mut app = Cli::command();
            print_completions(shell, &mut app);
            Some(0)
        }
        Some(Commands::CompletionInstall { shell }) => match install_completion(shell) {
            Ok(message) => {
                println!("{message}");
                Some(0)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                Some(1)
            }
        },
        Some(Commands::ConfigWizard) => match run_configuration_wizard() {
            Ok(()) => Some(0),
            Err(e) => {
                eprintln!("Error: {e}");
                Some(1)
            }
        },
        None => None,
    }
}

/// Main pipeline logic extracted from main() for testing
pub async fn run_merchsum_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    // Parse CLI arguments into CliConfig using the derive-based CLI
    let cli_config = cli_to_config(cli);

    // Load and merge configuration
    let config = load_and_merge_config(&cli_config)?;
    config.validate()?;

    // Initialize performance profiler if requested
    let mut profiler = if config.show_performance.unwrap_or(false) {
        Some(PerformanceProfiler::new())
    } else {
        None
    };

    // Setup logging and output settings
    let output_settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(output_settings.verbose, output_settings.quiet);

    // Discover and classify input files
    let timer = profiler
        .as_mut()
        .map(|p| p.start_operation("file_discovery"));
    let expanded_paths = process_and_expand_inputs(cli, &config)?;
    let sources = classify_and_filter_sources(&expanded_paths, &config)?;
    if let (Some(profiler), Some(timer)) = (profiler.as_mut(), timer) {
        profiler.finish_operation(timer, sources.len());
    }

    if sources.is_empty() {
        let error = "No data files left to process after filtering";
        logging::log_error(error, None);
        return Err(error.into());
    }
    logging::log_discovery(sources.len(), expanded_paths.len());

    // Display configuration and discovery info if needed
    if output_settings.should_show_config_info() {
        let threads = config.threads.unwrap_or_else(num_cpus::get);
        logging::log_config_info(&config, threads);
        output::display_config_info(&config, threads, &sources);
        output::display_discovery_info(&sources, expanded_paths.len());
    }

    // Initialize progress reporter
    let progress = create_progress_reporter(&output_settings);

    // Clean, analyze and write artifacts
    let (run, analytics, artifacts) =
        run_pipeline(cli, &config, sources, progress, profiler.as_mut()).await?;

    // Create display metadata
    let metadata = output::DisplayMetadata {
        files_discovered: expanded_paths.len(),
        files_processed: run.stats.files_processed,
        files_cleaned: run.stats.files_cleaned,
        rows_before: run.stats.total_rows_before,
        rows_after: run.stats.total_rows_after,
        errors_found: run.stats.errors.len(),
    };

    // Display final results
    output::display_results(
        &run,
        analytics.as_ref(),
        &output_settings.output_format,
        output_settings.quiet,
        &config,
        &metadata,
        &artifacts,
    );

    // Generate performance report if requested
    if let Some(profiler) = profiler {
        profiler.display_performance_summary();
    }

    Ok(determine_exit_code(&run.stats, &config))
}

/// Clean the classified sources, derive analytics, and write the report
/// artifacts, profiling each stage when a profiler is active
pub async fn run_pipeline(
    cli: &Cli,
    config: &Config,
    sources: Vec<merchsum::SourceFile>,
    mut progress: Option<ProgressReporter>,
    mut profiler: Option<&mut PerformanceProfiler>,
) -> Result<(CleanRun, Option<AnalyticsReport>, Vec<PathBuf>), Box<dyn std::error::Error>> {
    let write_outputs = !cli.analyze_only;
    logging::log_cleaning_start(sources.len());
    let start_time = std::time::Instant::now();

    let timer = profiler
        .as_mut()
        .map(|p| p.start_operation("data_cleaning"));
    let cleaner = Cleaner::default();
    let run = cleaner
        .clean_files_with_config(sources, config, write_outputs, progress.as_mut())
        .await?;
    if let (Some(profiler), Some(timer)) = (profiler.as_mut(), timer) {
        profiler.finish_operation(timer, run.stats.files_processed);
    }

    finalize_progress_reporter(progress);

    let rows_removed = run
        .stats
        .total_rows_before
        .saturating_sub(run.stats.total_rows_after);
    logging::log_cleaning_complete(
        run.stats.files_cleaned,
        run.stats.files_processed,
        rows_removed,
        start_time.elapsed().as_millis(),
    );

    // Derive analytics over the cleaned tables
    let analytics = if cli.clean_only {
        None
    } else {
        let timer = profiler.as_mut().map(|p| p.start_operation("analytics"));
        let engine = AnalyticsEngine::new();
        let today = chrono::Local::now().date_naive();
        let report = engine.calculate(&run, config, today)?;
        if let (Some(profiler), Some(timer)) = (profiler.as_mut(), timer) {
            profiler.finish_operation(timer, run.files.len());
        }
        Some(report)
    };

    let timer = profiler
        .as_mut()
        .map(|p| p.start_operation("report_generation"));
    let artifacts = write_artifacts(&run, analytics.as_ref(), config)?;
    if let (Some(profiler), Some(timer)) = (profiler.as_mut(), timer) {
        profiler.finish_operation(timer, artifacts.len());
    }

    Ok((run, analytics, artifacts))
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(
    cli_config: &merchsum::config::CliConfig,
) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations().unwrap_or_default()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

impl OutputSettings {
    pub fn should_show_config_info(&self) -> bool {
        !self.quiet && self.output_format == output_formats::TEXT
    }
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(
    cli_config: &merchsum::config::CliConfig,
    config: &Config,
) -> OutputSettings {
    let quiet = cli_config.quiet || config.quiet.unwrap_or(false);
    let verbose = config.verbose.unwrap_or(false);
    let output_format = config
        .output_format
        .as_deref()
        .unwrap_or(output_formats::DEFAULT)
        .to_string();
    let show_progress = !quiet && !cli_config.no_progress && !config.no_progress.unwrap_or(false);

    OutputSettings {
        quiet,
        verbose,
        output_format,
        show_progress,
    }
}

/// Validate input paths and expand directories into data files
pub fn process_and_expand_inputs(
    cli: &Cli,
    config: &Config,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let inputs: Vec<&Path> = cli.inputs.iter().map(Path::new).collect();

    // Validate input paths exist
    validate_input_paths(&inputs)?;

    // Only csv and xlsx exports are processed unless --include overrides
    let file_types: HashSet<String> = config.file_types_as_set().unwrap_or_else(|| {
        files::DEFAULT_EXTENSIONS
            .iter()
            .map(|e| e.to_string())
            .collect()
    });

    let expanded_paths =
        expand_paths(inputs, cli.recursive, Some(&file_types)).inspect_err(|e| {
            logging::log_error("Could not expand input paths", Some(e));
        })?;

    if expanded_paths.is_empty() {
        let error = "No data files found to process";
        logging::log_error(error, None);
        return Err(error.into());
    }

    // Log file processing information
    logging::log_file_info(expanded_paths.len(), &expanded_paths);

    Ok(expanded_paths)
}

/// Validate that all input paths exist
pub fn validate_input_paths(inputs: &[&Path]) -> Result<(), Box<dyn std::error::Error>> {
    for path in inputs {
        if !path.exists() {
            let error_msg = format!("File not found: '{}'", path.display());
            logging::log_error(&error_msg, None);
            return Err(error_msg.into());
        }
    }
    Ok(())
}

/// Classify expanded paths into dataset kinds, applying exclude patterns
pub fn classify_and_filter_sources(
    expanded_paths: &[PathBuf],
    config: &Config,
) -> Result<Vec<merchsum::SourceFile>, Box<dyn std::error::Error>> {
    let exclude_patterns = config.compile_exclude_patterns().inspect_err(|e| {
        logging::log_error("Could not compile exclude patterns", Some(e));
    })?;

    let classifier = Classifier::new(exclude_patterns);
    let paths: Vec<&Path> = expanded_paths.iter().map(|p| p.as_path()).collect();
    let sources = classifier.classify_sources(paths);

    if sources.len() < expanded_paths.len() {
        logging::log_warning(&format!(
            "{} file(s) excluded by pattern",
            expanded_paths.len() - sources.len()
        ));
    }

    Ok(sources)
}

/// Create progress reporter if needed
pub fn create_progress_reporter(output_settings: &OutputSettings) -> Option<ProgressReporter> {
    if output_settings.show_progress && output_settings.output_format == output_formats::TEXT {
        Some(ProgressReporter::new(true))
    } else {
        None
    }
}

/// Finalize progress reporting
pub fn finalize_progress_reporter(progress: Option<ProgressReporter>) {
    if let Some(ref progress) = progress {
        progress.finish_and_clear();
    }
}

/// Write the JSON report artifacts into the output directory
pub fn write_artifacts(
    run: &CleanRun,
    analytics: Option<&AnalyticsReport>,
    config: &Config,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let out_dir = config.out_dir_path();
    let mut artifacts = Vec::new();

    let cleaning_report = CleaningReport::new(run.stats.clone());
    artifacts.push(reports::write_cleaning_report(&cleaning_report, &out_dir)?);

    if let Some(report) = analytics {
        artifacts.push(reports::write_refined_report(report, &out_dir)?);
    }

    Ok(artifacts)
}

/// Determine exit code from cleaning outcomes and failure threshold
pub fn determine_exit_code(stats: &CleanStats, config: &Config) -> i32 {
    if stats.has_errors() {
        return 1;
    }

    if let Some(threshold) = config.failure_threshold
        && stats.overall_removal_rate() > threshold
    {
        return 1;
    }

    0
}
