//! Output formatting and display logic for merchsum

use rust_decimal::Decimal;

use crate::analytics::engine::AnalyticsReport;
use crate::cleaning::cleaner::{self, CleanRun, IssueCategory};
use crate::config::Config;
use crate::core::constants::{display, output_formats};
use crate::core::types::SourceFile;
use crate::discovery::Classifier;
use crate::ui::color::{Colors, colorize, terminal_width, truncate_path};

use std::path::PathBuf;

/// Metadata for displaying results
#[derive(Debug, Clone)]
pub struct DisplayMetadata {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_cleaned: usize,
    pub rows_before: usize,
    pub rows_after: usize,
    pub errors_found: usize,
}

/// Display configuration information in a user-friendly format
pub fn display_config_info(config: &Config, threads: usize, sources: &[SourceFile]) {
    print_config_line("Using threads", &threads.to_string());
    print_config_line(
        "Active window (days)",
        &config.active_window_days().to_string(),
    );
    if let Some(ref cutoff) = config.signup_cutoff {
        print_config_line("Signup cutoff", cutoff);
    }
    print_config_line(
        "Backups",
        &if config.no_backup.unwrap_or(false) {
            "disabled".to_string()
        } else {
            config.backup_dir_path().display().to_string()
        },
    );
    print_config_line(
        "Output directory",
        &config.out_dir_path().display().to_string(),
    );
    print_config_line(
        "Monthly growth",
        &format!("{:.1}%", config.monthly_growth_percent.unwrap_or_default()),
    );
    print_config_line(
        "Annual growth",
        &format!("{:.1}%", config.annual_growth_percent.unwrap_or_default()),
    );
    print_config_line("Forecast months", &config.forecast_months().to_string());

    if let Some(threshold) = config.failure_threshold {
        print_config_line("Failure threshold", &format!("{threshold:.1}%"));
    }

    println!(
        "\n{} {}: {}",
        colorize("📁", Colors::BRIGHT_BLUE),
        colorize(
            &format!("{}{}{}", Colors::BOLD, "Will clean", Colors::RESET),
            Colors::BRIGHT_CYAN
        ),
        colorize(
            &format!(
                "{}{} file{}{}",
                Colors::BOLD,
                sources.len(),
                if sources.len() == 1 { "" } else { "s" },
                Colors::RESET
            ),
            Colors::BRIGHT_WHITE
        )
    );

    // List files (limit to first 10 to avoid spam)
    let path_width = terminal_width().saturating_sub(8).max(20);
    for (i, source) in sources.iter().enumerate().take(10) {
        println!(
            "   {}. {}",
            colorize(&format!("{}", i + 1), Colors::DIM),
            colorize(
                &truncate_path(&source.path.display().to_string(), path_width),
                Colors::BLUE
            )
        );
    }
    if sources.len() > 10 {
        println!(
            "   {}",
            colorize(
                &format!("... and {} more files", sources.len() - 10),
                Colors::DIM
            )
        );
    }
    println!();
}

fn print_config_line(label: &str, value: &str) {
    println!(
        "{}: {}",
        colorize(
            &format!("{}{}{}", Colors::BOLD, label, Colors::RESET),
            Colors::BRIGHT_CYAN
        ),
        colorize(value, Colors::BRIGHT_WHITE)
    );
}

/// Display discovery information with per-kind counts
pub fn display_discovery_info(sources: &[SourceFile], total_candidates: usize) {
    let counts = Classifier::kind_counts(sources);
    let breakdown = counts
        .iter()
        .map(|(kind, count)| format!("{count} {}", kind.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let headline = if sources.len() == total_candidates {
        format!(
            "{}{} data files{}",
            Colors::BOLD,
            sources.len(),
            Colors::RESET
        )
    } else {
        format!(
            "{}{} data files, {} candidates{}",
            Colors::BOLD,
            sources.len(),
            total_candidates,
            Colors::RESET
        )
    };

    println!(
        "\n{} {}: {}",
        colorize("🔍", Colors::BRIGHT_GREEN),
        colorize(
            &format!("{}{}{}", Colors::BOLD, "Found", Colors::RESET),
            Colors::BRIGHT_CYAN
        ),
        colorize(&headline, Colors::BRIGHT_WHITE)
    );
    if !breakdown.is_empty() {
        println!("   {}", colorize(&breakdown, Colors::DIM));
    }
    println!();
}

/// Display run results based on output format
pub fn display_results(
    run: &CleanRun,
    analytics: Option<&AnalyticsReport>,
    output_format: &str,
    quiet: bool,
    config: &Config,
    metadata: &DisplayMetadata,
    artifacts: &[PathBuf],
) {
    match output_format {
        output_formats::MINIMAL => display_minimal_output(run, metadata, artifacts),
        output_formats::JSON => display_json_output(run, analytics, metadata, artifacts),
        _ => display_text_output(run, analytics, quiet, config, metadata, artifacts),
    }
}

/// Display results in minimal format (no colors, emojis, or grouping)
fn display_minimal_output(run: &CleanRun, metadata: &DisplayMetadata, artifacts: &[PathBuf]) {
    for error in &run.stats.errors {
        println!("ERROR {error}");
    }
    println!(
        "{} files processed, {} cleaned, {} rows removed",
        metadata.files_processed,
        metadata.files_cleaned,
        metadata.rows_before.saturating_sub(metadata.rows_after)
    );
    for artifact in artifacts {
        println!("{}", artifact.display());
    }
}

/// Display results as one combined JSON document
fn display_json_output(
    run: &CleanRun,
    analytics: Option<&AnalyticsReport>,
    metadata: &DisplayMetadata,
    artifacts: &[PathBuf],
) {
    let rows_removed = metadata.rows_before.saturating_sub(metadata.rows_after);
    let document = serde_json::json!({
        "status": if run.stats.has_errors() { "failure" } else { "success" },
        "files": {
            "discovered": metadata.files_discovered,
            "processed": metadata.files_processed,
            "cleaned": metadata.files_cleaned,
        },
        "rows": {
            "before": metadata.rows_before,
            "after": metadata.rows_after,
            "removed": rows_removed,
            "removal_rate": run.stats.overall_removal_rate(),
        },
        "errors": run.stats.errors,
        "cleaning_details": run.stats.cleaning_details,
        "recommendations": cleaner::generate_recommendations(&run.stats),
        "analytics": analytics,
        "artifacts": artifacts
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>(),
    });
    println!("{document}");
}

/// Display results in text format with colors, emojis, and grouping
fn display_text_output(
    run: &CleanRun,
    analytics: Option<&AnalyticsReport>,
    quiet: bool,
    config: &Config,
    metadata: &DisplayMetadata,
    artifacts: &[PathBuf],
) {
    if !quiet {
        display_cleaning_summary(run);
        display_grouped_issues(run);

        if let Some(report) = analytics {
            display_analytics_summary(report);
        }

        display_recommendations(&cleaner::generate_recommendations(&run.stats));
        display_artifacts(artifacts, config);
    }

    display_threshold_info(config, metadata, quiet);
}

/// Per-file cleaning lines plus the aggregate row counts
fn display_cleaning_summary(run: &CleanRun) {
    println!(
        "{} {}",
        colorize(display::EMOJI_BROOM, Colors::BRIGHT_GREEN),
        colorize(
            &format!("{}{}{}", Colors::BOLD, "Cleaning Summary", Colors::RESET),
            Colors::BRIGHT_GREEN
        )
    );

    for (file_name, detail) in &run.stats.cleaning_details {
        let (mark, mark_color) = if detail.rows_removed == 0 {
            (display::CHECK_MARK, Colors::BRIGHT_GREEN)
        } else {
            (display::CROSS_MARK, Colors::BRIGHT_YELLOW)
        };
        println!(
            "   {} {} ({}): {} {} {} rows ({:.1}% removed)",
            colorize(mark, mark_color),
            colorize(file_name, Colors::CYAN),
            colorize(&detail.file_type, Colors::DIM),
            format_count(detail.original_rows),
            colorize("→", Colors::DIM),
            format_count(detail.cleaned_rows),
            detail.removal_rate,
        );
    }

    if !run.stats.errors.is_empty() {
        println!(
            "\n   {} {}:",
            colorize("⚠️", Colors::BRIGHT_RED),
            colorize(
                &format!("{}{}{}", Colors::BOLD, "Errors", Colors::RESET),
                Colors::BRIGHT_RED
            )
        );
        for (i, error) in run.stats.errors.iter().enumerate() {
            println!(
                "      {}. {}",
                colorize(&format!("{}", i + 1), Colors::DIM),
                colorize(error, Colors::BRIGHT_RED)
            );
        }
    }

    println!(
        "\n   {} rows before, {} after ({:.2}% removed)\n",
        format_count(run.stats.total_rows_before),
        format_count(run.stats.total_rows_after),
        run.stats.overall_removal_rate(),
    );
}

/// Display removed rows grouped by issue category
fn display_grouped_issues(run: &CleanRun) {
    const CATEGORIES: [IssueCategory; 7] = [
        IssueCategory::BlankKeyFields,
        IssueCategory::Duplicate,
        IssueCategory::NonItemRow,
        IssueCategory::MissingBusinessName,
        IssueCategory::MissingItemName,
        IssueCategory::NegativeAmount,
        IssueCategory::EmptyRow,
    ];

    for category in CATEGORIES {
        let mut matching = Vec::new();
        for file in &run.files {
            for issue in &file.issues {
                if issue.category == category {
                    matching.push((file.source.file_name(), issue));
                }
            }
        }
        if matching.is_empty() {
            continue;
        }

        println!(
            "   {} {} ({}):",
            colorize("🚫", Colors::BRIGHT_YELLOW),
            colorize(
                &format!(
                    "{}{}{}",
                    Colors::BOLD,
                    capitalize(category.description()),
                    Colors::RESET
                ),
                Colors::BRIGHT_YELLOW
            ),
            matching.len()
        );
        for (i, (file_name, issue)) in matching.iter().enumerate().take(10) {
            println!(
                "      {}. {}: {}",
                colorize(&format!("{}", i + 1), Colors::DIM),
                colorize(file_name, Colors::CYAN),
                issue
            );
        }
        if matching.len() > 10 {
            println!(
                "      {}",
                colorize(
                    &format!("... and {} more rows", matching.len() - 10),
                    Colors::DIM
                )
            );
        }
        println!();
    }
}

/// Analytics summary blocks in the refinement report layout
fn display_analytics_summary(report: &AnalyticsReport) {
    let summary = &report.summary;
    let customers = &report.customers;
    let merchants = &report.merchants;
    let business = &report.business_customers;
    let predictions = &report.predictions;

    println!(
        "{} {}",
        colorize(display::EMOJI_CHART, Colors::BRIGHT_CYAN),
        colorize(
            &format!(
                "{}{}{}",
                Colors::BOLD,
                "Data Refinement Summary",
                Colors::RESET
            ),
            Colors::BRIGHT_CYAN
        )
    );

    println!(
        "\n {}",
        colorize("COMPREHENSIVE PLATFORM OVERVIEW:", Colors::BRIGHT_WHITE)
    );
    println!(
        "   Total Entities Onboarded: {}",
        format_count(summary.total_entities_onboarded)
    );
    println!(
        "   - Individual Customers: {}",
        format_count(summary.comprehensive_breakdown.individual_customers)
    );
    println!(
        "   - Business Customers: {}",
        format_count(summary.comprehensive_breakdown.business_customers)
    );
    println!(
        "   - Merchants: {}",
        format_count(summary.comprehensive_breakdown.merchants)
    );
    println!(
        "   Total Platform Volume: ${}",
        format_money(summary.total_platform_volume)
    );
    println!("   Overall Active Rate: {}%", summary.overall_active_rate);

    println!(
        "\n {}",
        colorize("INDIVIDUAL CUSTOMERS:", Colors::BRIGHT_WHITE)
    );
    println!(
        "   Total Onboarded: {}",
        format_count(customers.total_onboarded)
    );
    println!("   Active: {}", format_count(customers.active_customers));
    println!(
        "   Inactive: {}",
        format_count(customers.inactive_customers)
    );
    println!(
        "   With Names: {}",
        format_count(customers.customers_with_names)
    );
    println!(
        "   With Phone: {}",
        format_count(customers.customers_with_phone)
    );
    println!(
        "   With Email: {}",
        format_count(customers.customers_with_email)
    );
    println!(
        "   Complete Profiles: {}",
        format_count(customers.profile_complete)
    );
    println!(
        "   Recent Signups (30d): {}",
        format_count(customers.recent_signups_30days)
    );
    println!("   Engagement Rate: {:.1}%", customers.engagement_rate);
    if let (Some(earliest), Some(latest)) =
        (&customers.date_range.earliest, &customers.date_range.latest)
    {
        println!("   Customer Range: {earliest} to {latest}");
    }

    println!(
        "\n {}",
        colorize("BUSINESS CUSTOMERS:", Colors::BRIGHT_WHITE)
    );
    println!(
        "   Total Business Accounts: {}",
        format_count(business.total_business_accounts)
    );
    println!(
        "   Active Accounts: {}",
        format_count(business.active_accounts)
    );
    println!("   Live Accounts: {}", format_count(business.live_accounts));
    println!("   MTD Volume: ${}", format_money(business.total_mtd_volume));
    println!(
        "   Last Month Volume: ${}",
        format_money(business.total_last_month_volume)
    );
    println!(
        "   High Volume Accounts: {}",
        format_count(business.high_volume_accounts)
    );
    println!(
        "   Avg Volume per Account: ${}",
        format_money(business.avg_volume_per_account)
    );

    if !business.top_3_business_customers.is_empty() {
        println!(
            "\n {}",
            colorize("TOP 3 BUSINESS CUSTOMERS BY VOLUME:", Colors::BRIGHT_WHITE)
        );
        for (i, customer) in business.top_3_business_customers.iter().enumerate() {
            println!(
                "   {}. {}: ${}",
                i + 1,
                customer.business_name,
                format_money(customer.total_volume)
            );
        }
    }

    println!("\n {}", colorize("MERCHANTS:", Colors::BRIGHT_WHITE));
    println!("   Total Merchants: {}", merchants.total_merchants);
    println!("   Active: {}", merchants.active_merchants);
    println!("   Inactive: {}", merchants.inactive_merchants);
    match merchants.average_profit_margin {
        Some(margin) => println!("   Avg Profit Margin: {margin:.2}%"),
        None => println!("   Avg Profit Margin: n/a"),
    }

    if !merchants.top_3_merchants.is_empty() {
        println!(
            "\n {}",
            colorize("TOP 3 MERCHANTS BY REVENUE:", Colors::BRIGHT_WHITE)
        );
        for (i, merchant) in merchants.top_3_merchants.iter().enumerate() {
            println!(
                "   {}. {}: ${}",
                i + 1,
                merchant.merchant_name,
                format_money(merchant.gross_sales.unwrap_or_default())
            );
            if let Some(ref inv) = merchant.inventory_details {
                println!(
                    "      Inventory: {} items, Value: ${}",
                    format_count(inv.total_items),
                    format_money(inv.total_inventory_value)
                );
            }
        }
    }

    if let (Some(monthly), Some(annual)) =
        (&predictions.next_2_months, &predictions.same_period_next_year)
    {
        println!("\n {}", colorize("PREDICTIONS:", Colors::BRIGHT_WHITE));
        println!(
            "   Next {} Months Total: ${}",
            monthly.months.len(),
            format_money_f64(monthly.total)
        );
        println!(
            "   Same Period Next Year: ${}",
            format_money_f64(annual.forecast)
        );
    }
    println!();
}

/// Data-quality recommendations
fn display_recommendations(recommendations: &[String]) {
    println!(
        "{} {}",
        colorize(display::EMOJI_BULB, Colors::BRIGHT_YELLOW),
        colorize(
            &format!("{}{}{}", Colors::BOLD, "Recommendations", Colors::RESET),
            Colors::BRIGHT_YELLOW
        )
    );
    for (i, recommendation) in recommendations.iter().enumerate() {
        println!(
            "   {}. {}",
            colorize(&format!("{}", i + 1), Colors::DIM),
            recommendation
        );
    }
    println!();
}

/// Artifact locations written by the run
fn display_artifacts(artifacts: &[PathBuf], config: &Config) {
    for artifact in artifacts {
        println!(
            "{} Report saved to: {}",
            colorize(display::EMOJI_SAVE, Colors::BRIGHT_BLUE),
            colorize(&artifact.display().to_string(), Colors::BLUE)
        );
    }
    println!(
        "🗂️  Cleaned files available in: {}",
        colorize(&config.out_dir_path().display().to_string(), Colors::BLUE)
    );
    if !config.no_backup.unwrap_or(false) {
        println!(
            "💿 Original files backed up to: {}",
            colorize(&config.backup_dir_path().display().to_string(), Colors::BLUE)
        );
    }
}

/// Display removal threshold information if configured
fn display_threshold_info(config: &Config, metadata: &DisplayMetadata, quiet: bool) {
    if let Some(threshold) = config.failure_threshold {
        if metadata.rows_before == 0 {
            return;
        }
        let rows_removed = metadata.rows_before.saturating_sub(metadata.rows_after);
        let removal_rate = rows_removed as f64 / metadata.rows_before as f64 * 100.0;

        if !quiet {
            if removal_rate > threshold {
                println!(
                    "\n{} Removal rate {:.1}% exceeds threshold {:.1}% ({}/{} rows removed)",
                    colorize("❌", Colors::BRIGHT_RED),
                    removal_rate,
                    threshold,
                    rows_removed,
                    metadata.rows_before
                );
            } else if rows_removed > 0 {
                println!(
                    "\n{} Removal rate {:.1}% is within threshold {:.1}% ({}/{} rows removed)",
                    colorize("✅", Colors::BRIGHT_GREEN),
                    removal_rate,
                    threshold,
                    rows_removed,
                    metadata.rows_before
                );
            }
        }
    }
}

/// Integer with thousands separators, 1234567 -> "1,234,567"
fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Money with thousands separators and two decimals
fn format_money(value: Decimal) -> String {
    group_thousands(&format!("{value:.2}"))
}

fn format_money_f64(value: f64) -> String {
    group_thousands(&format!("{value:.2}"))
}

fn group_thousands(raw: &str) -> String {
    let (number, decimals) = match raw.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (raw, None),
    };
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match decimals {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
