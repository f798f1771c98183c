//! Property-based tests for merchsum using proptest
//!
//! These tests generate random inputs to test edge cases and ensure
//! robustness across a wide range of potential inputs.

use assert_cmd::prelude::*;
use proptest::prelude::*;
use std::process::Command;

const NAME: &str = "merchsum";

/// Generate plausible customer field values
fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        r"[a-z]{2,12}",
        r"[A-Z]{2,12}",
        r"[a-z]{2,8}-[a-z]{2,8}",
        Just("".to_string()),
        Just("123456".to_string()),
        Just("x".to_string()),
    ]
}

fn email_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (r"[a-z]{2,10}", r"[a-z]{2,8}")
            .prop_map(|(user, domain)| format!("{user}@{domain}.com")),
        (r"[A-Z]{2,10}", r"[a-z]{2,8}")
            .prop_map(|(user, domain)| format!("{user}@{domain}.org")),
        // Malformed addresses
        Just("not-an-email".to_string()),
        Just("double@@at.com".to_string()),
        Just("a@b".to_string()),
        Just("".to_string()),
    ]
}

fn phone_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        r"[0-9]{10}",
        r"\([0-9]{3}\) [0-9]{3}-[0-9]{4}",
        r"\+1[0-9]{10}",
        Just("555-CALL-NOW".to_string()),
        Just("42".to_string()),
        Just("".to_string()),
    ]
}

fn date_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (2020u32..2026, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
        (1u32..13, 1u32..29, 2020u32..2026)
            .prop_map(|(m, d, y)| format!("{m:02}/{d:02}/{y:04}")),
        Just("yesterday".to_string()),
        Just("".to_string()),
    ]
}

/// Generate a whole customer export, valid and broken rows mixed
fn customer_csv_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            name_strategy(),
            name_strategy(),
            email_strategy(),
            phone_strategy(),
            date_strategy(),
        )
            .prop_map(|(first, last, email, phone, date)| {
                format!("{first},{last},{email},{phone},{date}")
            }),
        1..30,
    )
    .prop_map(|rows| {
        format!(
            "First Name,Last Name,Email Address,Phone Number,Signup Date\n{}\n",
            rows.join("\n")
        )
    })
}

/// Generate an inventory export with occasional junk values
fn inventory_csv_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (r"[A-Za-z ]{0,20}", -100.0f64..1000.0, 0u32..500).prop_map(|(name, price, qty)| {
            format!("{name},{price:.2},{qty}")
        }),
        1..30,
    )
    .prop_map(|rows| format!("Name,Price,Quantity\n{}\n", rows.join("\n")))
}

fn run_on_content(file_name: &str, content: &str, extra_args: &[&str]) {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_path = temp_dir.path().join(file_name);
    std::fs::write(&data_path, content).unwrap();

    let mut cmd = Command::cargo_bin(NAME).unwrap();
    cmd.current_dir(temp_dir.path())
        .arg(&data_path)
        .arg("--format")
        .arg("minimal")
        .arg("--no-config")
        .arg("--no-progress")
        .arg("--no-backup");
    for arg in extra_args {
        cmd.arg(arg);
    }

    // Should not crash, regardless of content
    // Can succeed or fail, but should not panic or crash
    let _ = cmd.assert().try_success();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))] // Default is 256...

    #[test]
    fn test_handles_random_customer_exports(
        content in customer_csv_strategy()
    ) {
        run_on_content("customer-export.csv", &content, &[]);
    }

    #[test]
    fn test_handles_random_inventory_exports(
        content in inventory_csv_strategy()
    ) {
        run_on_content("inventory-export.csv", &content, &[]);
    }

    #[test]
    fn test_handles_unclassifiable_files(
        content in r"[ -~]{0,500}"
    ) {
        run_on_content("random-data.csv", &content, &[]);
    }

    #[test]
    fn test_configuration_combinations(
        active_window in 1i64..365,
        concurrency in 1u8..10,
        growth_rate in -50.0f64..200.0,
        forecast_months in 1u32..24,
    ) {
        run_on_content(
            "customer-export.csv",
            "First Name,Email Address\nJane,jane@example.com\n",
            &[
                "--active-window",
                &active_window.to_string(),
                "--concurrency",
                &concurrency.to_string(),
                "--growth-rate",
                &growth_rate.to_string(),
                "--forecast-months",
                &forecast_months.to_string(),
            ],
        );
    }

    #[test]
    fn test_failure_threshold_edge_cases(
        threshold in 0.0f64..100.0
    ) {
        // Mix of valid and empty rows so some cleaning always happens
        run_on_content(
            "customer-export.csv",
            "First Name,Email Address\nJane,jane@example.com\n,\n",
            &["--failure-threshold", &threshold.to_string()],
        );
    }

    #[test]
    fn test_exclude_patterns(
        patterns in prop::collection::vec(r"[a-z]{3,10}", 1..5)
    ) {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_path = temp_dir.path().join("customer-export.csv");
        std::fs::write(&data_path, "Email Address\na@b.co\n").unwrap();

        let mut cmd = Command::cargo_bin(NAME).unwrap();
        cmd.current_dir(temp_dir.path())
            .arg(&data_path)
            .arg("--format")
            .arg("minimal")
            .arg("--no-config")
            .arg("--no-progress")
            .arg("--no-backup");
        for pattern in &patterns {
            cmd.arg("--exclude-pattern").arg(pattern);
        }

        // Should handle any exclude patterns without crashing
        let _ = cmd.assert().try_success();
    }

    #[test]
    fn test_file_extensions(
        extensions in prop::collection::vec(r"[a-z]{2,5}", 1..8)
    ) {
        let temp_dir = tempfile::tempdir().unwrap();

        // Create files with random extensions
        for (i, ext) in extensions.iter().enumerate() {
            let file_path = temp_dir.path().join(format!("customer-export{i}.{ext}"));
            std::fs::write(&file_path, "Email Address\na@b.co\n").unwrap();
        }

        let extension_list = extensions.join(",");

        let mut cmd = Command::cargo_bin(NAME).unwrap();
        cmd.current_dir(temp_dir.path())
            .arg("--recursive")
            .arg("--include")
            .arg(&extension_list)
            .arg(temp_dir.path())
            .arg("--format")
            .arg("minimal")
            .arg("--no-config")
            .arg("--no-progress")
            .arg("--no-backup");

        // Should handle any file extensions
        let _ = cmd.assert().try_success();
    }

    #[test]
    fn test_large_content_generation(
        row_count in 50usize..300,
        blank_every in 2usize..10
    ) {
        let mut rows = Vec::new();
        for i in 0..row_count {
            if i % blank_every == 0 {
                rows.push(",,".to_string());
            } else {
                rows.push(format!("customer{i},user{i}@example.com,303555{i:04}"));
            }
        }
        let content = format!(
            "First Name,Email Address,Phone Number\n{}\n",
            rows.join("\n")
        );

        run_on_content("customer-export.csv", &content, &["--concurrency", "4"]);
    }
}

#[cfg(test)]
mod unit_property_tests {
    use super::*;
    use chrono::NaiveDate;
    use merchsum::cleaning::cleaner::Cleaner;
    use merchsum::cleaning::rules;
    use merchsum::core::types::{DataTable, DatasetKind};
    use proptest::proptest;

    proptest! {

        #[test]
        fn test_customer_csv_strategy_shape(content in customer_csv_strategy()) {
            prop_assert!(content.starts_with("First Name,"));
            prop_assert!(content.lines().count() >= 2);
            prop_assert!(content.len() < 10000);
        }

        #[test]
        fn test_clean_name_never_returns_blank(raw in r"[ -~]{0,40}") {
            if let Some(cleaned) = rules::clean_name(&raw) {
                prop_assert!(!cleaned.trim().is_empty());
                prop_assert!(cleaned.len() >= 2);
            }
        }

        #[test]
        fn test_clean_email_is_lowercase(raw in r"[ -~]{0,40}") {
            if let Some(cleaned) = rules::clean_email(&raw) {
                prop_assert_eq!(cleaned.clone(), cleaned.to_lowercase());
                prop_assert!(cleaned.contains('@'));
            }
        }

        #[test]
        fn test_title_case_preserves_length_for_ascii(raw in r"[a-zA-Z '-]{0,40}") {
            let cased = rules::title_case(&raw);
            prop_assert_eq!(cased.chars().count(), raw.chars().count());
        }

        #[test]
        fn test_cleaning_never_adds_rows(
            rows in prop::collection::vec(
                prop::collection::vec(r"[ -~]{0,15}", 3..4),
                0..25,
            )
        ) {
            let headers = vec![
                "First Name".to_string(),
                "Email Address".to_string(),
                "Phone Number".to_string(),
            ];
            let table = DataTable::new(headers, rows);
            let before = table.row_count();

            let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
            for kind in [
                DatasetKind::Customer,
                DatasetKind::Sales,
                DatasetKind::Business,
                DatasetKind::Inventory,
                DatasetKind::Unknown,
            ] {
                let outcome = Cleaner::clean_table(kind, &table, today);
                prop_assert!(outcome.table.row_count() <= before);
            }
        }

        #[test]
        fn test_parse_currency_handles_arbitrary_text(raw in r"[ -~]{0,40}") {
            // Must never panic, whatever the line looks like
            let _ = rules::parse_currency(&raw);
        }
    }
}
