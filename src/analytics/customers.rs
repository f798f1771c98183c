use chrono::NaiveDate;
use serde::Serialize;

use crate::cleaning::rules;
use crate::core::constants::defaults;
use crate::core::types::DataTable;

/// One customer row reduced to the signals analytics cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub signup: Option<NaiveDate>,
    pub has_name: bool,
    pub has_phone: bool,
    pub has_email: bool,
    pub has_address: bool,
}

impl CustomerProfile {
    pub fn profile_complete(&self) -> bool {
        self.has_name && self.has_phone && self.has_email
    }

    /// A customer counts as active when they signed up strictly after
    /// the cutoff. Unknown signup dates are inactive.
    pub fn signed_up_after(&self, cutoff: NaiveDate) -> bool {
        self.signup.map(|date| date > cutoff).unwrap_or(false)
    }
}

/// Flatten cleaned customer tables into profiles. Columns the export
/// lacks simply leave their flags unset.
pub fn collect_profiles(tables: &[&DataTable]) -> Vec<CustomerProfile> {
    let mut profiles = Vec::new();

    for table in tables {
        let first_name = table.column_index("First Name");
        let last_name = table.column_index("Last Name");
        let phone = table.column_index("Phone Number");
        let email = table.column_index("Email Address");
        let address = table.column_index("Address Line 1");
        let signup = table.column_index("Customer Since");

        for row in &table.rows {
            profiles.push(CustomerProfile {
                signup: signup.and_then(|col| rules::parse_loose_date(cell(row, col))),
                has_name: has_value(row, first_name) || has_value(row, last_name),
                has_phone: has_value(row, phone),
                has_email: has_value(row, email),
                has_address: has_value(row, address),
            });
        }
    }

    profiles
}

/// Earliest and latest signup dates seen across all customer files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerAnalytics {
    pub total_onboarded: usize,
    pub active_customers: usize,
    pub inactive_customers: usize,
    pub customers_with_names: usize,
    pub customers_with_phone: usize,
    pub customers_with_email: usize,
    pub customers_with_address: usize,
    pub profile_complete: usize,
    pub recent_signups_30days: usize,
    pub date_range: DateRange,
    pub engagement_rate: f64,
    pub profile_completion_rate: f64,
}

impl CustomerAnalytics {
    /// `active_cutoff` decides the Active/Inactive split. The recent
    /// signup figure always uses a fixed 30 day window ending `today`,
    /// independent of how the active window is configured.
    pub fn from_profiles(
        profiles: &[CustomerProfile],
        active_cutoff: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let total = profiles.len();
        let active = profiles
            .iter()
            .filter(|p| p.signed_up_after(active_cutoff))
            .count();
        let complete = profiles.iter().filter(|p| p.profile_complete()).count();

        let recent_cutoff = today - chrono::Duration::days(defaults::RECENT_SIGNUP_DAYS);
        let recent = profiles
            .iter()
            .filter(|p| p.signed_up_after(recent_cutoff))
            .count();

        let signups: Vec<NaiveDate> = profiles.iter().filter_map(|p| p.signup).collect();
        let date_range = DateRange {
            earliest: signups
                .iter()
                .min()
                .map(|date| date.format("%Y-%m-%d").to_string()),
            latest: signups
                .iter()
                .max()
                .map(|date| date.format("%Y-%m-%d").to_string()),
        };

        let share = |count: usize| {
            if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        };

        Self {
            total_onboarded: total,
            active_customers: active,
            inactive_customers: total - active,
            customers_with_names: profiles.iter().filter(|p| p.has_name).count(),
            customers_with_phone: profiles.iter().filter(|p| p.has_phone).count(),
            customers_with_email: profiles.iter().filter(|p| p.has_email).count(),
            customers_with_address: profiles.iter().filter(|p| p.has_address).count(),
            profile_complete: complete,
            recent_signups_30days: recent,
            date_range,
            engagement_rate: share(active),
            profile_completion_rate: share(complete),
        }
    }
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

fn has_value(row: &[String], col: Option<usize>) -> bool {
    col.and_then(|c| row.get(c))
        .map(|cell| !cell.trim().is_empty())
        .unwrap_or(false)
}
