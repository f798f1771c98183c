//! Field-level cleaning and parsing rules
//!
//! These are the pure functions the table cleaner and the analytics
//! stage are built from. Inputs are raw cell text as exported, outputs
//! are normalized values or `None` for values that fail validation.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::core::constants::defaults;

static NON_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d]").expect("Failed to compile digit filter pattern"));

static CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([0-9,]+\.?[0-9]*)").expect("Failed to compile currency pattern"));

static PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+\.?[0-9]*)%").expect("Failed to compile percent pattern"));

static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z]+ \d{1,2}, \d{4})").expect("Failed to compile date pattern")
});

/// Formats seen across merchant platform exports, tried in order
const LOOSE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const LOOSE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d-%b-%Y",
];

/// A phone number is kept when it contains 10 or 11 digits. The
/// original formatting is preserved, only surrounding whitespace is
/// dropped.
pub fn clean_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let digits = NON_DIGITS.replace_all(trimmed, "");
    let digit_count = digits.len();
    if !(defaults::MIN_PHONE_DIGITS..=defaults::MAX_PHONE_DIGITS).contains(&digit_count) {
        return None;
    }

    Some(trimmed.to_string())
}

/// An email address is lowercased and must contain exactly one `@`,
/// at least one `.`, and five or more characters.
pub fn clean_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return None;
    }

    if !email.contains('@') || !email.contains('.') {
        return None;
    }
    if email.len() < defaults::MIN_EMAIL_LENGTH || email.matches('@').count() != 1 {
        return None;
    }

    Some(email)
}

/// A name must be at least two characters and not purely digits.
/// Valid names are title-cased.
pub fn clean_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() {
        return None;
    }

    if name.chars().count() < defaults::MIN_NAME_LENGTH
        || name.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    Some(title_case(name))
}

/// Uppercase every letter that follows a non-letter, lowercase the
/// rest. Word boundaries are any non-alphabetic character.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_alphabetic = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alphabetic {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            result.push(c);
            prev_alphabetic = false;
        }
    }

    result
}

/// Parse a date in any of the formats merchant exports use.
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    for format in LOOSE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    for format in LOOSE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    None
}

/// Extract the last dollar amount in a piece of text.
///
/// Sales reports repeat labels with running totals; the final amount
/// on a line is the authoritative one.
pub fn parse_currency(text: &str) -> Option<Decimal> {
    let captures = CURRENCY.captures_iter(text).last()?;
    parse_decimal_digits(&captures[1])
}

/// Extract the last percentage in a piece of text.
pub fn parse_percent(text: &str) -> Option<Decimal> {
    let captures = PERCENT.captures_iter(text).last()?;
    parse_decimal_digits(&captures[1])
}

/// Tolerant numeric parse for volume and price columns. Accepts plain
/// numbers plus dollar signs and thousands separators.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let stripped: String = trimmed
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    parse_decimal_digits(&stripped)
}

/// Whether a sales row cell holds an amount. True for anything with a
/// dollar sign, or text that is purely digits once separators are
/// removed.
pub fn is_numeric_like(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.contains('$') {
        return true;
    }

    let stripped: String = trimmed
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect();
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

/// Last `Mon DD, YYYY` date mentioned in a piece of text, used for the
/// closing date of a report period.
pub fn last_month_day_year(text: &str) -> Option<NaiveDate> {
    MONTH_DAY_YEAR
        .captures_iter(text)
        .filter_map(|captures| {
            let raw = &captures[1];
            NaiveDate::parse_from_str(raw, "%b %d, %Y")
                .or_else(|_| NaiveDate::parse_from_str(raw, "%B %d, %Y"))
                .ok()
        })
        .last()
}

fn parse_decimal_digits(digits: &str) -> Option<Decimal> {
    let without_commas = digits.replace(',', "");
    // Amounts like "1234." parse once the dangling separator is gone
    let normalized = without_commas.trim_end_matches('.');
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<Decimal>().ok()
}
