//! Heuristic false-positive suppression for grid-shaped text.
//!
//! Both filters are pure decision policies: the same match and the same
//! reference date always produce the same `(filtered_out, reason)` pair.
//! The reference date is an explicit parameter rather than captured state,
//! so recency windows stay correct in long-running processes and tests can
//! pin a fake date.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use spanform::Rejection;

use crate::variants::GeocoordMatch;

/// Calendar-looking prefixes that disqualify an MGRS candidate: day-month-
/// year variants, with and without a trailing time.
const MGRS_DATE_FORMATS: &[&str] = &["%d%b%Y", "%d%b%y"];
const MGRS_DATETIME_FORMATS: &[&str] = &["%d%b%Y%H%M", "%d%b%y%H%M"];

/// Decoy digit runs: counting sequences never seen in real grid references.
const DECOY_SEQUENCES: &[&str] = &["1234", "123456", "12345678", "1234567890"];

/// Rejects MGRS-shaped text that is more plausibly something else: a date,
/// a rate, a counting sequence, or text with the wrong lexical shape.
#[derive(Debug, Clone)]
pub struct MgrsFilter {
    /// A date-looking prefix within this many years of the reference date
    /// rejects the candidate.
    pub window_years: i32,
}

impl Default for MgrsFilter {
    fn default() -> Self {
        Self { window_years: 30 }
    }
}

impl MgrsFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether the candidate is a false positive.
    pub fn filter_out(&self, m: &GeocoordMatch, today: NaiveDate) -> (bool, Option<Rejection>) {
        if !m.verdict.is_valid {
            return (true, Some(Rejection::Invalid));
        }

        // Lexical shape: upper-case alphanumeric, more than 6 characters
        // once spaces are removed, with at least one letter.
        let stripped: String = m.text.chars().filter(|c| !c.is_whitespace()).collect();
        let shape_ok = stripped.len() > 6
            && stripped
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
            && stripped.chars().any(|c| c.is_ascii_uppercase());
        if !shape_ok {
            return (true, Some(Rejection::Lexical));
        }

        if m.text.split_whitespace().any(|w| w == "SEC" || w == "PER") {
            return (true, Some(Rejection::RateWord));
        }

        for seq in DECOY_SEQUENCES {
            if m.textnorm.contains(seq) {
                return (true, Some(Rejection::DigitSequence));
            }
        }

        for year in leading_date_years(&m.textnorm) {
            if (year - today.year()).abs() < self.window_years {
                debug!(text = %m.text, year, "mgrs candidate reads as a recent date");
                return (true, Some(Rejection::DateLike));
            }
        }

        (false, None)
    }
}

/// Try every date template against leading slices of the normalized text
/// and collect every year that parses. A slice may parse under more than
/// one template with different years (`10jan94` is year 94 under `%Y` and
/// 1994 under `%y`); recency is judged against each.
fn leading_date_years(textnorm: &str) -> Vec<i32> {
    let mut years = Vec::new();
    let upper_len = textnorm.len().min(11);
    for end in (5..=upper_len).rev() {
        if !textnorm.is_char_boundary(end) {
            continue;
        }
        let prefix = &textnorm[..end];
        for fmt in MGRS_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, fmt) {
                years.push(date.year());
            }
        }
        for fmt in MGRS_DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(prefix, fmt) {
                years.push(dt.year());
            }
        }
    }
    years
}

/// Numeric date-time templates that collide with all-numeric DMS text.
const DMS_DATE_FORMATS: &[&str] = &["%y-%d-%m %H:%M:%S", "%m-%d-%y %H:%M:%S"];

/// Rejects DMS-shaped text that parses as a numeric date-time. Unlike the
/// MGRS filter there is no recency window: any parse rejects.
#[derive(Debug, Clone, Default)]
pub struct DmsFilter;

impl DmsFilter {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether the candidate is a false positive.
    pub fn filter_out(&self, m: &GeocoordMatch) -> (bool, Option<Rejection>) {
        if !m.verdict.is_valid {
            return (true, Some(Rejection::Invalid));
        }
        // Alphabetic-led text cannot collide with the numeric templates.
        if m.text.chars().next().is_some_and(|c| c.is_alphabetic()) {
            return (false, None);
        }
        for fmt in DMS_DATE_FORMATS {
            if NaiveDateTime::parse_from_str(m.text.trim(), fmt).is_ok() {
                debug!(text = %m.text, "dms candidate reads as a date-time");
                return (true, Some(Rejection::DateLike));
            }
        }
        (false, None)
    }
}
