//! End-to-end checks driving the normalizer from regex named captures, the
//! way a pattern engine feeds it in production.

use chrono::NaiveDate;
use regex::Regex;

use spanform::{RawMatch, Slots};

use crate::{Locale, TemporalNormalizer};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

/// A simplified numeric-date grammar with the production slot names.
fn mdy_pattern() -> Regex {
    Regex::new(
        r"(?x)
        (?P<DM1>\d{1,2})
        (?P<DSEP1>[/.-])
        (?P<DM2>\d{1,2})
        (?P<DSEP2>[/.-])
        (?P<YEAR>\d{4})
        ",
    )
    .unwrap()
}

fn extract(re: &Regex, pattern_id: &str, text: &str) -> Option<RawMatch> {
    let caps = re.captures(text)?;
    let matched = caps.get(0)?;
    Some(RawMatch::new(
        matched.as_str(),
        pattern_id,
        Slots::from_captures(re, &caps),
    ))
}

#[test]
fn test_forced_euro_extraction() {
    let re = mdy_pattern();
    let raw = extract(&re, "MDY-01", "text text 04/05/2025").unwrap();
    assert_eq!(raw.text, "04/05/2025");

    let m = TemporalNormalizer::with_locale(Locale::Euro).normalize(&raw, today());
    assert!(m.verdict.is_valid);
    assert_eq!(m.attrs.unwrap().datenorm, "2025-05-04");
}

#[test]
fn test_unambiguous_day_first_extraction() {
    let re = mdy_pattern();
    let raw = extract(&re, "MDY-01", "text text 30/05/2025").unwrap();

    // day > 12 forces the day-first reading with or without a forced locale.
    for normalizer in [
        TemporalNormalizer::new(),
        TemporalNormalizer::with_locale(Locale::Euro),
    ] {
        let m = normalizer.normalize(&raw, today());
        assert!(m.verdict.is_valid);
        assert_eq!(m.attrs.unwrap().datenorm, "2025-05-30");
    }
}

#[test]
fn test_separator_consistency_from_captures() {
    let re = Regex::new(
        r"(?x)
        (?P<DM1>\d{1,2})(?P<DSEP1>[/.-])(?P<DM2>\d{1,2})(?P<DSEP2>[/.-])(?P<YEAR>\d{4})",
    )
    .unwrap();
    let raw = extract(&re, "MDY-01", "04/05-2025").unwrap();

    let m = TemporalNormalizer::new().normalize(&raw, today());
    assert!(!m.verdict.is_valid);
    assert_eq!(
        m.verdict.reason.as_ref().map(|r| r.code()),
        Some("sep-mismatch")
    );
}
