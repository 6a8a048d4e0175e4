//! Date-time match orchestration.
//!
//! Ties the slot normalizers together in a fixed order: year first (hard
//! failure if unresolvable), then the locale-ambiguity test for the short
//! numeric families, then month, separators, day, and the February guard,
//! and finally calendar construction with optional time-of-day shift and
//! timezone conversion.

use chrono::{Duration, NaiveDate, NaiveTime, Offset, Utc};
use serde::Serialize;
use tracing::debug;

use spanform::{PatternId, RawMatch, Rejection, Verdict};

use crate::resolve::{self, Locale, LocaleDecision, Resolution, Resolved, TzSpec};

/// The two pattern identifiers whose generic numeric day/month pair is
/// locale-ambiguous and goes through the European-locale test first.
const AMBIGUOUS_MDY_PATTERNS: &[&str] = &["MDY-01", "MDY-02"];

/// Configuration surface consumed by the temporal normalizer.
#[derive(Debug, Clone, Default)]
pub struct TemporalConfig {
    /// When set to [`Locale::Euro`], ambiguous day/month pairs are forced
    /// day-first for the whole document.
    pub forced_locale: Option<Locale>,
}

/// Final attribute encodings shared with downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalAttrs {
    /// ISO date, after any time shift and timezone conversion.
    pub datenorm: String,
    /// Seconds since the epoch, wall-clock fields read as UTC.
    pub epoch: i64,
    /// Finest calendar unit actually captured.
    pub resolution: Resolution,
    pub locale: Locale,
    /// ISO date-time with offset; only present when a time was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Timezone abbreviation or rendered offset, when one was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tzinfo: Option<String>,
}

/// A normalized temporal candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTimeMatch {
    pub text: String,
    pub pattern_id: PatternId,
    pub locale: Locale,
    pub verdict: Verdict,
    /// Present only when the candidate normalized successfully.
    pub attrs: Option<TemporalAttrs>,
    /// Calendar construction failure text, when one occurred.
    pub error: Option<String>,
}

/// Normalizes raw temporal candidates into validated date/time records.
#[derive(Debug, Clone, Default)]
pub struct TemporalNormalizer {
    pub config: TemporalConfig,
}

impl TemporalNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a day/month ordering for every ambiguous date in a document.
    pub fn with_locale(locale: Locale) -> Self {
        Self {
            config: TemporalConfig {
                forced_locale: Some(locale),
            },
        }
    }

    /// Normalize one candidate.
    ///
    /// `today` is the reference date for two-digit-year windowing.
    pub fn normalize(&self, raw: &RawMatch, today: NaiveDate) -> DateTimeMatch {
        let mut m = DateTimeMatch {
            text: raw.text.clone(),
            pattern_id: raw.pattern_id.clone(),
            locale: Locale::NorthAm,
            verdict: Verdict::pending(),
            attrs: None,
            error: None,
        };
        let slots = &raw.slots;

        let year = match resolve::year(slots, today) {
            Resolved::Found(y) => y,
            _ => {
                m.verdict = Verdict::reject(Rejection::OutOfRange(
                    "year could not be resolved".into(),
                ));
                return m;
            }
        };

        // The short numeric families get the locale test before any
        // month-first reading is attempted.
        let is_short_mdy = AMBIGUOUS_MDY_PATTERNS.contains(&raw.pattern_id.as_str());
        let mut resolved_pair = None;
        if is_short_mdy {
            match resolve::european_day_month(slots, self.config.forced_locale) {
                LocaleDecision::Resolved { day, month } => {
                    resolved_pair = Some((day, month));
                    m.locale = Locale::Euro;
                }
                LocaleDecision::Rejected => {
                    debug!(text = %m.text, "day/month pair has no valid reading");
                    m.verdict = Verdict::reject(Rejection::AmbiguousLocale);
                    return m;
                }
                LocaleDecision::NoOpinion => {}
            }
        }

        let month = match resolved_pair {
            Some((_, month)) => month,
            None => match resolve::month_number(slots) {
                Resolved::Found(month) => month,
                _ => match resolve::month_name(slots) {
                    Resolved::Found(month) => month,
                    _ => {
                        m.verdict = Verdict::reject(Rejection::OutOfRange(
                            "month could not be resolved".into(),
                        ));
                        return m;
                    }
                },
            },
        };

        let mut resolution = Resolution::Month;

        let sep1 = slots.value("DSEP1");
        let sep2 = slots.value("DSEP2");
        if let (Some(first), Some(second)) = (sep1, sep2) {
            if first != second {
                m.verdict = Verdict::reject(Rejection::SeparatorMismatch {
                    first: Some(first.to_string()),
                    second: Some(second.to_string()),
                });
                return m;
            }
        }

        // A dotted numeric date with a two-digit year collides with a
        // different, non-date numeric convention; refuse to claim it.
        if sep1 == Some(".") && is_short_mdy {
            if let Some(year_text) = resolve::year_literal(slots) {
                if year_text.len() == 2 {
                    debug!(text = %m.text, "dotted short-year date left unclaimed");
                    m.verdict = Verdict::reject(Rejection::Lexical);
                    return m;
                }
            }
        }

        let day = match resolved_pair {
            Some((day, _)) => {
                resolution = Resolution::Day;
                day
            }
            None => match resolve::day(slots) {
                Resolved::Found(day) => {
                    resolution = Resolution::Day;
                    day
                }
                Resolved::Missing => 1,
                Resolved::Invalid => {
                    m.verdict =
                        Verdict::reject(Rejection::OutOfRange("day out of range".into()));
                    return m;
                }
            },
        };

        // Simple February catch; finer day/month cross-checks are left to
        // calendar construction.
        if month == 2 && day > 29 {
            m.verdict = Verdict::reject(Rejection::OutOfRange(format!(
                "February has no day {day}"
            )));
            return m;
        }

        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            let err = format!("invalid calendar date {year:04}-{month:02}-{day:02}");
            m.error = Some(err.clone());
            m.verdict = Verdict::reject(Rejection::Construction(err));
            return m;
        };

        let mut dt = date.and_time(NaiveTime::MIN);
        let time = resolve::time_of_day(slots);
        let mut tz: Option<TzSpec> = None;
        if let Some(t) = time {
            resolution = t.resolution();
            dt += Duration::hours(i64::from(t.hour));
            dt += Duration::minutes(i64::from(t.minute));
            if let Some(s) = t.second {
                dt += Duration::seconds(i64::from(s));
            }
            tz = resolve::timezone(slots);
        }

        let offset = tz
            .as_ref()
            .and_then(TzSpec::offset)
            .unwrap_or_else(|| Utc.fix());
        let zoned = dt.and_utc().with_timezone(&offset);

        m.attrs = Some(TemporalAttrs {
            datenorm: zoned.format("%Y-%m-%d").to_string(),
            epoch: zoned.naive_local().and_utc().timestamp(),
            resolution,
            locale: m.locale,
            timestamp: time.map(|_| zoned.format("%Y-%m-%dT%H:%M:%S%:z").to_string()),
            tzinfo: tz.as_ref().map(|t| t.label.clone()),
        });
        m.verdict = Verdict::accept();
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spanform::Slots;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn slots(pairs: &[(&str, &str)]) -> Slots {
        Slots::from_pairs(pairs.iter().copied())
    }

    /// Slot shape of the short numeric families: DM1/DM2 plus a year.
    fn mdy_slots(dm1: &str, dm2: &str, year: &str, sep: &str) -> Slots {
        Slots::from_pairs([
            ("DM1", dm1),
            ("DM2", dm2),
            ("YEAR", year),
            ("DSEP1", sep),
            ("DSEP2", sep),
        ])
    }

    fn datenorm(m: &DateTimeMatch) -> String {
        m.attrs.as_ref().expect("valid match").datenorm.clone()
    }

    #[test]
    fn test_forced_euro_locale() {
        let normalizer = TemporalNormalizer::with_locale(Locale::Euro);
        let cases = [
            ("04/05/2025", "04", "05", "2025-05-04"),
            ("30/05/2025", "30", "05", "2025-05-30"),
            ("12/05/2025", "12", "05", "2025-05-12"),
            ("12/12/2025", "12", "12", "2025-12-12"),
            ("05/12/2025", "05", "12", "2025-12-05"),
        ];
        for (text, dm1, dm2, expected) in cases {
            let raw = RawMatch::new(text, "MDY-01", mdy_slots(dm1, dm2, "2025", "/"));
            let m = normalizer.normalize(&raw, today());
            assert!(m.verdict.is_valid, "{text}: {:?}", m.verdict.reason);
            assert_eq!(datenorm(&m), expected, "{text}");
            assert_eq!(m.locale, Locale::Euro, "{text}");
        }
    }

    #[test]
    fn test_unambiguous_day_first_without_forced_locale() {
        let raw = RawMatch::new(
            "text text 30/05/2025",
            "MDY-01",
            mdy_slots("30", "05", "2025", "/"),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(m.verdict.is_valid);
        assert_eq!(datenorm(&m), "2025-05-30");
        assert_eq!(m.locale, Locale::Euro);
    }

    #[test]
    fn test_ambiguous_pair_defaults_month_first() {
        let raw = RawMatch::new(
            "04/05/2025",
            "MDY-01",
            mdy_slots("04", "05", "2025", "/"),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(m.verdict.is_valid);
        assert_eq!(datenorm(&m), "2025-04-05");
        assert_eq!(m.locale, Locale::NorthAm);
    }

    #[test]
    fn test_impossible_pair_hard_fails() {
        let raw = RawMatch::new(
            "13/13/2025",
            "MDY-01",
            mdy_slots("13", "13", "2025", "/"),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(!m.verdict.is_valid);
        assert_eq!(
            m.verdict.reason.as_ref().map(|r| r.code()),
            Some("ambiguous-locale")
        );
    }

    #[test]
    fn test_separator_mismatch_hard_fails() {
        let raw = RawMatch::new(
            "04/05-2025",
            "MDY-01",
            Slots::from_pairs([
                ("DM1", "04"),
                ("DM2", "05"),
                ("YEAR", "2025"),
                ("DSEP1", "/"),
                ("DSEP2", "-"),
            ]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(!m.verdict.is_valid);
        assert_eq!(
            m.verdict.reason.as_ref().map(|r| r.code()),
            Some("sep-mismatch")
        );
    }

    #[test]
    fn test_dotted_short_year_is_left_unclaimed() {
        // "04.05.09" is reserved for a different numeric convention when
        // the year is too short to disambiguate.
        let raw = RawMatch::new(
            "04.05.09",
            "MDY-02",
            Slots::from_pairs([
                ("DM1", "04"),
                ("DM2", "05"),
                ("YY", "09"),
                ("DSEP1", "."),
                ("DSEP2", "."),
            ]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(!m.verdict.is_valid);
        assert_eq!(m.verdict.reason.as_ref().map(|r| r.code()), Some("lexical"));

        // A four-digit year through the same dotted shape is fine.
        let raw = RawMatch::new(
            "04.05.2009",
            "MDY-02",
            mdy_slots("04", "05", "2009", "."),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(m.verdict.is_valid);
        assert_eq!(datenorm(&m), "2009-04-05");
    }

    #[test]
    fn test_month_name_with_default_day() {
        let raw = RawMatch::new(
            "JAN 2025",
            "MON-01",
            Slots::from_pairs([("MON_ABBREV", "JAN"), ("YEAR", "2025")]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(m.verdict.is_valid);
        let attrs = m.attrs.unwrap();
        assert_eq!(attrs.datenorm, "2025-01-01");
        assert_eq!(attrs.resolution.code(), 'M');
        assert!(attrs.timestamp.is_none());
    }

    #[test]
    fn test_found_day_escalates_resolution() {
        let raw = RawMatch::new(
            "15 JAN 2025",
            "DMY-01",
            Slots::from_pairs([
                ("DOM", "15"),
                ("MON_ABBREV", "JAN"),
                ("YEAR", "2025"),
            ]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        let attrs = m.attrs.unwrap();
        assert_eq!(attrs.datenorm, "2025-01-15");
        assert_eq!(attrs.resolution.code(), 'D');
    }

    #[test]
    fn test_out_of_range_day_hard_fails() {
        let raw = RawMatch::new(
            "APR 42, 2025",
            "MDY-03",
            Slots::from_pairs([
                ("MON_ABBREV", "APR"),
                ("DOM", "42"),
                ("YEAR", "2025"),
            ]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(!m.verdict.is_valid);
        assert_eq!(m.verdict.reason.as_ref().map(|r| r.code()), Some("range"));
    }

    #[test]
    fn test_february_rules() {
        // Day 30 in February is the one explicit day/month cross-check.
        let raw = RawMatch::new(
            "02/30/2024",
            "MDY-03",
            Slots::from_pairs([("MM", "02"), ("DOM", "30"), ("YEAR", "2024")]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(!m.verdict.is_valid);
        assert_eq!(m.verdict.reason.as_ref().map(|r| r.code()), Some("range"));

        // Feb 29 of a non-leap year falls through to calendar
        // construction, which records the failure.
        let raw = RawMatch::new(
            "02/29/2023",
            "MDY-03",
            Slots::from_pairs([("MM", "02"), ("DOM", "29"), ("YEAR", "2023")]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(!m.verdict.is_valid);
        assert!(m.error.as_deref().unwrap_or("").contains("2023-02-29"));
        assert_eq!(
            m.verdict.reason.as_ref().map(|r| r.code()),
            Some("construction")
        );

        // Feb 29 of a leap year is a real date.
        let raw = RawMatch::new(
            "02/29/2024",
            "MDY-03",
            Slots::from_pairs([("MM", "02"), ("DOM", "29"), ("YEAR", "2024")]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(m.verdict.is_valid);
        assert_eq!(datenorm(&m), "2024-02-29");
    }

    #[test]
    fn test_nominal_month_days_all_normalize() {
        let normalizer = TemporalNormalizer::new();
        let nominal_days = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (month, max_day) in nominal_days.into_iter().enumerate() {
            let month = month as u32 + 1;
            for day in 1..=max_day {
                let raw = RawMatch::new(
                    "synthetic",
                    "MDY-03",
                    Slots::from_pairs([
                        ("MM", month.to_string()),
                        ("DOM", day.to_string()),
                        ("YEAR", "2025".to_string()),
                    ]),
                );
                let m = normalizer.normalize(&raw, today());
                assert!(
                    m.verdict.is_valid,
                    "{month:02}/{day:02} should normalize: {:?}",
                    m.verdict.reason
                );
            }
        }
    }

    #[test]
    fn test_time_and_timezone_shift() {
        let base = Slots::from_pairs([
            ("MM", "06"),
            ("DOM", "15"),
            ("YEAR", "2025"),
            ("hh", "14"),
            ("mm", "30"),
            ("ss", "45"),
        ]);
        let mut with_tz = base.clone();
        with_tz.insert("LONG_TZ", "EST");

        let normalizer = TemporalNormalizer::new();
        let utc = normalizer.normalize(&RawMatch::new("t", "DTM-01", base), today());
        let est = normalizer.normalize(&RawMatch::new("t", "DTM-01", with_tz), today());

        let utc_attrs = utc.attrs.unwrap();
        let est_attrs = est.attrs.unwrap();
        assert_eq!(utc_attrs.resolution.code(), 's');
        assert_eq!(
            utc_attrs.timestamp.as_deref(),
            Some("2025-06-15T14:30:45+00:00")
        );
        assert!(utc_attrs.tzinfo.is_none());

        // EST wall clock is five hours behind the captured wall time.
        assert_eq!(
            est_attrs.timestamp.as_deref(),
            Some("2025-06-15T09:30:45-05:00")
        );
        assert_eq!(est_attrs.tzinfo.as_deref(), Some("EST"));
        assert_eq!(utc_attrs.epoch - est_attrs.epoch, 5 * 3600);
    }

    #[test]
    fn test_hour_only_time_is_ignored() {
        let raw = RawMatch::new(
            "15 JUN 2025 14h",
            "DMY-01",
            Slots::from_pairs([
                ("DOM", "15"),
                ("MM", "06"),
                ("YEAR", "2025"),
                ("hh", "14"),
            ]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        let attrs = m.attrs.unwrap();
        // No usable time: the attrs stay date-only.
        assert_eq!(attrs.resolution.code(), 'D');
        assert!(attrs.timestamp.is_none());
        assert_eq!(attrs.datenorm, "2025-06-15");
    }

    #[test]
    fn test_unresolvable_year_hard_fails() {
        let raw = RawMatch::new(
            "04/05",
            "MDY-01",
            Slots::from_pairs([("DM1", "04"), ("DM2", "05")]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(!m.verdict.is_valid);
        assert_eq!(m.verdict.reason.as_ref().map(|r| r.code()), Some("range"));
    }

    #[test]
    fn test_two_digit_year_date() {
        // "22 Jun '17" - an apostrophe-marked short year.
        let raw = RawMatch::new(
            "22 Jun '17",
            "DMY-02",
            Slots::from_pairs([
                ("DOM", "22"),
                ("MON_ABBREV", "Jun"),
                ("YEARYY", "'17"),
            ]),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        assert!(m.verdict.is_valid);
        assert_eq!(datenorm(&m), "2017-06-22");
    }

    #[test]
    fn test_attrs_serialize_for_downstream_consumers() {
        let raw = RawMatch::new(
            "30/05/2025",
            "MDY-01",
            mdy_slots("30", "05", "2025", "/"),
        );
        let m = TemporalNormalizer::new().normalize(&raw, today());
        let json = serde_json::to_value(m.attrs.unwrap()).unwrap();
        assert_eq!(json["datenorm"], "2025-05-30");
        assert_eq!(json["resolution"], "D");
        assert_eq!(json["locale"], "euro");
        assert!(json.get("timestamp").is_none());
    }
}
