//! Slot normalizers: year, month, day, time-of-day, and timezone.
//!
//! Each normalizer is a pure function of the slot mapping. Outcomes are
//! three-way: `Found` a value, the field is `Missing` from the grammar
//! alternative, or the field is present but `Invalid`. Callers must not
//! conflate the last two - a missing day defaults to the first of the
//! month, while a day of 42 hard-fails the whole match.

use std::collections::HashMap;

use chrono::{Datelike, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use serde::Serialize;

use spanform::Slots;

/// Latest year the normalizer will believe; anything beyond is noise.
pub const MAXIMUM_YEAR: i32 = 2040;

const MILLENNIUM: i32 = 2000;

/// Three-way outcome of a slot normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<T> {
    /// The field was present and normalized.
    Found(T),
    /// The grammar alternative never captured this field.
    Missing,
    /// The field was captured but failed validation.
    Invalid,
}

impl<T> Resolved<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Resolved::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Resolved::Invalid)
    }
}

/// Day/month ordering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    NorthAm,
    Euro,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::NorthAm => "north-am",
            Locale::Euro => "euro",
        }
    }
}

/// Resolve the year, windowing two-digit years around the reference date.
///
/// A four-digit year wins outright when below [`MAXIMUM_YEAR`]. A two-digit
/// year marked with a leading apostrophe ("class of '07") is an explicit
/// short year: values up to the reference year's two digits plus two map to
/// 20xx, the rest to 19xx. A bare two-digit value beyond that threshold is
/// taken as 19xx - a far-future two-digit value is more likely a
/// 20th-century year than a day-of-month collision.
pub fn year(slots: &Slots, today: NaiveDate) -> Resolved<i32> {
    if let Some(text) = slots.value("YEAR") {
        match text.parse::<i32>() {
            Ok(y) if 0 < y && y < MAXIMUM_YEAR => return Resolved::Found(y),
            Ok(_) => {}
            Err(_) => return Resolved::Invalid,
        }
    }

    let (text, marked) = match slots.value("YY").or_else(|| slots.value("YY2")) {
        Some(text) => (text, false),
        None => match slots.value("YEARYY") {
            Some(text) => (text.trim_start_matches('\''), text.starts_with('\'')),
            None => return Resolved::Invalid,
        },
    };
    let Ok(value) = text.parse::<i32>() else {
        return Resolved::Invalid;
    };

    let short = text.len() < 4;
    if !short {
        return if value < MAXIMUM_YEAR {
            Resolved::Found(value)
        } else {
            Resolved::Invalid
        };
    }

    let future_threshold = today.year() - MILLENNIUM + 2;
    if marked {
        if (0..=future_threshold).contains(&value) {
            Resolved::Found(MILLENNIUM + value)
        } else if value <= 99 {
            Resolved::Found(1900 + value)
        } else {
            Resolved::Invalid
        }
    } else if future_threshold < value && value <= 99 {
        Resolved::Found(1900 + value)
    } else if (0..=future_threshold).contains(&value) {
        Resolved::Found(MILLENNIUM + value)
    } else {
        Resolved::Invalid
    }
}

/// The year slot's literal text, whichever alternative captured it.
pub fn year_literal<'s>(slots: &'s Slots) -> Option<&'s str> {
    slots
        .value("YEAR")
        .or_else(|| slots.value("YY"))
        .or_else(|| slots.value("YEARYY"))
        .or_else(|| slots.value("YY2"))
}

/// Resolve a numeric month in `[1, 12]`.
pub fn month_number(slots: &Slots) -> Resolved<u32> {
    let text = slots
        .value("DM1")
        .or_else(|| slots.value("MM"))
        .or_else(|| slots.value("MONTH"));
    let Some(text) = text else {
        return Resolved::Missing;
    };
    match text.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Resolved::Found(m),
        _ => Resolved::Invalid,
    }
}

const MONTH_PREFIXES: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Resolve a month name or abbreviation (3-11 characters) by its first
/// three letters.
pub fn month_name(slots: &Slots) -> Resolved<u32> {
    let text = slots
        .value("MON_ABBREV")
        .or_else(|| slots.value("MON_NAME"));
    let Some(text) = text else {
        return Resolved::Missing;
    };
    let len = text.chars().count();
    if !(3..=11).contains(&len) {
        return Resolved::Invalid;
    }
    let prefix: String = text.chars().take(3).collect::<String>().to_lowercase();
    match MONTH_PREFIXES.iter().find(|(name, _)| *name == prefix) {
        Some((_, month)) => Resolved::Found(*month),
        None => Resolved::Invalid,
    }
}

/// Resolve a day of month in `[1, 31]`.
///
/// Absence is `Missing` (the caller defaults to day 1); a captured value
/// outside the range is `Invalid` and hard-fails the match.
pub fn day(slots: &Slots) -> Resolved<u32> {
    let text = slots
        .value("DM2")
        .or_else(|| slots.value("DOM"))
        .or_else(|| slots.value("DD"));
    let Some(text) = text else {
        return Resolved::Missing;
    };
    match text.parse::<u32>() {
        Ok(d) if (1..=31).contains(&d) => Resolved::Found(d),
        _ => Resolved::Invalid,
    }
}

/// Outcome of the European-locale ambiguity test on a generic numeric
/// day/month pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleDecision {
    /// The pair reads day-first.
    Resolved { day: u32, month: u32 },
    /// No valid reading exists (or the forced locale made it impossible).
    Rejected,
    /// Ambiguous; fall back to month-first resolution.
    NoOpinion,
}

/// Decide whether an ambiguous numeric pair reads day-first.
///
/// With a forced euro locale the pair is accepted as `(day, month)`
/// whenever it is calendar-plausible, and rejected outright otherwise.
/// Unforced, the pair is only accepted when it *cannot* be month-first
/// (`30/05`); `13/13` has no reading at all; anything else is left to the
/// caller's month-first fallback.
pub fn european_day_month(slots: &Slots, forced: Option<Locale>) -> LocaleDecision {
    if !(slots.contains("DM1") && slots.contains("DM2")) {
        return LocaleDecision::NoOpinion;
    }
    let parsed = slots
        .value("DM1")
        .and_then(|d| d.parse::<u32>().ok())
        .zip(slots.value("DM2").and_then(|m| m.parse::<u32>().ok()));
    let Some((day, month)) = parsed else {
        return LocaleDecision::NoOpinion;
    };

    if matches!(forced, Some(Locale::Euro)) {
        if month <= 12 && day <= 31 {
            LocaleDecision::Resolved { day, month }
        } else {
            LocaleDecision::Rejected
        }
    } else if day > 12 && month <= 12 {
        LocaleDecision::Resolved { day, month }
    } else if day > 12 && month > 12 {
        LocaleDecision::Rejected
    } else {
        LocaleDecision::NoOpinion
    }
}

/// The finest calendar unit actually captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl Resolution {
    /// Single-character code used in the attribute map.
    pub fn code(self) -> char {
        match self {
            Resolution::Year => 'Y',
            Resolution::Month => 'M',
            Resolution::Week => 'W',
            Resolution::Day => 'D',
            Resolution::Hour => 'H',
            Resolution::Minute => 'm',
            Resolution::Second => 's',
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.code())
    }
}

/// A validated time of day. Hour and minute are required; seconds upgrade
/// the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: Option<u32>,
}

impl TimeOfDay {
    pub fn resolution(&self) -> Resolution {
        if self.second.is_some() {
            Resolution::Second
        } else {
            Resolution::Minute
        }
    }
}

/// Read one time slot as a sentinel: present-and-parseable is the value,
/// anything else (missing, empty, garbage) is -1, "not applicable".
fn time_field(slots: &Slots, key: &str) -> i32 {
    slots
        .value(key)
        .and_then(|v| v.parse::<i32>().ok())
        .unwrap_or(-1)
}

/// Resolve a time of day from the `hh`/`mm`/`ss` slots.
///
/// Hour outside `[0, 24)` or minute outside `[0, 60)` invalidates the whole
/// time - no partial result. Seconds in `[0, 60)` upgrade resolution to
/// seconds.
pub fn time_of_day(slots: &Slots) -> Option<TimeOfDay> {
    let hour = time_field(slots, "hh");
    let minute = time_field(slots, "mm");
    let second = time_field(slots, "ss");

    if !(0..24).contains(&hour) {
        return None;
    }
    if !(0..60).contains(&minute) {
        return None;
    }
    Some(TimeOfDay {
        hour: hour as u32,
        minute: minute as u32,
        second: (0..60).contains(&second).then_some(second as u32),
    })
}

/// A resolved timezone: the label as captured plus its fixed offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TzSpec {
    /// Upper-cased abbreviation, or the normalized numeric offset.
    pub label: String,
    pub offset_seconds: i32,
}

impl TzSpec {
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.offset_seconds)
    }
}

/// Timezone abbreviations to UTC offsets, in seconds.
static TZ_ABBREVIATIONS: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    const HOUR: i32 = 3600;
    HashMap::from([
        ("UTC", 0),
        ("GMT", 0),
        ("Z", 0),
        ("ZULU", 0),
        ("EST", -5 * HOUR),
        ("EDT", -4 * HOUR),
        ("CST", -6 * HOUR),
        ("CDT", -5 * HOUR),
        ("MST", -7 * HOUR),
        ("MDT", -6 * HOUR),
        ("PST", -8 * HOUR),
        ("PDT", -7 * HOUR),
        ("AKST", -9 * HOUR),
        ("AKDT", -8 * HOUR),
        ("HST", -10 * HOUR),
        ("WET", 0),
        ("WEST", HOUR),
        ("CET", HOUR),
        ("CEST", 2 * HOUR),
        ("EET", 2 * HOUR),
        ("EEST", 3 * HOUR),
        ("BST", HOUR),
        ("IST", 5 * HOUR + 1800),
        ("JST", 9 * HOUR),
        ("KST", 9 * HOUR),
        ("AEST", 10 * HOUR),
        ("AEDT", 11 * HOUR),
        ("NZST", 12 * HOUR),
    ])
});

/// Parse a numeric UTC offset: `+HH`, `-HHMM`, `+HH:MM`, or `Z`.
fn parse_numeric_offset(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("z") {
        return Some(0);
    }
    let (sign, digits) = if let Some(rest) = text.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = text.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let digits = digits.replace(':', "");
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Resolve a timezone from the short numeric-offset slot or the long
/// abbreviation slot. Parse failure yields no timezone; the caller assumes
/// UTC.
pub fn timezone(slots: &Slots) -> Option<TzSpec> {
    if let Some(text) = slots.value("SHORT_TZ") {
        let seconds = parse_numeric_offset(text)?;
        let sign = if seconds < 0 { '-' } else { '+' };
        let magnitude = seconds.abs();
        return Some(TzSpec {
            label: format!("{sign}{:02}:{:02}", magnitude / 3600, magnitude % 3600 / 60),
            offset_seconds: seconds,
        });
    }
    if let Some(text) = slots.value("LONG_TZ") {
        let abbrev = text.trim().to_uppercase();
        let seconds = TZ_ABBREVIATIONS.get(abbrev.as_str())?;
        return Some(TzSpec {
            label: abbrev,
            offset_seconds: *seconds,
        });
    }
    None
}
