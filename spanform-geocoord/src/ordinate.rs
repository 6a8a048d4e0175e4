//! Axis ordinate digestion: one latitude-or-longitude value from slots.
//!
//! The builder walks the axis's slot families in priority order (plain
//! integer, DMS-style integer, decimal encodings), preserving the literal
//! decimal precision present in the text: `"30.44"` stays two significant
//! decimals, never `30.4400001` from float round-tripping. Separators and
//! symbols present in the raw text are collected as evidence for the
//! false-positive filters downstream.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use spanform::Slots;

use crate::hemisphere::{Axis, Hemisphere};

/// The finest unit actually captured for an axis.
///
/// Monotonically increases as finer-grained slots are found during
/// digestion; never decreases once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Specificity {
    Degree,
    SubDegree,
    Minute,
    SubMinute,
    Second,
    SubSecond,
}

/// Nominal positional uncertainty, in meters, implied by a specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ResolutionUncertainty {
    Unknown,
    Regional,
    Local,
    Site,
    Spot,
    Gps,
}

impl ResolutionUncertainty {
    pub fn meters(self) -> u32 {
        match self {
            ResolutionUncertainty::Unknown => 100_000,
            ResolutionUncertainty::Regional => 50_000,
            ResolutionUncertainty::Local => 5_000,
            ResolutionUncertainty::Site => 1_000,
            ResolutionUncertainty::Spot => 100,
            ResolutionUncertainty::Gps => 10,
        }
    }

    pub fn from_specificity(specificity: Specificity) -> Self {
        match specificity {
            Specificity::Degree => ResolutionUncertainty::Regional,
            Specificity::SubDegree => ResolutionUncertainty::Local,
            Specificity::Minute => ResolutionUncertainty::Local,
            Specificity::SubMinute => ResolutionUncertainty::Site,
            Specificity::Second => ResolutionUncertainty::Spot,
            Specificity::SubSecond => ResolutionUncertainty::Gps,
        }
    }
}

/// Punctuation and keyword tokens that count as coordinate evidence.
const COORDINATE_SYMBOLS: &[&str] = &[
    "°", "º", "'", "\"", ":", "lat", "lon", "geo", "coord", "deg",
];

/// One axis's digested value: degrees, optional minutes and seconds, the
/// resolved hemisphere, and the evidence collected along the way.
///
/// Built once per match; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DmsOrdinate {
    axis: Axis,
    degrees: Option<f64>,
    minutes: Option<f64>,
    seconds: Option<f64>,
    hemisphere: Hemisphere,
    specificity: Specificity,
    resolution: ResolutionUncertainty,
    symbols: BTreeSet<&'static str>,
    normalized_slots: BTreeMap<&'static str, String>,
}

impl DmsOrdinate {
    /// Digest one axis from the match text and slot mapping.
    ///
    /// `family` is the pattern family of the owning match; the degree-minute
    /// disambiguation guard applies to family `"DMS"` only.
    pub fn build(axis: Axis, text: &str, slots: &Slots, family: &str) -> Self {
        let mut symbols = BTreeSet::new();
        let textnorm = text.to_lowercase();
        for sym in COORDINATE_SYMBOLS {
            if textnorm.contains(sym) {
                symbols.insert(*sym);
            }
        }

        let hemisphere = Hemisphere::resolve(axis, slots);

        let mut ordinate = Self {
            axis,
            degrees: None,
            minutes: None,
            seconds: None,
            hemisphere,
            specificity: Specificity::Degree,
            resolution: ResolutionUncertainty::Unknown,
            symbols,
            normalized_slots: BTreeMap::new(),
        };

        if family == "DMS" && dm_pattern_preferred(axis, slots) {
            // The text more likely encodes degree + decimal minutes; leave
            // this axis undigested so a competing DM match wins.
            return ordinate;
        }

        ordinate.digest(slots);
        if ordinate.degrees.is_some() {
            ordinate.resolution = ResolutionUncertainty::from_specificity(ordinate.specificity);
        }
        ordinate
    }

    fn digest(&mut self, slots: &Slots) {
        let suffix = self.axis.slot_suffix();

        // DEGREES: plain integer, DMS-style integer, then decimal. Presence
        // is checked explicitly - a captured 0 is a value, not an absence.
        let deg = self
            .int_slot(slots, &format!("deg{suffix}"), "deg")
            .or_else(|| self.int_slot(slots, &format!("dmsDeg{suffix}"), "deg"));
        self.degrees = match deg {
            Some(v) => Some(v),
            None => {
                let dec = self.decimal_slot(slots, &format!("decDeg{suffix}"), "deg");
                if dec.is_some() {
                    self.specificity = Specificity::SubDegree;
                }
                dec
            }
        };
        if self.degrees.is_none() {
            return;
        }

        // MINUTES
        let min = self
            .int_slot(slots, &format!("min{suffix}"), "min")
            .or_else(|| self.int_slot(slots, &format!("dmsMin{suffix}"), "min"))
            .or_else(|| self.decimal_slot(slots, &format!("decMin{suffix}"), "min"))
            .or_else(|| self.decimal_slot(slots, &format!("decMin{suffix}3"), "min"));
        self.minutes = min;
        match self.minutes {
            Some(minutes) => {
                self.specificity = Specificity::Minute;
                let fract = self
                    .fraction_slot(slots, &format!("fractMin{suffix}"), "fmin")
                    .or_else(|| self.fraction_slot(slots, &format!("fractMin{suffix}3"), "fmin"));
                if let Some(f) = fract {
                    self.specificity = Specificity::SubMinute;
                    self.minutes = Some(minutes + f);
                }
            }
            None => return,
        }

        // SECONDS
        let sec = self
            .int_slot(slots, &format!("sec{suffix}"), "sec")
            .or_else(|| self.int_slot(slots, &format!("dmsSec{suffix}"), "sec"));
        self.seconds = sec;
        if let Some(seconds) = self.seconds {
            self.specificity = Specificity::Second;
            let fract = self
                .fraction_slot(slots, &format!("fractSec{suffix}"), "fsec")
                .or_else(|| self.fraction_slot(slots, &format!("fractSec{suffix}Opt"), "fsec"));
            if let Some(f) = fract {
                self.specificity = Specificity::SubSecond;
                self.seconds = Some(seconds + f);
            }
        }
    }

    /// Integer slot: parsed as-is.
    fn int_slot(&mut self, slots: &Slots, key: &str, canon: &'static str) -> Option<f64> {
        let raw = slots.value(key)?;
        let value: i64 = raw.parse().ok()?;
        self.normalized_slots.insert(canon, raw.to_string());
        Some(value as f64)
    }

    /// Decimal slot: a `-` stands in for the decimal point in grammars that
    /// cannot capture a literal dot, so `"33-44"` normalizes to `"33.44"`.
    fn decimal_slot(&mut self, slots: &Slots, key: &str, canon: &'static str) -> Option<f64> {
        let raw = slots.value(key)?;
        let normalized = raw.replace('-', ".");
        let value: f64 = normalized.parse().ok()?;
        self.normalized_slots.insert(canon, normalized);
        Some(value)
    }

    /// Fraction slot: reconstruct a fractional literal - a leading `-`
    /// becomes `.`, and a bare digit run gains a leading `.`.
    fn fraction_slot(&mut self, slots: &Slots, key: &str, canon: &'static str) -> Option<f64> {
        let raw = slots.value(key)?;
        let normalized = if let Some(rest) = raw.strip_prefix('-') {
            format!(".{rest}")
        } else if raw.starts_with('.') {
            raw.to_string()
        } else {
            format!(".{raw}")
        };
        let value: f64 = normalized.parse().ok()?;
        self.normalized_slots.insert(canon, normalized);
        Some(value)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn degrees(&self) -> Option<f64> {
        self.degrees
    }

    pub fn minutes(&self) -> Option<f64> {
        self.minutes
    }

    pub fn seconds(&self) -> Option<f64> {
        self.seconds
    }

    pub fn hemisphere(&self) -> &Hemisphere {
        &self.hemisphere
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    pub fn resolution(&self) -> ResolutionUncertainty {
        self.resolution
    }

    /// Normalized literals per canonical field (`deg`, `min`, `fmin`, ...),
    /// preserving the textual precision of the source.
    pub fn normalized_slots(&self) -> &BTreeMap<&'static str, String> {
        &self.normalized_slots
    }

    pub fn has_minutes(&self) -> bool {
        self.minutes.is_some() && self.specificity >= Specificity::Minute
    }

    pub fn has_subminutes(&self) -> bool {
        self.specificity == Specificity::SubMinute
    }

    pub fn has_seconds(&self) -> bool {
        self.seconds.is_some() && self.specificity >= Specificity::Second
    }

    pub fn has_subseconds(&self) -> bool {
        self.specificity == Specificity::SubSecond
    }

    /// At least one recognized coordinate symbol or keyword appeared in the
    /// matched text.
    pub fn has_symbol_evidence(&self) -> bool {
        !self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &BTreeSet<&'static str> {
        &self.symbols
    }

    /// Degrees present and in open range for the axis; minutes and seconds,
    /// when present, in `[0, 60)`.
    pub fn is_valid(&self) -> bool {
        let Some(degrees) = self.degrees else {
            return false;
        };
        let in_range = match self.axis {
            Axis::Lat => -90.0 < degrees && degrees < 90.0,
            Axis::Lon => -180.0 < degrees && degrees < 180.0,
        };
        if !in_range {
            return false;
        }
        if let Some(minutes) = self.minutes {
            if !(0.0..60.0).contains(&minutes) {
                return false;
            }
        }
        if let Some(seconds) = self.seconds {
            if !(0.0..60.0).contains(&seconds) {
                return false;
            }
        }
        true
    }

    /// Signed decimal degrees: `polarity * (deg + min/60 + sec/3600)`, using
    /// whichever finer fields are present and in range.
    ///
    /// # Panics
    ///
    /// Panics if the hemisphere polarity was never resolved. Requesting a
    /// value before resolution is a caller sequencing defect, not a data
    /// condition.
    pub fn decimal(&self) -> Option<f64> {
        let polarity = self.hemisphere.polarity();
        assert!(
            polarity != 0,
            "hemisphere polarity was never resolved for {:?}",
            self.axis
        );
        let degrees = self.degrees?;
        let mut value = degrees;
        if let Some(minutes) = self.minutes {
            if minutes < 60.0 {
                value += minutes / 60.0;
                if let Some(seconds) = self.seconds {
                    if seconds < 60.0 {
                        value += seconds / 3600.0;
                    }
                }
            }
        }
        Some(f64::from(polarity) * value)
    }
}

/// Degree-minute disambiguation: a `.` between minutes and seconds combined
/// with a different degree-minute separator reads as decimal minutes, not
/// as a seconds field.
fn dm_pattern_preferred(axis: Axis, slots: &Slots) -> bool {
    let suffix = axis.slot_suffix();
    match (
        slots.value(&format!("ms{suffix}Sep")),
        slots.value(&format!("dm{suffix}Sep")),
    ) {
        (Some(ms), Some(dm)) => ms == "." && dm != ".",
        _ => false,
    }
}
