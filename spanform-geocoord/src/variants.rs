//! The five geocoordinate match variants and their normalization.
//!
//! Each pattern family normalizes differently but shares one lifecycle:
//! start pessimistic (invalid, filtered), build axis ordinates or a grid
//! reference, construct the `{lat, lon}` coordinate, then validate - range
//! checks, separator consistency, and the false-positive filters. A match
//! is immutable once returned.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use spanform::{PatternId, RawMatch, Rejection, Verdict};

use crate::coordinate::LatLon;
use crate::filters::{DmsFilter, MgrsFilter};
use crate::geodetic::{Mgrs, Utm};
use crate::hemisphere::Axis;
use crate::ordinate::DmsOrdinate;

/// The closed set of geocoordinate grammar families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GeocoordKind {
    DecimalDegree,
    DegreeMinute,
    DegreeMinuteSecond,
    Mgrs,
    Utm,
}

impl GeocoordKind {
    /// Map a pattern family prefix to its variant, if it is a geocoordinate
    /// family at all.
    pub fn from_family(family: &str) -> Option<Self> {
        match family {
            "DD" => Some(GeocoordKind::DecimalDegree),
            "DM" => Some(GeocoordKind::DegreeMinute),
            "DMS" => Some(GeocoordKind::DegreeMinuteSecond),
            "MGRS" => Some(GeocoordKind::Mgrs),
            "UTM" => Some(GeocoordKind::Utm),
            _ => None,
        }
    }
}

/// A grid reference built by the geodetic constructors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GridRef {
    Mgrs(Mgrs),
    Utm(Utm),
}

/// A normalized geocoordinate candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocoordMatch {
    /// Raw matched substring.
    pub text: String,
    /// Normalized text; MGRS candidates additionally strip spaces.
    pub textnorm: String,
    pub pattern_id: PatternId,
    pub kind: GeocoordKind,
    /// Axis ordinates for the DD / DM / DMS variants.
    pub lat_ordinate: Option<DmsOrdinate>,
    pub lon_ordinate: Option<DmsOrdinate>,
    /// Grid reference for the MGRS / UTM variants.
    pub grid: Option<GridRef>,
    /// The resulting coordinate, when construction succeeded.
    pub coordinate: Option<LatLon>,
    pub verdict: Verdict,
    /// Captured constructor failure, when one occurred.
    pub parse_error: Option<String>,
}

impl GeocoordMatch {
    fn pending(raw: &RawMatch, kind: GeocoordKind) -> Self {
        Self {
            text: raw.text.clone(),
            textnorm: raw.textnorm.clone(),
            pattern_id: raw.pattern_id.clone(),
            kind,
            lat_ordinate: None,
            lon_ordinate: None,
            grid: None,
            coordinate: None,
            verdict: Verdict::pending(),
            parse_error: None,
        }
    }
}

/// Normalizes raw geocoordinate candidates into validated matches.
#[derive(Debug, Clone, Default)]
pub struct GeocoordNormalizer {
    pub mgrs_filter: MgrsFilter,
    pub dms_filter: DmsFilter,
}

impl GeocoordNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize one candidate. Returns `None` when the pattern family is
    /// not a geocoordinate family.
    ///
    /// `today` is the reference date for the MGRS filter's recency window.
    pub fn normalize(&self, raw: &RawMatch, today: NaiveDate) -> Option<GeocoordMatch> {
        let kind = GeocoordKind::from_family(raw.pattern_id.family())?;
        let m = match kind {
            GeocoordKind::DecimalDegree => self.normalize_decimal_degree(raw),
            GeocoordKind::DegreeMinute => self.normalize_degree_minute(raw),
            GeocoordKind::DegreeMinuteSecond => self.normalize_degree_minute_second(raw, today),
            GeocoordKind::Mgrs => self.normalize_mgrs(raw, today),
            GeocoordKind::Utm => self.normalize_utm(raw),
        };
        Some(m)
    }

    /// Build both ordinates and the coordinate; shared by the three
    /// degree-based variants. The verdict reflects range validation only.
    fn build_ordinates(&self, raw: &RawMatch, m: &mut GeocoordMatch) {
        let family = raw.pattern_id.family();
        let lat = DmsOrdinate::build(Axis::Lat, &raw.text, &raw.slots, family);
        let lon = DmsOrdinate::build(Axis::Lon, &raw.text, &raw.slots, family);

        if !(lat.is_valid() && lon.is_valid()) {
            m.verdict = Verdict::reject(Rejection::OutOfRange(
                "axis ordinate failed range validation".into(),
            ));
            m.lat_ordinate = Some(lat);
            m.lon_ordinate = Some(lon);
            return;
        }

        let coordinate = match (lat.decimal(), lon.decimal()) {
            (Some(lat_deg), Some(lon_deg)) => LatLon::new(lat_deg, lon_deg),
            _ => {
                m.verdict = Verdict::reject(Rejection::Invalid);
                m.lat_ordinate = Some(lat);
                m.lon_ordinate = Some(lon);
                return;
            }
        };

        m.verdict = if coordinate.is_valid() {
            Verdict::accept()
        } else {
            Verdict::reject(Rejection::OutOfRange(format!(
                "coordinate {coordinate} out of range"
            )))
        };
        m.coordinate = Some(coordinate);
        m.lat_ordinate = Some(lat);
        m.lon_ordinate = Some(lon);
    }

    /// Decimal degrees need evidence this is really a coordinate and not
    /// two arbitrary signed numbers: lettered hemispheres on both axes, or
    /// a recognized coordinate symbol on either.
    fn normalize_decimal_degree(&self, raw: &RawMatch) -> GeocoordMatch {
        let mut m = GeocoordMatch::pending(raw, GeocoordKind::DecimalDegree);
        self.build_ordinates(raw, &mut m);
        if !m.verdict.is_valid {
            return m;
        }

        let (lat, lon) = (
            m.lat_ordinate.as_ref().expect("ordinate built"),
            m.lon_ordinate.as_ref().expect("ordinate built"),
        );
        let lettered = lat.hemisphere().is_alpha() && lon.hemisphere().is_alpha();
        let symboled = lat.has_symbol_evidence() || lon.has_symbol_evidence();
        if !(lettered || symboled) {
            debug!(text = %m.text, "bare signed pair rejected as decimal degrees");
            m.verdict = Verdict::reject(Rejection::Lexical);
        }
        m
    }

    /// Degree-minute pairs must use the same degree-minute separator on
    /// both axes; punctuation inconsistency is strong false-positive
    /// evidence.
    fn normalize_degree_minute(&self, raw: &RawMatch) -> GeocoordMatch {
        let mut m = GeocoordMatch::pending(raw, GeocoordKind::DegreeMinute);
        self.build_ordinates(raw, &mut m);
        if !m.verdict.is_valid {
            return m;
        }

        let lat_sep = raw.slots.value("dmLatSep");
        let lon_sep = raw.slots.value("dmLonSep");
        let consistent = match (lat_sep, lon_sep) {
            (None, None) => true,
            (Some(lat), Some(lon)) => lat == lon,
            _ => false,
        };
        if !consistent {
            m.verdict = Verdict::reject(Rejection::SeparatorMismatch {
                first: lat_sep.map(str::to_string),
                second: lon_sep.map(str::to_string),
            });
        }
        m
    }

    fn normalize_degree_minute_second(&self, raw: &RawMatch, _today: NaiveDate) -> GeocoordMatch {
        let mut m = GeocoordMatch::pending(raw, GeocoordKind::DegreeMinuteSecond);
        self.build_ordinates(raw, &mut m);

        let (filtered_out, reason) = self.dms_filter.filter_out(&m);
        if filtered_out {
            m.verdict = Verdict {
                is_valid: m.verdict.is_valid,
                filtered_out: true,
                reason,
            };
        }
        m
    }

    fn normalize_mgrs(&self, raw: &RawMatch, today: NaiveDate) -> GeocoordMatch {
        let mut m = GeocoordMatch::pending(raw, GeocoordKind::Mgrs);
        m.textnorm = raw.textnorm.replace(' ', "");

        let (Some(zone), Some(quad), Some(east_north)) = (
            raw.slots.value("MGRSZone"),
            raw.slots.value("MGRSQuad"),
            raw.slots.value("Easting_Northing"),
        ) else {
            m.verdict = Verdict::reject(Rejection::Construction(
                "missing zone, square, or easting/northing slot".into(),
            ));
            return m;
        };

        let halves = match split_easting_northing(east_north) {
            Ok(halves) => halves,
            Err(err) => {
                m.parse_error = Some(err.clone());
                m.verdict = Verdict::reject(Rejection::Construction(err));
                return m;
            }
        };
        let (easting, northing) = halves;

        let parsed = easting
            .parse::<u32>()
            .and_then(|e| northing.parse::<u32>().map(|n| (e, n)));
        let (easting_val, northing_val) = match parsed {
            Ok(pair) => pair,
            Err(err) => {
                let err = format!("easting/northing digits: {err}");
                m.parse_error = Some(err.clone());
                m.verdict = Verdict::reject(Rejection::Construction(err));
                return m;
            }
        };

        match Mgrs::new(zone, quad, easting_val, northing_val, easting.len()) {
            Ok(mgrs) => {
                // The grid constructor enforces its own ranges; a built
                // reference is a valid coordinate.
                m.coordinate = Some(mgrs.to_lat_lon());
                m.grid = Some(GridRef::Mgrs(mgrs));
                m.verdict = Verdict::accept();
            }
            Err(err) => {
                m.parse_error = Some(err.to_string());
                m.verdict = Verdict::reject(Rejection::Construction(err.to_string()));
                return m;
            }
        }

        let (filtered_out, reason) = self.mgrs_filter.filter_out(&m, today);
        if filtered_out {
            m.verdict = Verdict {
                is_valid: m.verdict.is_valid,
                filtered_out: true,
                reason,
            };
        }
        m
    }

    fn normalize_utm(&self, raw: &RawMatch) -> GeocoordMatch {
        let mut m = GeocoordMatch::pending(raw, GeocoordKind::Utm);

        let zone_str = raw
            .slots
            .value("UTMZone")
            .or_else(|| raw.slots.value("UTMZoneZZ"))
            .or_else(|| raw.slots.value("UTMZoneZ"));
        let Some(zone_str) = zone_str else {
            m.verdict = Verdict::reject(Rejection::Construction("missing zone slot".into()));
            return m;
        };
        let Ok(zone) = zone_str.parse::<i64>() else {
            let err = format!("zone `{zone_str}` is not numeric");
            m.parse_error = Some(err.clone());
            m.verdict = Verdict::reject(Rejection::Construction(err));
            return m;
        };

        // A band is required: without it the hemisphere is unresolvable.
        let Some(band) = raw.slots.value("UTMBand") else {
            debug!(text = %m.text, "utm candidate without a band letter");
            m.verdict = Verdict::reject(Rejection::Invalid);
            return m;
        };
        let band_char = band
            .trim()
            .to_uppercase()
            .chars()
            .next()
            .unwrap_or_default();

        let (Some(easting), Some(northing)) = (
            raw.slots.value("UTMEasting"),
            raw.slots.value("UTMNorthing"),
        ) else {
            m.verdict = Verdict::reject(Rejection::Construction(
                "missing easting or northing slot".into(),
            ));
            return m;
        };
        let parsed = easting
            .parse::<f64>()
            .and_then(|e| northing.parse::<f64>().map(|n| (e, n)));
        let (easting_val, northing_val) = match parsed {
            Ok(pair) => pair,
            Err(err) => {
                let err = format!("easting/northing digits: {err}");
                m.parse_error = Some(err.clone());
                m.verdict = Verdict::reject(Rejection::Construction(err));
                return m;
            }
        };

        match Utm::new(zone, band_char, easting_val, northing_val) {
            Ok(utm) => {
                m.coordinate = Some(utm.to_lat_lon());
                m.grid = Some(GridRef::Utm(utm));
                m.verdict = Verdict::accept();
            }
            Err(err) => {
                m.parse_error = Some(err.to_string());
                m.verdict = Verdict::reject(Rejection::Construction(err.to_string()));
            }
        }
        m
    }
}

/// Split a combined easting/northing digit string into two halves of equal
/// digit count.
///
/// A space splits explicitly; unequal halves are truncated to the shorter
/// length, since MGRS precision must match on both axes. Without a space an
/// even-length string splits in the middle; an odd length is unsplittable.
fn split_easting_northing(east_north: &str) -> Result<(String, String), String> {
    if !east_north.chars().all(|c| c.is_ascii_digit() || c == ' ') {
        return Err(format!("`{east_north}` is not a digit string"));
    }
    if let Some((e, n)) = east_north.split_once(' ') {
        let e = e.trim();
        let n = n.trim();
        let resolution = e.len().min(n.len());
        if resolution == 0 {
            return Err(format!("`{east_north}` has an empty easting or northing"));
        }
        return Ok((e[..resolution].to_string(), n[..resolution].to_string()));
    }
    if east_north.len() % 2 == 0 && !east_north.is_empty() {
        let half = east_north.len() / 2;
        return Ok((
            east_north[..half].to_string(),
            east_north[half..].to_string(),
        ));
    }
    Err(format!(
        "`{east_north}` cannot be split into easting and northing"
    ))
}
