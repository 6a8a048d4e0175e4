//! End-to-end checks driving the normalizer from regex named captures, the
//! way a pattern engine feeds it in production.

use chrono::NaiveDate;
use regex::Regex;

use spanform::{RawMatch, Slots};

use crate::{GeocoordKind, GeocoordNormalizer};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
}

/// A simplified decimal-degree grammar with the production slot names.
fn dd_pattern() -> Regex {
    Regex::new(
        r"(?x)
        (?P<hemiLat>[NS])
        (?P<decDegLat>\d{1,2}\.\d+)
        ,\s*
        (?P<hemiLon>[EW])
        (?P<decDegLon>\d{1,3}\.\d+)
        ",
    )
    .unwrap()
}

/// A simplified MGRS grammar.
fn mgrs_pattern() -> Regex {
    Regex::new(
        r"(?x)
        (?P<MGRSZone>\d{1,2}\s?[C-HJ-NP-X])\s*
        (?P<MGRSQuad>[A-HJ-NP-Z]{2})\s*
        (?P<Easting_Northing>\d{1,10}(?:\s\d{1,10})?)
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
fn test_decimal_degrees_from_captures() {
    let re = dd_pattern();
    let raw = extract(&re, "DD-01", "position was N55.60, W80.11 at dusk").unwrap();
    assert_eq!(raw.text, "N55.60, W80.11");

    let m = GeocoordNormalizer::new().normalize(&raw, today()).unwrap();
    assert_eq!(m.kind, GeocoordKind::DecimalDegree);
    assert!(m.verdict.is_valid);
    let coord = m.coordinate.unwrap();
    assert!((coord.lat - 55.60).abs() < 1e-9);
    assert!((coord.lon + 80.11).abs() < 1e-9);
}

#[test]
fn test_mgrs_from_captures() {
    let re = mgrs_pattern();
    let raw = extract(&re, "MGRS-01", "rally at 31UDQ 48251 11932 tonight").unwrap();

    let m = GeocoordNormalizer::new().normalize(&raw, today()).unwrap();
    assert_eq!(m.kind, GeocoordKind::Mgrs);
    assert!(m.verdict.is_valid, "reason: {:?}", m.verdict.reason);
    let coord = m.coordinate.unwrap();
    assert!((coord.lat - 48.858).abs() < 0.01);
    assert!((coord.lon - 2.294).abs() < 0.01);
}

#[test]
fn test_date_string_never_reported_as_grid_reference() {
    let re = mgrs_pattern();
    let raw = extract(&re, "MGRS-01", "signed on 10 JAN 94 by the committee").unwrap();

    let m = GeocoordNormalizer::new().normalize(&raw, today()).unwrap();
    assert!(m.verdict.filtered_out);
    assert_eq!(m.verdict.reason.as_ref().map(|r| r.code()), Some("date"));
}

#[test]
fn test_matches_serialize_for_downstream_consumers() {
    let re = dd_pattern();
    let raw = extract(&re, "DD-01", "N55.60, W80.11").unwrap();
    let m = GeocoordNormalizer::new().normalize(&raw, today()).unwrap();

    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["kind"], "DecimalDegree");
    assert_eq!(json["verdict"]["is_valid"], true);
    assert!(json["coordinate"]["lat"].as_f64().is_some());
}
