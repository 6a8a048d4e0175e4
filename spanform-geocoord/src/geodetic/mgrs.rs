//! Military Grid Reference System references.
//!
//! An MGRS reference is a grid zone designator (zone number plus latitude
//! band), a 100 km square identifier, and easting/northing offsets within
//! that square. Resolution to a full UTM position needs the band: the row
//! letters repeat every 2,000 km, so the band's latitude range picks the
//! correct cycle.

use serde::Serialize;

use crate::coordinate::LatLon;

use super::{band_max_lat, band_min_lat, GridError, Utm};

/// Column letter sets, cycling with the zone number.
const COLUMN_SETS: [&[u8]; 3] = [b"ABCDEFGH", b"JKLMNPQR", b"STUVWXYZ"];

/// Row letters, a 20-letter cycle. Even zones start the cycle at `F`.
const ROW_LETTERS: &[u8] = b"ABCDEFGHJKLMNPQRSTUV";

/// Tolerance, in degrees, when checking a resolved latitude against its
/// band's range; squares straddle band edges.
const BAND_EDGE_TOLERANCE: f64 = 0.5;

/// A validated MGRS reference, resolved to its underlying UTM position at
/// construction time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mgrs {
    zone: u8,
    band: char,
    square: String,
    easting: u32,
    northing: u32,
    digits: usize,
    utm: Utm,
}

impl Mgrs {
    /// Construct from a grid zone designator (e.g. `"31U"`), a 100 km square
    /// identifier (e.g. `"DQ"`), and easting/northing offsets of `digits`
    /// digits each (symmetric precision is the caller's contract).
    pub fn new(
        zone_designator: &str,
        square: &str,
        easting: u32,
        northing: u32,
        digits: usize,
    ) -> Result<Self, GridError> {
        let designator: String = zone_designator
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let split = designator
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| GridError::BadZone(designator.clone()))?;
        let (zone_digits, band_part) = designator.split_at(split);
        let zone: i64 = zone_digits
            .parse()
            .map_err(|_| GridError::BadZone(designator.clone()))?;
        if !(1..=60).contains(&zone) {
            return Err(GridError::ZoneOutOfRange(zone));
        }
        let mut band_chars = band_part.chars();
        let band = band_chars
            .next()
            .ok_or_else(|| GridError::BadZone(designator.clone()))?;
        if band_chars.next().is_some() || band_min_lat(band).is_none() {
            return Err(GridError::BadBand(band_part.to_string()));
        }

        let square = square.trim().to_uppercase();
        if square.len() != 2 || !square.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(GridError::BadSquare(square));
        }
        if !(1..=5).contains(&digits) {
            return Err(GridError::BadPrecision(digits));
        }

        let utm = resolve_square(zone as u8, band, &square, easting, northing, digits)?;

        Ok(Self {
            zone: zone as u8,
            band,
            square,
            easting,
            northing,
            digits,
            utm,
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn band(&self) -> char {
        self.band
    }

    pub fn square(&self) -> &str {
        &self.square
    }

    /// Ground precision implied by the offset digit count, in meters.
    pub fn precision_meters(&self) -> u32 {
        10_u32.pow(5 - self.digits as u32)
    }

    /// The underlying UTM position the square letters resolved to.
    pub fn utm(&self) -> &Utm {
        &self.utm
    }

    pub fn to_lat_lon(&self) -> LatLon {
        self.utm.to_lat_lon()
    }
}

impl std::fmt::Display for Mgrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {} {:0width$} {:0width$}",
            self.zone,
            self.band,
            self.square,
            self.easting,
            self.northing,
            width = self.digits
        )
    }
}

/// Resolve square letters plus in-square offsets to a full UTM position.
fn resolve_square(
    zone: u8,
    band: char,
    square: &str,
    easting: u32,
    northing: u32,
    digits: usize,
) -> Result<Utm, GridError> {
    let mut chars = square.chars();
    let col_letter = chars.next().unwrap_or(' ');
    let row_letter = chars.next().unwrap_or(' ');

    let column_set = COLUMN_SETS[((zone as usize) - 1) % 3];
    let col_index = column_set
        .iter()
        .position(|&c| c as char == col_letter)
        .ok_or_else(|| GridError::BadSquare(square.to_string()))?;
    let row_offset = if zone % 2 == 0 { 5 } else { 0 };
    let row_position = ROW_LETTERS
        .iter()
        .position(|&c| c as char == row_letter)
        .ok_or_else(|| GridError::BadSquare(square.to_string()))?;
    let row_index = (row_position + 20 - row_offset) % 20;

    let scale = 10_u64.pow(5 - digits as u32);
    let easting_m = (col_index as f64 + 1.0) * 100_000.0 + (easting as u64 * scale) as f64;
    let row_base = row_index as f64 * 100_000.0 + (northing as u64 * scale) as f64;

    // The row cycle repeats every 2,000 km; try each cycle and keep the one
    // whose latitude lands inside the band.
    let min_lat = band_min_lat(band).unwrap_or(0.0) - BAND_EDGE_TOLERANCE;
    let max_lat = band_max_lat(band).unwrap_or(0.0) + BAND_EDGE_TOLERANCE;
    for cycle in 0..5 {
        let northing_m = row_base + f64::from(cycle) * 2_000_000.0;
        let Ok(utm) = Utm::new(i64::from(zone), band, easting_m, northing_m) else {
            continue;
        };
        let lat = utm.to_lat_lon().lat;
        if lat >= min_lat && lat <= max_lat {
            return Ok(utm);
        }
    }
    Err(GridError::SquareOutsideBand {
        square: square.to_string(),
        band,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris_square() {
        // 31U DQ 48251 11932 is central Paris.
        let mgrs = Mgrs::new("31U", "DQ", 48_251, 11_932, 5).unwrap();
        assert_eq!(mgrs.precision_meters(), 1);
        assert_eq!(mgrs.utm().easting(), 448_251.0);
        assert_eq!(mgrs.utm().northing(), 5_411_932.0);
        let ll = mgrs.to_lat_lon();
        assert!((ll.lat - 48.858).abs() < 0.01, "lat was {}", ll.lat);
        assert!((ll.lon - 2.294).abs() < 0.01, "lon was {}", ll.lon);
    }

    #[test]
    fn test_southern_hemisphere_square() {
        // 56H LH 34786 52080 is Sydney; even zone shifts the row cycle.
        let mgrs = Mgrs::new("56H", "LH", 34_786, 52_080, 5).unwrap();
        assert_eq!(mgrs.utm().easting(), 334_786.0);
        assert_eq!(mgrs.utm().northing(), 6_252_080.0);
        let ll = mgrs.to_lat_lon();
        assert!((ll.lat + 33.86).abs() < 0.05, "lat was {}", ll.lat);
        assert!((ll.lon - 151.21).abs() < 0.05, "lon was {}", ll.lon);
    }

    #[test]
    fn test_low_precision_offsets_scale() {
        // One digit per axis means 10 km precision.
        let mgrs = Mgrs::new("31U", "DQ", 4, 1, 1).unwrap();
        assert_eq!(mgrs.precision_meters(), 10_000);
        assert_eq!(mgrs.utm().easting(), 440_000.0);
        assert_eq!(mgrs.utm().northing(), 5_410_000.0);
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            Mgrs::new("99U", "DQ", 1, 1, 1),
            Err(GridError::ZoneOutOfRange(99))
        ));
        assert!(matches!(
            Mgrs::new("31", "DQ", 1, 1, 1),
            Err(GridError::BadZone(_))
        ));
        assert!(matches!(
            Mgrs::new("31U", "D", 1, 1, 1),
            Err(GridError::BadSquare(_))
        ));
        assert!(matches!(
            Mgrs::new("31U", "DQ", 123_456, 123_456, 6),
            Err(GridError::BadPrecision(6))
        ));
        // `I` never appears in square identifiers.
        assert!(matches!(
            Mgrs::new("31U", "IQ", 1, 1, 1),
            Err(GridError::BadSquare(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let mgrs = Mgrs::new("31U", "DQ", 48_251, 11_932, 5).unwrap();
        insta::assert_snapshot!(mgrs.to_string(), @"31U DQ 48251 11932");
    }
}
