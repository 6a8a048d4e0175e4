//! Projected-grid references and their conversion to geographic coordinates.
//!
//! This module plays the role an external geodesy library would: fallible
//! constructors that enforce each grid system's own ranges, and a
//! `to_lat_lon` conversion on the constructed reference. Callers treat a
//! constructed reference as valid - range enforcement happens here, once.
//!
//! The projection is the standard WGS-84 inverse transverse Mercator series
//! (scale factor 0.9996, zone-centered meridians). MGRS references resolve
//! their 100 km square letters to a full UTM position first.

mod mgrs;
mod utm;

pub use mgrs::Mgrs;
pub use utm::Utm;

use thiserror::Error;

/// Construction failures raised by the grid constructors.
///
/// These are captured into a match's parse error by the normalizers, never
/// propagated further.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid zone {0} is out of range 1..=60")]
    ZoneOutOfRange(i64),

    #[error("`{0}` is not a valid grid zone designator")]
    BadZone(String),

    #[error("`{0}` is not a valid latitude band designator")]
    BadBand(String),

    #[error("easting {0} is outside the valid extent")]
    EastingOutOfRange(f64),

    #[error("northing {0} is outside the valid extent")]
    NorthingOutOfRange(f64),

    #[error("`{0}` is not a valid 100km square identifier")]
    BadSquare(String),

    #[error("offset precision must be 1..=5 digits, got {0}")]
    BadPrecision(usize),

    #[error("square {square} does not resolve inside band {band}")]
    SquareOutsideBand { square: String, band: char },
}

/// Latitude band letters, south to north. `I` and `O` are never used.
pub(crate) const BAND_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWX";

/// South edge of a band's latitude range, in degrees.
pub(crate) fn band_min_lat(band: char) -> Option<f64> {
    let idx = BAND_LETTERS.iter().position(|&b| b as char == band)?;
    Some(-80.0 + 8.0 * idx as f64)
}

/// North edge of a band's latitude range. Band X spans 12 degrees.
pub(crate) fn band_max_lat(band: char) -> Option<f64> {
    if band == 'X' {
        return Some(84.0);
    }
    band_min_lat(band).map(|min| min + 8.0)
}

/// Bands N and above lie in the northern hemisphere.
pub(crate) fn band_is_north(band: char) -> bool {
    band >= 'N'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_ranges() {
        assert_eq!(band_min_lat('C'), Some(-80.0));
        assert_eq!(band_max_lat('C'), Some(-72.0));
        assert_eq!(band_min_lat('N'), Some(0.0));
        assert_eq!(band_min_lat('X'), Some(72.0));
        assert_eq!(band_max_lat('X'), Some(84.0));
        assert_eq!(band_min_lat('I'), None);
        assert_eq!(band_min_lat('O'), None);
    }

    #[test]
    fn test_hemisphere_split() {
        assert!(!band_is_north('M'));
        assert!(band_is_north('N'));
        assert!(band_is_north('X'));
        assert!(!band_is_north('C'));
    }
}
