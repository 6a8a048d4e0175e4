//! Universal Transverse Mercator references.

use serde::Serialize;

use crate::coordinate::LatLon;

use super::{band_is_north, band_min_lat, GridError};

// WGS-84 ellipsoid.
const SEMI_MAJOR: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// A validated UTM reference: zone, latitude band, easting, northing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Utm {
    zone: u8,
    band: char,
    easting: f64,
    northing: f64,
}

impl Utm {
    /// Construct and validate a reference. The band letter supplies the
    /// hemisphere (bands `N` and above are northern).
    pub fn new(zone: i64, band: char, easting: f64, northing: f64) -> Result<Self, GridError> {
        if !(1..=60).contains(&zone) {
            return Err(GridError::ZoneOutOfRange(zone));
        }
        if band_min_lat(band).is_none() {
            return Err(GridError::BadBand(band.to_string()));
        }
        if !(100_000.0..=900_000.0).contains(&easting) {
            return Err(GridError::EastingOutOfRange(easting));
        }
        if !(0.0..=10_000_000.0).contains(&northing) {
            return Err(GridError::NorthingOutOfRange(northing));
        }
        Ok(Self {
            zone: zone as u8,
            band,
            easting,
            northing,
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn band(&self) -> char {
        self.band
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    pub fn is_north(&self) -> bool {
        band_is_north(self.band)
    }

    /// Central meridian of the zone, in degrees.
    fn central_meridian(&self) -> f64 {
        f64::from(self.zone - 1) * 6.0 - 180.0 + 3.0
    }

    /// Inverse transverse Mercator (USGS series expansion).
    pub fn to_lat_lon(&self) -> LatLon {
        let e2 = FLATTENING * (2.0 - FLATTENING);
        let ep2 = e2 / (1.0 - e2);

        let x = self.easting - FALSE_EASTING;
        let mut y = self.northing;
        if !self.is_north() {
            y -= FALSE_NORTHING_SOUTH;
        }

        let m = y / SCALE_FACTOR;
        let mu = m / (SEMI_MAJOR
            * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0));

        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let c1 = ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let n1 = SEMI_MAJOR / (1.0 - e2 * sin_phi1 * sin_phi1).sqrt();
        let r1 = SEMI_MAJOR * (1.0 - e2) / (1.0 - e2 * sin_phi1 * sin_phi1).powf(1.5);
        let d = x / (n1 * SCALE_FACTOR);

        let lat_rad = phi1
            - (n1 * tan_phi1 / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * ep2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let lon_rad = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos_phi1;

        LatLon::new(
            lat_rad.to_degrees(),
            self.central_meridian() + lon_rad.to_degrees(),
        )
    }
}

impl std::fmt::Display for Utm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {:.0}m E {:.0}m N",
            self.zone, self.band, self.easting, self.northing
        )
    }
}
