//! The normalized output coordinate.

use serde::Serialize;

/// A decimal-degree latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Range validation: latitude in `[-90, 90]`, longitude in `[-180, 180]`.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validation() {
        assert!(LatLon::new(0.0, 0.0).is_valid());
        assert!(LatLon::new(-90.0, 180.0).is_valid());
        assert!(!LatLon::new(90.5, 0.0).is_valid());
        assert!(!LatLon::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn test_display() {
        insta::assert_snapshot!(LatLon::new(34.5, -118.25).to_string(), @"34.50000, -118.25000");
    }
}
