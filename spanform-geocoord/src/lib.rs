//! Geocoordinate normalization plugin for spanform.
//!
//! Converts raw pattern-engine captures into validated geocoordinates:
//! MGRS and UTM grid references, and decimal-degree / degree-minute /
//! degree-minute-second pairs, with axis-level digesting, hemisphere-sign
//! resolution, specificity tracking, and heuristic false-positive rejection.
//!
//! ## Pipeline position
//!
//! An external pattern engine finds candidate spans and produces a
//! [`spanform::RawMatch`] per candidate. This crate decides whether each
//! candidate is numerically valid, resolves its precision, and assigns it a
//! `{lat, lon}` value:
//!
//! - [`Hemisphere`] - sign resolution from N/S/E/W letters or `+`/`-` symbols
//! - [`DmsOrdinate`] - one axis digested from slots, precision preserved
//! - [`GeocoordNormalizer`] - the five match variants, filters applied
//! - [`MgrsFilter`] / [`DmsFilter`] - date/rate/digit-run suppression
//! - [`geodetic`] - UTM and MGRS references with their own range enforcement
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use spanform::{RawMatch, Slots};
//! use spanform_geocoord::GeocoordNormalizer;
//!
//! let raw = RawMatch::new(
//!     "N55.60, W80.11",
//!     "DD-01",
//!     Slots::from_pairs([
//!         ("decDegLat", "55.60"),
//!         ("decDegLon", "80.11"),
//!         ("hemiLat", "N"),
//!         ("hemiLon", "W"),
//!     ]),
//! );
//! let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
//! let m = GeocoordNormalizer::new().normalize(&raw, today).unwrap();
//! assert!(m.verdict.is_valid);
//! assert!(m.coordinate.unwrap().lon < 0.0);
//! ```

mod coordinate;
mod filters;
pub mod geodetic;
mod hemisphere;
mod ordinate;
mod variants;

pub use coordinate::LatLon;
pub use filters::{DmsFilter, MgrsFilter};
pub use hemisphere::{Axis, Hemisphere};
pub use ordinate::{DmsOrdinate, ResolutionUncertainty, Specificity};
pub use variants::{GeocoordKind, GeocoordMatch, GeocoordNormalizer, GridRef};

#[cfg(test)]
mod tests {
    mod end_to_end;
}
