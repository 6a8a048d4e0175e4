//! Boundary contract between a pattern-matching engine and the semantic
//! normalization plugins built on top of it.
//!
//! A pattern engine (out of scope here) scans text for candidate spans that
//! *look* like geocoordinates or calendar dates and emits, per candidate, a
//! raw match: the matched text, a pattern identifier, and a mapping of named
//! capture groups ("slots") to captured literals. This crate defines that
//! contract so plugin crates can decide whether each candidate is numerically
//! valid and assign it a normalized value:
//!
//! - [`Slots`] - the named-capture mapping, with absent / present-but-empty /
//!   present-with-value observed as three distinct states
//! - [`RawMatch`] - the read-only candidate record produced by the engine
//! - [`PatternId`] - pattern identifier with family-prefix parsing
//! - [`Verdict`] - the validity / filtered-out / reason triple consumed
//!   downstream
//! - [`Rejection`] - the taxonomy of local, recoverable rejection outcomes
//!
//! ## Plugin crates
//!
//! - `spanform-geocoord` - MGRS / UTM / degree-minute-second candidates
//! - `spanform-temporal` - calendar date/time candidates
//!
//! ## Example
//!
//! ```
//! use spanform::{RawMatch, Slots};
//!
//! let slots = Slots::from_pairs([("degLat", "34"), ("hemiLat", "N")]);
//! let raw = RawMatch::new("N34", "DD-01", slots);
//! assert_eq!(raw.pattern_id.family(), "DD");
//! assert!(raw.slots.contains("degLat"));
//! ```

mod raw;
mod slots;
mod verdict;

pub use raw::{PatternId, RawMatch};
pub use slots::Slots;
pub use verdict::{Rejection, Verdict};
