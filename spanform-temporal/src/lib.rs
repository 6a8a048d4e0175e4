//! Temporal normalization plugin for spanform.
//!
//! Converts raw pattern-engine captures into validated calendar dates and
//! times: locale-ambiguous day/month resolution, two-digit-year windowing,
//! time-of-day validation, and timezone resolution.
//!
//! ## Pipeline position
//!
//! An external pattern engine finds candidate spans and produces a
//! [`spanform::RawMatch`] per candidate. This crate decides whether each
//! candidate is a real date, normalizes it, and emits the attribute map
//! shared with downstream consumers (`datenorm`, `epoch`, `resolution`,
//! and optionally `timestamp`/`tzinfo`):
//!
//! - [`resolve`] - pure slot normalizers for year / month / day / time / tz
//! - [`TemporalNormalizer`] - the orchestration, in a fixed hard-fail order
//! - [`Locale`] - day/month ordering, forced per document or inferred per
//!   match when the captured values leave only one valid reading
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use spanform::{RawMatch, Slots};
//! use spanform_temporal::{Locale, TemporalNormalizer};
//!
//! let raw = RawMatch::new(
//!     "04/05/2025",
//!     "MDY-01",
//!     Slots::from_pairs([("DM1", "04"), ("DM2", "05"), ("YEAR", "2025")]),
//! );
//! let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
//! let m = TemporalNormalizer::with_locale(Locale::Euro).normalize(&raw, today);
//! assert_eq!(m.attrs.unwrap().datenorm, "2025-05-04");
//! ```

mod datetime;
pub mod resolve;

pub use datetime::{DateTimeMatch, TemporalAttrs, TemporalConfig, TemporalNormalizer};
pub use resolve::{
    Locale, LocaleDecision, Resolution, Resolved, TimeOfDay, TzSpec, MAXIMUM_YEAR,
};

#[cfg(test)]
mod tests {
    mod end_to_end;
}
