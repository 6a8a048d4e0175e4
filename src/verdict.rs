//! Normalization verdicts and the rejection taxonomy.
//!
//! Every rejection here is a *local, recoverable* outcome: it marks a single
//! candidate match as invalid or filtered and carries a short diagnostic, but
//! never aborts processing of the remaining candidates in a document.

use serde::Serialize;
use thiserror::Error;

/// Why a candidate match was rejected or filtered out.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum Rejection {
    /// A degree/minute/second or calendar field failed its bounds check.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Punctuation is inconsistent across the two axes or date fields.
    #[error("separator mismatch: {first:?} vs {second:?}")]
    SeparatorMismatch {
        first: Option<String>,
        second: Option<String>,
    },

    /// Day/month order cannot be read either way, or a forced locale made
    /// the captured pair impossible.
    #[error("day/month pair has no valid reading for the locale")]
    AmbiguousLocale,

    /// The text's lexical shape does not fit the claimed pattern.
    #[error("lexical shape does not fit the pattern")]
    Lexical,

    /// The text parses as a calendar date and was claimed by a date-shaped
    /// heuristic instead.
    #[error("text parses as a calendar date")]
    DateLike,

    /// The digits contain a known decoy sequence (counting runs, phone pads).
    #[error("decoy digit sequence")]
    DigitSequence,

    /// The text reads as a rate or duration ("12 per LB", "30 SEC").
    #[error("rate or duration wording")]
    RateWord,

    /// The external grid or calendar constructor rejected the normalized
    /// inputs.
    #[error("constructor rejected normalized inputs: {0}")]
    Construction(String),

    /// The match never produced a numerically valid value.
    #[error("match failed numeric validation")]
    Invalid,
}

impl Rejection {
    /// Stable machine-readable code for downstream consumers and reports.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::OutOfRange(_) => "range",
            Rejection::SeparatorMismatch { .. } => "sep-mismatch",
            Rejection::AmbiguousLocale => "ambiguous-locale",
            Rejection::Lexical => "lexical",
            Rejection::DateLike => "date",
            Rejection::DigitSequence => "digit-seq",
            Rejection::RateWord => "rate",
            Rejection::Construction(_) => "construction",
            Rejection::Invalid => "invalid",
        }
    }
}

/// The output triple consumed downstream of normalization.
///
/// Constructed pessimistic - invalid and filtered - and upgraded only once a
/// candidate survives construction and validation. Immutable once the owning
/// match record is returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Whether the candidate normalized to a numerically valid value.
    pub is_valid: bool,
    /// Whether a filter or validation rule suppressed the candidate.
    pub filtered_out: bool,
    /// Diagnostic for a rejected candidate; `None` when accepted.
    pub reason: Option<Rejection>,
}

impl Verdict {
    /// The starting state: nothing proven yet.
    pub fn pending() -> Self {
        Self {
            is_valid: false,
            filtered_out: true,
            reason: None,
        }
    }

    /// A candidate that survived construction, validation, and filtering.
    pub fn accept() -> Self {
        Self {
            is_valid: true,
            filtered_out: false,
            reason: None,
        }
    }

    /// A candidate rejected with a diagnostic.
    pub fn reject(reason: Rejection) -> Self {
        Self {
            is_valid: false,
            filtered_out: true,
            reason: Some(reason),
        }
    }

    /// A valid candidate that a post-validation filter suppressed anyway.
    pub fn filtered(reason: Rejection) -> Self {
        Self {
            is_valid: true,
            filtered_out: true,
            reason: Some(reason),
        }
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(Rejection::Invalid.code(), "invalid");
        assert_eq!(Rejection::Lexical.code(), "lexical");
        assert_eq!(Rejection::RateWord.code(), "rate");
        assert_eq!(Rejection::DigitSequence.code(), "digit-seq");
        assert_eq!(Rejection::DateLike.code(), "date");
    }

    #[test]
    fn test_display_messages() {
        insta::assert_snapshot!(
            Rejection::OutOfRange("latitude 95".into()).to_string(),
            @"value out of range: latitude 95"
        );
        insta::assert_snapshot!(
            Rejection::DateLike.to_string(),
            @"text parses as a calendar date"
        );
    }

    #[test]
    fn test_verdict_lifecycle() {
        let pending = Verdict::pending();
        assert!(!pending.is_valid);
        assert!(pending.filtered_out);
        assert_eq!(pending.reason, None);

        let accepted = Verdict::accept();
        assert!(accepted.is_valid);
        assert!(!accepted.filtered_out);

        let rejected = Verdict::reject(Rejection::Invalid);
        assert!(!rejected.is_valid);
        assert!(rejected.filtered_out);
        assert_eq!(rejected.reason.as_ref().map(Rejection::code), Some("invalid"));
    }
}
