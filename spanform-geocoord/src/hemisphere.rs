//! Hemisphere resolution for one latitude or longitude axis.

use serde::Serialize;

use spanform::Slots;

/// Which axis a slot group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    Lat,
    Lon,
}

impl Axis {
    /// Suffix used in slot names for this axis (`degLat`, `fractMinLon`, ...).
    pub fn slot_suffix(self) -> &'static str {
        match self {
            Axis::Lat => "Lat",
            Axis::Lon => "Lon",
        }
    }

    /// Candidate hemisphere slots, scanned in order: explicit symbol,
    /// sign variant, prefixed variant.
    fn hemisphere_slots(self) -> [&'static str; 3] {
        match self {
            Axis::Lat => ["hemiLat", "hemiLatSign", "hemiLatPre"],
            Axis::Lon => ["hemiLon", "hemiLonSign", "hemiLonPre"],
        }
    }
}

/// Symbol-to-polarity table. Anything unrecognized resolves positive.
const HEMISPHERE_SIGNS: &[(&str, i8)] = &[
    ("-", -1),
    ("W", -1),
    ("S", -1),
    ("+", 1),
    ("E", 1),
    ("N", 1),
];

fn polarity_for(symbol: &str) -> i8 {
    HEMISPHERE_SIGNS
        .iter()
        .find(|(sym, _)| *sym == symbol)
        .map(|(_, pol)| *pol)
        .unwrap_or(1)
}

/// The sign of one axis value, derived from a letter (N/S/E/W) or an
/// explicit `+`/`-` symbol found in the slot mapping.
///
/// Polarity `0` means "not yet resolved": none of the candidate slots was
/// present. Scaling a value by an unresolved polarity is a caller sequencing
/// defect, asserted in [`crate::DmsOrdinate::decimal`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hemisphere {
    axis: Axis,
    symbol: Option<String>,
    polarity: i8,
}

impl Hemisphere {
    /// Scan the axis's candidate slots; the first *present* key wins, even
    /// with an empty value. A present-but-empty slot means "the grammar
    /// looked for a symbol and found none", which resolves positive.
    pub fn resolve(axis: Axis, slots: &Slots) -> Self {
        for key in axis.hemisphere_slots() {
            if let Some(raw) = slots.get(key) {
                if raw.is_empty() {
                    return Self {
                        axis,
                        symbol: None,
                        polarity: 1,
                    };
                }
                let symbol = raw.trim().to_uppercase();
                let polarity = polarity_for(&symbol);
                return Self {
                    axis,
                    symbol: Some(symbol),
                    polarity,
                };
            }
        }
        Self {
            axis,
            symbol: None,
            polarity: 0,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The normalized (upper-cased, trimmed) symbol, if one was captured.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// `-1`, `+1`, or `0` when unresolved.
    pub fn polarity(&self) -> i8 {
        self.polarity
    }

    pub fn is_resolved(&self) -> bool {
        self.polarity != 0
    }

    /// Whether the resolved symbol is a letter rather than a sign.
    ///
    /// A lettered hemisphere (`N`, `W`) is strong evidence of a real
    /// coordinate; a bare signed number is not.
    pub fn is_alpha(&self) -> bool {
        self.symbol
            .as_deref()
            .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_alphabetic()))
    }

    /// Display sign for the resolved polarity.
    pub fn standard_format(&self) -> char {
        if self.polarity < 0 {
            '-'
        } else {
            '+'
        }
    }
}
