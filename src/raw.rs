//! Raw candidate matches as produced by the pattern engine.

use serde::Serialize;

use crate::Slots;

/// Identifier of the specific grammar alternative that matched.
///
/// The prefix up to the first `-` names the pattern family: `"MDY-01"` and
/// `"MDY-02"` both belong to family `"MDY"`, `"DMS-01a"` to `"DMS"`. An
/// identifier with no `-` is its own family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternId(String);

impl PatternId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The full identifier as given by the engine.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The family prefix (everything before the first `-`).
    pub fn family(&self) -> &str {
        match self.0.split_once('-') {
            Some((family, _)) => family,
            None => &self.0,
        }
    }
}

impl From<&str> for PatternId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One candidate span found by the engine, before semantic analysis.
///
/// Read-only input to the normalization plugins: the matched substring, its
/// normalized (lower-cased) form, the pattern identifier, and the slot
/// mapping of the grammar alternative that matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMatch {
    /// Raw matched substring, exactly as it appears in the source text.
    pub text: String,
    /// Normalized form of the text; lower-cased by default.
    pub textnorm: String,
    /// Which grammar alternative produced this candidate.
    pub pattern_id: PatternId,
    /// Named captures of that alternative.
    pub slots: Slots,
}

impl RawMatch {
    /// Create a candidate with the default lower-cased `textnorm`.
    pub fn new(text: impl Into<String>, pattern_id: impl Into<PatternId>, slots: Slots) -> Self {
        let text = text.into();
        let textnorm = text.to_lowercase();
        Self {
            text,
            textnorm,
            pattern_id: pattern_id.into(),
            slots,
        }
    }

    /// Override the normalized text (e.g. an engine that case-folds and
    /// squeezes whitespace differently).
    pub fn with_textnorm(mut self, textnorm: impl Into<String>) -> Self {
        self.textnorm = textnorm.into();
        self
    }
}

impl From<String> for PatternId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
