use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("{field} must be a finite number, got {provided}")]
    NotFinite { field: &'static str, provided: f64 },

    #[error("{field} must not be negative, got {provided}")]
    Negative { field: &'static str, provided: f64 },

    #[error("percentage offset and absolute offset cannot both be 0")]
    ZeroOffsets,
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Coefficients of the likelihood formula.
///
/// Constructed only through [`ScoringConfig::new`] (or deserialization, which
/// goes through the same checks), so the formula's divisors are never zero:
/// the weighting is non-negative and the two offsets are not both zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoringConfigDraft")]
pub struct ScoringConfig {
    percentage_weighting: f64,
    percentage_offset: f64,
    absolute_offset: f64,
}

/// Unvalidated shape of a [`ScoringConfig`], as read from a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfigDraft {
    pub percentage_weighting: f64,
    pub percentage_offset: f64,
    pub absolute_offset: f64,
}

impl Default for ScoringConfigDraft {
    fn default() -> Self {
        Self {
            percentage_weighting: ScoringConfig::DEFAULT_PERCENTAGE_WEIGHTING,
            percentage_offset: ScoringConfig::DEFAULT_PERCENTAGE_OFFSET,
            absolute_offset: ScoringConfig::DEFAULT_ABSOLUTE_OFFSET,
        }
    }
}

impl TryFrom<ScoringConfigDraft> for ScoringConfig {
    type Error = ScoringError;

    fn try_from(draft: ScoringConfigDraft) -> Result<Self, Self::Error> {
        Self::new(
            draft.percentage_weighting,
            draft.percentage_offset,
            draft.absolute_offset,
        )
    }
}

impl ScoringConfig {
    pub const DEFAULT_PERCENTAGE_WEIGHTING: f64 = 1.0;
    pub const DEFAULT_PERCENTAGE_OFFSET: f64 = 25.0;
    pub const DEFAULT_ABSOLUTE_OFFSET: f64 = 2.0;

    /// Creates a validated scoring configuration.
    ///
    /// # Errors
    ///
    /// - `NotFinite` if any coefficient is NaN or infinite
    /// - `Negative` if any coefficient is below zero
    /// - `ZeroOffsets` if both offsets are zero
    pub fn new(
        percentage_weighting: f64,
        percentage_offset: f64,
        absolute_offset: f64,
    ) -> Result<Self, ScoringError> {
        for (field, value) in [
            ("percentage weighting", percentage_weighting),
            ("percentage offset", percentage_offset),
            ("absolute offset", absolute_offset),
        ] {
            if !value.is_finite() {
                return Err(ScoringError::NotFinite {
                    field,
                    provided: value,
                });
            }
            if value < 0.0 {
                return Err(ScoringError::Negative {
                    field,
                    provided: value,
                });
            }
        }
        if percentage_offset == 0.0 && absolute_offset == 0.0 {
            return Err(ScoringError::ZeroOffsets);
        }

        Ok(Self {
            percentage_weighting,
            percentage_offset,
            absolute_offset,
        })
    }

    /// Relative importance of "got it wrong" against "is overdue".
    #[must_use]
    pub fn percentage_weighting(&self) -> f64 {
        self.percentage_weighting
    }

    /// Share of the expected exposure, in percent, added to the overdue divisor.
    #[must_use]
    pub fn percentage_offset(&self) -> f64 {
        self.percentage_offset
    }

    /// Fixed amount added to the overdue divisor.
    #[must_use]
    pub fn absolute_offset(&self) -> f64 {
        self.absolute_offset
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            percentage_weighting: Self::DEFAULT_PERCENTAGE_WEIGHTING,
            percentage_offset: Self::DEFAULT_PERCENTAGE_OFFSET,
            absolute_offset: Self::DEFAULT_ABSOLUTE_OFFSET,
        }
    }
}

//
// ─── LIKELIHOOD ────────────────────────────────────────────────────────────────
//

/// The two signals blended into a likelihood, kept apart for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikelihoodBreakdown {
    /// `100 - percentage`.
    pub wrongness: f64,
    /// How far behind schedule the question is, clamped to `[0, 100]`;
    /// 50 means asked exactly as often as expected.
    pub overdue: f64,
}

impl LikelihoodBreakdown {
    /// Splits the likelihood inputs into their components.
    ///
    /// Returns `None` when `expected_times_asked` is zero: a question that has
    /// never been part of a pool has no likelihood beyond the zero floor.
    #[must_use]
    pub fn compute(
        attempted: u32,
        percentage: f64,
        expected_times_asked: f64,
        config: &ScoringConfig,
    ) -> Option<Self> {
        if expected_times_asked == 0.0 {
            return None;
        }

        let wrongness = 100.0 - percentage;
        let divisor =
            (config.percentage_offset / 100.0) * expected_times_asked + config.absolute_offset;
        let raw_overdue =
            50.0 - (50.0 * (f64::from(attempted) - expected_times_asked)) / divisor;

        Some(Self {
            wrongness,
            overdue: raw_overdue.clamp(0.0, 100.0),
        })
    }

    /// Weighted blend of the two components.
    #[must_use]
    pub fn likelihood(&self, config: &ScoringConfig) -> f64 {
        let weighting = config.percentage_weighting;
        (weighting * self.wrongness + self.overdue) / (weighting + 1.0)
    }
}

/// Priority score of a question: higher means ask it sooner.
///
/// Questions with zero expected exposure score exactly 0.
#[must_use]
pub fn calculate_likelihood(
    attempted: u32,
    percentage: f64,
    expected_times_asked: f64,
    config: &ScoringConfig,
) -> f64 {
    LikelihoodBreakdown::compute(attempted, percentage, expected_times_asked, config)
        .map_or(0.0, |breakdown| breakdown.likelihood(config))
}

/// Rounds half away from zero to two decimal places, the precision used when
/// comparing persisted derived values against recomputed ones.
#[must_use]
pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
