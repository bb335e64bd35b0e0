use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fingerprint::Fingerprint;

/// One of the four match criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Active sample count within a relative tolerance.
    Duration,
    /// Average volume within a relative tolerance.
    Volume,
    /// Rhythm score within a relative tolerance.
    Rhythm,
    /// Peak count within an absolute tolerance.
    Peaks,
}

impl Criterion {
    /// All criteria in evaluation order.
    pub const ALL: [Criterion; 4] = [
        Criterion::Duration,
        Criterion::Volume,
        Criterion::Rhythm,
        Criterion::Peaks,
    ];
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration => write!(f, "duration"),
            Self::Volume => write!(f, "volume"),
            Self::Rhythm => write!(f, "rhythm"),
            Self::Peaks => write!(f, "peaks"),
        }
    }
}

/// Result of comparing a candidate fingerprint against a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchVerdict {
    pub duration_match: bool,
    pub volume_match: bool,
    pub rhythm_match: bool,
    pub peak_match: bool,
    /// Number of criteria that passed (0-4).
    pub agreement_count: u8,
    /// Whether enough criteria agreed.
    pub accepted: bool,
}

impl MatchVerdict {
    /// Returns the outcome of a single criterion.
    pub fn passed(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Duration => self.duration_match,
            Criterion::Volume => self.volume_match,
            Criterion::Rhythm => self.rhythm_match,
            Criterion::Peaks => self.peak_match,
        }
    }

    /// Returns the criteria that did not pass.
    pub fn failed_criteria(&self) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|&c| !self.passed(c))
            .collect()
    }
}

impl fmt::Display for MatchVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = if self.accepted { "accepted" } else { "rejected" };
        write!(f, "{word} ({}/{})", self.agreement_count, Criterion::ALL.len())
    }
}

/// Scores a candidate fingerprint against a stored reference.
///
/// # Algorithm
///
/// Each criterion is an independent tolerance check against the reference:
///
/// ```text
/// duration  |c - r| / r < 0.30   (activeSampleCount)
/// volume    |c - r| / r < 0.30   (averageVolume)
/// rhythm    |c - r| / r < 0.40   (rhythmScore)
/// peaks     |c - r|     <= 2     (peakCount)
/// ```
///
/// A relative check whose reference value is zero fails. The candidate is
/// accepted when at least 3 of the 4 criteria agree.
#[derive(Debug, Clone)]
pub struct Matcher {
    cfg: MatcherConfig,
}

/// Configuration for [`Matcher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Relative tolerance on active sample count (default: 0.30).
    pub duration_tolerance: f64,
    /// Relative tolerance on average volume (default: 0.30).
    pub volume_tolerance: f64,
    /// Relative tolerance on rhythm score (default: 0.40).
    pub rhythm_tolerance: f64,
    /// Absolute tolerance on peak count (default: 2).
    pub peak_tolerance: u32,
    /// Criteria that must pass for acceptance (default: 3).
    pub min_agreement: u8,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            duration_tolerance: 0.30,
            volume_tolerance: 0.30,
            rhythm_tolerance: 0.40,
            peak_tolerance: 2,
            min_agreement: 3,
        }
    }
}

impl Matcher {
    /// Creates a Matcher with the default tolerances.
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    /// Creates a Matcher with the given configuration.
    /// Non-positive or non-finite tolerances and an agreement outside 1..=4
    /// fall back to defaults.
    pub fn with_config(cfg: MatcherConfig) -> Self {
        let def = MatcherConfig::default();
        let tolerance = |v: f64, d: f64| if v.is_finite() && v > 0.0 { v } else { d };
        let min_agreement = if (1..=Criterion::ALL.len() as u8).contains(&cfg.min_agreement) {
            cfg.min_agreement
        } else {
            def.min_agreement
        };
        Self {
            cfg: MatcherConfig {
                duration_tolerance: tolerance(cfg.duration_tolerance, def.duration_tolerance),
                volume_tolerance: tolerance(cfg.volume_tolerance, def.volume_tolerance),
                rhythm_tolerance: tolerance(cfg.rhythm_tolerance, def.rhythm_tolerance),
                peak_tolerance: cfg.peak_tolerance,
                min_agreement,
            },
        }
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }

    /// Compares `candidate` against `reference`.
    ///
    /// Deterministic and infallible; a missing reference must be handled by
    /// the caller before getting here.
    pub fn compare(&self, candidate: &Fingerprint, reference: &Fingerprint) -> MatchVerdict {
        let duration_match = within_relative(
            candidate.active_sample_count as f64,
            reference.active_sample_count as f64,
            self.cfg.duration_tolerance,
        );
        let volume_match = within_relative(
            candidate.average_volume,
            reference.average_volume,
            self.cfg.volume_tolerance,
        );
        let rhythm_match = within_relative(
            candidate.rhythm_score,
            reference.rhythm_score,
            self.cfg.rhythm_tolerance,
        );
        let peak_match = candidate.peak_count.abs_diff(reference.peak_count) <= self.cfg.peak_tolerance;

        let agreement_count = [duration_match, volume_match, rhythm_match, peak_match]
            .into_iter()
            .filter(|&m| m)
            .count() as u8;

        let verdict = MatchVerdict {
            duration_match,
            volume_match,
            rhythm_match,
            peak_match,
            agreement_count,
            accepted: agreement_count >= self.cfg.min_agreement,
        };

        debug!(
            duration = duration_match,
            volume = volume_match,
            rhythm = rhythm_match,
            peaks = peak_match,
            agreement = agreement_count,
            "voicegate: compared fingerprints"
        );

        verdict
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

/// `|candidate - reference| / reference < tolerance`, failing on a zero or
/// non-finite reference.
fn within_relative(candidate: f64, reference: f64, tolerance: f64) -> bool {
    if reference == 0.0 || !reference.is_finite() {
        return false;
    }
    (candidate - reference).abs() / reference.abs() < tolerance
}
