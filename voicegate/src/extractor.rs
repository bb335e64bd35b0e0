use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fingerprint::Fingerprint;
use crate::sample::Sample;
use crate::VoicegateError;

/// Reduces a finished sample sequence to a [`Fingerprint`].
///
/// # Algorithm
///
/// Samples at or below the silence floor are discarded; the remaining
/// *active* samples keep their original order. Over the active volumes:
///
/// - count, mean and maximum
/// - rhythm: mean `|v[i] - v[i-1]|` over consecutive pairs
/// - peaks: interior indices where `v[i]` exceeds the peak threshold and
///   both neighbours (strict local maximum)
///
/// Extraction is a single batch pass with no side effects; identical
/// input always yields a bit-identical fingerprint.
#[derive(Debug, Clone)]
pub struct Extractor {
    cfg: ExtractorConfig,
}

/// Configuration for [`Extractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Minimum total samples in a capture (default: 10).
    pub min_samples: usize,
    /// Minimum samples above the silence floor (default: 5).
    pub min_active_samples: usize,
    /// A sample is active when its volume is strictly above this (default: 0.01).
    pub silence_threshold: f64,
    /// A peak must be strictly above this volume (default: 0.1).
    pub peak_threshold: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            min_active_samples: 5,
            silence_threshold: 0.01,
            peak_threshold: 0.1,
        }
    }
}

impl Extractor {
    /// Creates an Extractor with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    /// Creates an Extractor with the given configuration.
    /// Zero counts and negative or non-finite thresholds fall back to defaults.
    pub fn with_config(cfg: ExtractorConfig) -> Self {
        let def = ExtractorConfig::default();
        let min_samples = if cfg.min_samples > 0 {
            cfg.min_samples
        } else {
            def.min_samples
        };
        let min_active_samples = if cfg.min_active_samples > 0 {
            cfg.min_active_samples
        } else {
            def.min_active_samples
        };
        let silence_threshold = if cfg.silence_threshold.is_finite() && cfg.silence_threshold >= 0.0 {
            cfg.silence_threshold
        } else {
            def.silence_threshold
        };
        let peak_threshold = if cfg.peak_threshold.is_finite() && cfg.peak_threshold >= 0.0 {
            cfg.peak_threshold
        } else {
            def.peak_threshold
        };
        Self {
            cfg: ExtractorConfig {
                min_samples,
                min_active_samples,
                silence_threshold,
                peak_threshold,
            },
        }
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.cfg
    }

    /// Builds a fingerprint from a complete capture.
    ///
    /// Fails with [`VoicegateError::TooShort`] when the capture has fewer than
    /// `min_samples` samples, [`VoicegateError::InvalidSample`] when a volume
    /// is not a finite value in `[0, 1]`, and [`VoicegateError::NoSignal`] when
    /// fewer than `min_active_samples` are above the silence floor.
    pub fn extract(&self, samples: &[Sample]) -> Result<Fingerprint, VoicegateError> {
        if samples.len() < self.cfg.min_samples {
            return Err(VoicegateError::TooShort {
                min: self.cfg.min_samples,
                got: samples.len(),
            });
        }

        if let Some((index, s)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.volume.is_finite() && (0.0..=1.0).contains(&s.volume)))
        {
            return Err(VoicegateError::InvalidSample {
                index,
                volume: s.volume,
            });
        }

        let active: Vec<f64> = samples
            .iter()
            .map(|s| s.volume)
            .filter(|&v| v > self.cfg.silence_threshold)
            .collect();

        if active.len() < self.cfg.min_active_samples {
            return Err(VoicegateError::NoSignal {
                min: self.cfg.min_active_samples,
                got: active.len(),
            });
        }

        let count = active.len();
        let peak_volume = active.iter().copied().fold(f64::MIN, f64::max);
        // Summation can round the mean of a flat take one ulp above its maximum.
        let average_volume = (active.iter().sum::<f64>() / count as f64).min(peak_volume);

        let fp = Fingerprint {
            active_sample_count: count as u32,
            average_volume,
            peak_volume,
            rhythm_score: rhythm_score(&active),
            peak_count: count_peaks(&active, self.cfg.peak_threshold),
        };

        debug!(
            total = samples.len(),
            active = fp.active_sample_count,
            average_volume = fp.average_volume,
            peak_volume = fp.peak_volume,
            rhythm_score = fp.rhythm_score,
            peak_count = fp.peak_count,
            "voicegate: fingerprint extracted"
        );

        Ok(fp)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean absolute change between consecutive volumes.
/// Fewer than two values yield 0.
pub fn rhythm_score(volumes: &[f64]) -> f64 {
    if volumes.len() < 2 {
        return 0.0;
    }
    let total: f64 = volumes.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    total / (volumes.len() - 1) as f64
}

/// Counts strict interior local maxima above `threshold`.
pub fn count_peaks(volumes: &[f64], threshold: f64) -> u32 {
    volumes
        .windows(3)
        .filter(|w| w[1] > threshold && w[1] > w[0] && w[1] > w[2])
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(volumes: &[f64]) -> Vec<Sample> {
        volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(i as u64 * 16, v, 0.0))
            .collect()
    }

    #[test]
    fn extract_too_short() {
        let ex = Extractor::new();
        for n in 0..10 {
            let err = ex.extract(&samples(&vec![0.5; n])).unwrap_err();
            assert!(
                matches!(err, VoicegateError::TooShort { min: 10, got } if got == n),
                "n={n}: {err}"
            );
        }
    }

    #[test]
    fn extract_no_signal() {
        let ex = Extractor::new();
        // 4 active samples out of 20.
        let mut v = vec![0.0; 16];
        v.extend([0.2, 0.3, 0.2, 0.3]);
        let err = ex.extract(&samples(&v)).unwrap_err();
        assert!(matches!(err, VoicegateError::NoSignal { min: 5, got: 4 }), "{err}");
    }

    #[test]
    fn silence_floor_is_exclusive() {
        let ex = Extractor::new();
        // Exactly 0.01 is silence.
        let err = ex.extract(&samples(&[0.01; 12])).unwrap_err();
        assert!(matches!(err, VoicegateError::NoSignal { got: 0, .. }));
    }

    #[test]
    fn extract_basic_fields() {
        let ex = Extractor::new();
        let fp = ex
            .extract(&samples(&[0.0, 0.2, 0.4, 0.2, 0.4, 0.2, 0.0, 0.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(fp.active_sample_count, 5);
        assert!((fp.average_volume - 0.28).abs() < 1e-12);
        assert_eq!(fp.peak_volume, 0.4);
        assert!((fp.rhythm_score - 0.2).abs() < 1e-12);
        // Interior maxima: 0.4 at active index 1 and 3.
        assert_eq!(fp.peak_count, 2);
    }

    #[test]
    fn silence_is_skipped_not_zeroed() {
        // Silent gaps between active samples do not count as volume changes.
        let ex = Extractor::new();
        let fp = ex
            .extract(&samples(&[0.3, 0.0, 0.3, 0.0, 0.3, 0.0, 0.3, 0.0, 0.3, 0.0]))
            .unwrap();
        assert_eq!(fp.active_sample_count, 5);
        assert_eq!(fp.rhythm_score, 0.0);
        assert_eq!(fp.peak_count, 0);
    }

    #[test]
    fn flat_take_mean_never_exceeds_peak() {
        let ex = Extractor::new();
        for v in [0.7, 0.35, 0.9, 0.1, 1.0, 0.011] {
            for n in 10..80 {
                let fp = ex.extract(&samples(&vec![v; n])).unwrap();
                assert_eq!(fp.peak_volume, v);
                assert!(fp.average_volume <= fp.peak_volume, "v={v} n={n}: {fp}");
                fp.validate().unwrap();
            }
        }
        let fp = ex.extract(&samples(&[0.7; 12])).unwrap();
        assert_eq!(fp.average_volume, 0.7);
    }

    #[test]
    fn extract_rejects_bad_volumes() {
        let ex = Extractor::new();
        for bad in [1.5, -0.2, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut v = vec![0.3; 12];
            v[4] = bad;
            let err = ex.extract(&samples(&v)).unwrap_err();
            assert!(
                matches!(err, VoicegateError::InvalidSample { index: 4, .. }),
                "{bad}: {err}"
            );
            assert!(err.is_recoverable());
        }
        // Length is checked first.
        let err = ex.extract(&samples(&[f64::NAN; 3])).unwrap_err();
        assert!(matches!(err, VoicegateError::TooShort { .. }));
        // Both bounds are inclusive.
        let mut v = vec![1.0; 12];
        v[0] = 0.0;
        ex.extract(&samples(&v)).unwrap();
    }

    #[test]
    fn rhythm_score_edges() {
        assert_eq!(rhythm_score(&[]), 0.0);
        assert_eq!(rhythm_score(&[0.5]), 0.0);
        assert!((rhythm_score(&[0.1, 0.3]) - 0.2).abs() < 1e-12);
        assert!((rhythm_score(&[0.1, 0.3, 0.1]) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn count_peaks_rules() {
        // Endpoints never count.
        assert_eq!(count_peaks(&[0.9, 0.2, 0.9], 0.1), 0);
        // Plateaus are not strict maxima.
        assert_eq!(count_peaks(&[0.2, 0.5, 0.5, 0.2], 0.1), 0);
        // Below or at the threshold.
        assert_eq!(count_peaks(&[0.02, 0.1, 0.05], 0.1), 0);
        assert_eq!(count_peaks(&[0.02, 0.11, 0.05], 0.1), 1);
        assert_eq!(count_peaks(&[0.1, 0.5, 0.1, 0.5, 0.1], 0.1), 2);
        assert_eq!(count_peaks(&[0.5, 0.6], 0.1), 0);
    }

    #[test]
    fn custom_config() {
        let ex = Extractor::with_config(ExtractorConfig {
            min_samples: 3,
            min_active_samples: 2,
            silence_threshold: 0.1,
            peak_threshold: 0.5,
        });
        let fp = ex.extract(&samples(&[0.05, 0.3, 0.6, 0.3])).unwrap();
        assert_eq!(fp.active_sample_count, 3);
        assert_eq!(fp.peak_count, 1);
    }

    #[test]
    fn invalid_config_falls_back() {
        let ex = Extractor::with_config(ExtractorConfig {
            min_samples: 0,
            min_active_samples: 0,
            silence_threshold: f64::NAN,
            peak_threshold: -1.0,
        });
        assert_eq!(ex.config(), &ExtractorConfig::default());
    }

    #[test]
    fn config_from_partial_json() {
        let cfg: ExtractorConfig = serde_json::from_str(r#"{"min_samples": 20}"#).unwrap();
        assert_eq!(cfg.min_samples, 20);
        assert_eq!(cfg.min_active_samples, 5);
        assert_eq!(cfg.silence_threshold, 0.01);
    }
}
