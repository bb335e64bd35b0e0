use serde::{Deserialize, Serialize};

/// One capture tick.
///
/// Within a single capture, samples are produced in non-decreasing
/// timestamp order. Only timestamp deltas are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Milliseconds, either since capture start or wall clock.
    #[serde(alias = "time")]
    pub timestamp: u64,

    /// RMS of the frame's unit-normalized signed amplitudes, in `[0, 1]`.
    pub volume: f64,

    /// Largest raw sample magnitude in the frame. The unit depends on the
    /// capture format; not used for matching.
    #[serde(default, alias = "peak")]
    pub peak_amplitude: f64,
}

impl Sample {
    /// Creates a sample from precomputed values.
    pub fn new(timestamp: u64, volume: f64, peak_amplitude: f64) -> Self {
        Self {
            timestamp,
            volume,
            peak_amplitude,
        }
    }

    /// Builds a sample from unsigned 8-bit time-domain data centered on 128,
    /// the format produced by byte analysers.
    ///
    /// The peak is the largest raw byte value.
    pub fn from_u8_frame(timestamp: u64, frame: &[u8]) -> Self {
        let normalized: Vec<f64> = frame.iter().map(|&b| (b as f64 - 128.0) / 128.0).collect();
        let peak = frame.iter().copied().max().unwrap_or(0);
        Self::new(timestamp, frame_volume(&normalized), peak as f64)
    }

    /// Builds a sample from signed 16-bit PCM.
    ///
    /// The peak is the largest absolute raw sample value.
    pub fn from_pcm16_frame(timestamp: u64, frame: &[i16]) -> Self {
        let normalized: Vec<f64> = frame.iter().map(|&s| s as f64 / 32768.0).collect();
        let peak = frame.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
        Self::new(timestamp, frame_volume(&normalized), peak as f64)
    }
}

/// Returns the root-mean-square of unit-normalized amplitudes.
/// An empty frame has volume 0.
pub fn frame_volume(frame: &[f64]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f64 = frame.iter().map(|v| v * v).sum();
    (sum / frame.len() as f64).sqrt()
}
