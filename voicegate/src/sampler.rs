use std::collections::VecDeque;

use crate::sample::Sample;

/// Produces capture samples on demand.
///
/// This is the polling side of a capture adapter: whatever drives the audio
/// device (an animation loop, a timer, a file reader) is hidden behind
/// [`SampleSource::next_sample`]. Sources must yield samples in
/// non-decreasing timestamp order and return `None` once exhausted.
pub trait SampleSource {
    /// Returns the next sample, or `None` when the source has no more.
    fn next_sample(&mut self) -> Option<Sample>;
}

/// A [`SampleSource`] over an already-recorded sequence.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    samples: VecDeque<Sample>,
}

impl VecSource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }
}

impl SampleSource for VecSource {
    fn next_sample(&mut self) -> Option<Sample> {
        self.samples.pop_front()
    }
}

/// Configures [`PcmSampler`].
#[derive(Debug, Clone)]
pub struct PcmSamplerConfig {
    /// Input sample rate in Hz (default: 16000).
    pub sample_rate: usize,
    /// Analysis window in samples (default: 2048).
    pub frame_size: usize,
    /// Ticks per second (default: 60).
    pub tick_hz: usize,
}

impl Default for PcmSamplerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            frame_size: 2048,
            tick_hz: 60,
        }
    }
}

/// A [`SampleSource`] that replays PCM16 signed little-endian mono audio
/// as if it were analysed live.
///
/// Each tick looks at a window of `frame_size` samples, advancing by
/// `sample_rate / tick_hz` samples. Tick `k` is stamped `k * 1000 / tick_hz`
/// milliseconds. The last windows may be shorter than `frame_size`.
pub struct PcmSampler {
    samples: Vec<i16>,
    frame_size: usize,
    hop: usize,
    tick_hz: usize,
    tick: usize,
}

impl PcmSampler {
    /// Creates a sampler over raw PCM16 bytes. A trailing odd byte is ignored.
    /// Zero config values fall back to defaults.
    pub fn new(audio: &[u8], cfg: PcmSamplerConfig) -> Self {
        let def = PcmSamplerConfig::default();
        let sample_rate = if cfg.sample_rate > 0 {
            cfg.sample_rate
        } else {
            def.sample_rate
        };
        let frame_size = if cfg.frame_size > 0 {
            cfg.frame_size
        } else {
            def.frame_size
        };
        let tick_hz = if cfg.tick_hz > 0 { cfg.tick_hz } else { def.tick_hz };

        let samples = audio
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();

        Self {
            samples,
            frame_size,
            hop: (sample_rate / tick_hz).max(1),
            tick_hz,
            tick: 0,
        }
    }

    /// Returns the number of ticks this sampler will produce in total.
    pub fn tick_count(&self) -> usize {
        self.samples.len().div_ceil(self.hop)
    }
}

impl SampleSource for PcmSampler {
    fn next_sample(&mut self) -> Option<Sample> {
        let start = self.tick * self.hop;
        if start >= self.samples.len() {
            return None;
        }
        let end = (start + self.frame_size).min(self.samples.len());
        let timestamp = (self.tick * 1000 / self.tick_hz) as u64;
        self.tick += 1;
        Some(Sample::from_pcm16_frame(timestamp, &self.samples[start..end]))
    }
}
