//! Voice fingerprint extraction and tolerance-based matching.
//!
//! # Architecture
//!
//! A short utterance flows through three stages:
//!
//! 1. [`SampleSource`]: a capture adapter yields timestamped volume samples,
//!    collected by a [`CaptureSession`] for at most 5 seconds
//! 2. [`Extractor::extract`]: the finished sample sequence -> [`Fingerprint`]
//! 3. [`Matcher::compare`]: candidate vs. enrolled fingerprint -> [`MatchVerdict`]
//!
//! [`VoiceGate`] ties the stages to an injected [`FingerprintStore`] that holds
//! exactly one enrolled fingerprint.
//!
//! # Fingerprint
//!
//! Only samples louder than the silence floor (0.01) contribute:
//!
//! ```text
//! activeSampleCount  how long the speaker was audible
//! averageVolume      mean loudness
//! peakVolume         loudest sample
//! rhythmScore        mean |volume[i] - volume[i-1]|
//! peakCount          strict local maxima above 0.1
//! ```
//!
//! # Matching
//!
//! Four criteria are checked against the reference (duration 30%, volume 30%,
//! rhythm 40% relative; peaks within 2 absolute). At least 3 of 4 must agree.
//! This is a gate-keeping heuristic, not a biometric verifier.

mod capture;
mod error;
mod extractor;
mod fingerprint;
mod gate;
mod matcher;
mod sample;
mod sampler;
pub mod store;

pub use capture::{capture, CaptureConfig, CaptureProgress, CaptureSession, CaptureState};
pub use error::VoicegateError;
pub use extractor::{count_peaks, rhythm_score, Extractor, ExtractorConfig};
pub use fingerprint::Fingerprint;
pub use gate::{Verification, VoiceGate};
pub use matcher::{Criterion, MatchVerdict, Matcher, MatcherConfig};
pub use sample::{frame_volume, Sample};
pub use sampler::{PcmSampler, PcmSamplerConfig, SampleSource, VecSource};
pub use store::{FingerprintStore, MemoryStore, RedbStore, StoreError};
