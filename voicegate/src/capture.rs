use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sample::Sample;
use crate::sampler::SampleSource;
use crate::VoicegateError;

/// Lifecycle state of a [`CaptureSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No capture in progress.
    Idle,
    /// Samples are being appended.
    Capturing,
    /// Capture ended; the sequence is waiting to be handed off.
    Processing,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Capturing => write!(f, "capturing"),
            Self::Processing => write!(f, "processing"),
        }
    }
}

/// Outcome of [`CaptureSession::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureProgress {
    /// The sample was appended; capture continues.
    Recording,
    /// The time budget is used up; the session is now Processing.
    BudgetElapsed,
}

/// Configuration for [`CaptureSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Wall-clock budget in milliseconds (default: 5000).
    pub max_duration_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_duration_ms: 5000,
        }
    }
}

/// Collects one utterance worth of samples.
///
/// # State Machine
///
/// ```text
/// Idle --start--> Capturing --stop / budget--> Processing --finish--> Idle
/// ```
///
/// The sample buffer is append-only and owned by the session. It is handed
/// off exactly once by [`CaptureSession::finish`], which refuses to run while
/// capture is still active. Stopping early is always safe; the sequence is
/// simply shorter.
#[derive(Debug)]
pub struct CaptureSession {
    cfg: CaptureConfig,
    state: CaptureState,
    started_at: u64,
    samples: Vec<Sample>,
}

impl CaptureSession {
    /// Creates an idle session with the default 5 second budget.
    pub fn new() -> Self {
        Self::with_config(CaptureConfig::default())
    }

    /// Creates an idle session. A zero budget falls back to the default.
    pub fn with_config(cfg: CaptureConfig) -> Self {
        let max_duration_ms = if cfg.max_duration_ms > 0 {
            cfg.max_duration_ms
        } else {
            CaptureConfig::default().max_duration_ms
        };
        Self {
            cfg: CaptureConfig { max_duration_ms },
            state: CaptureState::Idle,
            started_at: 0,
            samples: Vec::new(),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Returns the number of samples collected so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Reports whether no samples have been collected.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Begins a capture whose budget is measured from `started_at` (ms).
    pub fn start(&mut self, started_at: u64) -> Result<(), VoicegateError> {
        self.expect_state(CaptureState::Idle)?;
        self.state = CaptureState::Capturing;
        self.started_at = started_at;
        self.samples.clear();
        debug!(started_at, "voicegate: capture started");
        Ok(())
    }

    /// Appends one sample.
    ///
    /// The first sample at or past the budget is dropped and ends the capture.
    /// Once the budget has elapsed, further pushes are ignored.
    pub fn push(&mut self, sample: Sample) -> Result<CaptureProgress, VoicegateError> {
        match self.state {
            CaptureState::Capturing => {}
            CaptureState::Processing => return Ok(CaptureProgress::BudgetElapsed),
            CaptureState::Idle => {
                return Err(VoicegateError::InvalidState {
                    expected: CaptureState::Capturing,
                    actual: CaptureState::Idle,
                });
            }
        }

        if let Some(last) = self.samples.last() {
            if sample.timestamp < last.timestamp {
                return Err(VoicegateError::OutOfOrder {
                    previous: last.timestamp,
                    got: sample.timestamp,
                });
            }
        }

        let elapsed = sample.timestamp.saturating_sub(self.started_at);
        if elapsed >= self.cfg.max_duration_ms {
            warn!(
                elapsed,
                budget = self.cfg.max_duration_ms,
                "voicegate: capture budget elapsed, dropping sample"
            );
            self.state = CaptureState::Processing;
            return Ok(CaptureProgress::BudgetElapsed);
        }

        self.samples.push(sample);
        Ok(CaptureProgress::Recording)
    }

    /// Ends the capture. Stopping after the budget elapsed is a no-op.
    pub fn stop(&mut self) -> Result<(), VoicegateError> {
        match self.state {
            CaptureState::Capturing => {
                self.state = CaptureState::Processing;
                debug!(samples = self.samples.len(), "voicegate: capture stopped");
                Ok(())
            }
            CaptureState::Processing => Ok(()),
            CaptureState::Idle => Err(VoicegateError::InvalidState {
                expected: CaptureState::Capturing,
                actual: CaptureState::Idle,
            }),
        }
    }

    /// Hands off the complete sequence and returns to Idle.
    pub fn finish(&mut self) -> Result<Vec<Sample>, VoicegateError> {
        if self.state == CaptureState::Capturing {
            return Err(VoicegateError::CaptureActive);
        }
        self.expect_state(CaptureState::Processing)?;
        self.state = CaptureState::Idle;
        Ok(std::mem::take(&mut self.samples))
    }

    /// Abandons the capture, discarding collected samples.
    pub fn cancel(&mut self) {
        self.state = CaptureState::Idle;
        self.samples.clear();
    }

    fn expect_state(&self, expected: CaptureState) -> Result<(), VoicegateError> {
        if self.state != expected {
            return Err(VoicegateError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a full capture from `source`, starting the budget at `started_at`.
///
/// Polls until the source is exhausted or the budget elapses, then hands
/// off the collected sequence.
pub fn capture<S: SampleSource + ?Sized>(
    source: &mut S,
    cfg: CaptureConfig,
    started_at: u64,
) -> Result<Vec<Sample>, VoicegateError> {
    let mut session = CaptureSession::with_config(cfg);
    session.start(started_at)?;
    while let Some(sample) = source.next_sample() {
        if session.push(sample)? == CaptureProgress::BudgetElapsed {
            break;
        }
    }
    session.stop()?;
    session.finish()
}
