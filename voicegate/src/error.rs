use thiserror::Error;

use crate::capture::CaptureState;
use crate::store::StoreError;

/// Errors returned by voicegate operations.
#[derive(Debug, Error)]
pub enum VoicegateError {
    #[error("recording too short: need at least {min} samples, got {got}")]
    TooShort { min: usize, got: usize },

    #[error("no signal: need at least {min} samples above the silence floor, got {got}")]
    NoSignal { min: usize, got: usize },

    #[error("sample {index} has volume {volume}, expected a finite value in [0, 1]")]
    InvalidSample { index: usize, volume: f64 },

    #[error("no reference fingerprint enrolled")]
    NoReferenceEnrolled,

    #[error("capture is {actual}, expected {expected}")]
    InvalidState {
        expected: CaptureState,
        actual: CaptureState,
    },

    #[error("sample timestamp {got}ms is earlier than previous {previous}ms")]
    OutOfOrder { previous: u64, got: u64 },

    #[error("capture is still active")]
    CaptureActive,

    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VoicegateError {
    /// Reports whether the caller can recover by prompting the user.
    ///
    /// Store failures are the only errors that a retry prompt cannot fix.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Store(_))
    }

    /// Returns a short prompt suitable for showing to the speaker.
    pub fn user_prompt(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "Recording too short. Try again!",
            Self::NoSignal { .. } => "No sound detected. Speak louder!",
            Self::InvalidSample { .. } => "Microphone input was garbled. Try again!",
            Self::NoReferenceEnrolled => "No voice pattern enrolled yet. Enroll first.",
            Self::InvalidState { .. } | Self::OutOfOrder { .. } | Self::CaptureActive => {
                "Capture was interrupted. Try again!"
            }
            Self::InvalidFingerprint(_) => "Voice pattern is unusable. Enroll again.",
            Self::Store(_) => "Voice pattern storage is unavailable.",
        }
    }
}
