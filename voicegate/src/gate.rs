use serde::Serialize;
use tracing::info;

use crate::extractor::Extractor;
use crate::fingerprint::Fingerprint;
use crate::matcher::{MatchVerdict, Matcher};
use crate::sample::Sample;
use crate::store::FingerprintStore;
use crate::VoicegateError;

/// Outcome of [`VoiceGate::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verification {
    /// Fingerprint of the utterance just captured.
    pub candidate: Fingerprint,
    /// The enrolled fingerprint it was compared against.
    pub reference: Fingerprint,
    pub verdict: MatchVerdict,
}

impl Verification {
    /// Reports whether the speaker was let through.
    pub fn accepted(&self) -> bool {
        self.verdict.accepted
    }
}

/// Enrollment and verification over a single stored fingerprint.
///
/// The store is injected, so the same gate runs against [`crate::MemoryStore`]
/// in tests and [`crate::RedbStore`] on disk. Failed extractions never
/// touch the store.
pub struct VoiceGate<S> {
    store: S,
    extractor: Extractor,
    matcher: Matcher,
}

impl<S: FingerprintStore> VoiceGate<S> {
    /// Creates a gate with default extraction and matching rules.
    pub fn new(store: S) -> Self {
        Self::with_parts(store, Extractor::new(), Matcher::new())
    }

    /// Creates a gate with a custom extractor and matcher.
    pub fn with_parts(store: S, extractor: Extractor, matcher: Matcher) -> Self {
        Self {
            store,
            extractor,
            matcher,
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the extractor in use.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Returns the matcher in use.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Extracts a fingerprint and stores it, replacing any previous enrollment.
    pub fn enroll(&self, samples: &[Sample]) -> Result<Fingerprint, VoicegateError> {
        let fp = self.extractor.extract(samples)?;
        self.store.save(&fp)?;
        info!(fingerprint = %fp, "voicegate: voice pattern enrolled");
        Ok(fp)
    }

    /// Extracts a fingerprint and compares it against the enrolled one.
    ///
    /// Fails with [`VoicegateError::NoReferenceEnrolled`] when nothing is
    /// enrolled. A rejected match is not an error; check
    /// [`Verification::accepted`].
    pub fn verify(&self, samples: &[Sample]) -> Result<Verification, VoicegateError> {
        let candidate = self.extractor.extract(samples)?;
        let reference = self
            .store
            .load()?
            .ok_or(VoicegateError::NoReferenceEnrolled)?;
        let verdict = self.matcher.compare(&candidate, &reference);
        info!(
            verdict = %verdict,
            failed = ?verdict.failed_criteria(),
            "voicegate: voice pattern verified"
        );
        Ok(Verification {
            candidate,
            reference,
            verdict,
        })
    }

    /// Compares an already-extracted fingerprint against the enrolled one.
    pub fn verify_fingerprint(&self, candidate: &Fingerprint) -> Result<MatchVerdict, VoicegateError> {
        let reference = self
            .store
            .load()?
            .ok_or(VoicegateError::NoReferenceEnrolled)?;
        Ok(self.matcher.compare(candidate, &reference))
    }

    /// Removes the enrolled fingerprint. Resetting an empty gate is a no-op.
    pub fn reset(&self) -> Result<(), VoicegateError> {
        self.store.clear()?;
        info!("voicegate: voice pattern reset");
        Ok(())
    }

    /// Returns the enrolled fingerprint, if any.
    pub fn reference(&self) -> Result<Option<Fingerprint>, VoicegateError> {
        Ok(self.store.load()?)
    }

    /// Reports whether a fingerprint is enrolled.
    pub fn is_enrolled(&self) -> Result<bool, VoicegateError> {
        Ok(self.store.load()?.is_some())
    }
}
