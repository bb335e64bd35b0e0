//! Fingerprint store interface and implementations.
//!
//! A store holds at most one enrolled [`Fingerprint`]. Saving replaces the
//! previous record wholesale; clearing an empty store is a no-op. Records
//! are validated on save, so a store never holds a record its own load
//! would reject, and again on load, so a corrupt file never reaches the
//! matcher.

mod memory;
mod redb;

use std::fmt;

use thiserror::Error;

use crate::Fingerprint;

pub use self::memory::MemoryStore;
pub use self::redb::RedbStore;

/// Errors that can occur in fingerprint store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store: storage error: {0}")]
    Storage(String),

    #[error("store: serialization error: {0}")]
    Serialization(String),

    #[error("store: corrupt record: {0}")]
    Corrupt(String),

    #[error("store: refusing invalid record: {0}")]
    Invalid(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persists exactly one fingerprint.
pub trait FingerprintStore: Send + Sync {
    /// Returns the enrolled fingerprint, if any.
    fn load(&self) -> StoreResult<Option<Fingerprint>>;

    /// Replaces the enrolled fingerprint.
    ///
    /// Fails with [`StoreError::Invalid`], leaving the previous record in
    /// place, when the fingerprint does not pass [`Fingerprint::validate`].
    fn save(&self, fingerprint: &Fingerprint) -> StoreResult<()>;

    /// Removes the enrolled fingerprint.
    fn clear(&self) -> StoreResult<()>;
}

impl fmt::Debug for dyn FingerprintStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FingerprintStore {{ ... }}")
    }
}

impl<S: FingerprintStore + ?Sized> FingerprintStore for Box<S> {
    fn load(&self) -> StoreResult<Option<Fingerprint>> {
        (**self).load()
    }

    fn save(&self, fingerprint: &Fingerprint) -> StoreResult<()> {
        (**self).save(fingerprint)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

fn check(fingerprint: &Fingerprint) -> StoreResult<()> {
    fingerprint
        .validate()
        .map_err(|e| StoreError::Invalid(e.to_string()))
}

fn encode(fingerprint: &Fingerprint) -> StoreResult<Vec<u8>> {
    check(fingerprint)?;
    fingerprint
        .to_json()
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode(data: &[u8]) -> StoreResult<Fingerprint> {
    let fp = Fingerprint::from_json(data).map_err(|e| StoreError::Serialization(e.to_string()))?;
    fp.validate().map_err(|e| {
        tracing::warn!(error = %e, "voicegate: stored fingerprint rejected");
        StoreError::Corrupt(e.to_string())
    })?;
    Ok(fp)
}
