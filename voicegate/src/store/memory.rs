//! In-memory fingerprint store for tests and single-process use.

use std::sync::{Arc, Mutex};

use super::{check, FingerprintStore, StoreError, StoreResult};
use crate::Fingerprint;

/// An in-memory store. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<Fingerprint>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FingerprintStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<Fingerprint>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(*slot)
    }

    fn save(&self, fingerprint: &Fingerprint) -> StoreResult<()> {
        check(fingerprint)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        *slot = Some(*fingerprint);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(active: u32) -> Fingerprint {
        Fingerprint {
            active_sample_count: active,
            average_volume: 0.1,
            peak_volume: 0.2,
            rhythm_score: 0.03,
            peak_count: 4,
        }
    }

    #[test]
    fn test_basic_operations() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save(&fingerprint(40)).unwrap();
        assert_eq!(store.load().unwrap(), Some(fingerprint(40)));

        // Overwrite.
        store.save(&fingerprint(60)).unwrap();
        assert_eq!(store.load().unwrap(), Some(fingerprint(60)));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        // Clearing an empty store is a no-op.
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_invalid_record_refused() {
        let store = MemoryStore::new();
        store.save(&fingerprint(40)).unwrap();

        let mut bad = fingerprint(50);
        bad.average_volume = f64::INFINITY;
        assert!(matches!(store.save(&bad), Err(StoreError::Invalid(_))));

        let mut bad = fingerprint(50);
        bad.average_volume = 0.3;
        assert!(matches!(store.save(&bad), Err(StoreError::Invalid(_))));

        assert_eq!(store.load().unwrap(), Some(fingerprint(40)));
    }

    #[test]
    fn test_clones_share_slot() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.save(&fingerprint(10)).unwrap();
        assert_eq!(b.load().unwrap(), Some(fingerprint(10)));
    }
}
