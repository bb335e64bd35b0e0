//! Redb-backed persistent fingerprint store.

use std::path::Path;

use ::redb::{Database, ReadableTable, TableDefinition};

use super::{decode, encode, FingerprintStore, StoreError, StoreResult};
use crate::Fingerprint;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("voicegate");

/// Key of the single enrolled record.
const RECORD_KEY: &str = "voicePattern";

/// A persistent store backed by redb.
///
/// The fingerprint is kept as a JSON record under a single key, so the
/// file holds at most one enrollment.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = Database::create(path).map_err(|e| StoreError::Storage(e.to_string()))?;

        // Create the table if it doesn't exist
        let tx = db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let _ = tx
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(Self { db })
    }

    /// Writes raw bytes under the record key, bypassing encoding.
    #[cfg(test)]
    fn put_raw(&self, data: &[u8]) -> StoreResult<()> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .insert(RECORD_KEY, data)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))
    }
}

impl FingerprintStore for RedbStore {
    fn load(&self) -> StoreResult<Option<Fingerprint>> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = tx
            .open_table(TABLE)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        match table
            .get(RECORD_KEY)
            .map_err(|e| StoreError::Storage(e.to_string()))?
        {
            Some(value) => decode(value.value()).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, fingerprint: &Fingerprint) -> StoreResult<()> {
        let data = encode(fingerprint)?;
        let tx = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .insert(RECORD_KEY, data.as_slice())
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .remove(RECORD_KEY)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }
}
