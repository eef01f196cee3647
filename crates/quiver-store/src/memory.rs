use std::collections::BTreeMap;
use std::sync::RwLock;

use quiver_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::record::ObjectRecord;
use crate::traits::ObjectStore;

/// Encoded records of one object, exactly as a filesystem store would hold them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRecord {
    pub meta: String,
    pub notes: Option<String>,
}

/// In-memory object store.
///
/// Intended for tests and embedding. Records go through the same codec as
/// [`FsObjectStore`](crate::FsObjectStore) and are kept in their encoded form,
/// so decoding failures can be exercised without touching the disk.
pub struct InMemoryObjectStore {
    records: RwLock<BTreeMap<ObjectId, RawRecord>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }

    /// The encoded records of an object, if present.
    pub fn raw(&self, id: ObjectId) -> Option<RawRecord> {
        self.records.read().expect("lock poisoned").get(&id).cloned()
    }

    /// Insert encoded records directly, bypassing the encoder.
    pub fn put_raw(&self, id: ObjectId, raw: RawRecord) {
        self.records.write().expect("lock poisoned").insert(id, raw);
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn list(&self) -> StoreResult<Vec<ObjectId>> {
        Ok(self
            .records
            .read()
            .expect("lock poisoned")
            .keys()
            .copied()
            .collect())
    }

    fn read(&self, id: ObjectId) -> StoreResult<ObjectRecord> {
        let raw = self.raw(id).ok_or(StoreError::MissingRecord(id))?;
        let mut record = ObjectRecord::decode_meta(id, &raw.meta)?;
        if let Some(notes) = &raw.notes {
            record.notes = ObjectRecord::decode_notes(id, notes)?;
        }
        Ok(record)
    }

    fn write(&self, record: &ObjectRecord) -> StoreResult<()> {
        let raw = RawRecord {
            meta: record.encode_meta()?,
            notes: record.encode_notes()?,
        };
        self.put_raw(record.id, raw);
        Ok(())
    }

    fn exists(&self, id: ObjectId) -> StoreResult<bool> {
        Ok(self
            .records
            .read()
            .expect("lock poisoned")
            .contains_key(&id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}
