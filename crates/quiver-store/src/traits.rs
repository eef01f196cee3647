use std::path::Path;

use quiver_types::ObjectId;

use crate::error::StoreResult;
use crate::record::ObjectRecord;

/// Persistent home of a world's objects.
///
/// All implementations must satisfy these rules:
/// - `write` replaces the metadata record unconditionally, and the notes
///   record exists afterwards only if the object has notes.
/// - Writing an unchanged record twice produces identical stored bytes.
/// - `read` fails with [`StoreError::MissingRecord`] when there is no
///   metadata record, but a missing notes record simply means empty notes.
/// - All I/O errors are propagated, never silently ignored or retried.
///
/// [`StoreError::MissingRecord`]: crate::StoreError::MissingRecord
pub trait ObjectStore: Send + Sync {
    /// Identifiers of every stored object, in the backend's native order.
    fn list(&self) -> StoreResult<Vec<ObjectId>>;

    /// Read and decode the records of one object.
    ///
    /// The embedded identifier is returned as stored; it is not compared
    /// against `id`.
    fn read(&self, id: ObjectId) -> StoreResult<ObjectRecord>;

    /// Encode and write the records of one object.
    fn write(&self, record: &ObjectRecord) -> StoreResult<()>;

    /// Check whether an object has a metadata record.
    fn exists(&self, id: ObjectId) -> StoreResult<bool>;

    /// The storage root, for backends that live on disk.
    fn root(&self) -> Option<&Path> {
        None
    }
}
