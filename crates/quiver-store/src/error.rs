use std::path::PathBuf;

use quiver_types::ObjectId;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The object has no metadata record.
    #[error("no record for object {0}")]
    MissingRecord(ObjectId),

    /// A record exists but cannot be decoded.
    #[error("corrupt record for object {id}: {reason}")]
    CorruptRecord { id: ObjectId, reason: String },

    /// A directory under the objects root is not named by an identifier.
    #[error("invalid object directory name: {0:?}")]
    InvalidIdentifier(String),

    /// A field could not be encoded.
    #[error("cannot encode record for object {id}: {reason}")]
    Encode { id: ObjectId, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
