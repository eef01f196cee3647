//! Error types for the object graph.

use quiver_store::StoreError;
use quiver_types::ObjectId;

/// Recoverable failures of world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No object with this identifier is registered.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// A stored record names a different object than its directory.
    #[error("id mismatch: directory {expected} holds record for {found}")]
    IdMismatch {
        /// Identifier derived from the storage location.
        expected: ObjectId,
        /// Identifier embedded in the record.
        found: ObjectId,
    },

    /// A link record references an endpoint that is not registered.
    #[error("unresolved link end: {domain} or {codomain} in {link}")]
    UnresolvedLink {
        link: ObjectId,
        domain: ObjectId,
        codomain: ObjectId,
    },

    /// Link endpoints are set once; relinking is not supported.
    #[error("object {0} is already a link")]
    AlreadyLinked(ObjectId),

    /// The store holds an object under an identifier the world cannot use:
    /// the null identifier, or the last one, which leaves nothing to allocate.
    #[error("identifier {0} cannot name a stored object")]
    UnusableId(ObjectId),

    /// The identifier is already present in the registry.
    #[error("object {0} is already loaded")]
    AlreadyLoaded(ObjectId),

    /// Failure in the persistence layer.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for world results.
pub type WorldResult<T> = Result<T, WorldError>;

/// A breach of the world's internal consistency.
///
/// These never result from bad input. The world panics when it detects one
/// after a mutation; [`World::verify`](crate::World::verify) reports them
/// without panicking.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("the null identifier cannot name an object")]
    NullId,

    #[error("object {0} is not registered under its own id")]
    Unregistered(ObjectId),

    #[error("object {id} is above the world maximum {max}")]
    AboveMax { id: ObjectId, max: ObjectId },

    #[error("link {link} has unregistered endpoint {endpoint}")]
    DanglingEndpoint { link: ObjectId, endpoint: ObjectId },

    #[error("link {link} is not recorded exactly once among the outgoing links of {domain}")]
    Outgoing { link: ObjectId, domain: ObjectId },

    #[error("link {link} is not recorded exactly once among the incoming links of {codomain}")]
    Incoming { link: ObjectId, codomain: ObjectId },

    #[error("object {object} lists {entry} as adjacent but {entry} is not a link ending there")]
    StrayAdjacency { object: ObjectId, entry: ObjectId },
}
