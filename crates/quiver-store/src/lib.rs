//! Object persistence for Quiver.
//!
//! Each object is stored as its own directory, named by the object's
//! fixed-width hex identifier, under `<root>/o/`:
//!
//! ```text
//! <root>/o/<id-8hex>/.meta   -- "<id-hex>\n<quoted-name>\n<domain-hex>\n<codomain-hex>"
//! <root>/o/<id-8hex>/.notes  -- "<quoted-notes>"   (only when notes are non-empty)
//! ```
//!
//! Quoted fields use JSON string escaping.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- the on-disk layout above
//! - [`InMemoryObjectStore`] -- the same encoded records held in a map, for
//!   tests and embedding
//!
//! # Design Rules
//!
//! 1. The store never interprets records beyond decoding them. Identifier
//!    checks and link resolution belong to the world.
//! 2. Metadata is written before notes. There is no atomicity across the two.
//! 3. All I/O errors are propagated, never retried. A missing notes record is
//!    the only absence that is not an error.

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod record;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::{InMemoryObjectStore, RawRecord};
pub use record::{ObjectRecord, META_FILE, NOTES_FILE};
pub use traits::ObjectStore;
