//! Foundation types for Quiver.
//!
//! Quiver is a personal knowledge store in which every entity is an
//! object, and any object may also act as a directed link between two
//! other objects. This crate holds the types shared by every other Quiver
//! crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- strictly positive identifier, rendered as 8-digit hex
//! - [`TypeError`] -- parse failures for the types above

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::ObjectId;
