//! The Quiver object graph.
//!
//! A [`World`] owns every [`Object`] loaded from or created against one
//! storage root. Any object can additionally be a link: a directed edge from
//! a domain object to a codomain object. Because links are objects, they can
//! be named, annotated, and linked in turn.
//!
//! Objects refer to each other only by [`ObjectId`], so cyclic structures
//! (including an object linking itself) need no special handling.
//!
//! Mutations are not persisted until the touched objects are staged in a
//! [`DirtySet`] and flushed through [`World::flush`] or [`World::commit`].

pub mod dirty;
pub mod error;
pub mod object;
pub mod render;
pub mod world;

pub use dirty::DirtySet;
pub use error::{InvariantViolation, WorldError, WorldResult};
pub use object::{Morphism, Object};
pub use render::{render, render_raw};
pub use world::World;

pub use quiver_types::ObjectId;
