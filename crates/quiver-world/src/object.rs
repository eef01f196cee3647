//! The single entity type of the graph.

use quiver_store::ObjectRecord;
use quiver_types::ObjectId;

/// The endpoints of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Morphism {
    /// Source endpoint.
    pub domain: ObjectId,
    /// Target endpoint.
    pub codomain: ObjectId,
}

/// Link payload of an object, including where it was inserted in the
/// adjacency lists of its endpoints.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LinkEnds {
    pub(crate) morphism: Morphism,
    /// Position in `domain.outgoing`.
    pub(crate) outgoing_slot: usize,
    /// Position in `codomain.incoming`.
    pub(crate) incoming_slot: usize,
}

/// A node of the graph, optionally also a link between two other objects.
///
/// Objects are owned by a [`World`](crate::World) and refer to each other
/// by identifier. Name and notes are free to change; link endpoints are set
/// once, through [`World::link`](crate::World::link).
#[derive(Clone, Debug)]
pub struct Object {
    id: ObjectId,
    name: String,
    notes: String,
    pub(crate) link: Option<LinkEnds>,
    /// Links whose domain is this object, in insertion order.
    pub(crate) outgoing: Vec<ObjectId>,
    /// Links whose codomain is this object, in insertion order.
    pub(crate) incoming: Vec<ObjectId>,
}

impl Object {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self {
            id,
            name: String::new(),
            notes: String::new(),
            link: None,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Set the name. Any text is accepted, including the empty string.
    pub fn rename(&mut self, text: impl Into<String>) {
        self.name = text.into();
    }

    /// Set the notes. Any text is accepted, including the empty string.
    pub fn annotate(&mut self, text: impl Into<String>) {
        self.notes = text.into();
    }

    /// Returns `true` if both link endpoints are set.
    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }

    pub fn morphism(&self) -> Option<Morphism> {
        self.link.map(|l| l.morphism)
    }

    pub fn domain(&self) -> Option<ObjectId> {
        self.morphism().map(|m| m.domain)
    }

    pub fn codomain(&self) -> Option<ObjectId> {
        self.morphism().map(|m| m.codomain)
    }

    /// Links leaving this object.
    pub fn outgoing(&self) -> &[ObjectId] {
        &self.outgoing
    }

    /// Links arriving at this object.
    pub fn incoming(&self) -> &[ObjectId] {
        &self.incoming
    }

    pub(crate) fn to_record(&self) -> ObjectRecord {
        let morphism = self.morphism();
        ObjectRecord {
            id: self.id,
            name: self.name.clone(),
            domain: morphism.map_or(ObjectId::null(), |m| m.domain),
            codomain: morphism.map_or(ObjectId::null(), |m| m.codomain),
            notes: self.notes.clone(),
        }
    }
}
