use std::collections::HashSet;

use quiver_types::ObjectId;

/// Objects awaiting a flush to storage.
///
/// Insertion-ordered and duplicate-suppressing: staging an object that is
/// already staged is a no-op, so one user action writes each touched object
/// exactly once. There is no capacity limit.
#[derive(Clone, Debug, Default)]
pub struct DirtySet {
    order: Vec<ObjectId>,
    members: HashSet<ObjectId>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an object. Returns `false` if it was already staged.
    pub fn stage(&mut self, id: ObjectId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Staged objects in the order they were first staged.
    pub fn as_slice(&self) -> &[ObjectId] {
        &self.order
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

impl Extend<ObjectId> for DirtySet {
    fn extend<I: IntoIterator<Item = ObjectId>>(&mut self, iter: I) {
        for id in iter {
            self.stage(id);
        }
    }
}
