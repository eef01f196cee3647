//! The registry of objects for one storage root.
//!
//! [`World`] owns every object by identifier, allocates fresh identifiers,
//! and moves objects between memory and an [`ObjectStore`].
//!
//! # Invariants
//!
//! - Every registered object sits under its own id, and that id lies in
//!   `1..=max`. `max` never decreases.
//! - A link appears exactly once in the outgoing list of its domain and
//!   exactly once in the incoming list of its codomain, at the recorded slots.
//! - Every adjacency entry names a link that ends at the listing object.
//!
//! A violation is a bug in this module, never the result of input, so it
//! panics rather than returning an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use quiver_store::{FsObjectStore, ObjectStore, StoreConfig};
use quiver_types::ObjectId;

use crate::dirty::DirtySet;
use crate::error::{InvariantViolation, WorldError, WorldResult};
use crate::object::{LinkEnds, Morphism, Object};

/// All objects of one storage root.
pub struct World {
    store: Box<dyn ObjectStore>,
    objects: BTreeMap<ObjectId, Object>,
    max: ObjectId,
}

impl World {
    /// An empty world over `store`. Nothing is loaded.
    pub fn new(store: impl ObjectStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            objects: BTreeMap::new(),
            max: ObjectId::null(),
        }
    }

    /// Open the world stored under `root` with the default store layout.
    pub fn open(root: impl Into<PathBuf>) -> WorldResult<Self> {
        Self::open_store(FsObjectStore::new(root))
    }

    /// Open the world stored under `root` with an explicit store layout.
    pub fn open_with_config(root: impl Into<PathBuf>, config: StoreConfig) -> WorldResult<Self> {
        Self::open_store(FsObjectStore::with_config(root, config))
    }

    /// Open a world by loading every object `store` holds.
    ///
    /// Loading runs in two phases: all objects are registered bare first,
    /// then links are resolved in identifier order. The result does not
    /// depend on the order in which the store enumerates objects. The first
    /// failure aborts the whole open.
    pub fn open_store(store: impl ObjectStore + 'static) -> WorldResult<Self> {
        let mut world = Self::new(store);
        world.load_all()?;
        info!(
            objects = world.len(),
            max = %world.max,
            root = ?world.root(),
            "opened world"
        );
        Ok(world)
    }

    fn load_all(&mut self) -> WorldResult<()> {
        let mut ids = self.store.list()?;
        ids.sort_unstable();

        let mut pending = Vec::new();
        for id in ids {
            admit(id)?;
            let record = self.store.read(id)?;
            if record.id != id {
                return Err(WorldError::IdMismatch {
                    expected: id,
                    found: record.id,
                });
            }
            if self.objects.contains_key(&id) {
                return Err(WorldError::AlreadyLoaded(id));
            }
            let obj = self.register(id);
            obj.rename(record.name);
            obj.annotate(record.notes);
            if record.domain.is_null() && record.codomain.is_null() {
                self.check(id);
            } else {
                pending.push((id, record.domain, record.codomain));
            }
            debug!(%id, "registered object");
        }

        for (id, domain, codomain) in pending {
            self.establish_link(id, domain, codomain)?;
        }
        Ok(())
    }

    /// Load a single object from the store.
    ///
    /// Link endpoints are resolved immediately, so both must already be
    /// registered. On any failure the registry is left as it was.
    pub fn load(&mut self, id: ObjectId) -> WorldResult<&Object> {
        admit(id)?;
        if self.objects.contains_key(&id) {
            return Err(WorldError::AlreadyLoaded(id));
        }
        let record = self.store.read(id)?;
        if record.id != id {
            return Err(WorldError::IdMismatch {
                expected: id,
                found: record.id,
            });
        }

        let prev_max = self.max;
        let obj = self.register(id);
        obj.rename(record.name);
        obj.annotate(record.notes);
        if let Err(e) = self.establish_link(id, record.domain, record.codomain) {
            self.objects.remove(&id);
            self.max = prev_max;
            return Err(e);
        }
        self.check(id);
        debug!(%id, "loaded object");
        self.lookup(id)
    }

    fn register(&mut self, id: ObjectId) -> &mut Object {
        if id > self.max {
            self.max = id;
        }
        self.objects.entry(id).or_insert_with(|| Object::new(id))
    }

    // ---------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------

    /// Allocate a fresh plain node with the next identifier.
    ///
    /// The object exists only in memory until it is committed.
    pub fn create_object(&mut self) -> &mut Object {
        let id = self.max.next();
        self.register(id);
        self.check(id);
        debug!(%id, "created object");
        self.objects
            .get_mut(&id)
            .expect("object registered above")
    }

    pub fn lookup(&self, id: ObjectId) -> WorldResult<&Object> {
        self.objects.get(&id).ok_or(WorldError::NotFound(id))
    }

    /// Mutable access, for [`Object::rename`] and [`Object::annotate`].
    pub fn lookup_mut(&mut self, id: ObjectId) -> WorldResult<&mut Object> {
        self.objects.get_mut(&id).ok_or(WorldError::NotFound(id))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Highest identifier in use, or null for a world that never held one.
    pub fn max_id(&self) -> ObjectId {
        self.max
    }

    /// All objects in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    /// The storage root, when the store lives on disk.
    pub fn root(&self) -> Option<&Path> {
        self.store.root()
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    // ---------------------------------------------------------------
    // Linking
    // ---------------------------------------------------------------

    /// Make `link` a directed edge from `domain` to `codomain`.
    ///
    /// `link` is appended to the outgoing list of `domain` and then to the
    /// incoming list of `codomain`. Endpoints are permanent: linking an
    /// object that is already a link fails with
    /// [`WorldError::AlreadyLinked`].
    pub fn link(&mut self, link: ObjectId, domain: ObjectId, codomain: ObjectId) -> WorldResult<()> {
        for id in [link, domain, codomain] {
            if !self.objects.contains_key(&id) {
                return Err(WorldError::NotFound(id));
            }
        }
        if self.objects[&link].is_link() {
            return Err(WorldError::AlreadyLinked(link));
        }
        self.check(link);

        let outgoing_slot = push_slot(&mut self.objects, domain, link, |o| &mut o.outgoing);
        let incoming_slot = push_slot(&mut self.objects, codomain, link, |o| &mut o.incoming);
        if let Some(obj) = self.objects.get_mut(&link) {
            obj.link = Some(LinkEnds {
                morphism: Morphism { domain, codomain },
                outgoing_slot,
                incoming_slot,
            });
        }

        self.check(link);
        debug!(%link, %domain, %codomain, "linked object");
        Ok(())
    }

    /// Resolve endpoint identifiers from a stored record and link.
    ///
    /// Two null endpoints mean a plain node and do nothing. Otherwise both
    /// must name registered objects; a single null endpoint is unresolved.
    pub fn establish_link(
        &mut self,
        link: ObjectId,
        domain: ObjectId,
        codomain: ObjectId,
    ) -> WorldResult<()> {
        if domain.is_null() && codomain.is_null() {
            return Ok(());
        }
        if !self.contains(domain) || !self.contains(codomain) {
            return Err(WorldError::UnresolvedLink {
                link,
                domain,
                codomain,
            });
        }
        self.link(link, domain, codomain)
    }

    /// Create a fresh link object from `from` to `to`, optionally named.
    ///
    /// Both endpoints are checked before anything is allocated.
    pub fn connect(&mut self, from: ObjectId, to: ObjectId, name: Option<&str>) -> WorldResult<ObjectId> {
        for id in [from, to] {
            if !self.contains(id) {
                return Err(WorldError::NotFound(id));
            }
        }
        let obj = self.create_object();
        if let Some(name) = name {
            obj.rename(name);
        }
        let id = obj.id();
        self.link(id, from, to)?;
        Ok(id)
    }

    // ---------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------

    /// Write the given objects to the store, in order.
    ///
    /// Stops at the first failure. Objects written before it stay written;
    /// there is no rollback. Returns the number of objects written.
    pub fn commit(&self, ids: &[ObjectId]) -> WorldResult<usize> {
        for id in ids {
            let obj = self.lookup(*id)?;
            self.check(*id);
            self.store.write(&obj.to_record())?;
        }
        info!(count = ids.len(), "committed objects");
        Ok(ids.len())
    }

    /// Commit everything staged in `dirty`, then clear it.
    ///
    /// On failure the set is left untouched.
    pub fn flush(&self, dirty: &mut DirtySet) -> WorldResult<usize> {
        let written = self.commit(dirty.as_slice())?;
        dirty.clear();
        Ok(written)
    }

    // ---------------------------------------------------------------
    // Invariants
    // ---------------------------------------------------------------

    /// Returns `true` if the object satisfies every world invariant.
    pub fn invariant(&self, id: ObjectId) -> bool {
        self.verify(id).is_ok()
    }

    /// Check one object against the world invariants.
    pub fn verify(&self, id: ObjectId) -> Result<(), InvariantViolation> {
        if id.is_null() {
            return Err(InvariantViolation::NullId);
        }
        let obj = match self.objects.get(&id) {
            Some(obj) if obj.id() == id => obj,
            _ => return Err(InvariantViolation::Unregistered(id)),
        };
        if id > self.max {
            return Err(InvariantViolation::AboveMax { id, max: self.max });
        }

        if let Some(ends) = obj.link {
            let Morphism { domain, codomain } = ends.morphism;
            let dom = self.endpoint(id, domain)?;
            if !recorded_once(&dom.outgoing, ends.outgoing_slot, id) {
                return Err(InvariantViolation::Outgoing { link: id, domain });
            }
            let cod = self.endpoint(id, codomain)?;
            if !recorded_once(&cod.incoming, ends.incoming_slot, id) {
                return Err(InvariantViolation::Incoming { link: id, codomain });
            }
        }

        for entry in &obj.outgoing {
            if self.objects.get(entry).and_then(Object::domain) != Some(id) {
                return Err(InvariantViolation::StrayAdjacency { object: id, entry: *entry });
            }
        }
        for entry in &obj.incoming {
            if self.objects.get(entry).and_then(Object::codomain) != Some(id) {
                return Err(InvariantViolation::StrayAdjacency { object: id, entry: *entry });
            }
        }
        Ok(())
    }

    /// Check every registered object, reporting the first violation.
    pub fn verify_all(&self) -> Result<(), InvariantViolation> {
        self.ids().try_for_each(|id| self.verify(id))
    }

    fn endpoint(&self, link: ObjectId, endpoint: ObjectId) -> Result<&Object, InvariantViolation> {
        self.objects
            .get(&endpoint)
            .ok_or(InvariantViolation::DanglingEndpoint { link, endpoint })
    }

    fn check(&self, id: ObjectId) {
        if let Err(violation) = self.verify(id) {
            panic!("world invariant violated: {violation}");
        }
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("root", &self.root())
            .field("object_count", &self.objects.len())
            .field("max", &self.max)
            .finish()
    }
}

/// Reject identifiers that cannot be registered from storage.
fn admit(id: ObjectId) -> WorldResult<()> {
    if id.is_null() || id.checked_next().is_none() {
        return Err(WorldError::UnusableId(id));
    }
    Ok(())
}

fn push_slot(
    objects: &mut BTreeMap<ObjectId, Object>,
    owner: ObjectId,
    link: ObjectId,
    list: impl FnOnce(&mut Object) -> &mut Vec<ObjectId>,
) -> usize {
    let list = list(objects.get_mut(&owner).expect("endpoint checked by caller"));
    list.push(link);
    list.len() - 1
}

fn recorded_once(list: &[ObjectId], slot: usize, link: ObjectId) -> bool {
    list.get(slot) == Some(&link) && list.iter().filter(|e| **e == link).count() == 1
}
