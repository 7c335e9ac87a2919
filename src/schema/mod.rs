pub mod field_descriptor;
pub mod fingerprint;

use field_descriptor::{FieldBinding, FieldDescriptor, FieldStorage, ObjectId, OwnerKind};

/// One registered field: its immutable descriptor plus the storage handle
/// it was bound to, and whether it has ever been included in a successful
/// serialize pass (unprimed tracked fields are force-included so the first
/// snapshot is a full one).
#[derive(Debug)]
pub struct SchemaEntry {
    descriptor: FieldDescriptor,
    storage: FieldStorage,
    primed: bool,
}

impl SchemaEntry {
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn storage(&self) -> &FieldStorage {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut FieldStorage {
        &mut self.storage
    }

    pub(crate) fn parts_mut(&mut self) -> (&FieldDescriptor, &mut FieldStorage) {
        (&self.descriptor, &mut self.storage)
    }

    pub(crate) fn primed(&self) -> bool {
        self.primed
    }

    pub(crate) fn set_primed(&mut self) {
        self.primed = true;
    }
}

/// The ordered field registrations owned by one sync handler. Field order
/// is registration order across all registered objects; it is the wire
/// layout, so it must be reproduced identically on both peers.
#[derive(Debug, Default)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
    objects: Vec<ObjectId>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered fields (not objects).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains(id)
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SchemaEntry] {
        &mut self.entries
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.entries.iter().map(SchemaEntry::descriptor)
    }

    /// Appends one object's fields in the order the bindings were supplied.
    /// Caller (the handler) has already validated the bindings; the append
    /// itself cannot fail, which keeps registration all-or-nothing.
    pub(crate) fn append(&mut self, id: ObjectId, kind: OwnerKind, fields: Vec<FieldBinding>) {
        for binding in fields {
            let descriptor = FieldDescriptor::new(
                id.clone(),
                kind,
                binding.name,
                binding.type_tag,
                binding.config,
                binding.constraints,
            );
            self.entries.push(SchemaEntry {
                descriptor,
                storage: binding.storage,
                primed: false,
            });
        }
        self.objects.push(id);
    }

    /// Removes every field registered under `id`. Later fields shift down,
    /// which changes the wire layout and therefore any previously issued
    /// fingerprint.
    pub(crate) fn remove(&mut self, id: &ObjectId) {
        self.entries.retain(|entry| entry.descriptor.owner() != id);
        self.objects.retain(|object| object != id);
    }
}
