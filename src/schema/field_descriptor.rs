use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    codec::SerializerConfig,
    constraint::Constraint,
    tracked::{TrackedSequence, TrackedValue},
    value::{SyncValue, TypeTag},
};

/// Caller-chosen stable identity for a registered object or class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a registration covers an instance's fields or a class's
/// static-scoped fields. Both kinds may coexist in one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Instance,
    Static,
}

impl OwnerKind {
    /// Stable identity string, mixed into schema fingerprints.
    pub fn identity(&self) -> &'static str {
        match self {
            OwnerKind::Instance => "instance",
            OwnerKind::Static => "static",
        }
    }
}

pub type GetFn = Box<dyn Fn() -> SyncValue>;
pub type SetFn = Box<dyn FnMut(SyncValue)>;

/// How the handler reaches a field's backing storage.
///
/// `Plain` fields have no change tracking and are included in every
/// snapshot; the tracked variants share the wrapper with the owning object
/// through an `Rc<RefCell<..>>` handle and are included only when dirty.
pub enum FieldStorage {
    Plain { get: GetFn, set: SetFn },
    Tracked(Rc<RefCell<dyn TrackedValue>>),
    TrackedArray(Rc<RefCell<dyn TrackedSequence>>),
}

impl fmt::Debug for FieldStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldStorage::Plain { .. } => f.write_str("Plain"),
            FieldStorage::Tracked(_) => f.write_str("Tracked"),
            FieldStorage::TrackedArray(_) => f.write_str("TrackedArray"),
        }
    }
}

/// One marked field as produced by the discovery layer: name, declared
/// type, serializer flags, declared constraints, and a way to reach the
/// backing storage. Registration input only; the schema turns bindings
/// into immutable [`FieldDescriptor`]s.
pub struct FieldBinding {
    pub name: String,
    pub type_tag: TypeTag,
    pub config: SerializerConfig,
    pub constraints: Vec<Constraint>,
    pub storage: FieldStorage,
}

impl FieldBinding {
    pub fn plain(name: impl Into<String>, type_tag: TypeTag, get: GetFn, set: SetFn) -> Self {
        Self {
            name: name.into(),
            type_tag,
            config: SerializerConfig::default(),
            constraints: Vec::new(),
            storage: FieldStorage::Plain { get, set },
        }
    }

    pub fn tracked(
        name: impl Into<String>,
        type_tag: TypeTag,
        handle: Rc<RefCell<dyn TrackedValue>>,
    ) -> Self {
        Self {
            name: name.into(),
            type_tag,
            config: SerializerConfig::default(),
            constraints: Vec::new(),
            storage: FieldStorage::Tracked(handle),
        }
    }

    pub fn tracked_array(
        name: impl Into<String>,
        type_tag: TypeTag,
        handle: Rc<RefCell<dyn TrackedSequence>>,
    ) -> Self {
        Self {
            name: name.into(),
            type_tag,
            config: SerializerConfig::default(),
            constraints: Vec::new(),
            storage: FieldStorage::TrackedArray(handle),
        }
    }

    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Declarative description of one registered field. Immutable after
/// registration; a field's wire identity is its schema position, not its
/// name.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    owner: ObjectId,
    owner_kind: OwnerKind,
    name: String,
    type_tag: TypeTag,
    config: SerializerConfig,
    constraints: Vec<Constraint>,
}

impl FieldDescriptor {
    pub(crate) fn new(
        owner: ObjectId,
        owner_kind: OwnerKind,
        name: String,
        type_tag: TypeTag,
        config: SerializerConfig,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            owner,
            owner_kind,
            name,
            type_tag,
            config,
            constraints,
        }
    }

    pub fn owner(&self) -> &ObjectId {
        &self.owner
    }

    pub fn owner_kind(&self) -> OwnerKind {
        self.owner_kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}
