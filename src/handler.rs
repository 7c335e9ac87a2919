use log::{debug, warn};

use fieldsync_serde::{BitReader, BitWrite, BitWriter};

use crate::{
    codec::{registry::CodecRegistry, Codec, CodecError},
    constraint::ConstraintViolation,
    error::SyncError,
    schema::{
        field_descriptor::{FieldBinding, FieldDescriptor, FieldStorage, ObjectId, OwnerKind},
        fingerprint::{fingerprint_schema, SchemaFingerprint},
        Schema,
    },
    value::SyncValue,
};

/// What a deserialize pass does when a decoded value violates a field's
/// constraint. The violating field's own write is always skipped; the
/// policy only governs the rest of the pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConstraintPolicy {
    /// Return the violation as an error immediately. Fields earlier in the
    /// schema stay applied (there is no rollback); later fields are not
    /// touched.
    #[default]
    Abort,
    /// Keep applying the remaining fields and report all violations to the
    /// caller at the end.
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncHandlerConfig {
    /// Leave field names out of the schema fingerprint, so peers match on
    /// field count, order, types, constraints, and flags alone. Rarely what
    /// you want; exists for renames that must stay wire-compatible.
    pub permissive_mismatch_check: bool,
    pub constraint_policy: ConstraintPolicy,
}

/// Registration input for one object or class: its identity plus the
/// ordered field bindings the discovery layer produced for it.
pub struct SyncObject {
    pub id: ObjectId,
    pub kind: OwnerKind,
    pub fields: Vec<FieldBinding>,
}

impl SyncObject {
    /// An object registration covering instance-scoped fields.
    pub fn instance(id: impl Into<ObjectId>, fields: Vec<FieldBinding>) -> Self {
        Self {
            id: id.into(),
            kind: OwnerKind::Instance,
            fields,
        }
    }

    /// A class registration covering static-scoped fields.
    pub fn static_scope(id: impl Into<ObjectId>, fields: Vec<FieldBinding>) -> Self {
        Self {
            id: id.into(),
            kind: OwnerKind::Static,
            fields,
        }
    }
}

/// Orchestrates registration, schema fingerprinting, and delta snapshot
/// production/application over one schema.
///
/// Designed for single-threaded use: every operation is a synchronous pass
/// bounded by schema and payload size. The first successful `serialize`
/// after a registration emits a full snapshot for the new fields; each one
/// after that emits only what changed.
pub struct SyncHandler {
    schema: Schema,
    registry: CodecRegistry,
    config: SyncHandlerConfig,
}

impl Default for SyncHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncHandler {
    pub fn new() -> Self {
        Self::with_config(SyncHandlerConfig::default())
    }

    pub fn with_config(config: SyncHandlerConfig) -> Self {
        Self::with_registry(CodecRegistry::default(), config)
    }

    /// Builds a handler around an explicit codec registry, for callers that
    /// register custom codecs or share one registry across handlers'
    /// construction.
    pub fn with_registry(registry: CodecRegistry, config: SyncHandlerConfig) -> Self {
        Self {
            schema: Schema::new(),
            registry,
            config,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CodecRegistry {
        &mut self.registry
    }

    /// Appends an object's fields to the schema, in binding order.
    ///
    /// All-or-nothing: every binding is validated against the codec
    /// registry before anything is appended, so a failed registration
    /// leaves the schema untouched.
    pub fn register_sync_object(&mut self, object: SyncObject) -> Result<(), SyncError> {
        if self.schema.contains(&object.id) {
            return Err(SyncError::DuplicateRegistration { object: object.id });
        }
        for binding in &object.fields {
            if !self.registry.contains(&binding.type_tag) {
                return Err(SyncError::UnsupportedType {
                    type_tag: binding.type_tag,
                });
            }
        }
        debug!(
            "registering sync object `{}` with {} field(s)",
            object.id,
            object.fields.len()
        );
        self.schema.append(object.id, object.kind, object.fields);
        Ok(())
    }

    /// Removes an object's fields from the schema. Any fingerprint issued
    /// before the removal no longer describes this handler.
    pub fn unregister_sync_object(&mut self, id: &ObjectId) -> Result<(), SyncError> {
        if !self.schema.contains(id) {
            return Err(SyncError::NotRegistered { object: id.clone() });
        }
        debug!("unregistering sync object `{id}`");
        self.schema.remove(id);
        Ok(())
    }

    /// Digest for the caller to exchange with a remote peer before trusting
    /// its payloads.
    pub fn generate_mismatch_check(&self) -> SchemaFingerprint {
        fingerprint_schema(
            self.schema.descriptors(),
            self.config.permissive_mismatch_check,
        )
    }

    /// Compares a remote peer's fingerprint against this handler's schema.
    /// No side effects beyond the comparison.
    pub fn do_mismatch_check(&self, remote: &[u8]) -> bool {
        let matches = self.generate_mismatch_check().matches(remote);
        if !matches {
            warn!("schema fingerprint mismatch: remote peer holds an incompatible schema");
        }
        matches
    }

    /// Produces a snapshot of the schema in registration order: plain
    /// fields always, tracked fields only when dirty (or not yet included
    /// in any snapshot), each behind a presence bit.
    ///
    /// Change state is cleared only after the whole pass succeeds; a failed
    /// serialize leaves every dirty flag in place so the next attempt loses
    /// nothing.
    pub fn serialize(&mut self) -> Result<Vec<u8>, SyncError> {
        let mut writer = BitWriter::new();

        for entry in self.schema.entries() {
            let descriptor = entry.descriptor();
            let codec = Self::codec_for(&self.registry, descriptor)?;

            match entry.storage() {
                FieldStorage::Plain { get, .. } => {
                    let value = get();
                    codec
                        .encode(&value, descriptor.config(), &mut writer)
                        .map_err(|source| Self::codec_error(descriptor, source))?;
                }
                FieldStorage::Tracked(handle) => {
                    let tracked = handle.borrow();
                    let include = !entry.primed() || tracked.has_changed();
                    writer.write_bit(include);
                    if include {
                        codec
                            .encode(&tracked.load(), descriptor.config(), &mut writer)
                            .map_err(|source| Self::codec_error(descriptor, source))?;
                    }
                }
                FieldStorage::TrackedArray(handle) => {
                    let sequence = handle.borrow();
                    let force = !entry.primed();
                    let include = force || sequence.has_changed();
                    writer.write_bit(include);
                    if include {
                        for index in 0..sequence.len() {
                            let slot = force || sequence.index_changed(index);
                            writer.write_bit(slot);
                            if slot {
                                codec
                                    .encode(&sequence.load(index), descriptor.config(), &mut writer)
                                    .map_err(|source| Self::codec_error(descriptor, source))?;
                            }
                        }
                    }
                }
            }
        }

        for entry in self.schema.entries_mut() {
            entry.set_primed();
            match entry.storage_mut() {
                FieldStorage::Tracked(handle) => handle.borrow_mut().clear_change_state(),
                FieldStorage::TrackedArray(handle) => handle.borrow_mut().clear_change_state(),
                FieldStorage::Plain { .. } => {}
            }
        }

        Ok(writer.to_bytes())
    }

    /// Applies a snapshot produced by a peer holding an equivalent schema
    /// (verify with [`do_mismatch_check`](Self::do_mismatch_check) first —
    /// this call trusts the payload's shape).
    ///
    /// Tracked fields write only the values present in the payload, leaving
    /// untouched slots at their current value, and have their local change
    /// state cleared as they are processed. Applied fields are never rolled
    /// back on a later error. The returned violations are non-empty only
    /// under [`ConstraintPolicy::Skip`].
    pub fn deserialize(&mut self, data: &[u8]) -> Result<Vec<ConstraintViolation>, SyncError> {
        let Self {
            schema,
            registry,
            config,
        } = self;
        let policy = config.constraint_policy;
        let mut reader = BitReader::new(data);
        let mut violations = Vec::new();

        for (index, entry) in schema.entries_mut().iter_mut().enumerate() {
            let (descriptor, storage) = entry.parts_mut();
            let codec = Self::codec_for(registry, descriptor)?;

            match storage {
                FieldStorage::Plain { set, .. } => {
                    let value = Self::decode_field(codec, descriptor, &mut reader)?;
                    if let Some(value) =
                        Self::apply_constraints(descriptor, index, value, policy, &mut violations)?
                    {
                        set(value);
                    }
                }
                FieldStorage::Tracked(handle) => {
                    let present = reader.read_bit().map_err(|_| SyncError::TruncatedPayload)?;
                    if present {
                        let value = Self::decode_field(codec, descriptor, &mut reader)?;
                        if let Some(value) = Self::apply_constraints(
                            descriptor,
                            index,
                            value,
                            policy,
                            &mut violations,
                        )? {
                            handle
                                .borrow_mut()
                                .store(value)
                                .map_err(|rejected| Self::type_mismatch(descriptor, &rejected))?;
                        }
                    }
                    handle.borrow_mut().clear_change_state();
                }
                FieldStorage::TrackedArray(handle) => {
                    let present = reader.read_bit().map_err(|_| SyncError::TruncatedPayload)?;
                    if present {
                        let len = handle.borrow().len();
                        for slot in 0..len {
                            let slot_present =
                                reader.read_bit().map_err(|_| SyncError::TruncatedPayload)?;
                            if !slot_present {
                                continue;
                            }
                            let value = Self::decode_field(codec, descriptor, &mut reader)?;
                            if let Some(value) = Self::apply_constraints(
                                descriptor,
                                index,
                                value,
                                policy,
                                &mut violations,
                            )? {
                                handle
                                    .borrow_mut()
                                    .store(slot, value)
                                    .map_err(|rejected| Self::type_mismatch(descriptor, &rejected))?;
                            }
                        }
                    }
                    handle.borrow_mut().clear_change_state();
                }
            }
        }

        Ok(violations)
    }

    fn codec_for<'r>(
        registry: &'r CodecRegistry,
        descriptor: &FieldDescriptor,
    ) -> Result<&'r dyn Codec, SyncError> {
        registry
            .get(&descriptor.type_tag())
            .ok_or(SyncError::UnsupportedType {
                type_tag: descriptor.type_tag(),
            })
    }

    fn decode_field(
        codec: &dyn Codec,
        descriptor: &FieldDescriptor,
        reader: &mut BitReader,
    ) -> Result<SyncValue, SyncError> {
        codec
            .decode(reader, descriptor.config())
            .map_err(|err| match err {
                CodecError::BitStream(_) => SyncError::TruncatedPayload,
                source => Self::codec_error(descriptor, source),
            })
    }

    /// Checks every declared constraint against a decoded value. Returns
    /// the value for application when all pass; otherwise the field's write
    /// is skipped and the policy decides whether the pass survives.
    fn apply_constraints(
        descriptor: &FieldDescriptor,
        index: usize,
        value: SyncValue,
        policy: ConstraintPolicy,
        violations: &mut Vec<ConstraintViolation>,
    ) -> Result<Option<SyncValue>, SyncError> {
        for constraint in descriptor.constraints() {
            if !constraint.check(&value) {
                let violation = ConstraintViolation {
                    field_index: index,
                    field_name: descriptor.name().to_string(),
                    constraint: *constraint,
                    value,
                };
                return match policy {
                    ConstraintPolicy::Abort => Err(SyncError::ConstraintViolation(violation)),
                    ConstraintPolicy::Skip => {
                        warn!("skipping field write: {violation}");
                        violations.push(violation);
                        Ok(None)
                    }
                };
            }
        }
        Ok(Some(value))
    }

    fn codec_error(descriptor: &FieldDescriptor, source: CodecError) -> SyncError {
        SyncError::Codec {
            field: descriptor.name().to_string(),
            source,
        }
    }

    fn type_mismatch(descriptor: &FieldDescriptor, rejected: &SyncValue) -> SyncError {
        SyncError::ValueTypeMismatch {
            field: descriptor.name().to_string(),
            expected: descriptor.type_tag(),
            actual: rejected.type_name(),
        }
    }
}
