//! # Fieldsync
//! Field-level state synchronization: dirty-tracked value wrappers, a
//! pluggable codec registry, schema fingerprinting for peer compatibility
//! checks, and a handler that turns a registered set of fields into
//! compact, delta-aware snapshots and applies them back.
//!
//! The core never inspects runtime type information. A thin adapter layer
//! (reflection, codegen, or hand-written) describes each object's marked
//! fields as [`FieldBinding`]s and hands them to a [`SyncHandler`];
//! everything after that — fingerprint exchange, serialize, transmit,
//! deserialize — works purely on that declared schema.
//!
//! Handlers are single-threaded by design: every operation is a bounded,
//! synchronous pass over the schema or payload. Transporting the produced
//! byte buffers (framing, checksums, retransmission) is the caller's
//! responsibility.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use fieldsync_serde::{
    zig_zag_decode, zig_zag_encode, BitReader, BitWrite, BitWriter, Serde, SerdeErr,
    UnsignedVariableInteger,
};

mod codec;
mod constraint;
mod error;
mod handler;
mod schema;
mod tracked;
mod value;

pub use codec::{registry::CodecRegistry, Codec, CodecError, SerializerConfig};
pub use constraint::{Constraint, ConstraintViolation};
pub use error::SyncError;
pub use handler::{ConstraintPolicy, SyncHandler, SyncHandlerConfig, SyncObject};
pub use schema::{
    field_descriptor::{
        FieldBinding, FieldDescriptor, FieldStorage, GetFn, ObjectId, OwnerKind, SetFn,
    },
    fingerprint::SchemaFingerprint,
    Schema, SchemaEntry,
};
pub use tracked::{
    diff_mask::DiffMask, diff_tracked::DiffTracked, diff_tracked_array::DiffTrackedArray,
    TrackedSequence, TrackedValue,
};
pub use value::{SyncValue, TypeTag};
