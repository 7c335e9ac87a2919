use thiserror::Error;

use crate::{
    codec::CodecError, constraint::ConstraintViolation, schema::field_descriptor::ObjectId,
    value::TypeTag,
};

/// Errors surfaced by [`SyncHandler`](crate::SyncHandler) operations.
///
/// A schema fingerprint mismatch is deliberately not represented here: it is
/// a boolean answer from `do_mismatch_check`, because the caller decides how
/// to react to an incompatible peer.
#[derive(Debug, PartialEq, Error)]
pub enum SyncError {
    /// Object registered twice under the same identity
    #[error("object `{object}` is already registered")]
    DuplicateRegistration { object: ObjectId },

    /// Unregistration of an object that was never registered
    #[error("object `{object}` is not registered")]
    NotRegistered { object: ObjectId },

    /// No codec available for a field's declared type
    #[error("no codec registered for type `{type_tag}`")]
    UnsupportedType { type_tag: TypeTag },

    /// A decoded value violated a field's declared constraint
    #[error(transparent)]
    ConstraintViolation(#[from] ConstraintViolation),

    /// The payload ended before the schema was exhausted
    #[error("payload ended before the schema was exhausted")]
    TruncatedPayload,

    /// Adapter wired a storage handle whose element type does not match the
    /// field's declared type tag
    #[error("field `{field}` is declared as `{expected}` but its storage rejected a {actual} value")]
    ValueTypeMismatch {
        field: String,
        expected: TypeTag,
        actual: &'static str,
    },

    /// A codec failed to encode or decode a field's value
    #[error("codec failure on field `{field}`: {source}")]
    Codec { field: String, source: CodecError },
}
