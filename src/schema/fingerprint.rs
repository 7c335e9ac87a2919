use sha2::{Digest, Sha256};

use crate::schema::field_descriptor::FieldDescriptor;

/// Digest over a schema's field count, order, names, types, constraints,
/// and serializer flags. Two peers whose fingerprints are equal can safely
/// exchange snapshots; anything else silently corrupts state, which is why
/// the check exists.
///
/// Opaque: equality comparison is the only supported operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFingerprint(Vec<u8>);

impl SchemaFingerprint {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn matches(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

/// Folds the descriptors in schema order into a SHA-256 digest. Each field
/// contributes a braced record of its identifying properties; `permissive`
/// leaves field names out, so schemas match on shape and types alone.
pub(crate) fn fingerprint_schema<'a>(
    descriptors: impl Iterator<Item = &'a FieldDescriptor>,
    permissive: bool,
) -> SchemaFingerprint {
    let mut hasher = Sha256::new();
    for descriptor in descriptors {
        hasher.update(b"{");
        if !permissive {
            hasher.update(descriptor.name().as_bytes());
            hasher.update(b":");
        }
        hasher.update(descriptor.owner_kind().identity().as_bytes());
        hasher.update(b":");
        hasher.update(descriptor.type_tag().identity().as_bytes());
        for constraint in descriptor.constraints() {
            hasher.update(b":");
            hasher.update(constraint.identity().as_bytes());
        }
        for flag in descriptor.config().flag_names() {
            hasher.update(b":");
            hasher.update(flag.as_bytes());
        }
        hasher.update(b"}");
    }
    SchemaFingerprint(hasher.finalize().to_vec())
}
