pub mod error;
pub mod primitives;
pub mod registry;

pub use error::CodecError;

use fieldsync_serde::{BitReader, BitWrite};

use crate::value::SyncValue;

/// Per-field serializer flags, chosen at field-marking time and threaded
/// through encode and decode identically. Mirrored into the schema
/// fingerprint, so both peers must declare the same flags for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializerConfig {
    /// Write fixed-width raw bits instead of variable-length compression.
    pub no_compress: bool,
    /// Encode integers as unsigned varints without zig-zag. Smaller output
    /// for values known to be non-negative; encoding a negative value under
    /// this flag is a [`CodecError`].
    pub non_negative: bool,
    /// Swap float byte order before varint compression. Tends to move the
    /// information-dense exponent bytes into the low positions.
    pub float_endian_swap: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            no_compress: false,
            non_negative: false,
            float_endian_swap: true,
        }
    }
}

impl SerializerConfig {
    pub fn no_compress() -> Self {
        Self {
            no_compress: true,
            ..Self::default()
        }
    }

    pub fn non_negative() -> Self {
        Self {
            non_negative: true,
            ..Self::default()
        }
    }

    /// Names of the set flags, in a fixed order. Fingerprint input.
    pub fn flag_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.no_compress {
            names.push("no_compress");
        }
        if self.non_negative {
            names.push("non_negative");
        }
        if self.float_endian_swap {
            names.push("float_endian_swap");
        }
        names
    }
}

/// A type-specific encode/decode pair. Implementations must be symmetric:
/// `decode` applied to the output of `encode` under the same config yields
/// the original value.
pub trait Codec {
    fn encode(
        &self,
        value: &SyncValue,
        config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError>;

    fn decode(
        &self,
        reader: &mut BitReader,
        config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError>;
}
