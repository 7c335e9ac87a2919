use thiserror::Error;

use fieldsync_serde::SerdeErr;

/// Errors raised by codecs while encoding or decoding a single value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A field flagged `non_negative` was asked to encode a negative value
    #[error("value {value} cannot be encoded under the non_negative flag")]
    NegativeValue { value: i64 },

    /// Decoded integer does not fit the field's declared width
    #[error("decoded integer does not fit the declared type width")]
    IntegerOverflow,

    /// Decoded string bytes are not valid UTF-8
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,

    /// The codec was handed a value variant it does not handle
    #[error("codec for `{type_tag}` cannot handle a {value_type} value")]
    WrongValueType {
        type_tag: &'static str,
        value_type: &'static str,
    },

    /// The underlying bit stream ended mid-value
    #[error(transparent)]
    BitStream(#[from] SerdeErr),
}
