use std::fmt;

/// A value in wire-transportable form. Codecs encode and decode these;
/// adapter layers convert between them and the concrete field types they
/// bind (see the `From`/`TryFrom` impls below).
#[derive(Debug, Clone, PartialEq)]
pub enum SyncValue {
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl SyncValue {
    /// Human-readable variant name, used in error reporting.
    pub fn type_name(&self) -> &'static str {
        match self {
            SyncValue::Bool(_) => "bool",
            SyncValue::Byte(_) => "byte",
            SyncValue::Short(_) => "short",
            SyncValue::Int(_) => "int",
            SyncValue::Long(_) => "long",
            SyncValue::Float(_) => "float",
            SyncValue::Double(_) => "double",
            SyncValue::String(_) => "string",
            SyncValue::Bytes(_) => "bytes",
        }
    }
}

/// Declared type of a field, used to select a codec from the registry.
///
/// `Custom` names a codec registered by the caller; all other tags have
/// built-in codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
    Custom(&'static str),
}

impl TypeTag {
    /// Stable identity string; mixed into schema fingerprints, so changing
    /// an identity is a wire-compatibility break.
    pub fn identity(&self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Byte => "byte",
            TypeTag::Short => "short",
            TypeTag::Int => "int",
            TypeTag::Long => "long",
            TypeTag::Float => "float",
            TypeTag::Double => "double",
            TypeTag::String => "string",
            TypeTag::Bytes => "bytes",
            TypeTag::Custom(name) => name,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identity())
    }
}

macro_rules! impl_value_conversion {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for SyncValue {
                fn from(value: $ty) -> Self {
                    SyncValue::$variant(value)
                }
            }

            impl TryFrom<SyncValue> for $ty {
                type Error = SyncValue;

                /// Returns the rejected value unchanged when the variant
                /// does not match.
                fn try_from(value: SyncValue) -> Result<Self, SyncValue> {
                    match value {
                        SyncValue::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_value_conversion!(
    Bool => bool,
    Byte => u8,
    Short => i16,
    Int => i32,
    Long => i64,
    Float => f32,
    Double => f64,
    String => String,
    Bytes => Vec<u8>,
);
