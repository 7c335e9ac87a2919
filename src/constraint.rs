use std::fmt;

use thiserror::Error;

use crate::value::SyncValue;

/// A declared value constraint, checked against each decoded value before
/// it is written into backing storage. Constraints that do not apply to a
/// value's type (e.g. `NonNegative` on a string) pass trivially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Numeric value must be zero or greater.
    NonNegative,
    /// Float value must not be NaN or infinite.
    Finite,
    /// String or byte payload must not exceed this many bytes.
    MaxLength(u32),
}

impl Constraint {
    /// Stable identity string, mixed into schema fingerprints.
    pub fn identity(&self) -> String {
        match self {
            Constraint::NonNegative => "non_negative".to_string(),
            Constraint::Finite => "finite".to_string(),
            Constraint::MaxLength(limit) => format!("max_length({limit})"),
        }
    }

    pub fn check(&self, value: &SyncValue) -> bool {
        match self {
            Constraint::NonNegative => match value {
                SyncValue::Short(v) => *v >= 0,
                SyncValue::Int(v) => *v >= 0,
                SyncValue::Long(v) => *v >= 0,
                SyncValue::Float(v) => *v >= 0.0,
                SyncValue::Double(v) => *v >= 0.0,
                _ => true,
            },
            Constraint::Finite => match value {
                SyncValue::Float(v) => v.is_finite(),
                SyncValue::Double(v) => v.is_finite(),
                _ => true,
            },
            Constraint::MaxLength(limit) => match value {
                SyncValue::String(v) => v.len() <= *limit as usize,
                SyncValue::Bytes(v) => v.len() <= *limit as usize,
                _ => true,
            },
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}

/// A decoded value violated one of its field's declared constraints. The
/// field's previous value is untouched; whether the surrounding deserialize
/// call aborts or continues is governed by
/// [`ConstraintPolicy`](crate::ConstraintPolicy).
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "field `{field_name}` (schema position {field_index}) rejected {value:?}: violates `{constraint}`"
)]
pub struct ConstraintViolation {
    pub field_index: usize,
    pub field_name: String,
    pub constraint: Constraint,
    pub value: SyncValue,
}
