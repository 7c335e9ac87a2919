use std::ops::Deref;

use crate::{tracked::TrackedValue, value::SyncValue};

/// Wraps a single value and records whether it changed since the last
/// successful serialize pass.
///
/// Change detection is value-based: storing a value equal to the current one
/// leaves the change flag untouched, so no-op writes never inflate the next
/// delta snapshot. Reading never clears the flag.
#[derive(Debug, Clone)]
pub struct DiffTracked<T> {
    value: T,
    changed: bool,
}

impl<T: PartialEq> DiffTracked<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            changed: false,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.changed |= value != self.value;
        self.value = value;
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn clear_change_state(&mut self) {
        self.changed = false;
    }
}

impl<T> Deref for DiffTracked<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> TrackedValue for DiffTracked<T>
where
    T: Clone + PartialEq + Into<SyncValue> + TryFrom<SyncValue, Error = SyncValue>,
{
    fn has_changed(&self) -> bool {
        self.changed
    }

    fn load(&self) -> SyncValue {
        self.value.clone().into()
    }

    fn store(&mut self, value: SyncValue) -> Result<(), SyncValue> {
        let inner = T::try_from(value)?;
        self.set(inner);
        Ok(())
    }

    fn clear_change_state(&mut self) {
        self.changed = false;
    }
}
