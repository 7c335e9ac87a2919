pub mod diff_mask;
pub mod diff_tracked;
pub mod diff_tracked_array;

use crate::value::SyncValue;

/// Handler-facing view of a diff-tracked scalar. Object-safe so bindings can
/// hold wrappers of any element type behind one handle.
pub trait TrackedValue {
    fn has_changed(&self) -> bool;

    /// Current value in wire-transportable form.
    fn load(&self) -> SyncValue;

    /// Writes a decoded value through the wrapper's change tracking.
    /// Returns the rejected value when it does not convert to the wrapped
    /// element type.
    fn store(&mut self, value: SyncValue) -> Result<(), SyncValue>;

    fn clear_change_state(&mut self);
}

/// Handler-facing view of a diff-tracked fixed-length sequence.
pub trait TrackedSequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn has_changed(&self) -> bool;

    fn index_changed(&self, index: usize) -> bool;

    fn load(&self, index: usize) -> SyncValue;

    fn store(&mut self, index: usize, value: SyncValue) -> Result<(), SyncValue>;

    fn clear_change_state(&mut self);
}
