use crate::{
    tracked::{diff_mask::DiffMask, TrackedSequence},
    value::SyncValue,
};

/// Fixed-length sequence with per-index change tracking.
///
/// Marking an index is O(1); a delta snapshot costs one presence bit per
/// slot plus the encodings of only the changed slots. Uses the same
/// value-based change policy as [`DiffTracked`]: writing an equal value to a
/// slot does not mark it.
///
/// [`DiffTracked`]: crate::DiffTracked
#[derive(Debug, Clone)]
pub struct DiffTrackedArray<T> {
    values: Vec<T>,
    change_mask: DiffMask,
}

impl<T: PartialEq> DiffTrackedArray<T> {
    /// Length is fixed at construction; `init` populates each slot by index.
    pub fn new(size: usize, init: impl FnMut(usize) -> T) -> Self {
        Self {
            values: (0..size).map(init).collect(),
            change_mask: DiffMask::new(size),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn get(&self, index: usize) -> &T {
        &self.values[index]
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set(&mut self, index: usize, value: T) {
        if self.values[index] != value {
            self.change_mask.set_bit(index);
        }
        self.values[index] = value;
    }

    pub fn has_changed(&self) -> bool {
        self.change_mask.any_set()
    }

    pub fn index_changed(&self, index: usize) -> bool {
        self.change_mask.bit(index)
    }

    pub fn clear_change_state(&mut self) {
        self.change_mask.clear();
    }
}

impl<T> TrackedSequence for DiffTrackedArray<T>
where
    T: Clone + PartialEq + Into<SyncValue> + TryFrom<SyncValue, Error = SyncValue>,
{
    fn len(&self) -> usize {
        self.values.len()
    }

    fn has_changed(&self) -> bool {
        self.change_mask.any_set()
    }

    fn index_changed(&self, index: usize) -> bool {
        self.change_mask.bit(index)
    }

    fn load(&self, index: usize) -> SyncValue {
        self.values[index].clone().into()
    }

    fn store(&mut self, index: usize, value: SyncValue) -> Result<(), SyncValue> {
        let inner = T::try_from(value)?;
        self.set(index, inner);
        Ok(())
    }

    fn clear_change_state(&mut self) {
        self.change_mask.clear();
    }
}
