/// Compact per-index change bitmask backing [`DiffTrackedArray`].
///
/// [`DiffTrackedArray`]: crate::DiffTrackedArray
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffMask {
    bytes: Vec<u8>,
    bits: usize,
}

impl DiffMask {
    pub fn new(bits: usize) -> Self {
        Self {
            bytes: vec![0u8; bits.div_ceil(8)],
            bits,
        }
    }

    pub fn len(&self) -> usize {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Marks one index. O(1).
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_bit(&mut self, index: usize) {
        assert!(index < self.bits, "bit index {index} out of range");
        self.bytes[index >> 3] |= 1 << (index & 7);
    }

    pub fn bit(&self, index: usize) -> bool {
        assert!(index < self.bits, "bit index {index} out of range");
        self.bytes[index >> 3] & (1 << (index & 7)) != 0
    }

    pub fn any_set(&self) -> bool {
        self.bytes.iter().any(|byte| *byte != 0)
    }

    pub fn count_set(&self) -> usize {
        self.bytes.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}
