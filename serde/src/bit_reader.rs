use crate::error::SerdeErr;

/// Cursor over a byte slice that yields bits in the order [`BitWriter`]
/// wrote them: LSB-first within each byte.
///
/// [`BitWriter`]: crate::BitWriter
pub struct BitReader<'b> {
    buffer: &'b [u8],
    byte_index: usize,
    bit_index: u8,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            byte_index: 0,
            bit_index: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.byte_index >= self.buffer.len() {
            return Err(SerdeErr);
        }
        let bit = self.buffer[self.byte_index] & (1 << self.bit_index) != 0;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.byte_index += 1;
        }
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut out = 0u8;
        for i in 0..8 {
            if self.read_bit()? {
                out |= 1 << i;
            }
        }
        Ok(out)
    }

    /// Whole bytes left in the underlying buffer. Used by codecs to reject
    /// length prefixes that cannot possibly be satisfied.
    pub fn bytes_remaining(&self) -> usize {
        self.buffer.len() - self.byte_index
    }
}
