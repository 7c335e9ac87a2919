use crate::{
    bit_reader::BitReader,
    bit_writer::BitWrite,
    error::SerdeErr,
    serde::Serde,
};

const CHUNK_BITS: u32 = 7;

/// Variable-length unsigned integer: chunks of 7 data bits, each preceded by
/// a continuation bit. Small values cost a single byte of stream space;
/// 64-bit values degrade gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnsignedVariableInteger {
    value: u64,
}

impl UnsignedVariableInteger {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn get(&self) -> u64 {
        self.value
    }
}

impl Serde for UnsignedVariableInteger {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let mut value = self.value;
        loop {
            let proceed = value >= (1u64 << CHUNK_BITS);
            writer.write_bit(proceed);
            for _ in 0..CHUNK_BITS {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
            if !proceed {
                return;
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut output: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let proceed = reader.read_bit()?;
            let mut chunk: u64 = 0;
            for i in 0..CHUNK_BITS {
                if reader.read_bit()? {
                    chunk |= 1 << i;
                }
            }
            if shift >= u64::BITS {
                return Err(SerdeErr);
            }
            output |= chunk << shift;
            shift += CHUNK_BITS;
            if !proceed {
                return Ok(Self::new(output));
            }
        }
    }
}

/// Maps signed integers onto unsigned ones so that values near zero stay
/// small in either direction: 0, -1, 1, -2, ... become 0, 1, 2, 3, ...
pub fn zig_zag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub fn zig_zag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
