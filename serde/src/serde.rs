use crate::{
    bit_reader::BitReader,
    bit_writer::BitWrite,
    error::SerdeErr,
    integer::UnsignedVariableInteger,
};

/// A type that can write itself into, and read itself back out of, a bit
/// stream. Implementations must be deterministic: equal values always
/// produce equal bit sequences.
pub trait Serde: Sized {
    fn ser(&self, writer: &mut dyn BitWrite);
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;
}

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }
}

impl Serde for u8 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }
}

macro_rules! impl_serde_int {
    ($($ty:ty),*) => {
        $(
            impl Serde for $ty {
                fn ser(&self, writer: &mut dyn BitWrite) {
                    for byte in self.to_le_bytes() {
                        writer.write_byte(byte);
                    }
                }

                fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                    let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                    for byte in bytes.iter_mut() {
                        *byte = reader.read_byte()?;
                    }
                    Ok(<$ty>::from_le_bytes(bytes))
                }
            }
        )*
    };
}

impl_serde_int!(u16, u32, u64, i8, i16, i32, i64);

impl Serde for f32 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.to_bits().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(f32::from_bits(u32::de(reader)?))
    }
}

impl Serde for f64 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.to_bits().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(f64::from_bits(u64::de(reader)?))
    }
}

impl Serde for String {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::new(self.len() as u64).ser(writer);
        for byte in self.as_bytes() {
            writer.write_byte(*byte);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = UnsignedVariableInteger::de(reader)?.get() as usize;
        if length > reader.bytes_remaining() {
            return Err(SerdeErr);
        }
        let mut bytes = Vec::with_capacity(length);
        for _ in 0..length {
            bytes.push(reader.read_byte()?);
        }
        String::from_utf8(bytes).map_err(|_| SerdeErr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit_writer::BitWriter;

    fn round_trip<T: Serde + PartialEq + std::fmt::Debug>(value: T) {
        let mut writer = BitWriter::new();
        value.ser(&mut writer);
        let bytes = writer.to_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(T::de(&mut reader).unwrap(), value);
    }

    #[test]
    fn primitives_round_trip() {
        round_trip(true);
        round_trip(0xABu8);
        round_trip(-12345i16);
        round_trip(i32::MIN);
        round_trip(u64::MAX);
        round_trip(3.5f32);
        round_trip(-0.25f64);
        round_trip(String::from("fieldsync"));
        round_trip(String::new());
    }

    #[test]
    fn mixed_sequence_round_trips() {
        let mut writer = BitWriter::new();
        true.ser(&mut writer);
        7u8.ser(&mut writer);
        (-3i32).ser(&mut writer);
        String::from("x").ser(&mut writer);
        let bytes = writer.to_bytes();

        let mut reader = BitReader::new(&bytes);
        assert!(bool::de(&mut reader).unwrap());
        assert_eq!(u8::de(&mut reader).unwrap(), 7);
        assert_eq!(i32::de(&mut reader).unwrap(), -3);
        assert_eq!(String::de(&mut reader).unwrap(), "x");
    }

    #[test]
    fn truncated_string_fails() {
        let mut writer = BitWriter::new();
        String::from("hello").ser(&mut writer);
        let mut bytes = writer.to_bytes();
        bytes.truncate(3);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(String::de(&mut reader), Err(SerdeErr));
    }
}
