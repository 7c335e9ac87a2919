//! Built-in codecs for the primitive type tags.
//!
//! Integer compression follows the wire conventions of the handler's delta
//! format: unsigned varints, zig-zag mapping for signed values, and optional
//! fixed-width output under the `no_compress` flag.

use fieldsync_serde::{
    zig_zag_decode, zig_zag_encode, BitReader, BitWrite, Serde, UnsignedVariableInteger,
};

use crate::{
    codec::{Codec, CodecError, SerializerConfig},
    value::SyncValue,
};

fn wrong_type(type_tag: &'static str, value: &SyncValue) -> CodecError {
    CodecError::WrongValueType {
        type_tag,
        value_type: value.type_name(),
    }
}

fn encode_varint(
    raw: i64,
    config: &SerializerConfig,
    writer: &mut dyn BitWrite,
) -> Result<(), CodecError> {
    let encoded = if config.non_negative {
        if raw < 0 {
            return Err(CodecError::NegativeValue { value: raw });
        }
        raw as u64
    } else {
        zig_zag_encode(raw)
    };
    UnsignedVariableInteger::new(encoded).ser(writer);
    Ok(())
}

fn decode_varint(reader: &mut BitReader, config: &SerializerConfig) -> Result<i64, CodecError> {
    let raw = UnsignedVariableInteger::de(reader)?.get();
    if config.non_negative {
        i64::try_from(raw).map_err(|_| CodecError::IntegerOverflow)
    } else {
        Ok(zig_zag_decode(raw))
    }
}

pub(crate) struct BoolCodec;

impl Codec for BoolCodec {
    fn encode(
        &self,
        value: &SyncValue,
        _config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError> {
        let SyncValue::Bool(inner) = value else {
            return Err(wrong_type("bool", value));
        };
        writer.write_bit(*inner);
        Ok(())
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        _config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError> {
        Ok(SyncValue::Bool(reader.read_bit()?))
    }
}

pub(crate) struct ByteCodec;

impl Codec for ByteCodec {
    fn encode(
        &self,
        value: &SyncValue,
        _config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError> {
        let SyncValue::Byte(inner) = value else {
            return Err(wrong_type("byte", value));
        };
        writer.write_byte(*inner);
        Ok(())
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        _config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError> {
        Ok(SyncValue::Byte(reader.read_byte()?))
    }
}

pub(crate) struct ShortCodec;

impl Codec for ShortCodec {
    fn encode(
        &self,
        value: &SyncValue,
        config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError> {
        let SyncValue::Short(inner) = value else {
            return Err(wrong_type("short", value));
        };
        if config.no_compress {
            inner.ser(writer);
            Ok(())
        } else {
            encode_varint(i64::from(*inner), config, writer)
        }
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError> {
        let inner = if config.no_compress {
            i16::de(reader)?
        } else {
            i16::try_from(decode_varint(reader, config)?)
                .map_err(|_| CodecError::IntegerOverflow)?
        };
        Ok(SyncValue::Short(inner))
    }
}

pub(crate) struct IntCodec;

impl Codec for IntCodec {
    fn encode(
        &self,
        value: &SyncValue,
        config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError> {
        let SyncValue::Int(inner) = value else {
            return Err(wrong_type("int", value));
        };
        if config.no_compress {
            inner.ser(writer);
            Ok(())
        } else {
            encode_varint(i64::from(*inner), config, writer)
        }
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError> {
        let inner = if config.no_compress {
            i32::de(reader)?
        } else {
            i32::try_from(decode_varint(reader, config)?)
                .map_err(|_| CodecError::IntegerOverflow)?
        };
        Ok(SyncValue::Int(inner))
    }
}

pub(crate) struct LongCodec;

impl Codec for LongCodec {
    fn encode(
        &self,
        value: &SyncValue,
        config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError> {
        let SyncValue::Long(inner) = value else {
            return Err(wrong_type("long", value));
        };
        if config.no_compress {
            inner.ser(writer);
            Ok(())
        } else {
            encode_varint(*inner, config, writer)
        }
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError> {
        let inner = if config.no_compress {
            i64::de(reader)?
        } else {
            decode_varint(reader, config)?
        };
        Ok(SyncValue::Long(inner))
    }
}

pub(crate) struct FloatCodec;

impl Codec for FloatCodec {
    fn encode(
        &self,
        value: &SyncValue,
        config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError> {
        let SyncValue::Float(inner) = value else {
            return Err(wrong_type("float", value));
        };
        if config.no_compress {
            inner.ser(writer);
        } else {
            let mut bits = inner.to_bits();
            if config.float_endian_swap {
                bits = bits.swap_bytes();
            }
            UnsignedVariableInteger::new(u64::from(bits)).ser(writer);
        }
        Ok(())
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError> {
        let inner = if config.no_compress {
            f32::de(reader)?
        } else {
            let raw = UnsignedVariableInteger::de(reader)?.get();
            let mut bits = u32::try_from(raw).map_err(|_| CodecError::IntegerOverflow)?;
            if config.float_endian_swap {
                bits = bits.swap_bytes();
            }
            f32::from_bits(bits)
        };
        Ok(SyncValue::Float(inner))
    }
}

pub(crate) struct DoubleCodec;

impl Codec for DoubleCodec {
    fn encode(
        &self,
        value: &SyncValue,
        config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError> {
        let SyncValue::Double(inner) = value else {
            return Err(wrong_type("double", value));
        };
        if config.no_compress {
            inner.ser(writer);
        } else {
            let mut bits = inner.to_bits();
            if config.float_endian_swap {
                bits = bits.swap_bytes();
            }
            UnsignedVariableInteger::new(bits).ser(writer);
        }
        Ok(())
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError> {
        let inner = if config.no_compress {
            f64::de(reader)?
        } else {
            let mut bits = UnsignedVariableInteger::de(reader)?.get();
            if config.float_endian_swap {
                bits = bits.swap_bytes();
            }
            f64::from_bits(bits)
        };
        Ok(SyncValue::Double(inner))
    }
}

pub(crate) struct StringCodec;

impl Codec for StringCodec {
    fn encode(
        &self,
        value: &SyncValue,
        _config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError> {
        let SyncValue::String(inner) = value else {
            return Err(wrong_type("string", value));
        };
        UnsignedVariableInteger::new(inner.len() as u64).ser(writer);
        for byte in inner.as_bytes() {
            writer.write_byte(*byte);
        }
        Ok(())
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        _config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError> {
        let bytes = read_length_prefixed(reader)?;
        let inner = String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
        Ok(SyncValue::String(inner))
    }
}

pub(crate) struct BytesCodec;

impl Codec for BytesCodec {
    fn encode(
        &self,
        value: &SyncValue,
        _config: &SerializerConfig,
        writer: &mut dyn BitWrite,
    ) -> Result<(), CodecError> {
        let SyncValue::Bytes(inner) = value else {
            return Err(wrong_type("bytes", value));
        };
        UnsignedVariableInteger::new(inner.len() as u64).ser(writer);
        for byte in inner {
            writer.write_byte(*byte);
        }
        Ok(())
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        _config: &SerializerConfig,
    ) -> Result<SyncValue, CodecError> {
        Ok(SyncValue::Bytes(read_length_prefixed(reader)?))
    }
}

fn read_length_prefixed(reader: &mut BitReader) -> Result<Vec<u8>, CodecError> {
    let length = UnsignedVariableInteger::de(reader)?.get() as usize;
    // An impossible length prefix means a corrupt or truncated stream.
    if length > reader.bytes_remaining() {
        return Err(CodecError::BitStream(fieldsync_serde::SerdeErr));
    }
    let mut bytes = Vec::with_capacity(length);
    for _ in 0..length {
        bytes.push(reader.read_byte()?);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldsync_serde::BitWriter;

    fn round_trip(codec: &dyn Codec, value: SyncValue, config: SerializerConfig) -> SyncValue {
        let mut writer = BitWriter::new();
        codec.encode(&value, &config, &mut writer).unwrap();
        let bytes = writer.to_bytes();
        let mut reader = BitReader::new(&bytes);
        codec.decode(&mut reader, &config).unwrap()
    }

    #[test]
    fn int_round_trips_both_compression_modes() {
        for config in [SerializerConfig::default(), SerializerConfig::no_compress()] {
            for value in [0, 1, -1, i32::MAX, i32::MIN] {
                assert_eq!(
                    round_trip(&IntCodec, SyncValue::Int(value), config),
                    SyncValue::Int(value)
                );
            }
        }
    }

    #[test]
    fn non_negative_flag_rejects_negative_values() {
        let mut writer = BitWriter::new();
        let result = IntCodec.encode(
            &SyncValue::Int(-5),
            &SerializerConfig::non_negative(),
            &mut writer,
        );
        assert_eq!(result, Err(CodecError::NegativeValue { value: -5 }));
    }

    #[test]
    fn non_negative_flag_shrinks_small_values() {
        let mut compressed = BitWriter::new();
        LongCodec
            .encode(
                &SyncValue::Long(100),
                &SerializerConfig::non_negative(),
                &mut compressed,
            )
            .unwrap();
        let mut raw = BitWriter::new();
        LongCodec
            .encode(
                &SyncValue::Long(100),
                &SerializerConfig::no_compress(),
                &mut raw,
            )
            .unwrap();
        assert!(compressed.to_bytes().len() < raw.to_bytes().len());
    }

    #[test]
    fn float_round_trips_with_and_without_endian_swap() {
        let swapped = SerializerConfig::default();
        let unswapped = SerializerConfig {
            float_endian_swap: false,
            ..SerializerConfig::default()
        };
        for config in [swapped, unswapped] {
            for value in [0.0f32, 1.5, -3.25, f32::MAX] {
                assert_eq!(
                    round_trip(&FloatCodec, SyncValue::Float(value), config),
                    SyncValue::Float(value)
                );
            }
        }
    }

    #[test]
    fn string_decode_rejects_invalid_utf8() {
        let mut writer = BitWriter::new();
        BytesCodec
            .encode(
                &SyncValue::Bytes(vec![0xFF, 0xFE]),
                &SerializerConfig::default(),
                &mut writer,
            )
            .unwrap();
        let bytes = writer.to_bytes();
        let mut reader = BitReader::new(&bytes);
        let result = StringCodec.decode(&mut reader, &SerializerConfig::default());
        assert_eq!(result, Err(CodecError::InvalidUtf8));
    }

    #[test]
    fn codec_rejects_mismatched_value_variant() {
        let mut writer = BitWriter::new();
        let result = BoolCodec.encode(
            &SyncValue::Int(1),
            &SerializerConfig::default(),
            &mut writer,
        );
        assert_eq!(
            result,
            Err(CodecError::WrongValueType {
                type_tag: "bool",
                value_type: "int",
            })
        );
    }
}
