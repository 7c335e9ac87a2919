//! # Fieldsync Serde
//! Bit-level serialization primitives shared by the fieldsync core and any
//! custom codecs layered on top of it.

mod bit_reader;
mod bit_writer;
mod error;
mod integer;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
pub use integer::{zig_zag_decode, zig_zag_encode, UnsignedVariableInteger};
pub use serde::Serde;
