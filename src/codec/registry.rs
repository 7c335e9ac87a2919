use std::collections::HashMap;

use log::debug;

use crate::{
    codec::{
        primitives::{
            BoolCodec, ByteCodec, BytesCodec, DoubleCodec, FloatCodec, IntCodec, LongCodec,
            ShortCodec, StringCodec,
        },
        Codec,
    },
    value::TypeTag,
};

/// Maps declared type tags to the codecs that read and write them.
///
/// Each [`SyncHandler`] owns its registry, handed in at construction
/// (or defaulted). Replacing codecs while a peer still holds payloads
/// produced by the old codec is a wire-compatibility break the registry
/// cannot detect; callers own that discipline.
///
/// [`SyncHandler`]: crate::SyncHandler
pub struct CodecRegistry {
    codecs: HashMap<TypeTag, Box<dyn Codec>>,
}

impl Default for CodecRegistry {
    /// A registry holding the built-in codecs for every non-`Custom` tag.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(TypeTag::Bool, Box::new(BoolCodec));
        registry.register(TypeTag::Byte, Box::new(ByteCodec));
        registry.register(TypeTag::Short, Box::new(ShortCodec));
        registry.register(TypeTag::Int, Box::new(IntCodec));
        registry.register(TypeTag::Long, Box::new(LongCodec));
        registry.register(TypeTag::Float, Box::new(FloatCodec));
        registry.register(TypeTag::Double, Box::new(DoubleCodec));
        registry.register(TypeTag::String, Box::new(StringCodec));
        registry.register(TypeTag::Bytes, Box::new(BytesCodec));
        registry
    }
}

impl CodecRegistry {
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Adds or replaces the codec for a type tag.
    pub fn register(&mut self, tag: TypeTag, codec: Box<dyn Codec>) {
        debug!("registering codec for type `{tag}`");
        self.codecs.insert(tag, codec);
    }

    pub fn unregister(&mut self, tag: &TypeTag) -> bool {
        self.codecs.remove(tag).is_some()
    }

    pub fn get(&self, tag: &TypeTag) -> Option<&dyn Codec> {
        self.codecs.get(tag).map(Box::as_ref)
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.codecs.contains_key(tag)
    }
}
