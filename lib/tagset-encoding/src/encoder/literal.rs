use bytes::Bytes;

use super::{TagEncoder, TagEncoderKind, TagEncoderStats};
use crate::buf::ByteBuffer;

/// A tag encoder that writes every tag literally.
///
/// Each group is encoded as its tag count followed by every tag as a length-prefixed string. Groups are fully
/// self-contained: nothing is remembered between calls to [`encode`][TagEncoder::encode], so the encoded size is
/// proportional to the total size of all tags given, regardless of how much they repeat.
///
/// This is the baseline that [`DictionaryTagEncoder`][super::DictionaryTagEncoder] is measured against.
#[derive(Clone, Debug, Default)]
pub struct LiteralTagEncoder {
    buf: ByteBuffer,
    groups: u64,
    tags: u64,
}

impl LiteralTagEncoder {
    /// Creates a new `LiteralTagEncoder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `LiteralTagEncoder` with room for `capacity` bytes of encoded output.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: ByteBuffer::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Consumes the encoder and returns the encoded bytes.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

impl TagEncoder for LiteralTagEncoder {
    fn encode(&mut self, tags: &mut dyn ExactSizeIterator<Item = &str>) {
        let tag_count = tags.len();
        self.buf.put_varint(tag_count as u64);

        let mut written = 0;
        for tag in tags {
            self.buf.put_len_prefixed(tag.as_bytes());
            written += 1;
        }
        debug_assert_eq!(written, tag_count, "tag iterator reported an inaccurate length");

        self.groups += 1;
        self.tags += written as u64;
    }

    fn buffer(&self) -> &[u8] {
        self.buf.as_slice()
    }

    fn kind(&self) -> TagEncoderKind {
        TagEncoderKind::V1
    }

    fn stats(&self) -> TagEncoderStats {
        TagEncoderStats {
            groups: self.groups,
            tags: self.tags,
            literal_tags: self.tags,
            referenced_tags: 0,
            encoded_bytes: self.buf.len(),
            buffer_growths: self.buf.growths(),
        }
    }

    fn into_bytes(self: Box<Self>) -> Bytes {
        self.freeze()
    }
}
