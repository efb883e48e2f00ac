use bytes::Bytes;

use super::{TagEncoder, TagEncoderKind, TagEncoderStats};
use crate::{
    buf::ByteBuffer,
    dictionary::{Lookup, TagDictionary},
};

/// Marker byte preceding a tag written out in full.
pub const LITERAL_MARKER: u8 = 0x00;

/// Marker byte preceding a reference to a previously written tag.
pub const REFERENCE_MARKER: u8 = 0x01;

/// A tag encoder that deduplicates tags across groups.
///
/// The encoder keeps a dictionary of every tag it has written so far. The first time a tag is seen, it is written out
/// in full behind [`LITERAL_MARKER`], and implicitly assigned the next dictionary index. Every later occurrence of that
/// tag, whether in the same group or a later one, is written as [`REFERENCE_MARKER`] followed by its index.
///
/// Duplicates within a group are never collapsed: every occurrence gets its own record, so the original order and
/// multiplicity of each group is preserved exactly.
///
/// The encoded size is therefore proportional to the size of the _distinct_ tags, plus one small reference per
/// occurrence, rather than to the total size of all tags. Indices are written as varints, so the tags seen earliest in
/// a session, which in practice are the ones shared by most entities, have the cheapest references.
///
/// The dictionary is scoped to the encoder instance: two encoders never share indices, and a fresh encoder always
/// starts over from index zero.
#[derive(Debug, Default)]
pub struct DictionaryTagEncoder {
    buf: ByteBuffer,
    dictionary: TagDictionary,
    groups: u64,
    tags: u64,
}

impl DictionaryTagEncoder {
    /// Creates a new `DictionaryTagEncoder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `DictionaryTagEncoder` with room for `capacity` bytes of encoded output.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: ByteBuffer::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Returns a reference to the dictionary of tags seen so far.
    pub fn dictionary(&self) -> &TagDictionary {
        &self.dictionary
    }

    /// Consumes the encoder and returns the encoded bytes.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

impl TagEncoder for DictionaryTagEncoder {
    fn encode(&mut self, tags: &mut dyn ExactSizeIterator<Item = &str>) {
        let tag_count = tags.len();
        self.buf.put_varint(tag_count as u64);

        let mut written = 0;
        for tag in tags {
            match self.dictionary.get_or_insert(tag) {
                Lookup::Existing(index) => {
                    self.buf.put_u8(REFERENCE_MARKER);
                    self.buf.put_varint(index as u64);
                }
                Lookup::Inserted(_) => {
                    self.buf.put_u8(LITERAL_MARKER);
                    self.buf.put_len_prefixed(tag.as_bytes());
                }
            }
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
        TagEncoderKind::V2
    }

    fn stats(&self) -> TagEncoderStats {
        let literal_tags = self.dictionary.len() as u64;
        TagEncoderStats {
            groups: self.groups,
            tags: self.tags,
            literal_tags,
            referenced_tags: self.tags - literal_tags,
            encoded_bytes: self.buf.len(),
            buffer_growths: self.buf.growths(),
        }
    }

    fn into_bytes(self: Box<Self>) -> Bytes {
        self.freeze()
    }
}
