//! Readers for encoded tag streams.
//!
//! These readers understand the wire format produced by the encoders in this crate, and exist to verify it: they
//! reconstruct the original tag groups from an encoded buffer, borrowing every tag directly from the buffer, and report
//! precisely where a malformed stream goes wrong.
//!
//! Both readers can be driven group by group, or used as iterators of `Result<Vec<&str>, ReadError>`. Iteration stops
//! at the first error.
use snafu::{OptionExt as _, Snafu};

use crate::{
    encoder::{TagEncoderKind, LITERAL_MARKER, REFERENCE_MARKER},
    varint::{decode_varint, MAX_VARINT_LEN},
};

/// A stream read error.
#[derive(Debug, Eq, PartialEq, Snafu)]
#[snafu(context(suffix(false)))]
pub enum ReadError {
    /// The stream ended in the middle of a record.
    #[snafu(display("Unexpected end of stream while reading record at offset {}.", offset))]
    UnexpectedEof {
        /// Offset of the incomplete value.
        offset: usize,
    },

    /// A varint was longer than the maximum encoded length of a 64-bit integer.
    #[snafu(display("Malformed varint at offset {}.", offset))]
    MalformedVarint {
        /// Offset of the malformed varint.
        offset: usize,
    },

    /// A tag was not valid UTF-8.
    #[snafu(display("Tag at offset {} is not valid UTF-8.", offset))]
    InvalidUtf8 {
        /// Offset of the tag bytes.
        offset: usize,
    },

    /// A tag record started with an unknown marker byte.
    #[snafu(display("Unknown tag record marker {:#04x} at offset {}.", marker, offset))]
    UnknownMarker {
        /// The marker byte.
        marker: u8,

        /// Offset of the marker byte.
        offset: usize,
    },

    /// A reference pointed at a dictionary index that had not been defined yet.
    #[snafu(display(
        "Reference to undefined dictionary index {} at offset {} ({} tags defined).",
        index,
        offset,
        defined
    ))]
    DanglingReference {
        /// The referenced index.
        index: u64,

        /// Number of tags defined at the point of the reference.
        defined: usize,

        /// Offset of the reference record.
        offset: usize,
    },
}

/// A single tag record from a dictionary-encoded stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagRecord<'a> {
    /// A tag written out in full, defining the given dictionary index.
    Literal {
        /// Dictionary index assigned to the tag.
        index: usize,

        /// The tag.
        tag: &'a str,
    },

    /// A reference to a previously defined tag.
    Reference {
        /// Dictionary index being referenced.
        index: usize,

        /// The referenced tag.
        tag: &'a str,
    },
}

impl<'a> TagRecord<'a> {
    /// Returns the tag this record resolves to.
    pub const fn tag(&self) -> &'a str {
        match self {
            Self::Literal { tag, .. } | Self::Reference { tag, .. } => *tag,
        }
    }

    /// Returns the dictionary index of this record's tag.
    pub const fn index(&self) -> usize {
        match self {
            Self::Literal { index, .. } | Self::Reference { index, .. } => *index,
        }
    }
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn is_exhausted(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn exhaust(&mut self) {
        self.pos = self.buf.len();
    }

    fn read_u8(&mut self) -> Result<u8, ReadError> {
        let byte = self.buf.get(self.pos).copied().context(UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_varint(&mut self) -> Result<u64, ReadError> {
        let offset = self.pos;
        let remaining = &self.buf[offset..];
        match decode_varint(remaining) {
            Some((value, consumed)) => {
                self.pos += consumed;
                Ok(value)
            }
            None => {
                // Running out of bytes while every byte so far asked for more is a truncated stream, rather than a
                // malformed varint.
                let truncated =
                    remaining.len() < MAX_VARINT_LEN && remaining.iter().all(|byte| byte & 0x80 != 0);
                if truncated {
                    UnexpectedEof { offset }.fail()
                } else {
                    MalformedVarint { offset }.fail()
                }
            }
        }
    }

    fn read_len(&mut self) -> Result<usize, ReadError> {
        let offset = self.pos;
        let len = self.read_varint()?;
        usize::try_from(len).ok().context(UnexpectedEof { offset })
    }

    fn read_str(&mut self) -> Result<&'a str, ReadError> {
        let len = self.read_len()?;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .context(UnexpectedEof { offset: start })?;

        let tag = simdutf8::basic::from_utf8(&self.buf[start..end])
            .ok()
            .context(InvalidUtf8 { offset: start })?;
        self.pos = end;
        Ok(tag)
    }

    fn read_tag_count(&mut self) -> Result<(usize, usize), ReadError> {
        let offset = self.pos;
        let count = self.read_len()?;

        // Every tag record is at least one byte, which bounds how much we should trust the count when preallocating.
        let capacity = count.min(self.remaining());
        if count > 0 && self.is_exhausted() {
            return UnexpectedEof { offset }.fail();
        }
        Ok((count, capacity))
    }
}

/// Reader for streams produced by [`LiteralTagEncoder`][crate::LiteralTagEncoder].
pub struct LiteralReader<'a> {
    cursor: Cursor<'a>,
}

impl<'a> LiteralReader<'a> {
    /// Creates a new `LiteralReader` over the given buffer.
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
        }
    }

    /// Reads the next group of tags.
    ///
    /// Returns `Ok(None)` once the end of the stream has been reached.
    ///
    /// # Errors
    ///
    /// If the stream is truncated, or a tag is not valid UTF-8, an error is returned.
    pub fn next_group(&mut self) -> Result<Option<Vec<&'a str>>, ReadError> {
        if self.cursor.is_exhausted() {
            return Ok(None);
        }

        let (count, capacity) = self.cursor.read_tag_count()?;
        let mut group = Vec::with_capacity(capacity);
        for _ in 0..count {
            group.push(self.cursor.read_str()?);
        }
        Ok(Some(group))
    }
}

impl<'a> Iterator for LiteralReader<'a> {
    type Item = Result<Vec<&'a str>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.next_group();
        if result.is_err() {
            self.cursor.exhaust();
        }
        result.transpose()
    }
}

/// Reader for streams produced by [`DictionaryTagEncoder`][crate::DictionaryTagEncoder].
///
/// The reader rebuilds the encoder's dictionary as it goes, so a reader must consume a stream from its very beginning.
pub struct DictionaryReader<'a> {
    cursor: Cursor<'a>,
    dictionary: Vec<&'a str>,
    references: usize,
}

impl<'a> DictionaryReader<'a> {
    /// Creates a new `DictionaryReader` over the given buffer.
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
            dictionary: Vec::new(),
            references: 0,
        }
    }

    /// Returns the dictionary reconstructed so far, in index order.
    pub fn dictionary(&self) -> &[&'a str] {
        &self.dictionary
    }

    /// Returns the number of literal records read so far.
    pub fn literal_count(&self) -> usize {
        self.dictionary.len()
    }

    /// Returns the number of reference records read so far.
    pub fn reference_count(&self) -> usize {
        self.references
    }

    /// Reads the next group of tags.
    ///
    /// Returns `Ok(None)` once the end of the stream has been reached.
    ///
    /// # Errors
    ///
    /// If the stream is truncated, a tag is not valid UTF-8, a record has an unknown marker, or a reference points at a
    /// tag that has not been defined yet, an error is returned.
    pub fn next_group(&mut self) -> Result<Option<Vec<&'a str>>, ReadError> {
        let records = self.next_group_records()?;
        Ok(records.map(|records| records.iter().map(TagRecord::tag).collect()))
    }

    /// Reads the next group of tags as raw records.
    ///
    /// Returns `Ok(None)` once the end of the stream has been reached.
    ///
    /// # Errors
    ///
    /// See [`next_group`][Self::next_group].
    pub fn next_group_records(&mut self) -> Result<Option<Vec<TagRecord<'a>>>, ReadError> {
        if self.cursor.is_exhausted() {
            return Ok(None);
        }

        let (count, capacity) = self.cursor.read_tag_count()?;
        let mut records = Vec::with_capacity(capacity);
        for _ in 0..count {
            records.push(self.read_record()?);
        }
        Ok(Some(records))
    }

    fn read_record(&mut self) -> Result<TagRecord<'a>, ReadError> {
        let offset = self.cursor.pos;
        match self.cursor.read_u8()? {
            LITERAL_MARKER => {
                let tag = self.cursor.read_str()?;
                let index = self.dictionary.len();
                self.dictionary.push(tag);
                Ok(TagRecord::Literal { index, tag })
            }
            REFERENCE_MARKER => {
                let index = self.cursor.read_varint()?;
                let tag = usize::try_from(index)
                    .ok()
                    .and_then(|index| self.dictionary.get(index).copied())
                    .context(DanglingReference {
                        index,
                        defined: self.dictionary.len(),
                        offset,
                    })?;
                self.references += 1;
                Ok(TagRecord::Reference {
                    index: index as usize,
                    tag,
                })
            }
            marker => UnknownMarker { marker, offset }.fail(),
        }
    }
}

impl<'a> Iterator for DictionaryReader<'a> {
    type Item = Result<Vec<&'a str>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.next_group();
        if result.is_err() {
            self.cursor.exhaust();
        }
        result.transpose()
    }
}

/// Reads every group of tags from a stream produced by an encoder of the given kind.
///
/// # Errors
///
/// If the stream is malformed, an error is returned. See [`LiteralReader::next_group`] and
/// [`DictionaryReader::next_group`] for details.
pub fn read_groups(kind: TagEncoderKind, buf: &[u8]) -> Result<Vec<Vec<&str>>, ReadError> {
    match kind {
        TagEncoderKind::V1 => LiteralReader::new(buf).collect(),
        TagEncoderKind::V2 => DictionaryReader::new(buf).collect(),
    }
}
