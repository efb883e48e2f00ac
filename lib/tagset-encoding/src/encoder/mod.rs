//! Tag encoders.

use std::{fmt, str::FromStr};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod dictionary;
pub use self::dictionary::{DictionaryTagEncoder, LITERAL_MARKER, REFERENCE_MARKER};

mod literal;
pub use self::literal::LiteralTagEncoder;

/// A tag encoder.
///
/// Tag encoders append each group of tags they are given to an internal buffer, which can be read at any point with
/// [`buffer`][TagEncoder::buffer]. An encoder instance represents a single encoding session: any state it keeps between
/// groups, such as a dictionary of previously-seen tags, lives exactly as long as the instance.
///
/// Encoders are not internally synchronized. Sharing one across threads requires external exclusion.
pub trait TagEncoder: Send {
    /// Encodes a group of tags.
    ///
    /// The tag count is taken from [`ExactSizeIterator::len`] and written before the tags themselves, so the iterator
    /// must report its length accurately. Empty groups are valid, and are encoded as a group with a tag count of zero.
    fn encode(&mut self, tags: &mut dyn ExactSizeIterator<Item = &str>);

    /// Returns the bytes encoded so far.
    ///
    /// This is always a valid stream, including before any group has been encoded, in which case it is empty.
    fn buffer(&self) -> &[u8];

    /// Returns the kind of this encoder.
    fn kind(&self) -> TagEncoderKind;

    /// Returns statistics about the groups encoded so far.
    fn stats(&self) -> TagEncoderStats;

    /// Consumes the encoder and returns the encoded bytes, without copying.
    fn into_bytes(self: Box<Self>) -> Bytes;
}

/// Extension methods for [`TagEncoder`].
pub trait TagEncoderExt: TagEncoder {
    /// Encodes a group of tags from a slice.
    fn encode_tags<S>(&mut self, tags: &[S])
    where
        S: AsRef<str>,
    {
        self.encode(&mut tags.iter().map(<S as AsRef<str>>::as_ref));
    }
}

impl<T> TagEncoderExt for T where T: TagEncoder + ?Sized {}

/// Tag encoder implementations.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagEncoderKind {
    /// Literal encoding.
    ///
    /// Every tag of every group is written out in full. See [`LiteralTagEncoder`].
    #[serde(alias = "literal")]
    V1,

    /// Dictionary encoding.
    ///
    /// Each distinct tag is written out in full once, and referred to by index afterwards. See
    /// [`DictionaryTagEncoder`].
    #[default]
    #[serde(alias = "dictionary")]
    V2,
}

impl TagEncoderKind {
    /// Returns the name of this encoder kind, as used in configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl fmt::Display for TagEncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagEncoderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" | "literal" => Ok(Self::V1),
            "v2" | "dictionary" => Ok(Self::V2),
            other => Err(format!("unknown tag encoder kind '{}'", other)),
        }
    }
}

/// Statistics about an encoding session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TagEncoderStats {
    /// Number of groups encoded.
    pub groups: u64,

    /// Number of tags encoded, across all groups.
    pub tags: u64,

    /// Number of tags written out in full.
    ///
    /// For the literal encoder, this is every tag. For the dictionary encoder, this is the number of distinct tags.
    pub literal_tags: u64,

    /// Number of tags written as a reference to a previously written tag.
    pub referenced_tags: u64,

    /// Size of the encoded buffer, in bytes.
    pub encoded_bytes: usize,

    /// Number of times the encoded buffer had to grow.
    pub buffer_growths: usize,
}

/// Creates a new tag encoder of the given kind.
pub fn new_tag_encoder(kind: TagEncoderKind) -> Box<dyn TagEncoder> {
    new_tag_encoder_with_capacity(kind, 0)
}

/// Creates a new tag encoder of the given kind, with room for `capacity` bytes of encoded output.
pub fn new_tag_encoder_with_capacity(kind: TagEncoderKind, capacity: usize) -> Box<dyn TagEncoder> {
    debug!(%kind, capacity, "Creating tag encoder.");

    match kind {
        TagEncoderKind::V1 => Box::new(LiteralTagEncoder::with_capacity(capacity)),
        TagEncoderKind::V2 => Box::new(DictionaryTagEncoder::with_capacity(capacity)),
    }
}
