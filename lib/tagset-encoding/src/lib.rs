//! Compact binary encoding for groups of tags.
//!
//! Monitored entities, such as processes and containers, each carry a group of tags (`env:prod`, `service:api`, and so
//! on) that has to be shipped alongside their data. In orchestrated environments, most entities share the bulk of their
//! tags, so encoding every group literally wastes most of the payload on repeated bytes.
//!
//! This crate provides two interchangeable encoders behind the [`TagEncoder`] trait:
//!
//! - [`LiteralTagEncoder`] (`v1`), which writes every tag of every group literally.
//! - [`DictionaryTagEncoder`] (`v2`), which writes each distinct tag literally once per encoding session and refers
//!   back to it by index on every later occurrence.
//!
//! Callers pick an implementation with [`new_tag_encoder`] or through [`TagEncoderConfiguration`], encode groups in
//! arrival order, and hand the resulting buffer off to the transport.
//!
//! # Wire format
//!
//! All integers are unsigned LEB128 varints. A stream is a sequence of group records, one per call to
//! [`TagEncoder::encode`], with no header: an encoder that has seen no groups produces an empty buffer.
//!
//! ```text
//! group    := varint(tag_count) tag{tag_count}
//!
//! v1 tag   := varint(len) bytes{len}
//!
//! v2 tag   := 0x00 varint(len) bytes{len}     ; literal, assigns the next dictionary index
//!           | 0x01 varint(index)              ; reference to a previously defined literal
//! ```
//!
//! Dictionary indices start at zero and are assigned in first-seen order over the lifetime of a single encoder.
#![deny(warnings)]
#![deny(missing_docs)]

mod buf;
pub use self::buf::ByteBuffer;

mod config;
pub use self::config::{ConfigurationError, TagEncoderConfiguration};

mod dictionary;
pub use self::dictionary::{Lookup, TagDictionary};

mod encoder;
pub use self::encoder::{
    new_tag_encoder, new_tag_encoder_with_capacity, DictionaryTagEncoder, LiteralTagEncoder, TagEncoder, TagEncoderExt,
    TagEncoderKind, TagEncoderStats, LITERAL_MARKER, REFERENCE_MARKER,
};

pub mod reader;

pub mod varint;
