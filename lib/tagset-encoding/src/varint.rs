//! Variable-width integer helpers.
//!
//! Integers are encoded as unsigned LEB128: seven bits of payload per byte, least significant group first, with the
//! high bit set on every byte except the last. This is the same scheme Protocol Buffers uses for its varints, and
//! consumes between one and ten bytes for a `u64`.

/// Maximum number of bytes a varint-encoded `u64` can occupy.
pub const MAX_VARINT_LEN: usize = 10;

/// Computes the encoded size of `v`, in bytes.
pub const fn sizeof_varint(v: u64) -> usize {
    match v {
        0x0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1FFFFF => 3,
        0x200000..=0xFFFFFFF => 4,
        0x10000000..=0x7FFFFFFFF => 5,
        0x0800000000..=0x3FFFFFFFFFF => 6,
        0x040000000000..=0x1FFFFFFFFFFFF => 7,
        0x02000000000000..=0xFFFFFFFFFFFFFF => 8,
        0x0100000000000000..=0x7FFFFFFFFFFFFFFF => 9,
        _ => 10,
    }
}

/// Computes the encoded size of a length-prefixed byte string of length `len`, in bytes.
pub const fn sizeof_len(len: usize) -> usize {
    sizeof_varint(len as u64) + len
}

/// Encodes `v` into `dst`, returning the number of bytes written.
///
/// `dst` must be at least [`MAX_VARINT_LEN`] bytes long, or at least [`sizeof_varint`] bytes for the given value.
#[inline]
pub fn encode_varint(mut v: u64, dst: &mut [u8]) -> usize {
    let mut i = 0;
    while v > 0x7F {
        dst[i] = ((v as u8) & 0x7F) | 0x80;
        v >>= 7;
        i += 1;
    }
    dst[i] = v as u8;
    i + 1
}

/// Decodes a varint from the start of `src`.
///
/// Returns the decoded value and the number of bytes consumed, or `None` if `src` ends before the varint does or the
/// varint does not fit in a `u64`.
pub fn decode_varint(src: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, byte) in src.iter().take(MAX_VARINT_LEN).enumerate() {
        let payload = u64::from(byte & 0x7F);

        // The tenth byte only has room for the single remaining bit of a `u64`.
        if i == MAX_VARINT_LEN - 1 && payload > 1 {
            return None;
        }

        value |= payload << (7 * i);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }

    None
}
