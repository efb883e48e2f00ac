use bytes::Bytes;
use tracing::trace;

use crate::varint::{encode_varint, sizeof_len, MAX_VARINT_LEN};

// Smallest capacity we allocate when growing an empty buffer, so that the first few tiny writes don't each trigger a
// reallocation.
const MIN_NON_ZERO_CAPACITY: usize = 64;

/// An append-only, growable byte buffer.
///
/// `ByteBuffer` is a thin wrapper over `Vec<u8>` that controls its own growth: whenever a write does not fit in the
/// remaining capacity, the capacity is at least doubled. A long sequence of small appends therefore only reallocates
/// a logarithmic number of times, which keeps the amortized cost of each append constant.
///
/// The number of reallocations is tracked and exposed through [`growths`][Self::growths].
#[derive(Clone, Debug, Default)]
pub struct ByteBuffer {
    data: Vec<u8>,
    growths: usize,
}

impl ByteBuffer {
    /// Creates a new, empty `ByteBuffer` without allocating.
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            growths: 0,
        }
    }

    /// Creates a new, empty `ByteBuffer` with at least the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            growths: 0,
        }
    }

    /// Returns the number of bytes written to the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no bytes have been written to the buffer.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the current capacity of the buffer, in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the number of times the buffer has had to grow its backing storage.
    pub fn growths(&self) -> usize {
        self.growths
    }

    /// Returns the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Writes a single byte.
    #[inline]
    pub fn put_u8(&mut self, byte: u8) {
        self.reserve(1);
        self.data.push(byte);
    }

    /// Writes a byte slice as-is.
    #[inline]
    pub fn put_slice(&mut self, src: &[u8]) {
        self.reserve(src.len());
        self.data.extend_from_slice(src);
    }

    /// Writes `v` as a varint.
    #[inline]
    pub fn put_varint(&mut self, v: u64) {
        let mut scratch = [0; MAX_VARINT_LEN];
        let n = encode_varint(v, &mut scratch);
        self.put_slice(&scratch[..n]);
    }

    /// Writes `src` prefixed by its length as a varint.
    #[inline]
    pub fn put_len_prefixed(&mut self, src: &[u8]) {
        // Reserve for the prefix and the payload together so they never straddle a reallocation.
        self.reserve(sizeof_len(src.len()));
        self.put_varint(src.len() as u64);
        self.data.extend_from_slice(src);
    }

    /// Consumes the buffer and returns the written bytes as a [`Bytes`], without copying.
    pub fn freeze(self) -> Bytes {
        Bytes::from(self.data)
    }

    /// Consumes the buffer and returns the underlying vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    fn reserve(&mut self, additional: usize) {
        let required = self.data.len().saturating_add(additional);
        let current_capacity = self.data.capacity();
        if required <= current_capacity {
            return;
        }

        let new_capacity = required
            .max(current_capacity.saturating_mul(2))
            .max(MIN_NON_ZERO_CAPACITY);
        self.data.reserve_exact(new_capacity - self.data.len());
        self.growths += 1;

        trace!(
            previous_capacity = current_capacity,
            new_capacity = self.data.capacity(),
            growths = self.growths,
            "Grew byte buffer."
        );
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<ByteBuffer> for Bytes {
    fn from(buf: ByteBuffer) -> Self {
        buf.freeze()
    }
}
