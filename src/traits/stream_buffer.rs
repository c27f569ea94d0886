//! # Stream Buffer Abstraction
//!
//! Lightweight abstraction over byte buffers for frame-based streaming.
//!
//! ## Purpose
//! Integrate different lower-level byte abstractions (e.g. `Vec<u8>` or
//! third-party buffers) with the frame encoders without coupling the wire
//! format to a concrete container.
//!
//! ## Notes
//! - Implementors must support common `Vec`-like operations: draining, appending,
//!   length queries, and slice access.
//!
//! This module provides trait bounds only; concrete buffers are supplied by callers.

/// Abstraction over a byte buffer for frame-based streaming.
///
/// This trait defines the required interface for buffers produced by the
/// frame encoders and consumed by the IO layers that carry them.
///
/// It is implemented for standard `Vec<u8>`, but can also be implemented
/// for alternative byte buffer types (e.g., Tokio's `BytesMut`), supporting
/// scenarios where the byte-level IO stack is fixed or externally controlled.
///
/// Implementors must support the following standard `Vec` operations:
/// - Draining consumed bytes
/// - Appending new bytes
/// - Querying the current buffer length
/// - Accessing the internal byte slice
pub trait StreamBuffer: AsRef<[u8]> + Default + Extend<u8> + 'static {
    /// Create with given capacity.
    fn with_capacity(n: usize) -> Self;

    /// Reserve additional capacity in the buffer without changing its length.
    fn reserve(&mut self, additional: usize);

    /// Remove the specified range from the front of the buffer.
    fn drain(&mut self, range: std::ops::Range<usize>);

    /// Current length (in bytes).
    fn len(&self) -> usize;

    /// Whether the buffer is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append bytes from a slice.
    fn extend_from_slice(&mut self, data: &[u8]);

    /// Push a single byte to the end of the buffer.
    fn push(&mut self, byte: u8);

    /// Create a buffer from a slice (copies the bytes).
    fn from_slice(data: &[u8]) -> Self;
}

impl StreamBuffer for Vec<u8> {
    #[inline]
    fn with_capacity(n: usize) -> Self {
        Vec::with_capacity(n)
    }

    #[inline]
    fn reserve(&mut self, additional: usize) {
        // Call inherent Vec::reserve to avoid recursion.
        Vec::<u8>::reserve(self, additional);
    }

    #[inline]
    fn drain(&mut self, range: std::ops::Range<usize>) {
        // Call Vec::<T>::drain, ignore the returned Drain iterator.
        Vec::<u8>::drain(self, range);
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::<u8>::len(self)
    }

    #[inline]
    fn extend_from_slice(&mut self, data: &[u8]) {
        Vec::<u8>::extend_from_slice(self, data)
    }

    #[inline]
    fn push(&mut self, byte: u8) {
        Vec::<u8>::push(self, byte)
    }

    #[inline]
    fn from_slice(data: &[u8]) -> Self {
        data.to_vec()
    }
}
