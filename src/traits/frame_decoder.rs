//! # Incremental Stream Decoder
//!
//! Turn an arbitrarily chunked byte stream into **complete protocol
//! messages** while keeping one reusable receive buffer.
//!
//! **Why this is useful**
//! - The transport hands over whatever the socket produced; the decoder
//!   resumes mid-frame without re-parsing.
//! - The decoder owns its buffer, so it can grow, recycle and compact it
//!   to fit the frames actually seen on the wire.
//! - Easy to drive from any IO style: blocking, `mio`, or async.
//!
//! Implement `StreamDecoder` for your wire format; fill `write_buffer()`
//! as chunks arrive and call `decode(written)`. Completed messages are
//! delivered through whatever emission mechanism the implementor defines
//! (this crate's HSMS decoder uses two callbacks).

use crate::error::SecsError;

/// A trait for push-based, resumable frame decoders that own their
/// receive buffer.
///
/// Implement this trait for any wire format that must make partial
/// progress under backpressure, such as length-prefixed binary protocols
/// arriving over TCP.
///
/// ### Contract
/// - `write_buffer` exposes the spare capacity after previously retained
///   bytes; the caller fills a prefix of it and reports the count to
///   `decode`.
/// - `decode` may move or reallocate the buffer, so the slice returned by
///   `write_buffer` is invalidated by every `decode` call.
/// - A short read is not an error: `decode` returns `true` while more
///   bytes are required to finish the frame in progress.
/// - Protocol faults are fatal; after an `Err` the only safe operations
///   are `reset` and drop.
pub trait StreamDecoder {
    /// Spare buffer capacity at the current write position.
    ///
    /// The caller copies incoming bytes into a prefix of this slice, then
    /// reports the byte count to [`decode`](StreamDecoder::decode).
    fn write_buffer(&mut self) -> &mut [u8];

    /// Commit `written` freshly appended bytes and advance decoding as
    /// far as the data permits.
    ///
    /// Returns `Ok(true)` while the frame in progress still needs bytes,
    /// `Ok(false)` when the decoder is at a frame boundary, and `Err` on
    /// a protocol fault (after which the session should be torn down).
    fn decode(&mut self, written: usize) -> Result<bool, SecsError>;

    /// Whether the decoder holds no partial frame and no buffered bytes.
    fn is_idle(&self) -> bool;

    /// Clear all partial-decode state without releasing the buffer.
    fn reset(&mut self);
}
