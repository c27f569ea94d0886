//! # Frame Encoder - **Generic frame encoding infrastructure**
//!
//! ## Purpose
//! For implementing frame encoders over arbitrary byte sinks.
//!
//! A `FrameEncoder` is responsible for serialising a logical frame into a
//! buffer, according to the wire protocol (e.g. length-prefix plus header
//! plus item tree). The encoder writes into a freshly produced buffer and
//! does not retain data.
//!
//! ## Usage
//! - Call `encode(&frame)` to serialise a frame.
//! - The encoder returns the wire bytes; caller sends or stores as required.
//! - Encoders must not retain or mutate the frame after encoding.

use crate::error::SecsError;
use crate::traits::stream_buffer::StreamBuffer;

/// Implement this trait for any wire format requiring message
/// serialisation into caller-chosen buffer types.
///
/// The encoder must only append to the produced buffer and must not retain
/// references or have side-effects to any data passed in.
///
/// ### Safety Contract
/// - The encoder must not mutate the frame being encoded.
/// - The encoder must not retain references to input data after the call.
/// - All writes must be bounded to the produced buffer.
pub trait FrameEncoder {
    /// The type of frame accepted by this encoder.
    type Frame<'a>;

    /// The type of metadata produced by this encoder.
    type Metadata;

    /// Encode a frame, producing both an output buffer and frame metadata.
    ///
    /// Returns an owned buffer containing the encoded frame and the
    /// associated metadata. Returns `Err` if the frame cannot be
    /// represented on the wire.
    fn encode<B: StreamBuffer>(
        frame: &Self::Frame<'_>,
    ) -> Result<(B, Self::Metadata), SecsError>;
}
