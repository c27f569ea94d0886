//! # Byte Stream Traits
//!
//! Simple trait aliases that let you plug **any async stream of bytes** into this crate.
//!
//! **Why this is useful**
//! - Works with any `futures_core::Stream<Result<_, io::Error>>` (sockets, pipes, in-memory).
//! - No extra layers or boxing—just trait bounds.
//! - The HSMS message stream does not care where its chunks come from.
//!
//! Backpressure and scheduling are handled by your underlying stream.

use futures_core::Stream;
use std::io;

/// Universal trait alias for any asynchronous, chunked byte stream.
///
/// Implemented automatically for any [`Stream`] yielding `Result<Vec<u8>, io::Error>`
/// and supporting `Send` + `Unpin`.
pub trait ByteStream: Stream<Item = Result<Vec<u8>, io::Error>> + Send + Unpin {}

impl<T> ByteStream for T where T: Stream<Item = Result<Vec<u8>, io::Error>> + Send + Unpin {}

/// Generalised trait for any asynchronous, chunked byte stream of the given buffer type `B`.
///
/// This is a pure set of bounds that allows plugging in any compliant `Stream`
/// without dynamic dispatch.
///
/// Implemented for any `Stream<Item = Result<B, io::Error>> + Send + Unpin`.
pub trait GenByteStream<B>: Stream<Item = Result<B, io::Error>> + Send + Unpin {}

impl<T, B> GenByteStream<B> for T where T: Stream<Item = Result<B, io::Error>> + Send + Unpin {}
