//! # Asynchronous reader byte stream
//!
//! Wraps any `tokio::io::AsyncRead` in a [`Stream`] that yields
//! variable-size byte chunks, up to a configured maximum per poll.
//!
//! ## Use cases
//! - Feed pipes, duplex channels or files into the HSMS message stream.
//! - Integrate non-socket transports into async pipelines.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::io::{AsyncRead, ReadBuf};

use crate::enums::BufferChunkSize;

/// A `Stream` that reads an `AsyncRead` in byte chunks.
pub struct ReaderByteStream<R> {
    /// The wrapped reader.
    reader: R,
    /// End-of-stream flag, prevents further reads after completion.
    eof: bool,
    /// Reusable staging buffer to avoid reallocating per `poll_next`.
    buf: Vec<u8>,
    /// Configured chunk size in bytes.
    chunk_size: usize,
}

impl<R: AsyncRead + Unpin> ReaderByteStream<R> {
    /// Wrap a reader with the given chunk size strategy.
    pub fn new(reader: R, size: BufferChunkSize) -> ReaderByteStream<R> {
        let chunk_size = size.chunk_size();
        ReaderByteStream {
            reader,
            eof: false,
            buf: vec![0u8; chunk_size],
            chunk_size,
        }
    }
}

impl<R: AsyncRead + Unpin> Stream for ReaderByteStream<R> {
    type Item = Result<Vec<u8>, io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let me = self.get_mut();

        if me.eof {
            return Poll::Ready(None);
        }

        let mut read_buf = ReadBuf::new(&mut me.buf[..]);
        match Pin::new(&mut me.reader).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(())) => {
                let n = read_buf.filled().len();
                if n == 0 {
                    me.eof = true;
                    return Poll::Ready(None);
                }
                // Hand the filled buffer to the caller, stage a new one.
                let mut out = std::mem::replace(&mut me.buf, vec![0u8; me.chunk_size]);
                out.truncate(n);
                Poll::Ready(Some(Ok(out)))
            }
            Poll::Ready(Err(e)) => {
                me.eof = true;
                Poll::Ready(Some(Err(e)))
            }
        }
    }
}
