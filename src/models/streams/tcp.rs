//! # TCP byte stream
//!
//! Chunked `Stream` over the read half of a TCP connection — the inbound
//! leg of an HSMS session. Pair it with
//! [`MessageStream`](crate::models::streams::message_stream::MessageStream)
//! for decoded frames and a
//! [`FrameWriter`](crate::models::writers::frame_writer::FrameWriter) on
//! the write half for the outbound leg.
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! # async fn run() -> std::io::Result<()> {
//! use secstream::enums::BufferChunkSize;
//! use secstream::models::streams::message_stream::MessageStream;
//! use secstream::models::streams::tcp::TcpByteStream;
//!
//! let (bytes, _writer) = TcpByteStream::connect("10.0.0.5:5000", BufferChunkSize::Tcp).await?;
//! let mut frames = MessageStream::new(bytes, 64 * 1024);
//! while let Some(frame) = frames.next().await {
//!     let frame = frame?;
//!     // hand off to the session layer
//! }
//! # Ok(()) }
//! ```

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::enums::BufferChunkSize;

/// Async chunked byte stream over a TCP read half.
pub struct TcpByteStream {
    read_half: OwnedReadHalf,
    eof: bool,
    /// Reusable staging buffer to avoid reallocating per `poll_next`.
    buf: Vec<u8>,
    chunk_size: usize,
}

impl TcpByteStream {
    /// Connect to a remote HSMS endpoint.
    ///
    /// Returns the byte stream over the read half together with the write
    /// half for the outbound frame writer.
    pub async fn connect(
        addr: impl ToSocketAddrs,
        size: BufferChunkSize,
    ) -> io::Result<(TcpByteStream, OwnedWriteHalf)> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();
        Ok((TcpByteStream::from_read_half(read_half, size), write_half))
    }

    /// Wrap an already-split read half (e.g. from an accepted
    /// connection).
    pub fn from_read_half(read_half: OwnedReadHalf, size: BufferChunkSize) -> TcpByteStream {
        let chunk_size = size.chunk_size();
        TcpByteStream {
            read_half,
            eof: false,
            buf: vec![0u8; chunk_size],
            chunk_size,
        }
    }
}

impl Stream for TcpByteStream {
    type Item = Result<Vec<u8>, io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let me = self.get_mut();

        if me.eof {
            return Poll::Ready(None);
        }

        let mut read_buf = ReadBuf::new(&mut me.buf[..]);
        match Pin::new(&mut me.read_half).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(())) => {
                let n = read_buf.filled().len();
                if n == 0 {
                    me.eof = true;
                    return Poll::Ready(None);
                }
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
