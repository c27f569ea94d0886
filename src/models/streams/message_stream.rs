//! # Asynchronous HSMS message stream
//!
//! Adapter that turns any chunked byte source into a stream of decoded
//! [`HsmsFrame`]s.
//!
//! # Purpose
//! - Converts a raw byte stream (arbitrary-sized chunks, possibly partial
//!   frames) into a clean stream of protocol-level messages.
//!
//! # Mechanism
//! - Owns a [`SecsDecoder`] whose callbacks push completed frames onto an
//!   internal queue — the standard wiring for the synchronous emission
//!   model, keeping the callbacks free of socket work.
//! - `poll_next` drains the queue first; only when it is empty does it
//!   poll the underlying source and feed the chunk through the decoder.
//! - Protocol faults and truncated frames at end-of-stream yield an error.
//!
//! # Invariants
//! - Frames are yielded in wire order.
//! - On `Poll::Ready(None)` from the source, residual mid-frame bytes are
//!   reported as `UnexpectedEof`.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::error::SecsError;
use crate::models::decoders::secs::SecsDecoder;
use crate::models::frames::message::HsmsFrame;
use crate::traits::byte_stream::GenByteStream;

type FrameQueue = Arc<Mutex<VecDeque<HsmsFrame>>>;

fn push_frame(queue: &FrameQueue, frame: HsmsFrame) {
    queue
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .push_back(frame);
}

/// Asynchronous stream of decoded HSMS frames over any byte source.
///
/// Construct via [`MessageStream::new`] and poll as a
/// `Stream<Item = io::Result<HsmsFrame>>`.
pub struct MessageStream<S> {
    /// The underlying byte source.
    inner: S,
    /// The stateful incremental decoder.
    decoder: SecsDecoder,
    /// Frames decoded but not yet yielded.
    queue: FrameQueue,
}

impl<S> MessageStream<S>
where
    S: GenByteStream<Vec<u8>>,
{
    /// Create a message stream with the given initial decode buffer
    /// capacity (4096 or more recommended).
    pub fn new(inner: S, initial_capacity: usize) -> MessageStream<S> {
        let queue: FrameQueue = Arc::new(Mutex::new(VecDeque::new()));
        let control_queue = Arc::clone(&queue);
        let data_queue = Arc::clone(&queue);
        let decoder = SecsDecoder::new(
            initial_capacity,
            move |header| push_frame(&control_queue, HsmsFrame::Control(header)),
            move |header, message| push_frame(&data_queue, HsmsFrame::Data(header, message)),
        );
        MessageStream {
            inner,
            decoder,
            queue,
        }
    }

    /// Consume the adapter and return the underlying byte source.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn pop_frame(&mut self) -> Option<HsmsFrame> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    /// Run one chunk through the decoder, piecewise when the chunk is
    /// larger than the decoder's spare capacity.
    fn feed(&mut self, chunk: &[u8]) -> Result<(), SecsError> {
        let mut offset = 0;
        while offset < chunk.len() {
            let spare = self.decoder.write_buffer();
            let n = spare.len().min(chunk.len() - offset);
            spare[..n].copy_from_slice(&chunk[offset..offset + n]);
            self.decoder.decode(n)?;
            offset += n;
        }
        Ok(())
    }
}

impl<S> Stream for MessageStream<S>
where
    S: GenByteStream<Vec<u8>>,
{
    type Item = io::Result<HsmsFrame>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let me = self.get_mut();

        loop {
            if let Some(frame) = me.pop_frame() {
                return Poll::Ready(Some(Ok(frame)));
            }

            match Pin::new(&mut me.inner).poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => {
                    if let Err(e) = me.feed(&chunk) {
                        return Poll::Ready(Some(Err(e.into())));
                    }
                    // Retry the queue with the newly decoded frames.
                }
                Poll::Ready(Some(Err(e))) => return Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => {
                    if me.decoder.is_idle() {
                        return Poll::Ready(None);
                    }
                    return Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "truncated frame at end of stream",
                    ))));
                }
            }
        }
    }
}
