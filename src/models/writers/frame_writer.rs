//! # Asynchronous HSMS frame writer
//!
//! Egress counterpart of the message stream: serialises messages through
//! the frame encoder and writes the fragment list to any async byte
//! sink — a TCP write half, a pipe, or an in-memory duplex.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::models::encoders::secs::frame_fragments;
use crate::models::frames::header::MessageHeader;
use crate::models::frames::message::SecsMessage;
use crate::models::item::Item;

/// Writes encoded HSMS frames to an `AsyncWrite`.
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Wrap a byte sink.
    pub fn new(inner: W) -> FrameWriter<W> {
        FrameWriter { inner }
    }

    /// Write one frame from an explicit header and optional item tree.
    pub async fn write_data(
        &mut self,
        header: &MessageHeader,
        root: Option<&Item>,
    ) -> io::Result<()> {
        let fragments = frame_fragments(header, root)?;
        for fragment in &fragments {
            self.inner.write_all(fragment).await?;
        }
        Ok(())
    }

    /// Write a data message under the given session identity.
    pub async fn write_message(
        &mut self,
        device_id: u16,
        system_bytes: u32,
        message: &SecsMessage,
    ) -> io::Result<()> {
        let header = MessageHeader::data(
            device_id,
            message.s,
            message.f,
            message.reply_expected,
            system_bytes,
        );
        self.write_data(&header, message.root.as_ref()).await
    }

    /// Write a header-only control frame.
    pub async fn write_control(&mut self, header: &MessageHeader) -> io::Result<()> {
        self.write_data(header, None).await
    }

    /// Flush the underlying sink.
    pub async fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().await
    }

    /// Consume the writer and return the sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
