//! # Incremental HSMS frame decoder
//!
//! Converts a raw inbound byte stream (arbitrary-sized chunks, possibly
//! partial frames) into decoded SECS-II messages while owning and
//! recycling a single receive buffer.
//!
//! ## Mechanism
//! The decoder is a five-stage pipeline — frame length, header, item
//! format byte, item length, item payload — retained across `decode`
//! calls, so a frame split at any byte boundary resumes exactly where the
//! previous chunk ended. Completed frames are delivered synchronously
//! through two callbacks: one for session-control headers, one for data
//! messages.
//!
//! ## Buffer management
//! External IO writes into [`write_buffer`](SecsDecoder::write_buffer)
//! and reports the byte count to [`decode`](SecsDecoder::decode). After
//! each call the decoder rebalances: a fully drained buffer rewinds to
//! offset 0; a buffer holding a partial frame is compacted in place or
//! regrown when the bytes still owed would not fit. Steady-state decoding
//! of a session therefore settles into a buffer sized to the frames the
//! peer actually sends.
//!
//! ## Invariants
//! - `decode_index <= write_offset <= buffer.len()` at all times.
//! - Between calls, `[decode_index, write_offset)` holds the valid
//!   unconsumed input.
//! - `message_data_length` is the byte count still owed on the current
//!   frame, zero between frames.
//! - The list-builder stack is empty between frames.
//!
//! Callbacks must not re-enter `decode` on the same instance and should
//! hand messages off (typically to a queue) rather than block the reader.

use crate::constants::{HEADER_LEN, LENGTH_PREFIX_LEN, MAX_LIST_LEN};
use crate::enums::{DecodeStep, SecsFormat};
use crate::error::SecsError;
use crate::models::decoders::item::{decode_item, decode_payload, ListBuilder};
use crate::models::frames::header::MessageHeader;
use crate::models::frames::message::SecsMessage;
use crate::models::item::Item;
use crate::traits::frame_decoder::StreamDecoder;
use crate::utils::{be_u32, be_uint};

/// Callback invoked for each session-control frame.
pub type ControlHandler = Box<dyn FnMut(MessageHeader) + Send>;

/// Callback invoked for each data message.
pub type DataHandler = Box<dyn FnMut(MessageHeader, SecsMessage) + Send>;

/// Pipelined SECS-II/HSMS stream decoder.
///
/// One instance per peer connection; the session reader owns it, fills
/// its buffer, and calls [`decode`](SecsDecoder::decode). No internal
/// locking.
pub struct SecsDecoder {
    buffer: Vec<u8>,
    write_offset: usize,
    decode_index: usize,
    previous_remained: usize,
    step: DecodeStep,
    /// Bytes still owed on the current frame; excludes the length prefix
    /// and counts down as header, item headers and payloads are consumed.
    message_data_length: usize,
    header: MessageHeader,
    format: SecsFormat,
    length_bits: usize,
    item_length: usize,
    stack: Vec<ListBuilder>,
    on_control: ControlHandler,
    on_data: DataHandler,
}

impl SecsDecoder {
    /// Create a decoder with the given initial buffer size (4096 or more
    /// recommended) and the two emission callbacks.
    pub fn new(
        initial_buffer_bytes: usize,
        on_control: impl FnMut(MessageHeader) + Send + 'static,
        on_data: impl FnMut(MessageHeader, SecsMessage) + Send + 'static,
    ) -> SecsDecoder {
        SecsDecoder {
            buffer: vec![0u8; initial_buffer_bytes.max(LENGTH_PREFIX_LEN)],
            write_offset: 0,
            decode_index: 0,
            previous_remained: 0,
            step: DecodeStep::FrameLength,
            message_data_length: 0,
            header: MessageHeader::default(),
            format: SecsFormat::List,
            length_bits: 0,
            item_length: 0,
            stack: Vec::new(),
            on_control: Box::new(on_control),
            on_data: Box::new(on_data),
        }
    }

    /// Spare buffer capacity at the current write position.
    ///
    /// Invalidated by every `decode` call, which may move or regrow the
    /// buffer.
    pub fn write_buffer(&mut self) -> &mut [u8] {
        &mut self.buffer[self.write_offset..]
    }

    /// Current receive buffer capacity in bytes.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the decoder holds no partial frame and no buffered bytes.
    pub fn is_idle(&self) -> bool {
        self.step == DecodeStep::FrameLength
            && self.previous_remained == 0
            && self.message_data_length == 0
            && self.stack.is_empty()
    }

    /// Clear all partial-decode state without releasing the buffer.
    pub fn reset(&mut self) {
        self.write_offset = 0;
        self.decode_index = 0;
        self.previous_remained = 0;
        self.step = DecodeStep::FrameLength;
        self.message_data_length = 0;
        self.stack.clear();
    }

    /// Commit `written` bytes appended via `write_buffer` and decode as
    /// far as the data permits, emitting every completed frame.
    ///
    /// Returns `Ok(true)` while the frame in progress still needs bytes.
    /// An `Err` means framing is lost; tear the session down.
    pub fn decode(&mut self, written: usize) -> Result<bool, SecsError> {
        let mut length = written + self.previous_remained;
        let mut need = 0usize;

        // Drive stages until one cannot complete; a stage signals
        // starvation by returning its own index with `need` set.
        loop {
            let current = self.step;
            let next = match current {
                DecodeStep::FrameLength => self.step_frame_length(&mut length, &mut need),
                DecodeStep::Header => self.step_header(&mut length, &mut need)?,
                DecodeStep::ItemFormat => self.step_item_format(&mut length, &mut need)?,
                DecodeStep::ItemLength => self.step_item_length(&mut length, &mut need)?,
                DecodeStep::ItemPayload => self.step_item_payload(&mut length, &mut need)?,
            };
            if next == current {
                break;
            }
            self.step = next;
        }

        let remained = length;
        if remained == 0 {
            // Everything consumed: rewind and, when the next read is
            // already known to exceed the buffer, regrow it empty.
            self.write_offset = 0;
            self.decode_index = 0;
            self.previous_remained = 0;
            if need > self.buffer.len() {
                self.buffer = vec![0u8; need * 2];
                crate::debug_println!("decode buffer regrown empty to {} bytes", self.buffer.len());
            }
        } else {
            self.write_offset += written;
            let required = remained + need;
            if required > self.buffer.len() {
                let new_size = usize::max(self.message_data_length / 2, required) * 2;
                crate::debug_println!("decode buffer regrown to {} bytes mid-frame", new_size);
                let mut fresh = vec![0u8; new_size];
                fresh[..remained]
                    .copy_from_slice(&self.buffer[self.decode_index..self.decode_index + remained]);
                self.buffer = fresh;
                self.write_offset = remained;
                self.decode_index = 0;
            } else if required > self.buffer.len() - self.write_offset {
                // Enough capacity overall, but not beyond the write
                // position: compact the unconsumed tail to the front.
                self.buffer
                    .copy_within(self.decode_index..self.decode_index + remained, 0);
                self.write_offset = remained;
                self.decode_index = 0;
            }
            self.previous_remained = remained;
        }

        Ok(self.message_data_length > 0)
    }

    // ---------------- Pipeline stages ---------------- //

    fn step_frame_length(&mut self, length: &mut usize, need: &mut usize) -> DecodeStep {
        if *length < LENGTH_PREFIX_LEN {
            *need = LENGTH_PREFIX_LEN - *length;
            return DecodeStep::FrameLength;
        }
        self.message_data_length =
            be_u32(&self.buffer[self.decode_index..self.decode_index + LENGTH_PREFIX_LEN])
                as usize;
        self.decode_index += LENGTH_PREFIX_LEN;
        *length -= LENGTH_PREFIX_LEN;
        DecodeStep::Header
    }

    fn step_header(
        &mut self,
        length: &mut usize,
        need: &mut usize,
    ) -> Result<DecodeStep, SecsError> {
        if *length < HEADER_LEN {
            *need = HEADER_LEN - *length;
            return Ok(DecodeStep::Header);
        }
        if self.message_data_length < HEADER_LEN {
            return Err(SecsError::FrameCorrupt(format!(
                "frame length {} below the {}-byte header",
                self.message_data_length, HEADER_LEN
            )));
        }
        let mut raw = [0u8; HEADER_LEN];
        raw.copy_from_slice(&self.buffer[self.decode_index..self.decode_index + HEADER_LEN]);
        self.header = MessageHeader::from_bytes(&raw);
        self.decode_index += HEADER_LEN;
        *length -= HEADER_LEN;
        self.message_data_length -= HEADER_LEN;

        if self.message_data_length == 0 {
            // Header-only frame: route by sType and rearm for the next
            // frame.
            if self.header.is_data() {
                let message = SecsMessage::from_header(&self.header, None);
                (self.on_data)(self.header, message);
            } else {
                (self.on_control)(self.header);
            }
            return Ok(DecodeStep::FrameLength);
        }

        if *length >= self.message_data_length {
            // Whole item tree already buffered: decode it in one pass.
            let body =
                &self.buffer[self.decode_index..self.decode_index + self.message_data_length];
            let (root, consumed) = decode_item(body)?;
            if consumed != self.message_data_length {
                return Err(SecsError::FrameCorrupt(format!(
                    "{} stray bytes after message root",
                    self.message_data_length - consumed
                )));
            }
            self.decode_index += self.message_data_length;
            *length -= self.message_data_length;
            self.message_data_length = 0;
            let message = SecsMessage::from_header(&self.header, Some(root));
            (self.on_data)(self.header, message);
            return Ok(DecodeStep::FrameLength);
        }

        Ok(DecodeStep::ItemFormat)
    }

    fn step_item_format(
        &mut self,
        length: &mut usize,
        need: &mut usize,
    ) -> Result<DecodeStep, SecsError> {
        if *length < 1 {
            *need = 1;
            return Ok(DecodeStep::ItemFormat);
        }
        if self.message_data_length == 0 {
            return Err(SecsError::FrameCorrupt(
                "frame length exhausted before item header".into(),
            ));
        }
        let byte = self.buffer[self.decode_index];
        self.format = SecsFormat::from_code(byte & 0xFC)
            .ok_or(SecsError::BadFormatCode(byte & 0xFC))?;
        self.length_bits = (byte & 0x03) as usize;
        if self.length_bits == 0 {
            return Err(SecsError::FrameCorrupt(
                "item header with zero length bytes".into(),
            ));
        }
        self.decode_index += 1;
        *length -= 1;
        self.message_data_length -= 1;
        Ok(DecodeStep::ItemLength)
    }

    fn step_item_length(
        &mut self,
        length: &mut usize,
        need: &mut usize,
    ) -> Result<DecodeStep, SecsError> {
        if *length < self.length_bits {
            *need = self.length_bits - *length;
            return Ok(DecodeStep::ItemLength);
        }
        if self.message_data_length < self.length_bits {
            return Err(SecsError::FrameCorrupt(
                "frame length exhausted inside item length".into(),
            ));
        }
        self.item_length =
            be_uint(&self.buffer[self.decode_index..self.decode_index + self.length_bits])
                as usize;
        self.decode_index += self.length_bits;
        *length -= self.length_bits;
        self.message_data_length -= self.length_bits;
        Ok(DecodeStep::ItemPayload)
    }

    fn step_item_payload(
        &mut self,
        length: &mut usize,
        need: &mut usize,
    ) -> Result<DecodeStep, SecsError> {
        if self.format == SecsFormat::List {
            if self.item_length > MAX_LIST_LEN {
                return Err(SecsError::FrameCorrupt(format!(
                    "list declares {} children (max {})",
                    self.item_length, MAX_LIST_LEN
                )));
            }
            if self.item_length == 0 {
                return self.finish_item(Item::empty_list());
            }
            self.stack.push(ListBuilder::new(self.item_length));
            return Ok(DecodeStep::ItemFormat);
        }

        if self.item_length > self.message_data_length {
            return Err(SecsError::FrameCorrupt(format!(
                "item payload of {} bytes exceeds the {} bytes left in the frame",
                self.item_length, self.message_data_length
            )));
        }
        if *length < self.item_length {
            *need = self.item_length - *length;
            return Ok(DecodeStep::ItemPayload);
        }

        let bytes = &self.buffer[self.decode_index..self.decode_index + self.item_length];
        let item = decode_payload(self.format, bytes)?;
        self.decode_index += self.item_length;
        *length -= self.item_length;
        self.message_data_length -= self.item_length;
        self.finish_item(item)
    }

    /// Fold a completed item into the builder stack; emits the data
    /// message when the item (or a list it completes) is the root.
    fn finish_item(&mut self, item: Item) -> Result<DecodeStep, SecsError> {
        let mut current = Some(item);
        while let Some(item) = current.take() {
            match self.stack.last_mut() {
                None => {
                    if self.message_data_length != 0 {
                        return Err(SecsError::FrameCorrupt(format!(
                            "{} stray bytes after message root",
                            self.message_data_length
                        )));
                    }
                    let message = SecsMessage::from_header(&self.header, Some(item));
                    (self.on_data)(self.header, message);
                    return Ok(DecodeStep::FrameLength);
                }
                Some(top) => {
                    top.children.push(item);
                    if top.children.len() == top.capacity {
                        if let Some(done) = self.stack.pop() {
                            current = Some(Item::List(done.children));
                        }
                    }
                }
            }
        }
        Ok(DecodeStep::ItemFormat)
    }
}

impl StreamDecoder for SecsDecoder {
    fn write_buffer(&mut self) -> &mut [u8] {
        SecsDecoder::write_buffer(self)
    }

    fn decode(&mut self, written: usize) -> Result<bool, SecsError> {
        SecsDecoder::decode(self, written)
    }

    fn is_idle(&self) -> bool {
        SecsDecoder::is_idle(self)
    }

    fn reset(&mut self) {
        SecsDecoder::reset(self)
    }
}
