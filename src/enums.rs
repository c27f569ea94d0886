/// SECS-II wire format codes.
///
/// The discriminant is the 6-bit format code pre-shifted into the high
/// bits of the first item byte, i.e. the value of `first_byte & 0xFC`.
/// The low two bits of that byte carry the number of length bytes that
/// follow and are not part of the format code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SecsFormat {
    /// Ordered sequence of child items. The item length is the child
    /// *count*, not a byte count.
    List = 0x00,

    /// Opaque byte array.
    Binary = 0x20,

    /// Boolean array, one byte per element.
    Bool = 0x24,

    /// ASCII text.
    Ascii = 0x40,

    /// JIS X 0201 8-bit text.
    Jis8 = 0x44,

    /// Signed 64-bit integer array.
    I8 = 0x60,

    /// Signed 8-bit integer array.
    I1 = 0x64,

    /// Signed 16-bit integer array.
    I2 = 0x68,

    /// Signed 32-bit integer array.
    I4 = 0x70,

    /// 64-bit float array.
    F8 = 0x80,

    /// 32-bit float array.
    F4 = 0x90,

    /// Unsigned 64-bit integer array.
    U8 = 0xA0,

    /// Unsigned 8-bit integer array.
    U1 = 0xA4,

    /// Unsigned 16-bit integer array.
    U2 = 0xA8,

    /// Unsigned 32-bit integer array.
    U4 = 0xAC,
}

impl SecsFormat {
    /// Resolve a masked format byte (`byte & 0xFC`) to a format.
    ///
    /// Returns `None` for the code points SECS-II leaves undefined;
    /// decoders treat those as a fatal protocol fault because stream
    /// framing can no longer be trusted.
    pub fn from_code(code: u8) -> Option<SecsFormat> {
        match code {
            0x00 => Some(SecsFormat::List),
            0x20 => Some(SecsFormat::Binary),
            0x24 => Some(SecsFormat::Bool),
            0x40 => Some(SecsFormat::Ascii),
            0x44 => Some(SecsFormat::Jis8),
            0x60 => Some(SecsFormat::I8),
            0x64 => Some(SecsFormat::I1),
            0x68 => Some(SecsFormat::I2),
            0x70 => Some(SecsFormat::I4),
            0x80 => Some(SecsFormat::F8),
            0x90 => Some(SecsFormat::F4),
            0xA0 => Some(SecsFormat::U8),
            0xA4 => Some(SecsFormat::U1),
            0xA8 => Some(SecsFormat::U2),
            0xAC => Some(SecsFormat::U4),
            _ => None,
        }
    }

    /// The pre-shifted wire code (`first_byte & 0xFC`).
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Element width in bytes.
    ///
    /// This table is the single source of truth for numeric byte-order
    /// handling: elements wider than one byte are serialised big-endian
    /// and byte-reversed per element on little-endian hosts.
    pub const fn element_size(self) -> usize {
        match self {
            SecsFormat::List
            | SecsFormat::Binary
            | SecsFormat::Bool
            | SecsFormat::Ascii
            | SecsFormat::Jis8
            | SecsFormat::I1
            | SecsFormat::U1 => 1,
            SecsFormat::I2 | SecsFormat::U2 => 2,
            SecsFormat::I4 | SecsFormat::U4 | SecsFormat::F4 => 4,
            SecsFormat::I8 | SecsFormat::U8 | SecsFormat::F8 => 8,
        }
    }

    /// Whether this format carries text rather than raw or numeric data.
    #[inline]
    pub const fn is_text(self) -> bool {
        matches!(self, SecsFormat::Ascii | SecsFormat::Jis8)
    }
}

impl std::fmt::Display for SecsFormat {
    /// SML mnemonic for the format (`L`, `B`, `BOOLEAN`, `A`, `J`, `I1`…).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = match self {
            SecsFormat::List => "L",
            SecsFormat::Binary => "B",
            SecsFormat::Bool => "BOOLEAN",
            SecsFormat::Ascii => "A",
            SecsFormat::Jis8 => "J",
            SecsFormat::I8 => "I8",
            SecsFormat::I1 => "I1",
            SecsFormat::I2 => "I2",
            SecsFormat::I4 => "I4",
            SecsFormat::F8 => "F8",
            SecsFormat::F4 => "F4",
            SecsFormat::U8 => "U8",
            SecsFormat::U1 => "U1",
            SecsFormat::U2 => "U2",
            SecsFormat::U4 => "U4",
        };
        f.write_str(mnemonic)
    }
}

/// Message category derived from the header's sType byte.
///
/// sType 0 denotes a data message carrying an S/F code and optional item
/// payload; every other value is an HSMS session-control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// SECS-II data message (sType 0).
    Data,

    /// select.req (sType 1).
    SelectRequest,

    /// select.rsp (sType 2).
    SelectResponse,

    /// deselect.req (sType 3).
    DeselectRequest,

    /// deselect.rsp (sType 4).
    DeselectResponse,

    /// linktest.req (sType 5).
    LinktestRequest,

    /// linktest.rsp (sType 6).
    LinktestResponse,

    /// reject.req (sType 7).
    Reject,

    /// separate.req (sType 9).
    SeparateRequest,

    /// Control message with an sType this crate does not recognise.
    Unknown(u8),
}

impl MessageType {
    /// Derive the message category from a raw sType byte.
    pub fn from_s_type(s_type: u8) -> MessageType {
        match s_type {
            0 => MessageType::Data,
            1 => MessageType::SelectRequest,
            2 => MessageType::SelectResponse,
            3 => MessageType::DeselectRequest,
            4 => MessageType::DeselectResponse,
            5 => MessageType::LinktestRequest,
            6 => MessageType::LinktestResponse,
            7 => MessageType::Reject,
            9 => MessageType::SeparateRequest,
            other => MessageType::Unknown(other),
        }
    }

    /// Whether this is a session-control message rather than a data
    /// message.
    #[inline]
    pub fn is_control(self) -> bool {
        self != MessageType::Data
    }
}

/// Pipeline stage of the incremental frame decoder.
///
/// Encodes all decode progress between `decode` calls; the decoder
/// re-enters the retained stage when the next chunk arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// Reading the 4-byte frame length prefix.
    FrameLength,

    /// Reading the 10-byte message header.
    Header,

    /// Reading an item's format byte.
    ItemFormat,

    /// Reading an item's 1–3 length bytes.
    ItemLength,

    /// Reading an item's payload (or resolving a list declaration).
    ItemPayload,
}

/// Specifies chunk sizing strategies for transport byte streams.
///
/// Provides domain-appropriate defaults but allows override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BufferChunkSize {
    /// TCP socket reads: default is 64 KiB.
    Tcp,

    /// In-memory or loopback streams: default is 512 KiB.
    InMemory,

    /// Custom chunk size.
    Custom(usize),
}

impl BufferChunkSize {
    /// Returns the configured chunk size in bytes.
    pub fn chunk_size(self) -> usize {
        match self {
            BufferChunkSize::Tcp => 64 * 1024,
            BufferChunkSize::InMemory => 512 * 1024,
            BufferChunkSize::Custom(n) => n,
        }
    }
}
