//! Error types for the SECS-II codec.

use std::{error, fmt, io};

use crate::enums::SecsFormat;

/// Unified error type for all codec operations.
///
/// Short reads are deliberately absent: an incomplete frame is normal
/// backpressure, surfaced by the decoder as "more bytes needed" rather
/// than as an error. Everything here is either a programmer error
/// (`WrongFormat`), an encode-side rejection, or a protocol fault after
/// which stream framing is lost and the session must be torn down.
#[derive(Debug)]
pub enum SecsError {
    /// I/O failure on the underlying transport.
    Io(io::Error),

    /// An item payload exceeds the 0xFFFFFF bytes three length bytes can
    /// describe.
    ItemOversize(usize),

    /// An accessor was used against an item of an incompatible format.
    WrongFormat {
        /// SML mnemonic of the expected format(s).
        expected: &'static str,
        /// Format the item actually carries.
        actual: SecsFormat,
    },

    /// A format byte decoded to a code point SECS-II leaves undefined.
    BadFormatCode(u8),

    /// A list was declared with more than 255 children.
    ListOverflow(usize),

    /// Frame structure is inconsistent (length underflow, truncated or
    /// oversized item, stray bytes). Framing alignment is lost.
    FrameCorrupt(String),
}

impl fmt::Display for SecsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecsError::Io(e) => write!(f, "I/O error: {}", e),
            SecsError::ItemOversize(n) => {
                write!(f, "item payload of {} bytes exceeds the 3-byte length field", n)
            }
            SecsError::WrongFormat { expected, actual } => {
                write!(f, "expected a {} item, got {}", expected, actual)
            }
            SecsError::BadFormatCode(code) => {
                write!(f, "undefined SECS-II format code 0x{:02X}", code)
            }
            SecsError::ListOverflow(n) => {
                write!(f, "list with {} children exceeds the 255-child limit", n)
            }
            SecsError::FrameCorrupt(s) => write!(f, "corrupt frame: {}", s),
        }
    }
}

impl error::Error for SecsError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            SecsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

// --- Conversions for error handling ---

impl From<io::Error> for SecsError {
    fn from(e: io::Error) -> Self {
        SecsError::Io(e)
    }
}

/// Protocol faults surface as `InvalidData` at async stream boundaries,
/// where the crate's adapters speak `io::Result`.
impl From<SecsError> for io::Error {
    fn from(e: SecsError) -> Self {
        match e {
            SecsError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
