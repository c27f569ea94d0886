//! Wire-format constants shared by the encoder and decoder.

/// Size of the HSMS message header in bytes.
pub const HEADER_LEN: usize = 10;

/// Size of the big-endian frame length prefix in bytes.
///
/// The prefix counts the header plus the item tree; it does not count
/// itself.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Maximum number of children a single list item may declare.
pub const MAX_LIST_LEN: usize = 255;

/// Maximum payload byte length of a single item (three length bytes).
pub const MAX_ITEM_LEN: usize = 0xFF_FFFF;

/// Default receive buffer size for a freshly created decoder.
pub const DEFAULT_DECODE_BUFFER: usize = 4096;

/// Session id carried by HSMS control messages.
pub const CONTROL_DEVICE_ID: u16 = 0xFFFF;
