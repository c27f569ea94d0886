//! # HSMS message header
//!
//! The fixed 10-byte header every frame carries:
//!
//! ```text
//! u16_be(device_id) || u8(s | reply_bit) || u8(f)
//!                   || u8(p_type) || u8(s_type) || u32_be(system_bytes)
//! ```
//!
//! sType 0 marks a data message; any other value is a session-control
//! message, with the standard HSMS control variants built by the
//! constructors at the bottom of this module.

use crate::constants::{CONTROL_DEVICE_ID, HEADER_LEN};
use crate::enums::MessageType;
use crate::utils::{be_u16, be_u32};

/// Decoded form of the 10-byte HSMS header.
///
/// The reply bit (high bit of header byte 2) is split out of the stream
/// byte; `to_bytes` recombines them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Device (session) id; 0xFFFF on control messages.
    pub device_id: u16,
    /// Stream code, without the reply bit.
    pub stream: u8,
    /// Function code.
    pub function: u8,
    /// Whether the sender expects a reply.
    pub reply_expected: bool,
    /// Presentation type; 0 for SECS-II.
    pub p_type: u8,
    /// Session type; 0 for data messages.
    pub s_type: u8,
    /// Transaction id correlating request and reply.
    pub system_bytes: u32,
}

impl MessageHeader {
    /// Header for a data message (pType and sType zero).
    pub fn data(
        device_id: u16,
        stream: u8,
        function: u8,
        reply_expected: bool,
        system_bytes: u32,
    ) -> MessageHeader {
        MessageHeader {
            device_id,
            stream: stream & 0x7F,
            function,
            reply_expected,
            p_type: 0,
            s_type: 0,
            system_bytes,
        }
    }

    /// Parse the wire form.
    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> MessageHeader {
        MessageHeader {
            device_id: be_u16(&bytes[0..2]),
            stream: bytes[2] & 0x7F,
            reply_expected: bytes[2] & 0x80 != 0,
            function: bytes[3],
            p_type: bytes[4],
            s_type: bytes[5],
            system_bytes: be_u32(&bytes[6..10]),
        }
    }

    /// Serialise to the wire form.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..2].copy_from_slice(&self.device_id.to_be_bytes());
        out[2] = (self.stream & 0x7F) | if self.reply_expected { 0x80 } else { 0 };
        out[3] = self.function;
        out[4] = self.p_type;
        out[5] = self.s_type;
        out[6..10].copy_from_slice(&self.system_bytes.to_be_bytes());
        out
    }

    /// Message category derived from sType.
    pub fn message_type(&self) -> MessageType {
        MessageType::from_s_type(self.s_type)
    }

    /// Whether this header belongs to a data message.
    #[inline]
    pub fn is_data(&self) -> bool {
        self.s_type == 0
    }
}

// -------------------- Control constructors -------------------- //

impl MessageHeader {
    fn control(s_type: u8, system_bytes: u32) -> MessageHeader {
        MessageHeader {
            device_id: CONTROL_DEVICE_ID,
            stream: 0,
            function: 0,
            reply_expected: false,
            p_type: 0,
            s_type,
            system_bytes,
        }
    }

    /// select.req header.
    pub fn select_req(system_bytes: u32) -> MessageHeader {
        MessageHeader::control(1, system_bytes)
    }

    /// select.rsp header; `status` 0 means the select was accepted.
    pub fn select_rsp(status: u8, system_bytes: u32) -> MessageHeader {
        let mut header = MessageHeader::control(2, system_bytes);
        header.function = status;
        header
    }

    /// deselect.req header.
    pub fn deselect_req(system_bytes: u32) -> MessageHeader {
        MessageHeader::control(3, system_bytes)
    }

    /// deselect.rsp header; `status` 0 means the deselect was accepted.
    pub fn deselect_rsp(status: u8, system_bytes: u32) -> MessageHeader {
        let mut header = MessageHeader::control(4, system_bytes);
        header.function = status;
        header
    }

    /// linktest.req header.
    pub fn linktest_req(system_bytes: u32) -> MessageHeader {
        MessageHeader::control(5, system_bytes)
    }

    /// linktest.rsp header, echoing the request's system bytes.
    pub fn linktest_rsp(system_bytes: u32) -> MessageHeader {
        MessageHeader::control(6, system_bytes)
    }

    /// reject.req header; `reason` per the HSMS reject reason codes.
    pub fn reject_req(reason: u8, system_bytes: u32) -> MessageHeader {
        let mut header = MessageHeader::control(7, system_bytes);
        header.function = reason;
        header
    }

    /// separate.req header.
    pub fn separate_req(system_bytes: u32) -> MessageHeader {
        MessageHeader::control(9, system_bytes)
    }
}
