//! # SECS-II message and decoded-frame types
//!
//! [`SecsMessage`] is the logical unit equipment software works with: a
//! stream/function pair, the reply flag, an optional name, and the item
//! tree. [`HsmsFrame`] is what the decoding side yields per wire frame —
//! either a session-control header or a data message with its header.

use std::fmt;

use crate::models::frames::header::MessageHeader;
use crate::models::item::Item;

/// A SECS-II data message.
#[derive(Debug, Clone, PartialEq)]
pub struct SecsMessage {
    /// Stream code.
    pub s: u8,
    /// Function code.
    pub f: u8,
    /// Whether the sender expects a reply.
    pub reply_expected: bool,
    /// Human-readable message name; empty when decoded off the wire.
    pub name: String,
    /// Root of the item tree, absent for header-only messages.
    pub root: Option<Item>,
}

impl SecsMessage {
    /// Build a message with a payload.
    pub fn new(
        s: u8,
        f: u8,
        reply_expected: bool,
        name: impl Into<String>,
        root: Option<Item>,
    ) -> SecsMessage {
        SecsMessage {
            s,
            f,
            reply_expected,
            name: name.into(),
            root,
        }
    }

    /// Build a header-only message (data length 10 on the wire).
    pub fn header_only(s: u8, f: u8, reply_expected: bool) -> SecsMessage {
        SecsMessage::new(s, f, reply_expected, "", None)
    }

    /// Build the message a decoded header and root describe.
    pub fn from_header(header: &MessageHeader, root: Option<Item>) -> SecsMessage {
        SecsMessage {
            s: header.stream,
            f: header.function,
            reply_expected: header.reply_expected,
            name: String::new(),
            root,
        }
    }
}

impl fmt::Display for SecsMessage {
    /// Renders `S{s}F{f}`, a `W` marker when a reply is expected, and the
    /// name if one is set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}F{}", self.s, self.f)?;
        if self.reply_expected {
            write!(f, " W")?;
        }
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        Ok(())
    }
}

/// One decoded wire frame.
///
/// This is the item type the async message stream yields, and the value
/// the decoder's typical callback wiring queues for the session layer.
#[derive(Debug, Clone, PartialEq)]
pub enum HsmsFrame {
    /// Session-control message (sType != 0); header-only on the wire.
    Control(MessageHeader),
    /// Data message with its header.
    Data(MessageHeader, SecsMessage),
}

impl HsmsFrame {
    /// The frame's header, whichever kind it is.
    pub fn header(&self) -> &MessageHeader {
        match self {
            HsmsFrame::Control(header) => header,
            HsmsFrame::Data(header, _) => header,
        }
    }
}
