//! # HSMS frame encoding
//!
//! Serialises a header and item tree into the on-wire frame:
//!
//! ```text
//! u32_be(payload_len) || header (10 bytes) || item tree
//! ```
//!
//! where `payload_len` counts the header plus the item tree but not the
//! prefix itself. The tree is walked depth-first, each node contributing
//! its raw-byte view ([`Item::raw_bytes`]) as one fragment, so the result
//! is suitable for scatter/gather writes as well as contiguous buffers.

use crate::constants::{HEADER_LEN, LENGTH_PREFIX_LEN};
use crate::error::SecsError;
use crate::models::frames::header::MessageHeader;
use crate::models::item::Item;
use crate::traits::frame_encoder::FrameEncoder;
use crate::traits::stream_buffer::StreamBuffer;

/// Collect the ordered fragment list for one outbound frame.
///
/// Fragment 0 is the length prefix plus header; each following fragment
/// is one item node's raw bytes in depth-first order. Pass `root: None`
/// for a header-only frame (`payload_len == 10`).
pub fn frame_fragments(
    header: &MessageHeader,
    root: Option<&Item>,
) -> Result<Vec<Vec<u8>>, SecsError> {
    let mut fragments = vec![Vec::new()];
    if let Some(item) = root {
        collect_item_fragments(item, &mut fragments)?;
    }

    let payload_len: usize =
        HEADER_LEN + fragments[1..].iter().map(Vec::len).sum::<usize>();
    if payload_len > u32::MAX as usize {
        return Err(SecsError::ItemOversize(payload_len));
    }

    let mut head = Vec::with_capacity(LENGTH_PREFIX_LEN + HEADER_LEN);
    head.extend_from_slice(&(payload_len as u32).to_be_bytes());
    head.extend_from_slice(&header.to_bytes());
    fragments[0] = head;
    Ok(fragments)
}

fn collect_item_fragments(item: &Item, out: &mut Vec<Vec<u8>>) -> Result<(), SecsError> {
    out.push(item.raw_bytes()?);
    if let Item::List(children) = item {
        for child in children {
            collect_item_fragments(child, out)?;
        }
    }
    Ok(())
}

/// Encode one frame contiguously.
pub fn encode_frame(header: &MessageHeader, root: Option<&Item>) -> Result<Vec<u8>, SecsError> {
    let fragments = frame_fragments(header, root)?;
    let total: usize = fragments.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);
    for fragment in &fragments {
        out.extend_from_slice(fragment);
    }
    Ok(out)
}

/// Borrowed view of one outbound frame for the [`FrameEncoder`] seam.
pub struct SecsFrameRef<'a> {
    /// The 10-byte header to serialise.
    pub header: &'a MessageHeader,
    /// Item tree, absent for header-only frames.
    pub root: Option<&'a Item>,
}

/// [`FrameEncoder`] implementation producing whole HSMS frames.
pub struct SecsFrameEncoder;

impl FrameEncoder for SecsFrameEncoder {
    type Frame<'a> = SecsFrameRef<'a>;
    type Metadata = ();

    fn encode<B: StreamBuffer>(frame: &Self::Frame<'_>) -> Result<(B, ()), SecsError> {
        let bytes = encode_frame(frame.header, frame.root)?;
        Ok((B::from_slice(&bytes), ()))
    }
}
