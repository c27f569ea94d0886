//! # Complete-slice item parsing
//!
//! Parsing for item trees that are fully resident in the receive buffer:
//! the whole-frame fast path of the incremental decoder lands here, as
//! does any caller holding a complete frame body.
//!
//! [`decode_payload`] is the single format-dispatch point for leaf
//! payloads — element width comes from the [`SecsFormat`] table and
//! multi-byte elements are read big-endian — so the incremental stage
//! machine and the slice parser cannot disagree on numeric byte order.

use crate::constants::MAX_LIST_LEN;
use crate::enums::SecsFormat;
use crate::error::SecsError;
use crate::jis8;
use crate::models::item::Item;
use crate::utils::be_uint;

/// Partially filled list, parked while its children decode.
///
/// `capacity` is the child count the wire declared; the builder
/// materialises into a list item the moment `children` reaches it.
pub(crate) struct ListBuilder {
    pub(crate) capacity: usize,
    pub(crate) children: Vec<Item>,
}

impl ListBuilder {
    pub(crate) fn new(capacity: usize) -> ListBuilder {
        ListBuilder {
            capacity,
            children: Vec::with_capacity(capacity),
        }
    }
}

/// Split an item header off the front of `buf`.
///
/// Returns the format, the declared length (child count for lists, byte
/// count otherwise), and the header size consumed.
pub(crate) fn read_item_header(buf: &[u8]) -> Result<(SecsFormat, usize, usize), SecsError> {
    let first = *buf
        .first()
        .ok_or_else(|| SecsError::FrameCorrupt("truncated item header".into()))?;
    let format = SecsFormat::from_code(first & 0xFC)
        .ok_or(SecsError::BadFormatCode(first & 0xFC))?;
    let length_bits = (first & 0x03) as usize;
    if length_bits == 0 {
        return Err(SecsError::FrameCorrupt(
            "item header with zero length bytes".into(),
        ));
    }
    if buf.len() < 1 + length_bits {
        return Err(SecsError::FrameCorrupt("truncated item length".into()));
    }
    let length = be_uint(&buf[1..1 + length_bits]) as usize;
    Ok((format, length, 1 + length_bits))
}

/// Decode one leaf payload into an item.
///
/// `bytes` must be exactly the payload; elements wider than one byte are
/// read big-endian, which on little-endian hosts performs the
/// per-element byte reversal the wire format requires.
pub(crate) fn decode_payload(format: SecsFormat, bytes: &[u8]) -> Result<Item, SecsError> {
    let size = format.element_size();
    if bytes.len() % size != 0 {
        return Err(SecsError::FrameCorrupt(format!(
            "item length {} is not a multiple of the {}-byte element size",
            bytes.len(),
            size
        )));
    }
    let item = match format {
        SecsFormat::List => {
            return Err(SecsError::FrameCorrupt(
                "list item has no leaf payload".into(),
            ))
        }
        SecsFormat::Binary => Item::Binary(bytes.to_vec()),
        SecsFormat::U1 => Item::U1(bytes.to_vec()),
        SecsFormat::Bool => Item::Bool(bytes.iter().map(|&b| b != 0).collect()),
        SecsFormat::Ascii => Item::Ascii(
            bytes
                .iter()
                .map(|&b| if b < 0x80 { b as char } else { '?' })
                .collect(),
        ),
        SecsFormat::Jis8 => Item::Jis8(jis8::decode(bytes)),
        SecsFormat::I1 => Item::I1(bytes.iter().map(|&b| b as i8).collect()),
        SecsFormat::I2 => Item::I2(
            bytes
                .chunks_exact(2)
                .map(|c| i16::from_be_bytes([c[0], c[1]]))
                .collect(),
        ),
        SecsFormat::I4 => Item::I4(
            bytes
                .chunks_exact(4)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        SecsFormat::I8 => Item::I8(
            bytes
                .chunks_exact(8)
                .map(|c| i64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
        SecsFormat::U2 => Item::U2(
            bytes
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect(),
        ),
        SecsFormat::U4 => Item::U4(
            bytes
                .chunks_exact(4)
                .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        SecsFormat::U8 => Item::U8(
            bytes
                .chunks_exact(8)
                .map(|c| u64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
        SecsFormat::F4 => Item::F4(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        SecsFormat::F8 => Item::F8(
            bytes
                .chunks_exact(8)
                .map(|c| f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
    };
    Ok(item)
}

/// Decode a complete item tree from the head of `buf`.
///
/// Returns the root item and the byte count consumed. The walk is
/// iterative with an explicit builder stack, so hostile nesting depth on
/// the wire cannot exhaust the call stack.
pub fn decode_item(buf: &[u8]) -> Result<(Item, usize), SecsError> {
    let mut stack: Vec<ListBuilder> = Vec::new();
    let mut index = 0usize;

    loop {
        let (format, length, header_len) = read_item_header(&buf[index..])?;
        index += header_len;

        let leaf = if format == SecsFormat::List {
            if length > MAX_LIST_LEN {
                return Err(SecsError::FrameCorrupt(format!(
                    "list declares {} children (max {})",
                    length, MAX_LIST_LEN
                )));
            }
            if length > 0 {
                stack.push(ListBuilder::new(length));
                continue;
            }
            Item::empty_list()
        } else {
            if buf.len() - index < length {
                return Err(SecsError::FrameCorrupt("truncated item payload".into()));
            }
            let item = decode_payload(format, &buf[index..index + length])?;
            index += length;
            item
        };

        // Fold the finished item into the builder stack; each list that
        // fills up completes an item one level out.
        let mut current = Some(leaf);
        while let Some(item) = current.take() {
            match stack.last_mut() {
                None => return Ok((item, index)),
                Some(top) => {
                    top.children.push(item);
                    if top.children.len() == top.capacity {
                        if let Some(done) = stack.pop() {
                            current = Some(Item::List(done.children));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_leaf() {
        let (item, consumed) = decode_item(&[0x41, 0x06, b'H', b'e', b'l', b'l', b'o', b'!']).unwrap();
        assert_eq!(item, Item::ascii("Hello!"));
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_decode_nested_list() {
        let bytes = [0x01, 0x02, 0xA9, 0x02, 0x12, 0x34, 0x01, 0x00];
        let (item, consumed) = decode_item(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        let children = item.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], Item::u2(vec![0x1234]));
        assert_eq!(children[1], Item::empty_list());
    }

    #[test]
    fn test_decode_stops_at_tree_end() {
        // Trailing bytes beyond the root are left unconsumed.
        let bytes = [0x25, 0x01, 0x01, 0xFF, 0xFF];
        let (item, consumed) = decode_item(&bytes).unwrap();
        assert_eq!(item, Item::bools(vec![true]));
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_bad_format_code() {
        assert!(matches!(
            decode_item(&[0xFD, 0x00]),
            Err(SecsError::BadFormatCode(0xFC))
        ));
    }

    #[test]
    fn test_zero_length_bits_rejected() {
        assert!(matches!(
            decode_item(&[0x40]),
            Err(SecsError::FrameCorrupt(_))
        ));
    }

    #[test]
    fn test_truncated_payload_rejected() {
        assert!(matches!(
            decode_item(&[0x41, 0x06, b'H', b'i']),
            Err(SecsError::FrameCorrupt(_))
        ));
    }

    #[test]
    fn test_element_size_mismatch_rejected() {
        assert!(matches!(
            decode_item(&[0xA9, 0x03, 0x00, 0x01, 0x02]),
            Err(SecsError::FrameCorrupt(_))
        ));
    }

    #[test]
    fn test_oversize_list_declaration_rejected() {
        // L with two length bytes declaring 256 children.
        assert!(matches!(
            decode_item(&[0x02, 0x01, 0x00]),
            Err(SecsError::FrameCorrupt(_))
        ));
    }

    #[test]
    fn test_numeric_byte_order() {
        let (item, _) = decode_item(&[0xA9, 0x04, 0x12, 0x34, 0xAB, 0xCD]).unwrap();
        assert_eq!(item, Item::u2(vec![0x1234, 0xABCD]));

        let (item, _) = decode_item(&[0x71, 0x04, 0xFF, 0xFF, 0xFF, 0xFE]).unwrap();
        assert_eq!(item, Item::i4(vec![-2]));

        let (item, _) = decode_item(&[0x91, 0x04, 0x3F, 0x80, 0x00, 0x00]).unwrap();
        assert_eq!(item, Item::f4(vec![1.0]));
    }
}
