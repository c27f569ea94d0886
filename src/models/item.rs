//! # SECS-II item model
//!
//! The recursive tag-length-value tree carried by data messages: lists,
//! two text encodings, raw bytes, booleans, and fixed-width numeric
//! arrays. Items own their children exclusively; there is no shared
//! mutable aliasing anywhere in a tree.
//!
//! ## Wire rules
//! Every item starts with a header byte `(format_code & 0xFC) | length_bits`
//! followed by `length_bits` big-endian bytes of payload length. For a
//! list the "payload length" is the child count and the children follow
//! as complete items in depth-first order; for every other format the
//! payload bytes follow directly, numeric elements serialised big-endian.
//!
//! [`Item::raw_bytes`] produces exactly this header-plus-payload view
//! (header only for lists) and is the unit the frame encoder collects
//! into scatter/gather fragments.

use std::fmt;

use crate::constants::{MAX_ITEM_LEN, MAX_LIST_LEN};
use crate::enums::SecsFormat;
use crate::error::SecsError;
use crate::jis8;

/// A single node of the SECS-II value tree.
///
/// Construct through the per-format factories ([`Item::list`],
/// [`Item::ascii`], [`Item::u2`], …) rather than the variants directly;
/// the factories enforce the wire invariants (a list never exceeds 255
/// children).
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Ordered children, at most 255.
    List(Vec<Item>),
    /// Opaque bytes.
    Binary(Vec<u8>),
    /// Booleans, one byte each on the wire.
    Bool(Vec<bool>),
    /// ASCII text.
    Ascii(String),
    /// JIS X 0201 text.
    Jis8(String),
    /// Signed 8-bit integers.
    I1(Vec<i8>),
    /// Signed 16-bit integers.
    I2(Vec<i16>),
    /// Signed 32-bit integers.
    I4(Vec<i32>),
    /// Signed 64-bit integers.
    I8(Vec<i64>),
    /// Unsigned 8-bit integers.
    U1(Vec<u8>),
    /// Unsigned 16-bit integers.
    U2(Vec<u16>),
    /// Unsigned 32-bit integers.
    U4(Vec<u32>),
    /// Unsigned 64-bit integers.
    U8(Vec<u64>),
    /// 32-bit floats.
    F4(Vec<f32>),
    /// 64-bit floats.
    F8(Vec<f64>),
}

// -------------------- Factories -------------------- //

impl Item {
    /// Build a list item. Rejects more than 255 children.
    ///
    /// An empty input yields the canonical empty list, which (like every
    /// empty item in this model) allocates nothing.
    pub fn list(children: Vec<Item>) -> Result<Item, SecsError> {
        if children.len() > MAX_LIST_LEN {
            return Err(SecsError::ListOverflow(children.len()));
        }
        Ok(Item::List(children))
    }

    /// The canonical empty list.
    pub fn empty_list() -> Item {
        Item::List(Vec::new())
    }

    /// Build a binary item from raw bytes.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Item {
        Item::Binary(bytes.into())
    }

    /// Build an ASCII text item.
    ///
    /// Characters outside ASCII are substituted with `?` at encode time;
    /// the in-memory string is kept as given.
    pub fn ascii(text: impl Into<String>) -> Item {
        Item::Ascii(text.into())
    }

    /// Build a JIS X 0201 text item.
    pub fn jis8(text: impl Into<String>) -> Item {
        Item::Jis8(text.into())
    }

    /// Build a boolean array item.
    pub fn bools(values: impl Into<Vec<bool>>) -> Item {
        Item::Bool(values.into())
    }

    /// Build a signed 8-bit array item.
    pub fn i1(values: impl Into<Vec<i8>>) -> Item {
        Item::I1(values.into())
    }

    /// Build a signed 16-bit array item.
    pub fn i2(values: impl Into<Vec<i16>>) -> Item {
        Item::I2(values.into())
    }

    /// Build a signed 32-bit array item.
    pub fn i4(values: impl Into<Vec<i32>>) -> Item {
        Item::I4(values.into())
    }

    /// Build a signed 64-bit array item.
    pub fn i8(values: impl Into<Vec<i64>>) -> Item {
        Item::I8(values.into())
    }

    /// Build an unsigned 8-bit array item.
    pub fn u1(values: impl Into<Vec<u8>>) -> Item {
        Item::U1(values.into())
    }

    /// Build an unsigned 16-bit array item.
    pub fn u2(values: impl Into<Vec<u16>>) -> Item {
        Item::U2(values.into())
    }

    /// Build an unsigned 32-bit array item.
    pub fn u4(values: impl Into<Vec<u32>>) -> Item {
        Item::U4(values.into())
    }

    /// Build an unsigned 64-bit array item.
    pub fn u8(values: impl Into<Vec<u64>>) -> Item {
        Item::U8(values.into())
    }

    /// Build a 32-bit float array item.
    pub fn f4(values: impl Into<Vec<f32>>) -> Item {
        Item::F4(values.into())
    }

    /// Build a 64-bit float array item.
    pub fn f8(values: impl Into<Vec<f64>>) -> Item {
        Item::F8(values.into())
    }
}

// -------------------- Shape -------------------- //

impl Item {
    /// The wire format of this item.
    pub fn format(&self) -> SecsFormat {
        match self {
            Item::List(_) => SecsFormat::List,
            Item::Binary(_) => SecsFormat::Binary,
            Item::Bool(_) => SecsFormat::Bool,
            Item::Ascii(_) => SecsFormat::Ascii,
            Item::Jis8(_) => SecsFormat::Jis8,
            Item::I1(_) => SecsFormat::I1,
            Item::I2(_) => SecsFormat::I2,
            Item::I4(_) => SecsFormat::I4,
            Item::I8(_) => SecsFormat::I8,
            Item::U1(_) => SecsFormat::U1,
            Item::U2(_) => SecsFormat::U2,
            Item::U4(_) => SecsFormat::U4,
            Item::U8(_) => SecsFormat::U8,
            Item::F4(_) => SecsFormat::F4,
            Item::F8(_) => SecsFormat::F8,
        }
    }

    /// Child count for a list, element count for everything else.
    ///
    /// For text this is the encoded byte count, which with single-byte
    /// encodings equals the character count.
    pub fn count(&self) -> usize {
        match self {
            Item::List(v) => v.len(),
            Item::Binary(v) => v.len(),
            Item::Bool(v) => v.len(),
            Item::Ascii(s) | Item::Jis8(s) => s.chars().count(),
            Item::I1(v) => v.len(),
            Item::I2(v) => v.len(),
            Item::I4(v) => v.len(),
            Item::I8(v) => v.len(),
            Item::U1(v) => v.len(),
            Item::U2(v) => v.len(),
            Item::U4(v) => v.len(),
            Item::U8(v) => v.len(),
            Item::F4(v) => v.len(),
            Item::F8(v) => v.len(),
        }
    }

    /// Whether the item carries no children or elements.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The value the item header's length field carries: the child count
    /// for a list, the payload byte count for everything else.
    pub(crate) fn value_len(&self) -> usize {
        match self {
            Item::List(v) => v.len(),
            _ => self.count() * self.format().element_size(),
        }
    }
}

// -------------------- Wire view -------------------- //

impl Item {
    /// This item's raw wire bytes: header byte, minimal big-endian length
    /// field, and (for non-lists) the payload in wire order.
    ///
    /// For a list the view is the header alone; children contribute their
    /// own views in depth-first order when a frame is assembled.
    pub fn raw_bytes(&self) -> Result<Vec<u8>, SecsError> {
        let value_len = self.value_len();
        let payload = match self {
            Item::List(_) => 0,
            _ => value_len,
        };
        let mut out = Vec::with_capacity(4 + payload);
        push_item_header(&mut out, self.format(), value_len)?;
        self.push_payload(&mut out);
        Ok(out)
    }

    fn push_payload(&self, out: &mut Vec<u8>) {
        match self {
            Item::List(_) => {}
            Item::Binary(v) | Item::U1(v) => out.extend_from_slice(v),
            Item::Bool(v) => out.extend(v.iter().map(|&b| u8::from(b))),
            Item::Ascii(s) => {
                out.extend(s.chars().map(|c| if c.is_ascii() { c as u8 } else { b'?' }))
            }
            Item::Jis8(s) => out.extend_from_slice(&jis8::encode(s)),
            Item::I1(v) => out.extend(v.iter().map(|&x| x as u8)),
            Item::I2(v) => {
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
            Item::I4(v) => {
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
            Item::I8(v) => {
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
            Item::U2(v) => {
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
            Item::U4(v) => {
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
            Item::U8(v) => {
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
            Item::F4(v) => {
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
            Item::F8(v) => {
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
        }
    }
}

/// Append an item header: format byte with the minimal `length_bits`,
/// then that many big-endian length bytes.
fn push_item_header(
    out: &mut Vec<u8>,
    format: SecsFormat,
    value_len: usize,
) -> Result<(), SecsError> {
    let length_bits: usize = if value_len <= 0xFF {
        1
    } else if value_len <= 0xFFFF {
        2
    } else if value_len <= MAX_ITEM_LEN {
        3
    } else {
        return Err(SecsError::ItemOversize(value_len));
    };
    out.push(format.code() | length_bits as u8);
    let be = (value_len as u32).to_be_bytes();
    out.extend_from_slice(&be[4 - length_bits..]);
    Ok(())
}

// -------------------- Accessors -------------------- //

impl Item {
    /// The children of a list item.
    pub fn children(&self) -> Result<&[Item], SecsError> {
        match self {
            Item::List(v) => Ok(v),
            other => Err(wrong_format("L", other)),
        }
    }

    /// The text of an ASCII or JIS8 item.
    pub fn as_str(&self) -> Result<&str, SecsError> {
        match self {
            Item::Ascii(s) | Item::Jis8(s) => Ok(s),
            other => Err(wrong_format("A or J", other)),
        }
    }

    /// The bytes of a binary item.
    pub fn as_binary(&self) -> Result<&[u8], SecsError> {
        match self {
            Item::Binary(v) => Ok(v),
            other => Err(wrong_format("B", other)),
        }
    }

    /// The elements of a boolean item.
    pub fn as_bools(&self) -> Result<&[bool], SecsError> {
        match self {
            Item::Bool(v) => Ok(v),
            other => Err(wrong_format("BOOLEAN", other)),
        }
    }

    /// The elements of an I1 item.
    pub fn as_i1(&self) -> Result<&[i8], SecsError> {
        match self {
            Item::I1(v) => Ok(v),
            other => Err(wrong_format("I1", other)),
        }
    }

    /// The elements of an I2 item.
    pub fn as_i2(&self) -> Result<&[i16], SecsError> {
        match self {
            Item::I2(v) => Ok(v),
            other => Err(wrong_format("I2", other)),
        }
    }

    /// The elements of an I4 item.
    pub fn as_i4(&self) -> Result<&[i32], SecsError> {
        match self {
            Item::I4(v) => Ok(v),
            other => Err(wrong_format("I4", other)),
        }
    }

    /// The elements of an I8 item.
    pub fn as_i8(&self) -> Result<&[i64], SecsError> {
        match self {
            Item::I8(v) => Ok(v),
            other => Err(wrong_format("I8", other)),
        }
    }

    /// The elements of a U1 item.
    pub fn as_u1(&self) -> Result<&[u8], SecsError> {
        match self {
            Item::U1(v) => Ok(v),
            other => Err(wrong_format("U1", other)),
        }
    }

    /// The elements of a U2 item.
    pub fn as_u2(&self) -> Result<&[u16], SecsError> {
        match self {
            Item::U2(v) => Ok(v),
            other => Err(wrong_format("U2", other)),
        }
    }

    /// The elements of a U4 item.
    pub fn as_u4(&self) -> Result<&[u32], SecsError> {
        match self {
            Item::U4(v) => Ok(v),
            other => Err(wrong_format("U4", other)),
        }
    }

    /// The elements of a U8 item.
    pub fn as_u8(&self) -> Result<&[u64], SecsError> {
        match self {
            Item::U8(v) => Ok(v),
            other => Err(wrong_format("U8", other)),
        }
    }

    /// The elements of an F4 item.
    pub fn as_f4(&self) -> Result<&[f32], SecsError> {
        match self {
            Item::F4(v) => Ok(v),
            other => Err(wrong_format("F4", other)),
        }
    }

    /// The elements of an F8 item.
    pub fn as_f8(&self) -> Result<&[f64], SecsError> {
        match self {
            Item::F8(v) => Ok(v),
            other => Err(wrong_format("F8", other)),
        }
    }

    /// The single element of a one-element U4 item, a common scalar read
    /// for equipment variables.
    ///
    /// Reading a scalar off an empty array is a caller mistake, not a
    /// framing fault, so it reports `WrongFormat` like every other
    /// incompatible access.
    pub fn first_u4(&self) -> Result<u32, SecsError> {
        let values = self.as_u4()?;
        values.first().copied().ok_or(SecsError::WrongFormat {
            expected: "non-empty U4",
            actual: SecsFormat::U4,
        })
    }
}

fn wrong_format(expected: &'static str, item: &Item) -> SecsError {
    SecsError::WrongFormat {
        expected,
        actual: item.format(),
    }
}

// -------------------- Pattern match -------------------- //

impl Item {
    /// Asymmetric structural match against a template, used for
    /// request/response pattern dispatch.
    ///
    /// Formats must agree. A template with count 0 is a wildcard for any
    /// value of that format; otherwise counts must agree, text compares
    /// string-equal, numeric and binary data compare byte-equal, and
    /// lists recurse positionally.
    pub fn matches(&self, template: &Item) -> bool {
        if self.format() != template.format() {
            return false;
        }
        if template.count() == 0 {
            return true;
        }
        if self.count() != template.count() {
            return false;
        }
        match (self, template) {
            (Item::List(a), Item::List(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| x.matches(y))
            }
            (Item::Ascii(a), Item::Ascii(b)) | (Item::Jis8(a), Item::Jis8(b)) => a == b,
            (Item::Binary(a), Item::Binary(b)) | (Item::U1(a), Item::U1(b)) => a == b,
            (Item::Bool(a), Item::Bool(b)) => a == b,
            (Item::I1(a), Item::I1(b)) => a == b,
            (Item::I2(a), Item::I2(b)) => a == b,
            (Item::I4(a), Item::I4(b)) => a == b,
            (Item::I8(a), Item::I8(b)) => a == b,
            (Item::U2(a), Item::U2(b)) => a == b,
            (Item::U4(a), Item::U4(b)) => a == b,
            (Item::U8(a), Item::U8(b)) => a == b,
            // Floats compare bitwise so the match is byte-exact like the
            // wire form, not IEEE-equal.
            (Item::F4(a), Item::F4(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Item::F8(a), Item::F8(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            _ => false,
        }
    }
}

// -------------------- SML rendering -------------------- //

impl fmt::Display for Item {
    /// Renders the item in SML notation, nested lists indented two
    /// spaces per level.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}

impl Item {
    fn fmt_indent(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:indent$}<{} [{}]", "", self.format(), self.count())?;
        match self {
            Item::List(children) => {
                if children.is_empty() {
                    return write!(f, ">");
                }
                writeln!(f)?;
                for child in children {
                    child.fmt_indent(f, indent + 2)?;
                    writeln!(f)?;
                }
                write!(f, "{:indent$}>", "")
            }
            Item::Ascii(s) | Item::Jis8(s) => write!(f, " \"{}\">", s),
            Item::Binary(v) => {
                for b in v {
                    write!(f, " 0x{:02X}", b)?;
                }
                write!(f, ">")
            }
            Item::Bool(v) => {
                for b in v {
                    write!(f, " {}", u8::from(*b))?;
                }
                write!(f, ">")
            }
            Item::I1(v) => fmt_elements(f, v),
            Item::I2(v) => fmt_elements(f, v),
            Item::I4(v) => fmt_elements(f, v),
            Item::I8(v) => fmt_elements(f, v),
            Item::U1(v) => fmt_elements(f, v),
            Item::U2(v) => fmt_elements(f, v),
            Item::U4(v) => fmt_elements(f, v),
            Item::U8(v) => fmt_elements(f, v),
            Item::F4(v) => fmt_elements(f, v),
            Item::F8(v) => fmt_elements(f, v),
        }
    }
}

fn fmt_elements<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for v in values {
        write!(f, " {}", v)?;
    }
    write!(f, ">")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_overflow_rejected() {
        let children: Vec<Item> = (0..256).map(|_| Item::empty_list()).collect();
        assert!(matches!(
            Item::list(children),
            Err(SecsError::ListOverflow(256))
        ));
        let children: Vec<Item> = (0..255).map(|_| Item::empty_list()).collect();
        assert!(Item::list(children).is_ok());
    }

    #[test]
    fn test_ascii_raw_bytes() {
        let item = Item::ascii("Hello!");
        assert_eq!(
            item.raw_bytes().unwrap(),
            [0x41, 0x06, b'H', b'e', b'l', b'l', b'o', b'!']
        );
    }

    #[test]
    fn test_list_raw_bytes_header_only() {
        let item = Item::list(vec![Item::u2(vec![0x1234]), Item::empty_list()]).unwrap();
        assert_eq!(item.raw_bytes().unwrap(), [0x01, 0x02]);
        assert_eq!(Item::empty_list().raw_bytes().unwrap(), [0x01, 0x00]);
    }

    #[test]
    fn test_numeric_big_endian() {
        assert_eq!(
            Item::u2(vec![0x1234, 0xABCD]).raw_bytes().unwrap(),
            [0xA9, 0x04, 0x12, 0x34, 0xAB, 0xCD]
        );
        assert_eq!(
            Item::i4(vec![-2]).raw_bytes().unwrap(),
            [0x71, 0x04, 0xFF, 0xFF, 0xFF, 0xFE]
        );
        assert_eq!(
            Item::f4(vec![1.0]).raw_bytes().unwrap(),
            [0x91, 0x04, 0x3F, 0x80, 0x00, 0x00]
        );
    }

    #[test]
    fn test_length_bits_boundaries() {
        let item = Item::binary(vec![0u8; 0xFF]);
        assert_eq!(item.raw_bytes().unwrap()[..2], [0x21, 0xFF]);

        let item = Item::binary(vec![0u8; 0x100]);
        assert_eq!(item.raw_bytes().unwrap()[..3], [0x22, 0x01, 0x00]);

        let item = Item::binary(vec![0u8; 0x1_0000]);
        assert_eq!(item.raw_bytes().unwrap()[..4], [0x23, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_item_oversize() {
        let item = Item::binary(vec![0u8; MAX_ITEM_LEN + 1]);
        assert!(matches!(
            item.raw_bytes(),
            Err(SecsError::ItemOversize(n)) if n == MAX_ITEM_LEN + 1
        ));
    }

    #[test]
    fn test_bool_encoding() {
        assert_eq!(
            Item::bools(vec![true, false]).raw_bytes().unwrap(),
            [0x25, 0x02, 0x01, 0x00]
        );
    }

    #[test]
    fn test_non_ascii_substituted() {
        let item = Item::ascii("a€b");
        assert_eq!(item.raw_bytes().unwrap(), [0x41, 0x03, b'a', b'?', b'b']);
    }

    #[test]
    fn test_accessors_enforce_format() {
        let item = Item::u2(vec![7]);
        assert_eq!(item.as_u2().unwrap(), &[7]);
        assert!(matches!(
            item.as_str(),
            Err(SecsError::WrongFormat { expected: "A or J", .. })
        ));
        assert!(item.as_u4().is_err());

        let list = Item::list(vec![Item::ascii("x")]).unwrap();
        assert_eq!(list.children().unwrap().len(), 1);
        assert!(list.as_binary().is_err());
    }

    #[test]
    fn test_first_u4() {
        assert_eq!(Item::u4(vec![9, 10]).first_u4().unwrap(), 9);
        assert!(matches!(
            Item::u4(vec![]).first_u4(),
            Err(SecsError::WrongFormat { expected: "non-empty U4", .. })
        ));
        assert!(matches!(
            Item::u2(vec![9]).first_u4(),
            Err(SecsError::WrongFormat { expected: "U4", .. })
        ));
    }

    #[test]
    fn test_matches_wildcard_and_recursion() {
        let value = Item::list(vec![
            Item::u2(vec![0x1234]),
            Item::ascii("PPID-1"),
        ])
        .unwrap();

        // Empty template of the right format is a wildcard.
        let wildcard = Item::list(vec![]).unwrap();
        assert!(value.matches(&wildcard));
        assert!(Item::ascii("PPID-1").matches(&Item::ascii("")));

        // Positional recursion with a nested wildcard.
        let template = Item::list(vec![Item::u2(vec![]), Item::ascii("PPID-1")]).unwrap();
        assert!(value.matches(&template));

        // Count mismatch and format mismatch both fail.
        let template = Item::list(vec![Item::u2(vec![1, 2]), Item::ascii("PPID-1")]).unwrap();
        assert!(!value.matches(&template));
        assert!(!value.matches(&Item::binary(vec![])));

        // Value mismatch fails.
        let template = Item::list(vec![Item::u2(vec![0x9999]), Item::ascii("PPID-1")]).unwrap();
        assert!(!value.matches(&template));
    }

    #[test]
    fn test_sml_rendering() {
        let item = Item::list(vec![
            Item::u2(vec![0x1234]),
            Item::empty_list(),
        ])
        .unwrap();
        let rendered = item.to_string();
        assert_eq!(
            rendered,
            "<L [2]\n  <U2 [1] 4660>\n  <L [0]>\n>"
        );
        assert_eq!(Item::ascii("Hi").to_string(), "<A [2] \"Hi\">");
        assert_eq!(Item::binary(vec![0xAB]).to_string(), "<B [1] 0xAB>");
    }
}
