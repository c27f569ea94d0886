//! # Test Helpers - *Decoder and Fixture Generators*
//!
//! Shared constructors for unit tests: a decoder whose callbacks collect
//! every emitted frame, chunked feeding, and a deterministic item tree
//! exercising every format family.

use std::sync::{Arc, Mutex};

use crate::models::decoders::secs::SecsDecoder;
use crate::models::frames::message::HsmsFrame;
use crate::models::item::Item;

/// Build a decoder that records every emitted frame, in order, into the
/// returned collector.
pub(crate) fn collecting_decoder(
    initial_buffer_bytes: usize,
) -> (SecsDecoder, Arc<Mutex<Vec<HsmsFrame>>>) {
    let frames = Arc::new(Mutex::new(Vec::new()));
    let control_frames = Arc::clone(&frames);
    let data_frames = Arc::clone(&frames);
    let decoder = SecsDecoder::new(
        initial_buffer_bytes,
        move |header| control_frames.lock().unwrap().push(HsmsFrame::Control(header)),
        move |header, message| {
            data_frames.lock().unwrap().push(HsmsFrame::Data(header, message))
        },
    );
    (decoder, frames)
}

/// Feed `input` to the decoder in chunks of at most `chunk` bytes.
pub(crate) fn feed_in_chunks(decoder: &mut SecsDecoder, input: &[u8], chunk: usize) {
    for piece in input.chunks(chunk) {
        let mut offset = 0;
        while offset < piece.len() {
            let spare = decoder.write_buffer();
            let n = spare.len().min(piece.len() - offset);
            spare[..n].copy_from_slice(&piece[offset..offset + n]);
            decoder.decode(n).unwrap();
            offset += n;
        }
    }
}

/// A 4-row style fixture tree spanning every format family.
pub(crate) fn sample_tree() -> Item {
    Item::list(vec![
        Item::ascii("GLASS-01"),
        Item::jis8("¥ﾛｯﾄ-1"),
        Item::binary(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        Item::bools(vec![true, false, true]),
        Item::list(vec![
            Item::i1(vec![-1, 0, 1]),
            Item::i2(vec![-2, 512]),
            Item::i4(vec![-70000]),
            Item::i8(vec![i64::MIN, i64::MAX]),
        ])
        .unwrap(),
        Item::list(vec![
            Item::u1(vec![0, 127, 255]),
            Item::u2(vec![0x1234]),
            Item::u4(vec![0xDEAD_BEEF]),
            Item::u8(vec![u64::MAX]),
        ])
        .unwrap(),
        Item::f4(vec![1.5, -0.25]),
        Item::f8(vec![6.02214076e23]),
        Item::empty_list(),
    ])
    .unwrap()
}
