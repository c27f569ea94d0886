//! Codec round-trip and buffer-management properties.
//!
//! Frames are encoded with the public encoder, then pushed through a
//! fresh decoder — whole, chunked, and byte-at-a-time — and the emitted
//! messages are compared structurally against the originals.

use std::sync::{Arc, Mutex};

use secstream::models::decoders::item::decode_item;
use secstream::models::encoders::secs::encode_frame;
use secstream::{HsmsFrame, Item, MessageHeader, SecsDecoder, SecsError};

fn collecting_decoder(initial: usize) -> (SecsDecoder, Arc<Mutex<Vec<HsmsFrame>>>) {
    let frames = Arc::new(Mutex::new(Vec::new()));
    let control_frames = Arc::clone(&frames);
    let data_frames = Arc::clone(&frames);
    let decoder = SecsDecoder::new(
        initial,
        move |header| control_frames.lock().unwrap().push(HsmsFrame::Control(header)),
        move |header, message| {
            data_frames.lock().unwrap().push(HsmsFrame::Data(header, message))
        },
    );
    (decoder, frames)
}

fn feed(decoder: &mut SecsDecoder, input: &[u8], chunk: usize) {
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

fn fixture_trees() -> Vec<Item> {
    vec![
        Item::ascii("Hello!"),
        Item::jis8("¥ﾃﾞｰﾀ"),
        Item::binary(vec![0x00, 0xFF, 0x7E]),
        Item::bools(vec![true, false]),
        Item::u1(vec![1, 2, 3]),
        Item::i8(vec![i64::MIN, -1, i64::MAX]),
        Item::f8(vec![0.5, -1024.75]),
        Item::empty_list(),
        Item::list(vec![
            Item::ascii("PPID"),
            Item::list(vec![
                Item::u2(vec![0x1234, 0xFFFF]),
                Item::list(vec![Item::f4(vec![2.5]), Item::empty_list()]).unwrap(),
            ])
            .unwrap(),
            Item::i4(vec![-1, 0, 1]),
        ])
        .unwrap(),
    ]
}

fn data_frame(root: &Item) -> Vec<u8> {
    let header = MessageHeader::data(1, 6, 11, false, 42);
    encode_frame(&header, Some(root)).unwrap()
}

/// Every fixture tree survives encode → decode structurally intact.
#[test]
fn test_roundtrip_whole_frames() {
    for tree in fixture_trees() {
        let (mut decoder, frames) = collecting_decoder(4096);
        let wire = data_frame(&tree);
        feed(&mut decoder, &wire, wire.len());

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 1, "tree: {}", tree);
        match &frames[0] {
            HsmsFrame::Data(_, message) => assert_eq!(message.root.as_ref(), Some(&tree)),
            other => panic!("expected data frame, got {:?}", other),
        }
    }
}

/// Chunk independence: any partition of the stream yields the same
/// messages as a single delivery.
#[test]
fn test_roundtrip_all_chunk_sizes() {
    let tree = fixture_trees().pop().unwrap();
    let wire = data_frame(&tree);

    for chunk in 1..=wire.len() {
        let (mut decoder, frames) = collecting_decoder(4096);
        feed(&mut decoder, &wire, chunk);

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 1, "chunk size {}", chunk);
        match &frames[0] {
            HsmsFrame::Data(_, message) => assert_eq!(message.root.as_ref(), Some(&tree)),
            other => panic!("expected data frame, got {:?}", other),
        }
    }
}

/// A back-to-back stream of mixed frames decodes identically whether
/// delivered in one chunk or byte-at-a-time.
#[test]
fn test_mixed_stream_chunking_equivalence() {
    let mut wire = Vec::new();
    for tree in fixture_trees() {
        wire.extend_from_slice(&data_frame(&tree));
    }
    wire.extend_from_slice(&encode_frame(&MessageHeader::linktest_req(9), None).unwrap());
    wire.extend_from_slice(
        &encode_frame(&MessageHeader::data(1, 1, 13, true, 7), None).unwrap(),
    );

    let (mut one_shot, expected) = collecting_decoder(4096);
    feed(&mut one_shot, &wire, wire.len());

    let (mut trickle, actual) = collecting_decoder(4096);
    feed(&mut trickle, &wire, 1);

    assert_eq!(&*expected.lock().unwrap(), &*actual.lock().unwrap());
    assert!(one_shot.is_idle());
    assert!(trickle.is_idle());
}

/// After a stream of varied frame sizes the buffer stays bounded by
/// twice the largest frame seen (plus slack for the initial size).
#[test]
fn test_buffer_recycling_bound() {
    let (mut decoder, frames) = collecting_decoder(64);

    // Deterministic varied sizes, largest first checked at the end.
    let mut max_frame = 0usize;
    let mut seed = 0x2F6E_2B1Du32;
    for _ in 0..40 {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let payload = 16 + (seed % 3000) as usize;
        let wire = data_frame(&Item::binary(vec![0x5A; payload]));
        max_frame = max_frame.max(wire.len());
        // Ragged chunking so frames straddle decode calls.
        feed(&mut decoder, &wire, 97);
    }

    assert_eq!(frames.lock().unwrap().len(), 40);
    assert!(
        decoder.buffer_capacity() <= 2 * (max_frame + 32),
        "capacity {} exceeds bound for max frame {}",
        decoder.buffer_capacity(),
        max_frame
    );
}

/// Per-format element round trip through the wire form.
#[test]
fn test_format_dispatch_elementwise() {
    let items = vec![
        Item::i1(vec![i8::MIN, -1, 0, 1, i8::MAX]),
        Item::i2(vec![i16::MIN, -256, 256, i16::MAX]),
        Item::i4(vec![i32::MIN, -65536, 65536, i32::MAX]),
        Item::i8(vec![i64::MIN, 0, i64::MAX]),
        Item::u1(vec![0, 1, 128, 255]),
        Item::u2(vec![0, 0x0102, 0xFFFF]),
        Item::u4(vec![0, 0x0102_0304, u32::MAX]),
        Item::u8(vec![0, 0x0102_0304_0506_0708, u64::MAX]),
        Item::f4(vec![0.0, -1.5, f32::MAX]),
        Item::f8(vec![0.0, 2.5e-10, f64::MIN]),
        Item::bools(vec![true, false, true]),
    ];
    for item in items {
        let wire = item.raw_bytes().unwrap();
        let (decoded, consumed) = decode_item(&wire).unwrap();
        assert_eq!(consumed, wire.len());
        assert_eq!(decoded, item);
    }
}

/// Encode-side list cap and decode of an empty list declaration.
#[test]
fn test_list_capacity() {
    let children: Vec<Item> = (0..256).map(|_| Item::u1(vec![1])).collect();
    assert!(matches!(
        Item::list(children),
        Err(SecsError::ListOverflow(256))
    ));

    // An empty list as the whole payload empties the stack and the
    // message is emitted immediately.
    let (mut decoder, frames) = collecting_decoder(4096);
    let wire = data_frame(&Item::empty_list());
    feed(&mut decoder, &wire, wire.len());
    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 1);
    match &frames[0] {
        HsmsFrame::Data(_, message) => {
            assert_eq!(message.root.as_ref(), Some(&Item::empty_list()));
        }
        other => panic!("expected data frame, got {:?}", other),
    }
}

/// Wire bytes regenerated from a decoded tree are identical to the
/// original frame body.
#[test]
fn test_reencode_byte_equality() {
    for tree in fixture_trees() {
        let wire = data_frame(&tree);
        let (decoded, _) = decode_item(&wire[14..]).unwrap();
        let reencoded = data_frame(&decoded);
        assert_eq!(wire, reencoded, "tree: {}", tree);
    }
}
