//! SECS-II / HSMS Codec Example
//!
//! This example demonstrates how to:
//! - Build item trees with the per-format factories
//! - Encode a message into wire fragments
//! - Decode a byte stream incrementally, one byte at a time
//! - Match decoded items against templates

use std::sync::{Arc, Mutex};

use secstream::models::encoders::secs::{encode_frame, frame_fragments};
use secstream::{HsmsFrame, Item, MessageHeader, SecsDecoder, SecsMessage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("SECS-II / HSMS Codec Example");
    println!("============================");

    println!("\n1. Building and rendering an item tree");
    let root = event_report()?;
    println!("{}", root);

    println!("\n2. Encoding a frame");
    let header = MessageHeader::data(0, 6, 11, true, 1);
    let fragments = frame_fragments(&header, Some(&root))?;
    println!("  {} scatter/gather fragments", fragments.len());
    for (i, fragment) in fragments.iter().enumerate() {
        println!("  Fragment {}: {:02X?}", i, fragment);
    }
    let wire = encode_frame(&header, Some(&root))?;
    println!("  Contiguous frame: {} bytes", wire.len());

    println!("\n3. Incremental decoding, one byte at a time");
    let frames = Arc::new(Mutex::new(Vec::new()));
    let control_frames = Arc::clone(&frames);
    let data_frames = Arc::clone(&frames);
    let mut decoder = SecsDecoder::new(
        64,
        move |h| control_frames.lock().unwrap().push(HsmsFrame::Control(h)),
        move |h, m| data_frames.lock().unwrap().push(HsmsFrame::Data(h, m)),
    );
    for byte in &wire {
        decoder.write_buffer()[0] = *byte;
        decoder.decode(1)?;
    }
    let frames = frames.lock().unwrap();
    let decoded = match frames.as_slice() {
        [HsmsFrame::Data(decoded_header, message)] => {
            println!("  Decoded {} (system bytes {})", message, decoded_header.system_bytes);
            message.clone()
        }
        other => panic!("expected exactly one data frame, got {:?}", other),
    };
    assert_eq!(decoded.root.as_ref(), Some(&root));
    println!("  ✓ Round trip is structurally identical");

    println!("\n4. Template matching");
    let template = Item::list(vec![
        Item::u4(vec![]), // wildcard: any data id
        Item::ascii("MEASUREMENT"),
        Item::list(vec![]).unwrap(),
    ])?;
    assert!(root.matches(&template));
    println!("  ✓ Report matches the MEASUREMENT template");

    println!("\n5. Control frames");
    let select = SecsMessage::header_only(1, 13, true);
    println!("  {} encodes header-only; select.req bytes:", select);
    println!("  {:02X?}", encode_frame(&MessageHeader::select_req(1), None)?);

    println!("\n✓ All codec examples completed successfully!");
    Ok(())
}

fn event_report() -> Result<Item, Box<dyn std::error::Error>> {
    Ok(Item::list(vec![
        Item::u4(vec![1001]),
        Item::ascii("MEASUREMENT"),
        Item::list(vec![
            Item::f8(vec![0.000124, 0.000119]),
            Item::u2(vec![240, 241]),
            Item::jis8("ﾁｬﾝﾊﾞ A"),
        ])?,
    ])?)
}
