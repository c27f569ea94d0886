//! In-memory roundtrip integration test.
//!
//! Wires a frame writer to a message stream over `tokio::io::duplex`,
//! sends a session's worth of mixed frames from one task, and verifies
//! they arrive decoded and in order.

use futures_util::StreamExt;

use secstream::constants::DEFAULT_DECODE_BUFFER;
use secstream::enums::BufferChunkSize;
use secstream::models::streams::message_stream::MessageStream;
use secstream::models::streams::reader::ReaderByteStream;
use secstream::models::writers::frame_writer::FrameWriter;
use secstream::{HsmsFrame, Item, MessageHeader, MessageType, SecsMessage};

fn process_program() -> Item {
    Item::list(vec![
        Item::ascii("PP-CASSETTE-7"),
        Item::list(vec![
            Item::u2(vec![0x0101, 0x0202]),
            Item::f8(vec![451.5]),
            Item::empty_list(),
        ])
        .unwrap(),
        Item::binary(vec![0x01, 0x02, 0x03]),
    ])
    .unwrap()
}

/// Select, data traffic, and linktest survive the trip in order.
#[tokio::test]
async fn test_duplex_session_roundtrip() {
    let (client, server) = tokio::io::duplex(256);
    let (server_read, _server_write) = tokio::io::split(server);

    let writer_handle = tokio::spawn(async move {
        let mut writer = FrameWriter::new(client);
        writer.write_control(&MessageHeader::select_req(1)).await.unwrap();

        let report = SecsMessage::new(6, 11, true, "EventReport", Some(process_program()));
        writer.write_message(17, 2, &report).await.unwrap();

        let are_you_there = SecsMessage::header_only(1, 1, true);
        writer.write_message(17, 3, &are_you_there).await.unwrap();

        writer.write_control(&MessageHeader::linktest_req(4)).await.unwrap();
        writer.flush().await.unwrap();
        // Writer drops here, closing the duplex and ending the stream.
    });

    let bytes = ReaderByteStream::new(server_read, BufferChunkSize::Custom(32));
    let mut frames = MessageStream::new(bytes, DEFAULT_DECODE_BUFFER);

    let frame = frames.next().await.unwrap().unwrap();
    match frame {
        HsmsFrame::Control(header) => {
            assert_eq!(header.message_type(), MessageType::SelectRequest);
            assert_eq!(header.system_bytes, 1);
        }
        other => panic!("expected select.req, got {:?}", other),
    }

    let frame = frames.next().await.unwrap().unwrap();
    match frame {
        HsmsFrame::Data(header, message) => {
            assert_eq!(header.device_id, 17);
            assert_eq!(header.system_bytes, 2);
            assert_eq!(message.s, 6);
            assert_eq!(message.f, 11);
            assert!(message.reply_expected);
            assert_eq!(message.root, Some(process_program()));
        }
        other => panic!("expected S6F11, got {:?}", other),
    }

    let frame = frames.next().await.unwrap().unwrap();
    match frame {
        HsmsFrame::Data(header, message) => {
            assert_eq!(header.system_bytes, 3);
            assert_eq!(message.s, 1);
            assert_eq!(message.f, 1);
            assert_eq!(message.root, None);
        }
        other => panic!("expected S1F1, got {:?}", other),
    }

    let frame = frames.next().await.unwrap().unwrap();
    assert!(matches!(frame, HsmsFrame::Control(h) if h.s_type == 5));

    assert!(frames.next().await.is_none());
    writer_handle.await.unwrap();
}

/// A connection dropped mid-frame surfaces as `UnexpectedEof`.
#[tokio::test]
async fn test_truncated_frame_is_an_error() {
    let (mut client, server) = tokio::io::duplex(256);
    let (server_read, _server_write) = tokio::io::split(server);

    tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        // Frame announces 18 payload bytes but the peer dies after 6.
        client
            .write_all(&[0x00, 0x00, 0x00, 0x12, 0x00, 0x11])
            .await
            .unwrap();
    });

    let bytes = ReaderByteStream::new(server_read, BufferChunkSize::Custom(32));
    let mut frames = MessageStream::new(bytes, DEFAULT_DECODE_BUFFER);

    let err = frames.next().await.unwrap().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

/// Corrupt item data inside a frame surfaces as `InvalidData`.
#[tokio::test]
async fn test_protocol_fault_is_an_error() {
    let (mut client, server) = tokio::io::duplex(256);
    let (server_read, _server_write) = tokio::io::split(server);

    tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        // 13-byte payload whose item carries an undefined format code.
        client
            .write_all(&[
                0x00, 0x00, 0x00, 0x0D, 0x00, 0x11, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x01, 0xFD, 0x01, 0x00,
            ])
            .await
            .unwrap();
    });

    let bytes = ReaderByteStream::new(server_read, BufferChunkSize::Custom(8));
    let mut frames = MessageStream::new(bytes, DEFAULT_DECODE_BUFFER);

    let err = frames.next().await.unwrap().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}
