//! HSMS-over-TCP Example
//!
//! Spins up an in-process passive endpoint (equipment side) and an
//! active endpoint (host side), completes a select handshake, and
//! exchanges a data message — the minimal HSMS link wiring.

use futures_util::StreamExt;
use tokio::net::TcpListener;

use secstream::enums::BufferChunkSize;
use secstream::models::streams::message_stream::MessageStream;
use secstream::models::streams::tcp::TcpByteStream;
use secstream::models::writers::frame_writer::FrameWriter;
use secstream::{HsmsFrame, Item, MessageHeader, MessageType, SecsMessage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("HSMS-over-TCP Example");
    println!("=====================");

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    println!("Passive endpoint listening on {}", addr);

    // Equipment side: accept, answer the select, echo one report.
    let equipment = tokio::spawn(async move {
        let (socket, peer) = listener.accept().await?;
        println!("[equipment] connection from {}", peer);
        let (read_half, write_half) = socket.into_split();
        let mut frames = MessageStream::new(
            TcpByteStream::from_read_half(read_half, BufferChunkSize::Tcp),
            64 * 1024,
        );
        let mut writer = FrameWriter::new(write_half);

        while let Some(frame) = frames.next().await {
            match frame? {
                HsmsFrame::Control(header) => match header.message_type() {
                    MessageType::SelectRequest => {
                        println!("[equipment] select.req -> select.rsp");
                        writer
                            .write_control(&MessageHeader::select_rsp(0, header.system_bytes))
                            .await?;
                    }
                    MessageType::SeparateRequest => {
                        println!("[equipment] separate.req, closing");
                        break;
                    }
                    other => println!("[equipment] ignoring {:?}", other),
                },
                HsmsFrame::Data(header, message) => {
                    println!("[equipment] received {}", message);
                    if message.reply_expected {
                        let reply = SecsMessage::new(
                            message.s,
                            message.f + 1,
                            false,
                            "",
                            Some(Item::binary(vec![0x00])),
                        );
                        writer
                            .write_message(header.device_id, header.system_bytes, &reply)
                            .await?;
                    }
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
    });

    // Host side: connect, select, send a report, separate.
    let (bytes, write_half) = TcpByteStream::connect(addr, BufferChunkSize::Tcp).await?;
    let mut frames = MessageStream::new(bytes, 64 * 1024);
    let mut writer = FrameWriter::new(write_half);

    writer.write_control(&MessageHeader::select_req(1)).await?;
    match frames.next().await.transpose()? {
        Some(HsmsFrame::Control(header))
            if header.message_type() == MessageType::SelectResponse =>
        {
            println!("[host] selected (status {})", header.function);
        }
        other => panic!("expected select.rsp, got {:?}", other),
    }

    let report = SecsMessage::new(
        6,
        11,
        true,
        "EventReport",
        Some(Item::list(vec![
            Item::u4(vec![42]),
            Item::ascii("PROCESS COMPLETE"),
        ])?),
    );
    writer.write_message(0, 2, &report).await?;
    println!("[host] sent {}", report);

    match frames.next().await.transpose()? {
        Some(HsmsFrame::Data(_, reply)) => println!("[host] got reply {}", reply),
        other => panic!("expected S6F12, got {:?}", other),
    }

    writer.write_control(&MessageHeader::separate_req(3)).await?;
    writer.flush().await?;
    drop(writer);

    equipment.await?.map_err(|e| e.to_string())?;
    println!("\n✓ HSMS link example completed successfully!");
    Ok(())
}
