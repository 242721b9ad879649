//! snipbot CLI client
//!
//! Sends platform events to the snipbot intake socket, the same way a relay
//! does, and waits for the acknowledgement. Useful for driving a local bot
//! without a chat workspace.

use clap::{Parser, Subcommand};
use rmp_serde::encode::Serializer;
use serde::Serialize;
use serde_json::json;
use std::io;
use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Message types
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
enum MsgType {
    Event = 0x01,
    EventAck = 0x02,
}

/// Event payload
#[derive(Debug, Serialize)]
struct EventPayload {
    body: String,
}

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "snipbot-cli")]
#[command(about = "Send chat platform events to a running snipbot")]
struct Args {
    /// Intake address (e.g., 127.0.0.1:9800)
    #[arg(short, long, default_value = "127.0.0.1:9800")]
    target: SocketAddr,

    /// ACK timeout in seconds
    #[arg(long, default_value = "5")]
    timeout: u64,

    /// Maximum send attempts
    #[arg(short, long, default_value = "3")]
    max_retries: u32,

    #[command(subcommand)]
    event: EventCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum EventCommand {
    /// Share a snippet file
    FileShare {
        /// File id
        #[arg(long)]
        id: String,
        /// File type tag (python, ruby, ...)
        #[arg(long)]
        filetype: String,
        /// Private download URL
        #[arg(long)]
        url: String,
    },
    /// Add a reaction to a file
    React {
        /// File id
        #[arg(long)]
        file: String,
        /// Reacting user id
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "repeat")]
        reaction: String,
    },
    /// Post a channel message
    Say {
        #[arg(long)]
        channel: String,
        #[arg(long)]
        user: String,
        text: String,
    },
    /// Send a raw event JSON document
    Raw { body: String },
}

impl EventCommand {
    fn into_body(self) -> String {
        let value = match self {
            EventCommand::FileShare { id, filetype, url } => json!({
                "type": "message",
                "subtype": "file_share",
                "file": {
                    "id": id,
                    "mode": "snippet",
                    "filetype": filetype,
                    "url_private_download": url,
                },
            }),
            EventCommand::React {
                file,
                user,
                reaction,
            } => json!({
                "type": "reaction_added",
                "user": user,
                "reaction": reaction,
                "item": { "type": "file", "file": file },
            }),
            EventCommand::Say {
                channel,
                user,
                text,
            } => json!({
                "type": "message",
                "channel": channel,
                "user": user,
                "text": text,
            }),
            EventCommand::Raw { body } => return body,
        };
        value.to_string()
    }
}

/// Encode an event packet: type (1) + seq (4) + payload
fn encode_event(seq: u32, body: String) -> io::Result<Vec<u8>> {
    let mut packet = vec![MsgType::Event as u8];
    packet.extend_from_slice(&seq.to_be_bytes());

    let mut ser = Serializer::new(&mut packet);
    EventPayload { body }
        .serialize(&mut ser)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(packet)
}

/// Wait for the ACK matching `expected_seq`
async fn wait_for_ack(socket: &UdpSocket, args: &Args, expected_seq: u32) -> io::Result<bool> {
    let mut buf = [0u8; 64];

    match timeout(Duration::from_secs(args.timeout), socket.recv_from(&mut buf)).await {
        Ok(Ok((len, addr))) => {
            if addr != args.target || len < 5 {
                return Ok(false);
            }
            let seq = u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]);
            Ok(buf[0] == MsgType::EventAck as u8 && seq == expected_seq)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Ok(false),
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let body = args.event.clone().into_body();

    // Sequence numbers only need to differ between sends from this process
    let seq = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1);
    let packet = encode_event(seq, body)?;

    let socket = UdpSocket::bind("0.0.0.0:0").await?;

    for attempt in 1..=args.max_retries {
        socket.send_to(&packet, args.target).await?;
        if wait_for_ack(&socket, &args, seq).await? {
            println!("event {} accepted by {}", seq, args.target);
            return Ok(());
        }
        eprintln!("[warning] no ack (attempt {}/{})", attempt, args.max_retries);
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        "snipbot not responding",
    ))
}
