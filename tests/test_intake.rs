// Integration tests for Intake module
// This file should be run with cargo test --test test_intake

#[path = "../src/intake/mod.rs"]
mod intake;

use intake::protocol::{HEADER_LEN, encode_event};
use intake::{InboundEvent, Intake, IntakeConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    });
}

const ACK: u8 = 0x02;

async fn start_intake(config: IntakeConfig) -> (SocketAddr, mpsc::Receiver<InboundEvent>) {
    let (intake, rx) = Intake::new(config).await.unwrap();
    let addr = intake.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = intake.run().await;
    });
    (addr, rx)
}

fn test_config() -> IntakeConfig {
    IntakeConfig {
        listen_addr: "127.0.0.1".to_string(),
        listen_port: 0,
        ..Default::default()
    }
}

async fn recv_ack(socket: &UdpSocket) -> u32 {
    let mut buf = [0u8; 64];
    let (len, _) = timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
        .await
        .expect("ack timeout")
        .unwrap();
    assert_eq!(len, HEADER_LEN);
    assert_eq!(buf[0], ACK);
    u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]])
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// An event is acknowledged and forwarded
    #[tokio::test]
    async fn test_event_forwarded_and_acked() {
        init_tracing();

        let (addr, mut rx) = start_intake(test_config()).await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let body = r#"{"type":"message","text":"hi"}"#;
        client
            .send_to(&encode_event(1, body).unwrap(), addr)
            .await
            .unwrap();

        assert_eq!(recv_ack(&client).await, 1);

        let event = timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.body, body);
        assert_eq!(event.source_addr, client.local_addr().unwrap());
    }

    /// A redelivered sequence is acknowledged again but forwarded once
    #[tokio::test]
    async fn test_duplicate_not_forwarded() {
        init_tracing();

        let (addr, mut rx) = start_intake(test_config()).await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let packet = encode_event(5, r#"{"type":"message"}"#).unwrap();

        client.send_to(&packet, addr).await.unwrap();
        assert_eq!(recv_ack(&client).await, 5);
        client.send_to(&packet, addr).await.unwrap();
        assert_eq!(recv_ack(&client).await, 5);

        assert!(rx.recv().await.is_some());
        assert!(
            timeout(Duration::from_millis(200), rx.recv()).await.is_err(),
            "duplicate must not be forwarded"
        );
    }

    /// Distinct sequences are all forwarded in order
    #[tokio::test]
    async fn test_distinct_sequences_forwarded() {
        init_tracing();

        let (addr, mut rx) = start_intake(test_config()).await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        for seq in 1..=3u32 {
            let body = format!(r#"{{"n":{}}}"#, seq);
            client
                .send_to(&encode_event(seq, body).unwrap(), addr)
                .await
                .unwrap();
            assert_eq!(recv_ack(&client).await, seq);
        }

        for seq in 1..=3u32 {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.body, format!(r#"{{"n":{}}}"#, seq));
        }
    }

    /// Truncated and oversized packets are dropped without an ack
    #[tokio::test]
    async fn test_bad_packets_dropped() {
        init_tracing();

        let config = IntakeConfig {
            max_payload_bytes: 64,
            ..test_config()
        };
        let (addr, mut rx) = start_intake(config).await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        client.send_to(&[0x01, 0x00], addr).await.unwrap();
        client
            .send_to(&encode_event(9, "x".repeat(500)).unwrap(), addr)
            .await
            .unwrap();

        let mut buf = [0u8; 64];
        assert!(
            timeout(Duration::from_millis(200), client.recv_from(&mut buf))
                .await
                .is_err()
        );

        // The server keeps serving afterwards
        client
            .send_to(&encode_event(10, "{}").unwrap(), addr)
            .await
            .unwrap();
        assert_eq!(recv_ack(&client).await, 10);
        assert_eq!(rx.recv().await.unwrap().body, "{}");
    }

    /// An undecodable payload is not acked, and the same seq can be retried
    #[tokio::test]
    async fn test_bad_payload_can_be_retried() {
        init_tracing();

        let (addr, mut rx) = start_intake(test_config()).await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let mut broken = vec![0x01u8];
        broken.extend_from_slice(&3u32.to_be_bytes());
        broken.extend_from_slice(&[0xc1]);
        client.send_to(&broken, addr).await.unwrap();

        let mut buf = [0u8; 64];
        assert!(
            timeout(Duration::from_millis(200), client.recv_from(&mut buf))
                .await
                .is_err()
        );

        client
            .send_to(&encode_event(3, "{}").unwrap(), addr)
            .await
            .unwrap();
        assert_eq!(recv_ack(&client).await, 3);
        assert!(rx.recv().await.is_some());
    }
}
