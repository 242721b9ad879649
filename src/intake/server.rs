use crate::intake::config::IntakeConfig;
use crate::intake::dedup::DedupTable;
use crate::intake::error::{IntakeError, IntakeInitError};
use crate::intake::protocol::{HEADER_LEN, decode_event_payload, decode_header, encode_event_ack};
use crate::intake::types::{InboundEvent, MsgType};
use std::net::SocketAddr;
use std::result::Result as StdResult;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};

/// Intake server - acknowledges relayed events and forwards each one once
pub struct Intake {
    socket: UdpSocket,
    config: IntakeConfig,
    /// Channel sender towards the dispatcher
    event_sender: mpsc::Sender<InboundEvent>,
    /// Per-relay sequence numbers already forwarded
    dedup: Mutex<DedupTable>,
}

impl Intake {
    /// Bind the UDP socket.
    /// Returns the intake and the receiver the dispatcher reads from.
    pub async fn new(
        config: IntakeConfig,
    ) -> StdResult<(Intake, mpsc::Receiver<InboundEvent>), IntakeInitError> {
        let addr = config
            .socket_addr()
            .map_err(|_| IntakeInitError::InvalidAddress(config.bind_addr()))?;
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| IntakeInitError::BindFailed(e.to_string()))?;

        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let dedup = DedupTable::new(
            config.dedup_capacity,
            Duration::from_secs(config.dedup_ttl_secs),
        );

        Ok((
            Self {
                socket,
                config,
                event_sender: tx,
                dedup: Mutex::new(dedup),
            },
            rx,
        ))
    }

    /// Get local socket address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receive loop; returns on socket failure or when the dispatcher is gone
    pub async fn run(self) -> StdResult<(), IntakeError> {
        let mut buf = vec![0u8; self.config.max_payload_bytes + HEADER_LEN + 1];
        let mut cleanup_interval = tokio::time::interval(Duration::from_secs(30));

        if let Ok(addr) = self.local_addr() {
            info!(addr = %addr, "intake listening");
        }

        loop {
            tokio::select! {
                result = self.socket.recv_from(&mut buf) => {
                    match result {
                        Ok((len, addr)) => {
                            match self.handle_packet(&buf[..len], addr).await {
                                Err(IntakeError::ChannelClosed) => return Err(IntakeError::ChannelClosed),
                                Err(e) => warn!(from = %addr, error = %e, "failed to handle packet"),
                                Ok(()) => {}
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "recv error");
                            return Err(IntakeError::RecvError(e.to_string()));
                        }
                    }
                }
                _ = cleanup_interval.tick() => {
                    self.cleanup_dedup().await;
                }
            }
        }
    }

    async fn handle_packet(&self, packet: &[u8], relay: SocketAddr) -> StdResult<(), IntakeError> {
        if packet.len() < HEADER_LEN {
            return Err(IntakeError::DecodeError(format!(
                "Packet too short: {} bytes",
                packet.len()
            )));
        }

        let payload_len = packet.len() - HEADER_LEN;
        if payload_len > self.config.max_payload_bytes {
            return Err(IntakeError::PayloadTooLarge(payload_len));
        }

        let (msg_type, seq) = decode_header(packet)?;
        debug!(from = %relay, seq = seq, msg_type = ?msg_type, "packet received");

        match msg_type {
            MsgType::Event => self.handle_event(&packet[HEADER_LEN..], seq, relay).await,
            MsgType::EventAck => {
                warn!(from = %relay, seq = seq, "unexpected ack from relay");
                Ok(())
            }
        }
    }

    async fn handle_event(&self, payload: &[u8], seq: u32, relay: SocketAddr) -> StdResult<(), IntakeError> {
        if !self.dedup.lock().await.admit(relay, seq) {
            info!(from = %relay, seq = seq, "duplicate event, re-acknowledging only");
            return self.send_ack(seq, relay).await;
        }

        let delivered = self.deliver(payload, seq, relay).await;
        if delivered.is_err() {
            // Not acknowledged or not forwarded: the retransmission must get through
            self.dedup.lock().await.release(relay, seq);
        }
        delivered
    }

    /// Decode, acknowledge and forward an admitted event
    async fn deliver(&self, payload: &[u8], seq: u32, relay: SocketAddr) -> StdResult<(), IntakeError> {
        let event = decode_event_payload(payload)?;
        self.send_ack(seq, relay).await?;

        debug!(from = %relay, seq = seq, body_len = event.body.len(), "forwarding event");
        self.event_sender
            .send(InboundEvent {
                body: event.body,
                source_addr: relay,
            })
            .await
            .map_err(|_| IntakeError::ChannelClosed)
    }

    async fn send_ack(&self, seq: u32, relay: SocketAddr) -> StdResult<(), IntakeError> {
        let ack = encode_event_ack(seq)?;
        self.socket
            .send_to(&ack, relay)
            .await
            .map_err(|e| IntakeError::SendError(e.to_string()))?;
        Ok(())
    }

    /// Drop dedup entries older than the TTL
    async fn cleanup_dedup(&self) {
        let relays = self.dedup.lock().await.cleanup();
        debug!(relays = relays, "dedup table cleaned");
    }
}
