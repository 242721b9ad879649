use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Packet types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MsgType {
    /// Relay → bot: one platform event
    Event = 0x01,
    /// Bot → relay: event accepted
    EventAck = 0x02,
}

impl MsgType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x01 => Some(Self::Event),
            0x02 => Some(Self::EventAck),
            _ => None,
        }
    }
}

/// Event payload carried in an `Event` packet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPayload {
    /// Raw event JSON as delivered by the platform
    pub body: String,
}

/// Event handed from the intake to the dispatcher
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub body: String,
    pub source_addr: SocketAddr,
}
