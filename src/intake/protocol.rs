use crate::intake::error::IntakeError;
use crate::intake::types::{EventPayload, MsgType};
use rmp_serde::decode::Deserializer;
use rmp_serde::encode::Serializer;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::result::Result as StdResult;

/// Header size: type (1) + seq (4)
pub const HEADER_LEN: usize = 5;

/// Encode a packet with given type, sequence, and optional payload
pub fn encode_packet(
    msg_type: MsgType,
    seq: u32,
    payload: Option<&impl Serialize>,
) -> StdResult<Vec<u8>, IntakeError> {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    buf.push(msg_type as u8);
    buf.extend_from_slice(&seq.to_be_bytes());

    if let Some(p) = payload {
        let mut ser = Serializer::new(&mut buf);
        p.serialize(&mut ser)
            .map_err(|e| IntakeError::EncodeError(e.to_string()))?;
    }

    Ok(buf)
}

/// Decode packet type and seq from raw bytes
pub fn decode_header(data: &[u8]) -> StdResult<(MsgType, u32), IntakeError> {
    if data.len() < HEADER_LEN {
        return Err(IntakeError::DecodeError("Packet too short".to_string()));
    }

    let msg_type = MsgType::from_u8(data[0])
        .ok_or_else(|| IntakeError::DecodeError(format!("Unknown msg type: {}", data[0])))?;
    let seq = u32::from_be_bytes([data[1], data[2], data[3], data[4]]);

    Ok((msg_type, seq))
}

pub fn decode_event_payload(data: &[u8]) -> StdResult<EventPayload, IntakeError> {
    let mut de = Deserializer::new(Cursor::new(data));
    EventPayload::deserialize(&mut de).map_err(|e| IntakeError::DecodeError(e.to_string()))
}

/// Encode an event packet
pub fn encode_event(seq: u32, body: impl Into<String>) -> StdResult<Vec<u8>, IntakeError> {
    let payload = EventPayload { body: body.into() };
    encode_packet(MsgType::Event, seq, Some(&payload))
}

/// Encode event ack (no payload)
pub fn encode_event_ack(seq: u32) -> StdResult<Vec<u8>, IntakeError> {
    encode_packet(MsgType::EventAck, seq, None::<&()>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_packet_carries_body() {
        let body = r#"{"type":"reaction_added","user":"U1","reaction":"repeat","item":{"type":"file","file":"F1"}}"#;
        let packet = encode_event(7, body).unwrap();

        let (msg_type, seq) = decode_header(&packet).unwrap();
        assert_eq!(msg_type, MsgType::Event);
        assert_eq!(seq, 7);

        let payload = decode_event_payload(&packet[HEADER_LEN..]).unwrap();
        assert_eq!(payload.body, body);
    }

    #[test]
    fn test_ack_has_no_payload() {
        let packet = encode_event_ack(42).unwrap();
        assert_eq!(packet.len(), HEADER_LEN);

        let (msg_type, seq) = decode_header(&packet).unwrap();
        assert_eq!(msg_type, MsgType::EventAck);
        assert_eq!(seq, 42);
    }

    #[test]
    fn test_seq_is_big_endian() {
        let packet = encode_event_ack(256).unwrap();
        assert_eq!(&packet[1..HEADER_LEN], &[0x00, 0x00, 0x01, 0x00]);

        let (_, seq) = decode_header(&encode_event_ack(u32::MAX).unwrap()).unwrap();
        assert_eq!(seq, u32::MAX);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let mut packet = vec![0xFFu8];
        packet.extend_from_slice(&1u32.to_be_bytes());

        let result = decode_header(&packet);
        assert!(matches!(result, Err(IntakeError::DecodeError(_))));
    }

    #[test]
    fn test_truncated_header_rejected() {
        assert!(decode_header(&[0x01, 0x00, 0x00]).is_err());
        assert!(decode_header(&[0x01, 0x00, 0x00, 0x00, 0x01]).is_ok());
    }

    #[test]
    fn test_garbage_payload_rejected() {
        assert!(decode_event_payload(&[0xc1, 0x00]).is_err());
    }
}
