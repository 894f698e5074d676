//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//! ```text
//! ┌────────────┬──────────────────────────┬──────────────┬──────────────┐
//! │ Total (4)  │ Type (1) │ HeaderLen (3) │ Header (JSON)│ Body (raw)   │
//! └────────────┴──────────────────────────┴──────────────┴──────────────┘
//! ```
//! - `Total` counts everything after itself: `4 + header_len + body_len`
//! - `Type` is the serialization type of the header (only JSON is supported)
//! - All integers are big-endian

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::Command;
use crate::error::{RemotingError, Result};

/// Size of the total-length prefix and of the header-length field
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Smallest buffer `decode_frame` can make sense of
pub const MIN_FRAME_SIZE: usize = 2 * LENGTH_FIELD_SIZE;

/// Low 24 bits of the second field carry the header length
pub const HEADER_LENGTH_MASK: u32 = 0x00FF_FFFF;

/// Serialization type of the header document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SerializeType {
    Json = 0,
    /// The peer's compact binary header; recognized but not implemented
    RocketMq = 1,
}

impl SerializeType {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(SerializeType::Json),
            1 => Some(SerializeType::RocketMq),
            _ => None,
        }
    }
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command into a complete frame, length prefix included
pub fn encode(command: &Command) -> Result<Bytes> {
    let header = serde_json::to_vec(command)?;
    if header.len() > HEADER_LENGTH_MASK as usize {
        return Err(RemotingError::Protocol(format!(
            "Header too large: {} bytes (max {})",
            header.len(),
            HEADER_LENGTH_MASK
        )));
    }

    let body = command.body();
    let total_len = u32::try_from(LENGTH_FIELD_SIZE + header.len() + body.len()).map_err(|_| {
        RemotingError::Protocol(format!("Body too large: {} bytes", body.len()))
    })?;

    let mut frame = BytesMut::with_capacity(LENGTH_FIELD_SIZE + total_len as usize);
    frame.put_u32(total_len);
    frame.put_u32(header.len() as u32 | (SerializeType::Json as u32) << 24);
    frame.put_slice(&header);
    frame.put_slice(body);

    Ok(frame.freeze())
}

/// Decode a frame whose total-length prefix has already been stripped
pub fn decode(bytes: &[u8]) -> Result<Command> {
    decode_bytes(Bytes::copy_from_slice(bytes))
}

/// Like `decode`, but the body shares `payload`'s buffer instead of copying
pub fn decode_bytes(payload: Bytes) -> Result<Command> {
    if payload.len() < MIN_FRAME_SIZE {
        return Err(RemotingError::Protocol(format!(
            "Incomplete frame: expected at least {} bytes, got {}",
            MIN_FRAME_SIZE,
            payload.len()
        )));
    }

    let field = (&payload[..LENGTH_FIELD_SIZE]).get_u32();
    let serialize_type = (field >> 24) as u8;
    let header_len = (field & HEADER_LENGTH_MASK) as usize;

    match SerializeType::from_byte(serialize_type) {
        Some(SerializeType::Json) => {}
        Some(other) => {
            return Err(RemotingError::Protocol(format!(
                "Unsupported header serialization: {:?}",
                other
            )))
        }
        None => {
            return Err(RemotingError::Protocol(format!(
                "Unknown header serialization type: 0x{:02x}",
                serialize_type
            )))
        }
    }

    let available = payload.len() - LENGTH_FIELD_SIZE;
    if header_len > available {
        return Err(RemotingError::Protocol(format!(
            "Incomplete header: declared {} bytes, got {}",
            header_len, available
        )));
    }

    let header_end = LENGTH_FIELD_SIZE + header_len;
    let mut command: Command = serde_json::from_slice(&payload[LENGTH_FIELD_SIZE..header_end])
        .map_err(|e| RemotingError::Protocol(format!("Invalid header: {}", e)))?;
    command.set_body(payload.slice(header_end..));

    Ok(command)
}

/// Decode a complete frame, length prefix included
pub fn decode_frame(frame: &[u8]) -> Result<Command> {
    if frame.len() < MIN_FRAME_SIZE {
        return Err(RemotingError::Protocol(format!(
            "Incomplete frame: expected at least {} bytes, got {}",
            MIN_FRAME_SIZE,
            frame.len()
        )));
    }

    let total_len = (&frame[..LENGTH_FIELD_SIZE]).get_u32() as usize;
    let available = frame.len() - LENGTH_FIELD_SIZE;
    if total_len != available {
        return Err(RemotingError::Protocol(format!(
            "Frame length mismatch: declared {} bytes, got {}",
            total_len, available
        )));
    }

    decode(&frame[LENGTH_FIELD_SIZE..])
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one length-delimited frame from a stream, prefix stripped
///
/// Blocks until the whole frame is received. A declared length above
/// `max_frame_size` is refused without reading further, so the caller
/// must treat the stream as desynchronized.
pub fn read_frame<R: Read>(reader: &mut R, max_frame_size: usize) -> Result<Bytes> {
    let mut prefix = [0u8; LENGTH_FIELD_SIZE];
    reader.read_exact(&mut prefix)?;

    let frame_len = u32::from_be_bytes(prefix) as usize;
    if frame_len > max_frame_size {
        return Err(RemotingError::FrameTooLarge {
            size: frame_len,
            max: max_frame_size,
        });
    }

    let mut payload = vec![0u8; frame_len];
    if frame_len > 0 {
        reader.read_exact(&mut payload)?;
    }

    Ok(Bytes::from(payload))
}

/// Read and decode one command from a stream
pub fn read_command<R: Read>(reader: &mut R, max_frame_size: usize) -> Result<Command> {
    let payload = read_frame(reader, max_frame_size)?;
    decode_bytes(payload)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let frame = encode(command)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;

    #[test]
    fn test_header_length_field_layout() {
        let cmd = Command::response(0, 5).with_body(&b"xyz"[..]);
        let frame = encode(&cmd).unwrap();

        let total = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
        let field = u32::from_be_bytes([frame[4], frame[5], frame[6], frame[7]]);
        let header_len = (field & HEADER_LENGTH_MASK) as usize;

        assert_eq!(field >> 24, 0);
        assert_eq!(total, frame.len() - 4);
        assert_eq!(total, 4 + header_len + 3);
        assert_eq!(&frame[frame.len() - 3..], b"xyz");
    }

    #[test]
    fn test_header_omits_body() {
        let cmd = Command::request(106, HashMap::new()).with_body(&b"secret"[..]);
        let frame = encode(&cmd).unwrap();
        let field = u32::from_be_bytes([frame[4], frame[5], frame[6], frame[7]]);
        let header = &frame[8..8 + (field & HEADER_LENGTH_MASK) as usize];
        let json: serde_json::Value = serde_json::from_slice(header).unwrap();

        assert!(json.get("body").is_none());
        assert_eq!(json["code"], 106);
        assert_eq!(json["language"], "RUST");
        assert!(json["extFields"].is_object());
    }

    #[test]
    fn test_read_frame_rejects_oversized_length() {
        let mut stream = Cursor::new(vec![0x7F, 0xFF, 0xFF, 0xFF]);
        let err = read_frame(&mut stream, 1024).unwrap_err();
        assert!(matches!(err, RemotingError::FrameTooLarge { max: 1024, .. }));
    }

    #[test]
    fn test_read_frame_truncated_stream_is_io_error() {
        let mut stream = Cursor::new(vec![0, 0, 0, 10, 1, 2]);
        let err = read_frame(&mut stream, 1024).unwrap_err();
        assert!(matches!(err, RemotingError::Io(_)));
    }
}
