//! Fixed 8-byte response header.

use serde::Serialize;

use super::error::{Result, ZkError};
use super::protocol::HEADER_SIZE;

/// Header at the start of every device response.
///
/// Layout (all fields u16 LE):
/// - Bytes 0-1: Command id
/// - Bytes 2-3: Checksum (not verified)
/// - Bytes 4-5: Session id
/// - Bytes 6-7: Reply id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseHeader {
    pub command_id: u16,
    pub checksum: u16,
    pub session_id: u16,
    pub reply_id: u16,
}

impl ResponseHeader {
    /// Read the header from the start of `bytes`.
    ///
    /// # Errors
    /// Returns `ZkError::BufferUnderrun` if fewer than 8 bytes are present.
    pub fn read(bytes: &[u8]) -> Result<Self> {
        ZkError::ensure_len(bytes, HEADER_SIZE)?;

        Ok(Self {
            command_id: u16::from_le_bytes([bytes[0], bytes[1]]),
            checksum: u16::from_le_bytes([bytes[2], bytes[3]]),
            session_id: u16::from_le_bytes([bytes[4], bytes[5]]),
            reply_id: u16::from_le_bytes([bytes[6], bytes[7]]),
        })
    }
}
