//! User record decoding for "list users" payloads.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use super::error::{Result, ZkError};

/// Size of a compact user record in bytes.
pub const COMPACT_RECORD_SIZE: usize = 28;

/// Size of an extended user record in bytes.
pub const EXTENDED_RECORD_SIZE: usize = 72;

/// Fixed-width user record format. One layout applies to a whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    /// 28-byte record with a numeric user id.
    Compact,
    /// 72-byte record with password, card number and a string user id.
    Extended,
}

/// External user identifier. Its shape depends on the record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(u32),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => f.pad(&id.to_string()),
            Self::Text(id) => f.pad(id),
        }
    }
}

/// Device privilege level derived from the role byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    User,
    Enroller,
    Admin,
    SuperAdmin,
    Other(u8),
}

impl From<u8> for Privilege {
    fn from(role: u8) -> Self {
        match role {
            0 => Self::User,
            2 => Self::Enroller,
            6 => Self::Admin,
            14 => Self::SuperAdmin,
            other => Self::Other(other),
        }
    }
}

/// User entry decoded from the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    /// Device-internal numeric id.
    pub uid: u16,
    /// Privilege level, 0 = normal user.
    pub role: u8,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<u32>,
    pub user_id: UserId,
}

impl UserRecord {
    pub fn privilege(&self) -> Privilege {
        Privilege::from(self.role)
    }
}

/// Outcome of decoding a payload, including non-fatal diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDecode {
    pub layout: Option<RecordLayout>,
    pub users: Vec<UserRecord>,
    pub notes: Vec<String>,
}

impl RecordLayout {
    /// Record width in bytes.
    pub fn width(self) -> usize {
        match self {
            Self::Compact => COMPACT_RECORD_SIZE,
            Self::Extended => EXTENDED_RECORD_SIZE,
        }
    }

    /// Select a layout from the payload length.
    ///
    /// Compact is checked first, so lengths divisible by both widths
    /// (multiples of 504) decode as Compact.
    pub fn detect(payload_len: usize) -> Option<Self> {
        if payload_len == 0 {
            return None;
        }
        if payload_len % COMPACT_RECORD_SIZE == 0 {
            Some(Self::Compact)
        } else if payload_len % EXTENDED_RECORD_SIZE == 0 {
            Some(Self::Extended)
        } else {
            None
        }
    }

    /// Decode one record slot.
    ///
    /// Only the first `width()` bytes are examined.
    ///
    /// # Errors
    /// Returns `ZkError::BufferUnderrun` if the slice is shorter than one record.
    pub fn decode(self, slot: &[u8]) -> Result<UserRecord> {
        ZkError::ensure_len(slot, self.width())?;
        Ok(self.decode_slot(&slot[..self.width()]))
    }

    /// Decode a slot already known to be `width()` bytes long.
    pub(crate) fn decode_slot(self, slot: &[u8]) -> UserRecord {
        match self {
            Self::Compact => decode_compact(slot),
            Self::Extended => decode_extended(slot),
        }
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "compact ({COMPACT_RECORD_SIZE} bytes)"),
            Self::Extended => write!(f, "extended ({EXTENDED_RECORD_SIZE} bytes)"),
        }
    }
}

/// Read a NUL-terminated ASCII field from a fixed window.
///
/// The window `[offset, offset + max_len)` is clamped to the end of `bytes`.
/// Decoding stops at the first NUL. Bytes that are not valid UTF-8 (any
/// byte >= 0x80 outside a valid sequence) become U+FFFD instead of failing.
pub fn fixed_ascii_field(bytes: &[u8], offset: usize, max_len: usize) -> String {
    let start = offset.min(bytes.len());
    let end = offset.saturating_add(max_len).min(bytes.len());
    let window = &bytes[start..end];
    let len = window.iter().position(|&b| b == 0).unwrap_or(window.len());
    String::from_utf8_lossy(&window[..len]).into_owned()
}

/// Compact record layout (28 bytes):
/// - Bytes 0-1: uid (u16 LE)
/// - Byte 2: role
/// - Bytes 3-7: Reserved
/// - Bytes 8-15: Name (ASCII, null-padded)
/// - Bytes 16-23: Reserved
/// - Bytes 24-27: User id (u32 LE)
fn decode_compact(slot: &[u8]) -> UserRecord {
    UserRecord {
        uid: u16::from_le_bytes([slot[0], slot[1]]),
        role: slot[2],
        name: fixed_ascii_field(slot, 8, 8),
        password: None,
        card_number: None,
        user_id: UserId::Numeric(u32::from_le_bytes([slot[24], slot[25], slot[26], slot[27]])),
    }
}

/// Extended record layout (72 bytes):
/// - Bytes 0-1: uid (u16 LE)
/// - Byte 2: role
/// - Bytes 3-10: Password (ASCII, null-padded)
/// - Bytes 11-71: Name (ASCII, null-terminated)
/// - Bytes 35-38: Card number (u32 LE)
/// - Bytes 48-56: User id (ASCII, null-padded)
///
/// The name window runs to the end of the record, so a name without a
/// terminator overlaps the card and user id fields.
fn decode_extended(slot: &[u8]) -> UserRecord {
    UserRecord {
        uid: u16::from_le_bytes([slot[0], slot[1]]),
        role: slot[2],
        password: Some(fixed_ascii_field(slot, 3, 8)),
        name: fixed_ascii_field(slot, 11, EXTENDED_RECORD_SIZE - 11),
        card_number: Some(u32::from_le_bytes([slot[35], slot[36], slot[37], slot[38]])),
        user_id: UserId::Text(fixed_ascii_field(slot, 48, 9)),
    }
}

/// Decode a "list users" payload, selecting the layout by length.
pub fn decode_records(payload: &[u8]) -> Vec<UserRecord> {
    decode_payload(payload).users
}

/// Decode a payload with automatic layout detection, keeping diagnostics.
pub fn decode_payload(payload: &[u8]) -> RecordDecode {
    match RecordLayout::detect(payload.len()) {
        Some(layout) => decode_records_with(payload, layout),
        None if payload.is_empty() => RecordDecode::default(),
        None => {
            let note = format!(
                "Payload length {} matches neither {COMPACT_RECORD_SIZE}-byte nor {EXTENDED_RECORD_SIZE}-byte records",
                payload.len()
            );
            warn!("{note}");
            RecordDecode {
                layout: None,
                users: Vec::new(),
                notes: vec![note],
            }
        }
    }
}

/// Decode a payload with a fixed layout.
///
/// Trailing bytes that do not fill a whole record are skipped and noted.
pub fn decode_records_with(payload: &[u8], layout: RecordLayout) -> RecordDecode {
    let chunks = payload.chunks_exact(layout.width());
    let remainder = chunks.remainder().len();

    let users: Vec<UserRecord> = chunks.map(|slot| layout.decode_slot(slot)).collect();

    let mut notes = Vec::new();
    if remainder > 0 {
        let note = format!("Ignored {remainder} trailing bytes after last {layout} record");
        warn!("{note}");
        notes.push(note);
    }

    debug!("Decoded {} user records using {layout} layout", users.len());

    RecordDecode {
        layout: Some(layout),
        users,
        notes,
    }
}
