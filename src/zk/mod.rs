//! ZKTeco device response decoder.
//!
//! Turns the raw bytes a device returns for user-management commands into a
//! typed [`OperationResult`]. For "list users" responses the payload is
//! decoded into [`UserRecord`]s using the compact (28-byte) or extended
//! (72-byte) record layout.
//!
//! Decoding is pure and synchronous: no I/O, no shared state. Checksums are
//! extracted but not verified.
//!
//! # Example
//!
//! ```
//! use zk_decode::zk::{CommandFamily, decode_response};
//!
//! let bytes = [0xD0, 0x07, 0x99, 0x7B, 0x87, 0x7C, 0x0F, 0x00];
//! let result = decode_response(&bytes, None)?;
//! assert!(result.success());
//! assert_eq!(result.family(), CommandFamily::Create);
//! # Ok::<(), zk_decode::zk::ZkError>(())
//! ```

mod classify;
mod decoder;
mod error;
mod header;
mod protocol;
mod record;
mod result;

#[cfg(test)]
mod tests;

pub use classify::classify;
pub use decoder::{Decoder, decode_response};
pub use error::{Result, ZkError};
pub use header::ResponseHeader;
pub use protocol::{
    CMD_USER_CREATE, CMD_USER_CREATE_WITH_PASSWORD, CMD_USER_DELETE, CMD_USER_DELETE_ALT, CMD_USER_LIST,
    CMD_USER_UPDATE, CommandFamily, CommandTable, HEADER_SIZE,
};
pub use record::{
    COMPACT_RECORD_SIZE, EXTENDED_RECORD_SIZE, Privilege, RecordDecode, RecordLayout, UserId, UserRecord,
    decode_payload, decode_records, decode_records_with, fixed_ascii_field,
};
pub use result::{OperationResult, format_hex};
