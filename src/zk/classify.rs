//! Per-family success/failure classification of device responses.

use tracing::{debug, warn};

use super::error::Result;
use super::header::ResponseHeader;
use super::protocol::{CommandFamily, ERROR_BYTE_OFFSET, HEADER_SIZE};
use super::record::decode_payload;
use super::result::OperationResult;

/// Classify a full response (header + optional payload) against `family`.
///
/// # Errors
/// Returns `ZkError::BufferUnderrun` if the response is shorter than the header.
pub fn classify(bytes: &[u8], family: CommandFamily) -> Result<OperationResult> {
    let header = ResponseHeader::read(bytes)?;
    debug!(
        "Classifying {} byte response as {family}: cmd=0x{:04X}",
        bytes.len(),
        header.command_id
    );

    Ok(match family {
        CommandFamily::Create | CommandFamily::Update | CommandFamily::Delete => {
            classify_write(bytes, &header, family)
        }
        CommandFamily::List => classify_list(bytes, &header),
        CommandFamily::Unknown => OperationResult::unrecognized(&header, bytes),
    })
}

/// Create, update and delete share one rule: an absent or zero status byte
/// after the header means success.
fn classify_write(bytes: &[u8], header: &ResponseHeader, family: CommandFamily) -> OperationResult {
    let message = family.success_message().unwrap_or("Operation completed");

    match bytes.get(ERROR_BYTE_OFFSET) {
        None => OperationResult::succeeded(family, header, bytes, message, "Header-only acknowledgement (8 bytes)"),
        Some(0) => OperationResult::succeeded(
            family,
            header,
            bytes,
            message,
            format!("Acknowledgement with zero status byte ({} bytes)", bytes.len()),
        ),
        Some(&code) => {
            warn!("Device rejected {family} command: error code 0x{code:02X} ({code})");
            OperationResult::device_error(
                family,
                header,
                bytes,
                code,
                format!("Nonzero status byte 0x{code:02X} after header ({} bytes)", bytes.len()),
            )
        }
    }
}

/// The list command always succeeds once the header is valid; an
/// undecodable payload only yields an empty roster.
fn classify_list(bytes: &[u8], header: &ResponseHeader) -> OperationResult {
    let payload = &bytes[HEADER_SIZE..];

    if payload.is_empty() {
        return OperationResult::succeeded(
            CommandFamily::List,
            header,
            bytes,
            "No users found on device",
            "Header-only list response (no payload)",
        )
        .with_users(None, Vec::new());
    }

    let decoded = decode_payload(payload);
    let count = decoded.users.len();

    let (message, interpretation) = match decoded.layout {
        Some(layout) => (
            format!("Found {count} user(s) on device"),
            format!("List payload of {} bytes decoded as {layout} records", payload.len()),
        ),
        None => (
            "No users decoded from device response".to_string(),
            format!("List payload of {} bytes with unrecognized record layout", payload.len()),
        ),
    };

    OperationResult::succeeded(CommandFamily::List, header, bytes, message, interpretation)
        .with_users(decoded.layout, decoded.users)
        .with_notes(decoded.notes)
}
