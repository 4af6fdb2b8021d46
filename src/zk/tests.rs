//! End-to-end decoding tests over captured and synthetic device responses.

use super::*;

/// Create acknowledgement captured from a device.
const CREATE_ACK: [u8; 8] = [0xD0, 0x07, 0x99, 0x7B, 0x87, 0x7C, 0x0F, 0x00];

fn response(command_id: u16, tail: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_SIZE + tail.len());
    bytes.extend_from_slice(&command_id.to_le_bytes());
    bytes.extend_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x05, 0x00]);
    bytes.extend_from_slice(tail);
    bytes
}

#[test]
fn test_create_ack_capture() {
    let result = decode_response(&CREATE_ACK, None).unwrap();

    assert_eq!(result.command_id(), 0x07D0);
    assert_eq!(result.checksum(), 0x7B99);
    assert_eq!(result.session_id(), 0x7C87);
    assert_eq!(result.reply_id(), 0x000F);
    assert!(result.success());
    assert_eq!(result.message(), "User created successfully");
    assert_eq!(result.raw_hex(), "D0 07 99 7B 87 7C 0F 00");
}

#[test]
fn test_compact_record_capture() {
    let mut record = [0u8; COMPACT_RECORD_SIZE];
    record[0..2].copy_from_slice(&[0xE9, 0x03]);
    record[8..16].copy_from_slice(b"ALICE\0\0\0");
    record[24..28].copy_from_slice(&[0x2C, 0x01, 0x00, 0x00]);

    let users = decode_records(&record);
    assert_eq!(
        users,
        vec![UserRecord {
            uid: 1001,
            role: 0,
            name: "ALICE".to_string(),
            password: None,
            card_number: None,
            user_id: UserId::Numeric(300),
        }]
    );
}

#[test]
fn test_list_without_payload() {
    let result = decode_response(&response(CMD_USER_LIST, &[]), None).unwrap();
    assert!(result.success());
    assert_eq!(result.user_count(), Some(0));
    assert!(result.users().is_empty());
}

#[test]
fn test_list_with_unmatched_payload_length() {
    assert!(decode_records(&[0x41; 17]).is_empty());

    let result = decode_response(&response(CMD_USER_LIST, &[0x41; 17]), None).unwrap();
    assert!(result.success());
    assert_eq!(result.user_count(), Some(0));
}

#[test]
fn test_header_only_known_write_commands() {
    for id in [
        CMD_USER_CREATE,
        CMD_USER_CREATE_WITH_PASSWORD,
        CMD_USER_UPDATE,
        CMD_USER_DELETE,
        CMD_USER_DELETE_ALT,
    ] {
        let result = decode_response(&response(id, &[]), None).unwrap();
        assert!(result.success(), "command 0x{id:04X}");
        assert!(result.message().ends_with("successfully"));
    }
}

#[test]
fn test_status_byte_for_every_value() {
    for status in 0..=u8::MAX {
        let result = decode_response(&response(CMD_USER_UPDATE, &[status]), None).unwrap();
        if status == 0 {
            assert!(result.success());
            assert_eq!(result.error_code(), None);
        } else {
            assert!(!result.success());
            assert_eq!(result.error_code(), Some(status));
        }
    }
}

#[test]
fn test_extended_list_response() {
    let mut payload = vec![0u8; EXTENDED_RECORD_SIZE * 2];
    for (i, slot) in payload.chunks_exact_mut(EXTENDED_RECORD_SIZE).enumerate() {
        slot[0] = i as u8 + 1;
        slot[11..15].copy_from_slice(b"USER");
        slot[48] = b'0' + i as u8;
    }

    let result = decode_response(&response(CMD_USER_LIST, &payload), None).unwrap();
    assert_eq!(result.layout(), Some(RecordLayout::Extended));
    assert_eq!(result.user_count(), Some(2));
    assert_eq!(result.users()[0].uid, 1);
    assert_eq!(result.users()[1].user_id, UserId::Text("1".to_string()));
    assert_eq!(result.users()[1].password.as_deref(), Some(""));
}

#[test]
fn test_decoding_is_idempotent() {
    let mut payload = vec![0u8; COMPACT_RECORD_SIZE * 3];
    payload[8..11].copy_from_slice(b"ANN");
    let bytes = response(CMD_USER_LIST, &payload);

    let first = decode_response(&bytes, None).unwrap();
    let second = decode_response(&bytes, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_underrun_aborts_decoding() {
    for len in 0..HEADER_SIZE {
        let err = decode_response(&CREATE_ACK[..len], Some(CommandFamily::Create)).unwrap_err();
        assert_eq!(err, ZkError::BufferUnderrun { required: 8, actual: len });
    }
}

#[test]
fn test_list_result_serializes_users() {
    let mut payload = vec![0u8; COMPACT_RECORD_SIZE];
    payload[8..11].copy_from_slice(b"ANN");
    payload[24] = 9;

    let result = decode_response(&response(CMD_USER_LIST, &payload), None).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["user_count"], 1);
    assert_eq!(json["layout"], "compact");
    assert_eq!(json["users"][0]["name"], "ANN");
    assert_eq!(json["users"][0]["user_id"], 9);
    assert!(json["users"][0].get("password").is_none());
}
