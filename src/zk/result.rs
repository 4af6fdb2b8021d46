//! Structured outcome of a decoded device response.

use serde::Serialize;

use super::header::ResponseHeader;
use super::protocol::CommandFamily;
use super::record::{RecordLayout, UserRecord};

/// Classified response from the device.
///
/// Fields are private so that `success` and `error_code` stay consistent:
/// a successful result never carries an error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    family: CommandFamily,
    success: bool,
    message: String,
    interpretation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<u8>,
    command_id: u16,
    checksum: u16,
    session_id: u16,
    reply_id: u16,
    raw_hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<RecordLayout>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    users: Vec<UserRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl OperationResult {
    fn base(
        family: CommandFamily,
        success: bool,
        header: &ResponseHeader,
        bytes: &[u8],
        message: String,
        interpretation: String,
    ) -> Self {
        Self {
            family,
            success,
            message,
            interpretation,
            error_code: None,
            command_id: header.command_id,
            checksum: header.checksum,
            session_id: header.session_id,
            reply_id: header.reply_id,
            raw_hex: format_hex(bytes),
            user_count: None,
            layout: None,
            users: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Successful outcome without records.
    pub(crate) fn succeeded(
        family: CommandFamily,
        header: &ResponseHeader,
        bytes: &[u8],
        message: impl Into<String>,
        interpretation: impl Into<String>,
    ) -> Self {
        Self::base(family, true, header, bytes, message.into(), interpretation.into())
    }

    /// Failure reported by the device through a nonzero status byte.
    pub(crate) fn device_error(
        family: CommandFamily,
        header: &ResponseHeader,
        bytes: &[u8],
        error_code: u8,
        interpretation: impl Into<String>,
    ) -> Self {
        let message = format!("Device reported error 0x{error_code:02X} ({error_code})");
        let mut result = Self::base(family, false, header, bytes, message, interpretation.into());
        result.error_code = Some(error_code);
        result
    }

    /// Response whose command id maps to no known family.
    pub(crate) fn unrecognized(header: &ResponseHeader, bytes: &[u8]) -> Self {
        let id = header.command_id;
        Self::base(
            CommandFamily::Unknown,
            false,
            header,
            bytes,
            "Unexpected response format".to_string(),
            format!("Unknown response format: command id 0x{id:04X} ({id})"),
        )
    }

    /// Attach decoded user records to a successful list result.
    pub(crate) fn with_users(mut self, layout: Option<RecordLayout>, users: Vec<UserRecord>) -> Self {
        self.user_count = Some(users.len());
        self.layout = layout;
        self.users = users;
        self
    }

    pub(crate) fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes.extend(notes);
        self
    }

    pub fn family(&self) -> CommandFamily {
        self.family
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Human-readable classification of the response shape.
    pub fn interpretation(&self) -> &str {
        &self.interpretation
    }

    pub fn error_code(&self) -> Option<u8> {
        self.error_code
    }

    pub fn command_id(&self) -> u16 {
        self.command_id
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn session_id(&self) -> u16 {
        self.session_id
    }

    pub fn reply_id(&self) -> u16 {
        self.reply_id
    }

    /// Full response as space-separated uppercase hex.
    pub fn raw_hex(&self) -> &str {
        &self.raw_hex
    }

    /// Number of decoded users, only set for list responses.
    pub fn user_count(&self) -> Option<usize> {
        self.user_count
    }

    pub fn layout(&self) -> Option<RecordLayout> {
        self.layout
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// Non-fatal decoding diagnostics.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// One-line summary for logs and the CLI.
    pub fn summary(&self) -> String {
        let status = if self.success { "OK" } else { "FAILED" };
        format!(
            "[{status}] {} (cmd=0x{:04X}, session=0x{:04X}, reply={})",
            self.message, self.command_id, self.session_id, self.reply_id
        )
    }
}

/// Render bytes as space-separated uppercase hex (`"D0 07 99"`).
pub fn format_hex(bytes: &[u8]) -> String {
    let encoded = hex::encode_upper(bytes);
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, pair) in encoded.as_bytes().chunks(2).enumerate() {
        if i != 0 {
            out.push(' ');
        }
        out.push(char::from(pair[0]));
        out.push(char::from(pair[1]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ResponseHeader {
        ResponseHeader {
            command_id: 0x07D0,
            checksum: 0x7B99,
            session_id: 0x7C87,
            reply_id: 0x000F,
        }
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0xD0, 0x07, 0x0a]), "D0 07 0A");
        assert_eq!(format_hex(&[]), "");
    }

    #[test]
    fn test_device_error_has_code() {
        let bytes = [0xD0, 0x07, 0, 0, 0, 0, 0, 0, 0x05];
        let result = OperationResult::device_error(CommandFamily::Create, &header(), &bytes, 0x05, "status byte");
        assert!(!result.success());
        assert_eq!(result.error_code(), Some(5));
        assert_eq!(result.message(), "Device reported error 0x05 (5)");
    }

    #[test]
    fn test_success_has_no_code() {
        let result = OperationResult::succeeded(CommandFamily::Update, &header(), &[], "ok", "header only");
        assert!(result.success());
        assert_eq!(result.error_code(), None);
        assert_eq!(result.user_count(), None);
    }

    #[test]
    fn test_unrecognized_interpretation() {
        let mut h = header();
        h.command_id = 0x1234;
        let result = OperationResult::unrecognized(&h, &[]);
        assert!(!result.success());
        assert_eq!(result.family(), CommandFamily::Unknown);
        assert_eq!(result.message(), "Unexpected response format");
        assert!(result.interpretation().contains("0x1234"));
        assert!(result.interpretation().contains("4660"));
    }

    #[test]
    fn test_summary() {
        let result = OperationResult::succeeded(CommandFamily::Create, &header(), &[], "User created successfully", "");
        assert_eq!(
            result.summary(),
            "[OK] User created successfully (cmd=0x07D0, session=0x7C87, reply=15)"
        );
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let result = OperationResult::succeeded(CommandFamily::Delete, &header(), &[0xD2], "done", "header only");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["family"], "delete");
        assert_eq!(json["success"], true);
        assert_eq!(json["raw_hex"], "D2");
        assert!(json.get("error_code").is_none());
        assert!(json.get("users").is_none());
    }
}
