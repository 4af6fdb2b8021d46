//! Response dispatcher: routes raw responses to the matching classifier.

use tracing::debug;

use super::classify::classify;
use super::error::Result;
use super::header::ResponseHeader;
use super::protocol::{CommandFamily, CommandTable};
use super::result::OperationResult;

/// Decoder for device responses.
///
/// Holds only the command table, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    table: CommandTable,
}

impl Decoder {
    /// Create a decoder with a custom command table.
    pub fn new(table: CommandTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Decode a full device response.
    ///
    /// With a `hint` the response is classified as that family directly.
    /// Without one, the family comes from the header's command id; ids not
    /// in the table produce an unsuccessful "unknown format" result.
    ///
    /// # Errors
    /// Returns `ZkError::BufferUnderrun` if the response is shorter than the header.
    pub fn decode_response(&self, bytes: &[u8], hint: Option<CommandFamily>) -> Result<OperationResult> {
        let family = match hint {
            Some(family) => family,
            None => {
                let header = ResponseHeader::read(bytes)?;
                let family = self.table.family_of(header.command_id);
                debug!("Command id 0x{:04X} maps to {family}", header.command_id);
                family
            }
        };

        classify(bytes, family)
    }
}

/// Decode a response using the default command table.
pub fn decode_response(bytes: &[u8], hint: Option<CommandFamily>) -> Result<OperationResult> {
    Decoder::default().decode_response(bytes, hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_overrides_command_id() {
        // command id says create, caller knows it issued a list
        let bytes = [0xD0, 0x07, 0, 0, 0, 0, 0, 0];
        let result = decode_response(&bytes, Some(CommandFamily::List)).unwrap();
        assert_eq!(result.family(), CommandFamily::List);
        assert_eq!(result.message(), "No users found on device");
    }

    #[test]
    fn test_fallback_uses_command_id() {
        let bytes = [0xD3, 0x07, 0, 0, 0, 0, 0, 0];
        let result = decode_response(&bytes, None).unwrap();
        assert_eq!(result.family(), CommandFamily::Update);
        assert!(result.success());
    }

    #[test]
    fn test_fallback_unknown_keeps_header() {
        let bytes = [0x34, 0x12, 0xAA, 0xBB, 0x01, 0x00, 0x02, 0x00];
        let result = decode_response(&bytes, None).unwrap();
        assert!(!result.success());
        assert_eq!(result.family(), CommandFamily::Unknown);
        assert_eq!(result.checksum(), 0xBBAA);
        assert_eq!(result.session_id(), 1);
        assert_eq!(result.reply_id(), 2);
    }

    #[test]
    fn test_custom_table() {
        let decoder = Decoder::new(CommandTable::new([(0x1380, CommandFamily::Delete)]));
        let delete = [0x80, 0x13, 0, 0, 0, 0, 0, 0];
        let create = [0xD0, 0x07, 0, 0, 0, 0, 0, 0];
        assert_eq!(decoder.decode_response(&delete, None).unwrap().family(), CommandFamily::Delete);
        assert_eq!(decoder.decode_response(&create, None).unwrap().family(), CommandFamily::Unknown);
    }

    #[test]
    fn test_short_input_without_hint() {
        assert!(decode_response(&[0xD0], None).is_err());
    }

    #[test]
    fn test_decoder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Decoder>();
    }
}
