//! Hex input parsing and text rendering for the `zk-decode` CLI.

use std::fmt;

use crate::error::{AppError, Result};
use crate::zk::{CommandFamily, Decoder, OperationResult};

/// Output format for [`decode_hex_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Parse a hex dump of a device response.
///
/// Whitespace between bytes is ignored (`"D0 07 99 7B"` and `"D0079 97B"`
/// both work).
pub fn parse_hex_input(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(AppError::input("No response bytes given"));
    }
    Ok(hex::decode(cleaned)?)
}

/// Decode a hex dump with `decoder` and render the result.
///
/// # Errors
/// Fails on malformed hex, responses shorter than the header, or JSON
/// serialization errors. An unsuccessful device result is still rendered.
pub fn decode_hex_report(
    decoder: &Decoder,
    input: &str,
    hint: Option<CommandFamily>,
    format: ReportFormat,
) -> Result<String> {
    let bytes = parse_hex_input(input)?;
    tracing::info!("Decoding {} byte response", bytes.len());

    let result = decoder.decode_response(&bytes, hint)?;
    Ok(match format {
        ReportFormat::Text => render_text(&result),
        ReportFormat::Json => serde_json::to_string_pretty(&result)?,
    })
}

/// Render a result as a human-readable report.
pub fn render_text(result: &OperationResult) -> String {
    TextReport(result).to_string()
}

/// Multi-line text view of an [`OperationResult`].
pub struct TextReport<'a>(pub &'a OperationResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(out, "{}", result.summary())?;
        writeln!(out, "  family:         {}", result.family())?;
        writeln!(out, "  interpretation: {}", result.interpretation())?;
        writeln!(out, "  checksum:       0x{:04X}", result.checksum())?;
        if let Some(code) = result.error_code() {
            writeln!(out, "  error code:     0x{code:02X} ({code})")?;
        }
        writeln!(out, "  raw:            {}", result.raw_hex())?;

        if let Some(count) = result.user_count() {
            match result.layout() {
                Some(layout) => writeln!(out, "  users:          {count} ({layout})")?,
                None => writeln!(out, "  users:          {count}")?,
            }
            for (i, user) in result.users().iter().enumerate() {
                write!(
                    out,
                    "    {:3}. uid {:5} | user id {:>9} | role {:2} | {}",
                    i + 1,
                    user.uid,
                    user.user_id,
                    user.role,
                    user.name
                )?;
                if let Some(card) = user.card_number {
                    write!(out, " | card {card}")?;
                }
                writeln!(out)?;
            }
        }

        for note in result.notes() {
            writeln!(out, "  note: {note}")?;
        }
        Ok(())
    }
}
