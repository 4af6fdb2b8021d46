//! Error types and handling.

use thiserror::Error;

use crate::config::ConfigError;
use crate::zk::ZkError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Device response could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] ZkError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Response bytes were not valid hex
    #[error("Invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Input missing or unusable
    #[error("Input error: {0}")]
    Input(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create an input error with message
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_header(bytes: &[u8]) -> Result<u16> {
        Ok(crate::zk::ResponseHeader::read(bytes)?.command_id)
    }

    fn load_config(content: &str) -> Result<crate::config::AppConfig> {
        Ok(crate::config::AppConfig::from_toml(content)?)
    }

    #[test]
    fn test_decode_error_converts() {
        let err = read_header(&[0xD0]).unwrap_err();
        assert!(matches!(err, AppError::Decode(ZkError::BufferUnderrun { .. })));
        assert!(err.to_string().starts_with("Decode error: Buffer underrun"));
    }

    #[test]
    fn test_config_error_converts() {
        let err = load_config("[commands]\nlist = []\n").unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_io_error_converts() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed").into();
        assert_eq!(err.to_string(), "IO error: stdin closed");
    }
}
