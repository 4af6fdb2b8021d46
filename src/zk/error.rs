//! ZK response decoding error types.

use thiserror::Error;

/// Structural failures that abort decoding of a device response.
///
/// Classification outcomes (device error codes, unknown commands,
/// unrecognized record layouts) are not errors; they are reported through
/// [`OperationResult`](super::OperationResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZkError {
    /// Byte sequence is shorter than the structure being read.
    #[error("Buffer underrun: need at least {required} bytes, got {actual}")]
    BufferUnderrun { required: usize, actual: usize },
}

/// Result type for ZK decoding operations.
pub type Result<T> = std::result::Result<T, ZkError>;

impl ZkError {
    /// Check that `bytes` holds at least `required` bytes.
    pub(crate) fn ensure_len(bytes: &[u8], required: usize) -> Result<()> {
        if bytes.len() < required {
            return Err(Self::BufferUnderrun {
                required,
                actual: bytes.len(),
            });
        }
        Ok(())
    }
}
