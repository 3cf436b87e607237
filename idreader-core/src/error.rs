//! Error types for idreader-core

use crate::command::Command;

/// Result type alias for idreader-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown command name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Native object is of a different command kind than the wrapper
    #[error("Native object mismatch: expected {expected}, got {actual}")]
    ObjectMismatch { expected: Command, actual: Command },

    /// Native object carries a body that does not fit its command
    #[error("Native object for {command} has an unexpected body")]
    BodyMismatch { command: Command },

    /// EPC to program is empty or malformed
    #[error("Invalid EPC: {0}")]
    InvalidEpc(String),

    /// Firmware image has no content
    #[error("Firmware image is empty")]
    EmptyFirmware,

    /// Firmware image does not fit in the block numbering
    #[error("Firmware image too large: {size} bytes (max: {max} bytes)")]
    FirmwareTooLarge { size: usize, max: usize },

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if the error came from bridging a native object
    pub fn is_bridge_error(&self) -> bool {
        matches!(self, Self::ObjectMismatch { .. } | Self::BodyMismatch { .. })
    }
}
