//! High-level error types

use idreader_core::{ErrorCode, Packet};
use idreader_types::Regulation;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core error: {0}")]
    Core(#[from] idreader_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] idreader_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] idreader_types::Error),

    #[error("Reader not connected")]
    NotConnected,

    /// The reader answered with an error
    #[error("Reader error: {code}")]
    Device {
        code: ErrorCode,

        /// The failed request, rebuilt from the native core's copy
        packet: Option<Packet>,
    },

    #[error("Regulation not supported by this reader: {0}")]
    UnsupportedRegulation(Regulation),

    #[error("Output power range not known yet, set a regulation first")]
    OutputPowerUnknown,

    #[error("No response to {0}")]
    Timeout(idreader_core::Command),

    #[error("Failed to read settings: {0}")]
    SettingsRead(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),
}

impl Error {
    /// Device error code, if the reader reported one
    pub fn device_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Device { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The link is gone and the reader has to be connected again
    pub fn requires_reconnect(&self) -> bool {
        match self {
            Self::NotConnected => true,
            Self::Transport(e) => e.requires_reconnect(),
            _ => false,
        }
    }
}
