//! Error codes reported by the reader

use std::fmt;

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Protocol,
    Hardware,
    State,
    Configuration,
    Rfid,
}

/// Error codes the SDK reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Protocol
    UnknownCommand,
    InvalidData,
    InvalidCrc,

    // Hardware
    StoreFailed,

    // State
    IncorrectFirmwareCrc,
    IncorrectFirmwareSignature,
    RfidBusy,
    BarcodeReaderBusy,

    // Configuration
    NoRegulationSelected,

    // Rfid
    AntennaMismatch,

    /// Any code without a dedicated variant
    Other { category: ErrorCategory, code: u16 },
}

impl ErrorCode {
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::UnknownCommand | Self::InvalidData | Self::InvalidCrc => ErrorCategory::Protocol,
            Self::StoreFailed => ErrorCategory::Hardware,
            Self::IncorrectFirmwareCrc
            | Self::IncorrectFirmwareSignature
            | Self::RfidBusy
            | Self::BarcodeReaderBusy => ErrorCategory::State,
            Self::NoRegulationSelected => ErrorCategory::Configuration,
            Self::AntennaMismatch => ErrorCategory::Rfid,
            Self::Other { category, .. } => category,
        }
    }

    /// Errors caused by malformed or corrupted transfers
    pub fn is_transfer_error(self) -> bool {
        matches!(self, Self::InvalidData | Self::InvalidCrc | Self::StoreFailed)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other { category, code } => write!(f, "{:?}/0x{:04X}", category, code),
            code => write!(f, "{:?}/{:?}", code.category(), code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category() {
        assert_eq!(ErrorCode::UnknownCommand.category(), ErrorCategory::Protocol);
        assert_eq!(ErrorCode::StoreFailed.category(), ErrorCategory::Hardware);
        assert_eq!(ErrorCode::RfidBusy.category(), ErrorCategory::State);
        assert_eq!(ErrorCode::NoRegulationSelected.category(), ErrorCategory::Configuration);
        assert_eq!(ErrorCode::AntennaMismatch.category(), ErrorCategory::Rfid);
        assert_eq!(
            ErrorCode::Other { category: ErrorCategory::Hardware, code: 7 }.category(),
            ErrorCategory::Hardware
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::InvalidCrc.to_string(), "Protocol/InvalidCrc");
        assert_eq!(
            ErrorCode::Other { category: ErrorCategory::State, code: 0x12 }.to_string(),
            "State/0x0012"
        );
    }

    #[test]
    fn test_transfer_errors() {
        assert!(ErrorCode::InvalidData.is_transfer_error());
        assert!(ErrorCode::StoreFailed.is_transfer_error());
        assert!(!ErrorCode::RfidBusy.is_transfer_error());
    }
}
