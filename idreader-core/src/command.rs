//! Reader command kinds

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Kinds of packets the SDK sends to a reader
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // Device information
    GetSerialNumber,
    GetVersion,
    GetPowerState,

    // Radio configuration
    GetRegulation,
    SetRegulation,
    GetOutputPower,
    SetOutputPower,
    SetEpcGen2Session,

    // User interaction
    SetUserLedMode,
    UserFeedback,
    Reset,

    // RFID operations
    StartInventorySmart,
    StopInventory,
    ProgramEpc,

    // Barcode scanner
    StartBarcodeReader,
    StopBarcodeReader,

    // Firmware
    StoreFirmwareBlock,
    StartFirmwareUpgrade,
}

impl Command {
    /// Every command kind
    pub const ALL: [Command; 18] = [
        Self::GetSerialNumber,
        Self::GetVersion,
        Self::GetPowerState,
        Self::GetRegulation,
        Self::SetRegulation,
        Self::GetOutputPower,
        Self::SetOutputPower,
        Self::SetEpcGen2Session,
        Self::SetUserLedMode,
        Self::UserFeedback,
        Self::Reset,
        Self::StartInventorySmart,
        Self::StopInventory,
        Self::ProgramEpc,
        Self::StartBarcodeReader,
        Self::StopBarcodeReader,
        Self::StoreFirmwareBlock,
        Self::StartFirmwareUpgrade,
    ];

    /// Check if this command only reads reader state
    pub fn is_query(self) -> bool {
        matches!(
            self,
            Self::GetSerialNumber
                | Self::GetVersion
                | Self::GetPowerState
                | Self::GetRegulation
                | Self::GetOutputPower
        )
    }

    /// Check if this command drives the RFID radio
    pub fn is_rfid_operation(self) -> bool {
        matches!(
            self,
            Self::StartInventorySmart | Self::StopInventory | Self::ProgramEpc
        )
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::GetSerialNumber => "GetSerialNumber",
            Self::GetVersion => "GetVersion",
            Self::GetPowerState => "GetPowerState",
            Self::GetRegulation => "GetRegulation",
            Self::SetRegulation => "SetRegulation",
            Self::GetOutputPower => "GetOutputPower",
            Self::SetOutputPower => "SetOutputPower",
            Self::SetEpcGen2Session => "SetEpcGen2Session",
            Self::SetUserLedMode => "SetUserLedMode",
            Self::UserFeedback => "UserFeedback",
            Self::Reset => "Reset",
            Self::StartInventorySmart => "StartInventorySmart",
            Self::StopInventory => "StopInventory",
            Self::ProgramEpc => "ProgramEpc",
            Self::StartBarcodeReader => "StartBarcodeReader",
            Self::StopBarcodeReader => "StopBarcodeReader",
            Self::StoreFirmwareBlock => "StoreFirmwareBlock",
            Self::StartFirmwareUpgrade => "StartFirmwareUpgrade",
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.name() == s)
            .ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name_parse() {
        assert_eq!(Command::GetSerialNumber.name(), "GetSerialNumber");
        assert_eq!("GetSerialNumber".parse::<Command>().unwrap(), Command::GetSerialNumber);
    }

    #[test]
    fn test_every_name_parses_back() {
        for cmd in Command::ALL {
            assert_eq!(cmd.name().parse::<Command>().unwrap(), cmd);
        }
    }

    #[test]
    fn test_command_is_query() {
        assert!(Command::GetSerialNumber.is_query());
        assert!(Command::GetOutputPower.is_query());
        assert!(!Command::SetOutputPower.is_query());
        assert!(!Command::Reset.is_query());
    }

    #[test]
    fn test_command_is_rfid_operation() {
        assert!(Command::StartInventorySmart.is_rfid_operation());
        assert!(Command::ProgramEpc.is_rfid_operation());
        assert!(!Command::StartBarcodeReader.is_rfid_operation());
    }

    #[test]
    fn test_unknown_command() {
        let result = "GetSerial".parse::<Command>();
        assert!(matches!(result, Err(Error::UnknownCommand(name)) if name == "GetSerial"));
    }
}
