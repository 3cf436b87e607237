//! Reader identity as reported by the accessory and the reader itself

use std::fmt;

/// Reader information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Accessory name (e.g. "!D Hand 2")
    pub name: String,

    /// Serial number, filled in once the reader answered a GetSerialNumber packet
    pub serial_number: Option<String>,

    /// Manufacturer name
    pub manufacturer: String,

    /// Model number
    pub model_number: Option<String>,

    /// Firmware version reported by the reader
    pub firmware_version: Option<u32>,

    /// Hardware revision
    pub hardware_version: Option<String>,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, manufacturer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manufacturer: manufacturer.into(),
            ..Self::default()
        }
    }

    /// Serial number, or an empty string when it was never retrieved
    pub fn serial(&self) -> &str {
        self.serial_number.as_deref().unwrap_or("")
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reader[{}, SN: {}", self.name, self.serial())?;
        if let Some(version) = self.firmware_version {
            write!(f, ", FW: {}", version)?;
        }
        write!(f, "]")
    }
}
