//! Native core object model
//!
//! The native core owns framing and the physical link. This module describes
//! what crosses the boundary in both directions:
//! - [`NativeObject`]: an outbound command, as handed to the native core
//! - [`Event`]: whatever the native core hands back
//!
//! Packet wrappers never alias a native object. Converting in either
//! direction copies the state.

use std::fmt;

use bytes::Bytes;
use idreader_types::{
    Gen2Session, LedMode, OutputPowerRange, PowerState, Regulation, SpeakerSound,
    VibrationPattern,
};

use crate::{command::Command, error_code::ErrorCode};

/// Outbound command object owned by the native core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeObject {
    pub command: Command,
    pub body: Body,
}

/// Command-specific state of a native object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Regulation(Regulation),
    OutputPower(u16),
    Gen2Session(Gen2Session),
    LedMode(LedMode),
    Feedback {
        vibration: VibrationPattern,
        speaker: SpeakerSound,
    },
    ProgramEpc {
        epc: Bytes,
        password: u32,
    },
    FirmwareBlock {
        number: u16,
        data: Bytes,
    },
    FirmwareUpgrade {
        total_size: u32,
        crc: u32,
    },
}

impl NativeObject {
    /// Create an object without body
    pub fn new(command: Command) -> Self {
        Self {
            command,
            body: Body::Empty,
        }
    }

    /// Create an object with body
    pub fn with_body(command: Command, body: Body) -> Self {
        Self { command, body }
    }
}

impl fmt::Display for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeObject[{}]", self.command)
    }
}

/// One tag sighting inside an inventory observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagObservation {
    pub epc: Bytes,
    pub rssi: i16,
}

/// Trigger button events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Down,
    Up,
}

/// Outcome of a ProgramEpc command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramEpcResult {
    Success,
    NoLabel,
    MultipleLabels,
    NoXtid,
    InvalidSerial,
    UnsupportedLabel,
    WriteFailed,
    VerifyFailed,
    LabelLost,
    MemoryLocked,
    SerialisationFailed,
}

impl ProgramEpcResult {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    /// Human readable outcome
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "Tag programmed",
            Self::NoLabel => "No tags nearby",
            Self::MultipleLabels => "Too many tags nearby",
            Self::NoXtid => "Tag has no XTID",
            Self::InvalidSerial => "Invalid serial",
            Self::UnsupportedLabel => "Unsupported tag",
            Self::WriteFailed => "Write failed",
            Self::VerifyFailed => "Verify failed",
            Self::LabelLost => "Tag lost",
            Self::MemoryLocked => "Tag memory locked",
            Self::SerialisationFailed => "Serialization failed",
        }
    }
}

/// Error reported by the reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceError {
    pub code: ErrorCode,

    /// The command that failed, when the native core could tell
    pub request: Option<NativeObject>,
}

impl DeviceError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            request: None,
        }
    }

    pub fn for_request(code: ErrorCode, request: NativeObject) -> Self {
        Self {
            code,
            request: Some(request),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.request {
            Some(request) => write!(f, "{} (in response to {})", self.code, request.command),
            None => write!(f, "{}", self.code),
        }
    }
}

/// Events handed back by the native core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SerialNumber(String),
    Version(u32),
    PowerState(PowerState),
    Regulation {
        current: Regulation,
        supported: Vec<Regulation>,
    },
    OutputPower {
        current: u16,
        range: OutputPowerRange,
    },
    ResetCompleted,
    InventoryObservation(Vec<TagObservation>),
    Button(ButtonEvent),
    BarcodeStarted,
    BarcodeStopped,
    BarcodeData {
        data: Bytes,
        symbology: String,
    },
    ProgramEpcResult(ProgramEpcResult),
    StoreFirmwareBlockCompleted(u16),
    Error(DeviceError),
    Disconnected,
}

impl Event {
    /// Get event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::SerialNumber(_) => "SerialNumber",
            Self::Version(_) => "Version",
            Self::PowerState(_) => "PowerState",
            Self::Regulation { .. } => "Regulation",
            Self::OutputPower { .. } => "OutputPower",
            Self::ResetCompleted => "ResetCompleted",
            Self::InventoryObservation(_) => "InventoryObservation",
            Self::Button(_) => "ButtonEvent",
            Self::BarcodeStarted => "BarcodeReaderStarted",
            Self::BarcodeStopped => "BarcodeReaderStopped",
            Self::BarcodeData { .. } => "BarcodeReaderData",
            Self::ProgramEpcResult(_) => "ProgramEpcResult",
            Self::StoreFirmwareBlockCompleted(_) => "StoreFirmwareBlockCompleted",
            Self::Error(_) => "Error",
            Self::Disconnected => "Disconnected",
        }
    }

    /// Check if this is an error event
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Error code carried by this event, if any
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Error(err) => Some(err.code),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(err) => write!(f, "Error[{}]", err),
            event => f.write_str(event.name()),
        }
    }
}
