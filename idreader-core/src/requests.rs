//! Request packets
//!
//! Payload-free packets share the shape of
//! [`GetSerialNumberPacket`](crate::GetSerialNumberPacket). Parameterised
//! packets copy their fields out of the native object when bridged.

use bytes::Bytes;
use idreader_types::{
    Feedback, Gen2Session, Gen2Settings, LedMode, Regulation, SpeakerSound, VibrationPattern,
};

use crate::{
    command::Command,
    error::{Error, Result},
    native::{Body, NativeObject},
    packet::{expect_command, expect_empty, SendablePacket},
};

macro_rules! empty_packet {
    ($(#[$meta:meta])* $name:ident => $command:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name {
            _private: (),
        }

        impl $name {
            pub fn new() -> Self {
                Self { _private: () }
            }

            pub fn packet() -> Self {
                Self::new()
            }

            /// Constructs a packet from a native object. For internal API usage only.
            pub fn with_object(object: &NativeObject) -> Result<Self> {
                expect_empty(object, Command::$command)?;
                Ok(Self::new())
            }
        }

        impl SendablePacket for $name {
            fn command(&self) -> Command {
                Command::$command
            }

            fn to_object(&self) -> NativeObject {
                NativeObject::new(Command::$command)
            }
        }
    };
}

empty_packet! {
    /// Retrieve the reader firmware version
    GetVersionPacket => GetVersion
}

empty_packet! {
    /// Retrieve battery level, health and power source
    GetPowerStatePacket => GetPowerState
}

empty_packet! {
    /// Retrieve the current and supported regulations
    GetRegulationPacket => GetRegulation
}

empty_packet! {
    /// Retrieve current output power and the allowed range
    GetOutputPowerPacket => GetOutputPower
}

empty_packet! {
    /// Reset the reader
    ResetPacket => Reset
}

empty_packet! {
    /// Start an inventory that manages antenna mismatches itself
    StartInventorySmartPacket => StartInventorySmart
}

empty_packet! {
    StopInventoryPacket => StopInventory
}

empty_packet! {
    StartBarcodeReaderPacket => StartBarcodeReader
}

empty_packet! {
    StopBarcodeReaderPacket => StopBarcodeReader
}

/// Select the regulation the radio operates under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetRegulationPacket {
    pub regulation: Regulation,
}

impl SetRegulationPacket {
    pub fn new(regulation: Regulation) -> Self {
        Self { regulation }
    }

    /// Constructs a packet from a native object. For internal API usage only.
    pub fn with_object(object: &NativeObject) -> Result<Self> {
        expect_command(object, Command::SetRegulation)?;

        match object.body {
            Body::Regulation(regulation) => Ok(Self::new(regulation)),
            _ => Err(Error::BodyMismatch {
                command: Command::SetRegulation,
            }),
        }
    }
}

impl SendablePacket for SetRegulationPacket {
    fn command(&self) -> Command {
        Command::SetRegulation
    }

    fn to_object(&self) -> NativeObject {
        NativeObject::with_body(Command::SetRegulation, Body::Regulation(self.regulation))
    }
}

/// Set the radio output power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetOutputPowerPacket {
    /// Output power in tenths of dBm
    pub power: u16,
}

impl SetOutputPowerPacket {
    pub fn new(power: u16) -> Self {
        Self { power }
    }

    /// Constructs a packet from a native object. For internal API usage only.
    pub fn with_object(object: &NativeObject) -> Result<Self> {
        expect_command(object, Command::SetOutputPower)?;

        match object.body {
            Body::OutputPower(power) => Ok(Self::new(power)),
            _ => Err(Error::BodyMismatch {
                command: Command::SetOutputPower,
            }),
        }
    }
}

impl SendablePacket for SetOutputPowerPacket {
    fn command(&self) -> Command {
        Command::SetOutputPower
    }

    fn to_object(&self) -> NativeObject {
        NativeObject::with_body(Command::SetOutputPower, Body::OutputPower(self.power))
    }
}

/// Configure the Gen2 inventory session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetEpcGen2SessionPacket {
    pub session: Gen2Session,
}

impl SetEpcGen2SessionPacket {
    pub fn new(session: Gen2Session) -> Self {
        Self { session }
    }

    pub fn from_settings(settings: &Gen2Settings) -> Self {
        Self::new(settings.resolve())
    }

    /// Constructs a packet from a native object. For internal API usage only.
    pub fn with_object(object: &NativeObject) -> Result<Self> {
        expect_command(object, Command::SetEpcGen2Session)?;

        match object.body {
            Body::Gen2Session(session) => Ok(Self::new(session)),
            _ => Err(Error::BodyMismatch {
                command: Command::SetEpcGen2Session,
            }),
        }
    }
}

impl SendablePacket for SetEpcGen2SessionPacket {
    fn command(&self) -> Command {
        Command::SetEpcGen2Session
    }

    fn to_object(&self) -> NativeObject {
        NativeObject::with_body(Command::SetEpcGen2Session, Body::Gen2Session(self.session))
    }
}

/// Switch the button LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetUserLedModePacket {
    pub mode: LedMode,
}

impl SetUserLedModePacket {
    pub fn new(mode: LedMode) -> Self {
        Self { mode }
    }

    /// Constructs a packet from a native object. For internal API usage only.
    pub fn with_object(object: &NativeObject) -> Result<Self> {
        expect_command(object, Command::SetUserLedMode)?;

        match object.body {
            Body::LedMode(mode) => Ok(Self::new(mode)),
            _ => Err(Error::BodyMismatch {
                command: Command::SetUserLedMode,
            }),
        }
    }
}

impl SendablePacket for SetUserLedModePacket {
    fn command(&self) -> Command {
        Command::SetUserLedMode
    }

    fn to_object(&self) -> NativeObject {
        NativeObject::with_body(Command::SetUserLedMode, Body::LedMode(self.mode))
    }
}

/// Play a vibration pattern and a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserFeedbackPacket {
    pub vibration: VibrationPattern,
    pub speaker: SpeakerSound,
}

impl UserFeedbackPacket {
    pub fn new(vibration: VibrationPattern, speaker: SpeakerSound) -> Self {
        Self { vibration, speaker }
    }

    pub fn from_feedback(feedback: Feedback) -> Self {
        let (vibration, speaker) = feedback.pattern();
        Self::new(vibration, speaker)
    }

    /// Constructs a packet from a native object. For internal API usage only.
    pub fn with_object(object: &NativeObject) -> Result<Self> {
        expect_command(object, Command::UserFeedback)?;

        match object.body {
            Body::Feedback { vibration, speaker } => Ok(Self::new(vibration, speaker)),
            _ => Err(Error::BodyMismatch {
                command: Command::UserFeedback,
            }),
        }
    }
}

impl SendablePacket for UserFeedbackPacket {
    fn command(&self) -> Command {
        Command::UserFeedback
    }

    fn to_object(&self) -> NativeObject {
        NativeObject::with_body(
            Command::UserFeedback,
            Body::Feedback {
                vibration: self.vibration,
                speaker: self.speaker,
            },
        )
    }
}

/// Write a raw EPC to the single tag in the field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramEpcPacket {
    pub epc: Bytes,

    /// Access password, 0 when the EPC bank is not locked
    pub password: u32,
}

impl ProgramEpcPacket {
    pub fn new(epc: impl Into<Bytes>, password: u32) -> Self {
        Self {
            epc: epc.into(),
            password,
        }
    }

    /// Build a packet from an EPC written as hexadecimal
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, has an odd number of
    /// characters or contains non-hex characters.
    pub fn from_hex(hex: &str, password: u32) -> Result<Self> {
        if hex.is_empty() {
            return Err(Error::InvalidEpc("No HEX value was provided".into()));
        }

        if hex.len() % 2 != 0 {
            return Err(Error::InvalidEpc(
                "An invalid HEX value was provided, it should be a multiple of 2 characters".into(),
            ));
        }

        let epc = hex::decode(hex).map_err(|e| Error::InvalidEpc(e.to_string()))?;
        Ok(Self::new(epc, password))
    }

    /// Constructs a packet from a native object. For internal API usage only.
    pub fn with_object(object: &NativeObject) -> Result<Self> {
        expect_command(object, Command::ProgramEpc)?;

        match &object.body {
            Body::ProgramEpc { epc, password } => {
                Ok(Self::new(Bytes::copy_from_slice(epc), *password))
            }
            _ => Err(Error::BodyMismatch {
                command: Command::ProgramEpc,
            }),
        }
    }
}

impl SendablePacket for ProgramEpcPacket {
    fn command(&self) -> Command {
        Command::ProgramEpc
    }

    fn to_object(&self) -> NativeObject {
        NativeObject::with_body(
            Command::ProgramEpc,
            Body::ProgramEpc {
                epc: self.epc.clone(),
                password: self.password,
            },
        )
    }
}

/// Store one block of a firmware image
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreFirmwareBlockPacket {
    pub number: u16,
    pub data: Bytes,
}

impl StoreFirmwareBlockPacket {
    pub fn new(number: u16, data: impl Into<Bytes>) -> Self {
        Self {
            number,
            data: data.into(),
        }
    }

    /// Constructs a packet from a native object. For internal API usage only.
    pub fn with_object(object: &NativeObject) -> Result<Self> {
        expect_command(object, Command::StoreFirmwareBlock)?;

        match &object.body {
            Body::FirmwareBlock { number, data } => {
                Ok(Self::new(*number, Bytes::copy_from_slice(data)))
            }
            _ => Err(Error::BodyMismatch {
                command: Command::StoreFirmwareBlock,
            }),
        }
    }
}

impl SendablePacket for StoreFirmwareBlockPacket {
    fn command(&self) -> Command {
        Command::StoreFirmwareBlock
    }

    fn to_object(&self) -> NativeObject {
        NativeObject::with_body(
            Command::StoreFirmwareBlock,
            Body::FirmwareBlock {
                number: self.number,
                data: self.data.clone(),
            },
        )
    }
}

/// Flash the stored firmware blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StartFirmwareUpgradePacket {
    pub total_size: u32,
    pub crc: u32,
}

impl StartFirmwareUpgradePacket {
    pub fn new(total_size: u32, crc: u32) -> Self {
        Self { total_size, crc }
    }

    /// Constructs a packet from a native object. For internal API usage only.
    pub fn with_object(object: &NativeObject) -> Result<Self> {
        expect_command(object, Command::StartFirmwareUpgrade)?;

        match object.body {
            Body::FirmwareUpgrade { total_size, crc } => Ok(Self::new(total_size, crc)),
            _ => Err(Error::BodyMismatch {
                command: Command::StartFirmwareUpgrade,
            }),
        }
    }
}

impl SendablePacket for StartFirmwareUpgradePacket {
    fn command(&self) -> Command {
        Command::StartFirmwareUpgrade
    }

    fn to_object(&self) -> NativeObject {
        NativeObject::with_body(
            Command::StartFirmwareUpgrade,
            Body::FirmwareUpgrade {
                total_size: self.total_size,
                crc: self.crc,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idreader_types::{InventoryFlag, RfidSession, Select, Target};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_packet_constructors() {
        assert_eq!(GetVersionPacket::new(), GetVersionPacket::packet());
        assert_eq!(ResetPacket::new().command(), Command::Reset);
        assert_eq!(StopInventoryPacket::new().to_object(), NativeObject::new(Command::StopInventory));
    }

    #[test]
    fn test_empty_packet_rejects_other_kind() {
        let object = NativeObject::new(Command::StartInventorySmart);
        assert!(matches!(
            StopInventoryPacket::with_object(&object),
            Err(Error::ObjectMismatch { .. })
        ));
    }

    #[test]
    fn test_feedback_mapping() {
        let packet = UserFeedbackPacket::from_feedback(Feedback::Failure);
        assert_eq!(packet.vibration, VibrationPattern::StrongTriple);
        assert_eq!(packet.speaker, SpeakerSound::Failure);

        let packet = UserFeedbackPacket::from_feedback(Feedback::NotifySubtle);
        assert_eq!(packet.vibration, VibrationPattern::WeakSingle);
        assert_eq!(packet.speaker, SpeakerSound::NotifySubtle);
    }

    #[test]
    fn test_gen2_session_from_settings() {
        let settings = Gen2Settings::new(RfidSession::S3, Target::Both, Select::Deasserted);
        let packet = SetEpcGen2SessionPacket::from_settings(&settings);

        assert_eq!(packet.session.session, RfidSession::S3);
        assert_eq!(packet.session.target, InventoryFlag::A);
        assert!(packet.session.auto_flip);
    }

    #[test]
    fn test_program_epc_from_hex() {
        let packet = ProgramEpcPacket::from_hex("E2801160", 0).unwrap();
        assert_eq!(packet.epc.as_ref(), &[0xE2, 0x80, 0x11, 0x60]);
        assert_eq!(packet.password, 0);
    }

    #[test]
    fn test_program_epc_from_hex_validation() {
        assert!(matches!(ProgramEpcPacket::from_hex("", 0), Err(Error::InvalidEpc(_))));
        assert!(matches!(ProgramEpcPacket::from_hex("ABC", 0), Err(Error::InvalidEpc(_))));
        assert!(matches!(ProgramEpcPacket::from_hex("ZZ", 0), Err(Error::InvalidEpc(_))));
    }

    #[test]
    fn test_firmware_block_bridge_copies_data() {
        let mut object = NativeObject::with_body(
            Command::StoreFirmwareBlock,
            Body::FirmwareBlock {
                number: 7,
                data: Bytes::from(vec![0xAA; 16]),
            },
        );

        let packet = StoreFirmwareBlockPacket::with_object(&object).unwrap();
        object.body = Body::Empty;

        assert_eq!(packet.number, 7);
        assert_eq!(packet.data.as_ref(), &[0xAA; 16]);
    }

    #[test]
    fn test_regulation_body_mismatch() {
        let object = NativeObject::with_body(Command::SetRegulation, Body::OutputPower(1));
        assert!(matches!(
            SetRegulationPacket::with_object(&object),
            Err(Error::BodyMismatch {
                command: Command::SetRegulation
            })
        ));
    }
}
