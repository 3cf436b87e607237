//! Sendable packets
//!
//! Every outbound command implements [`SendablePacket`]: it knows its
//! [`Command`] kind and can produce the [`NativeObject`] the native core
//! transmits. [`Packet`] wraps every concrete packet type so mixed packets
//! can be queued, logged, and rebuilt from native objects.

use std::fmt;

use tracing::trace;

use crate::{
    command::Command,
    error::{Error, Result},
    native::{Body, NativeObject},
    requests::*,
    serial_number::GetSerialNumberPacket,
};

/// A command that can be handed to the transport for sending
pub trait SendablePacket: fmt::Debug + Send + Sync {
    /// Command kind of this packet
    fn command(&self) -> Command;

    /// Native representation, as handed to the native core
    fn to_object(&self) -> NativeObject;
}

/// Check that a native object is of the expected kind
pub(crate) fn expect_command(object: &NativeObject, expected: Command) -> Result<()> {
    if object.command != expected {
        return Err(Error::ObjectMismatch {
            expected,
            actual: object.command,
        });
    }

    Ok(())
}

/// Check that a native object carries no body
pub(crate) fn expect_empty(object: &NativeObject, expected: Command) -> Result<()> {
    expect_command(object, expected)?;

    match object.body {
        Body::Empty => Ok(()),
        _ => Err(Error::BodyMismatch { command: expected }),
    }
}

macro_rules! packets {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Any sendable packet
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Packet {
            $($variant($ty)),+
        }

        impl Packet {
            /// Rebuild a packet from a native object.
            ///
            /// Takes an internally managed copy of the object's state. For
            /// internal API usage only.
            pub fn with_object(object: &NativeObject) -> Result<Self> {
                trace!(command = %object.command, "Bridging native object");

                match object.command {
                    $(Command::$variant => <$ty>::with_object(object).map(Self::$variant)),+
                }
            }
        }

        impl SendablePacket for Packet {
            fn command(&self) -> Command {
                match self {
                    $(Self::$variant(packet) => packet.command()),+
                }
            }

            fn to_object(&self) -> NativeObject {
                match self {
                    $(Self::$variant(packet) => packet.to_object()),+
                }
            }
        }

        $(
            impl From<$ty> for Packet {
                fn from(packet: $ty) -> Self {
                    Self::$variant(packet)
                }
            }
        )+
    };
}

packets! {
    GetSerialNumber(GetSerialNumberPacket),
    GetVersion(GetVersionPacket),
    GetPowerState(GetPowerStatePacket),
    GetRegulation(GetRegulationPacket),
    SetRegulation(SetRegulationPacket),
    GetOutputPower(GetOutputPowerPacket),
    SetOutputPower(SetOutputPowerPacket),
    SetEpcGen2Session(SetEpcGen2SessionPacket),
    SetUserLedMode(SetUserLedModePacket),
    UserFeedback(UserFeedbackPacket),
    Reset(ResetPacket),
    StartInventorySmart(StartInventorySmartPacket),
    StopInventory(StopInventoryPacket),
    ProgramEpc(ProgramEpcPacket),
    StartBarcodeReader(StartBarcodeReaderPacket),
    StopBarcodeReader(StopBarcodeReaderPacket),
    StoreFirmwareBlock(StoreFirmwareBlockPacket),
    StartFirmwareUpgrade(StartFirmwareUpgradePacket),
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet[{}]", self.command())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_packet_from_concrete() {
        let packet = Packet::from(GetSerialNumberPacket::new());
        assert_eq!(packet.command(), Command::GetSerialNumber);
        assert_eq!(packet.to_string(), "Packet[GetSerialNumber]");
    }

    #[test]
    fn test_packet_with_object_dispatches_on_command() {
        let object = SetOutputPowerPacket::new(200).to_object();
        let packet = Packet::with_object(&object).unwrap();
        assert_eq!(packet, Packet::SetOutputPower(SetOutputPowerPacket::new(200)));
    }

    #[test]
    fn test_every_empty_command_bridges() {
        for cmd in Command::ALL {
            let object = NativeObject::new(cmd);
            let result = Packet::with_object(&object);

            match cmd {
                Command::SetRegulation
                | Command::SetOutputPower
                | Command::SetEpcGen2Session
                | Command::SetUserLedMode
                | Command::UserFeedback
                | Command::ProgramEpc
                | Command::StoreFirmwareBlock
                | Command::StartFirmwareUpgrade => {
                    assert!(matches!(result, Err(Error::BodyMismatch { command }) if command == cmd));
                }
                _ => assert_eq!(result.unwrap().command(), cmd),
            }
        }
    }

    #[test]
    fn test_body_mismatch() {
        let object = NativeObject::with_body(Command::GetVersion, Body::OutputPower(10));
        let result = Packet::with_object(&object);
        assert!(matches!(result, Err(Error::BodyMismatch { command: Command::GetVersion })));
    }
}
