//! GetSerialNumber command

use std::fmt;

use crate::{
    command::Command,
    error::Result,
    native::NativeObject,
    packet::{expect_empty, SendablePacket},
};

/// Command to retrieve the serial number of the reader.
///
/// The packet carries no payload; the serial number itself arrives later as
/// an [`Event::SerialNumber`](crate::native::Event::SerialNumber). Every
/// instance is immediately sendable.
///
/// # Examples
///
/// ```
/// use idreader_core::{Command, GetSerialNumberPacket, SendablePacket};
///
/// let packet = GetSerialNumberPacket::new();
/// assert_eq!(packet.command(), Command::GetSerialNumber);
/// assert_eq!(packet, GetSerialNumberPacket::packet());
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GetSerialNumberPacket {
    _private: (),
}

impl GetSerialNumberPacket {
    /// Constructs a GetSerialNumber packet
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Constructs a GetSerialNumber packet
    pub fn packet() -> Self {
        Self::new()
    }

    /// Constructs a packet from a native object.
    ///
    /// Creates an internally managed copy of the object; the source may be
    /// mutated or dropped afterwards. For internal API usage only.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not a GetSerialNumber object.
    pub fn with_object(object: &NativeObject) -> Result<Self> {
        expect_empty(object, Command::GetSerialNumber)?;
        Ok(Self::new())
    }
}

impl SendablePacket for GetSerialNumberPacket {
    fn command(&self) -> Command {
        Command::GetSerialNumber
    }

    fn to_object(&self) -> NativeObject {
        NativeObject::new(Command::GetSerialNumber)
    }
}

impl fmt::Debug for GetSerialNumberPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GetSerialNumberPacket")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::native::Body;
    use pretty_assertions::assert_eq;

    fn assert_sendable<P: SendablePacket>(packet: &P) -> Command {
        packet.command()
    }

    #[test]
    fn test_constructors_are_equivalent() {
        let p1 = GetSerialNumberPacket::new();
        let p2 = GetSerialNumberPacket::packet();
        let p3 = GetSerialNumberPacket::default();

        assert_eq!(p1, p2);
        assert_eq!(p1, p3);
        assert_eq!(assert_sendable(&p1), Command::GetSerialNumber);
        assert_eq!(assert_sendable(&p2), Command::GetSerialNumber);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut first = NativeObject::new(Command::GetSerialNumber);
        let mut second = NativeObject::new(Command::GetSerialNumber);
        let p1 = GetSerialNumberPacket::with_object(&first).unwrap();
        let p2 = GetSerialNumberPacket::with_object(&second).unwrap();

        first.command = Command::GetVersion;
        second.body = Body::OutputPower(200);

        assert_eq!(p1, p2);
        assert_eq!(p1.to_object(), NativeObject::new(Command::GetSerialNumber));
        assert_eq!(p2.to_object(), NativeObject::new(Command::GetSerialNumber));
        assert_ne!(p1.to_object(), first);
        assert_ne!(p2.to_object(), second);
    }

    #[test]
    fn test_bridge_copies_native_state() {
        let mut object = Box::new(NativeObject::new(Command::GetSerialNumber));
        let packet = GetSerialNumberPacket::with_object(&object).unwrap();

        object.command = Command::Reset;
        object.body = Body::OutputPower(100);
        drop(object);

        assert_eq!(packet, GetSerialNumberPacket::new());
        assert_eq!(packet.to_object(), NativeObject::new(Command::GetSerialNumber));
    }

    #[test]
    fn test_bridge_rejects_other_objects() {
        let object = NativeObject::new(Command::GetVersion);
        let result = GetSerialNumberPacket::with_object(&object);

        assert!(matches!(
            result,
            Err(Error::ObjectMismatch {
                expected: Command::GetSerialNumber,
                actual: Command::GetVersion,
            })
        ));
        assert!(result.unwrap_err().is_bridge_error());
    }

    #[test]
    fn test_bridge_rejects_payload() {
        let mut object = NativeObject::new(Command::GetSerialNumber);
        object.body = Body::OutputPower(100);

        let err = GetSerialNumberPacket::with_object(&object).unwrap_err();
        assert!(matches!(
            err,
            Error::BodyMismatch {
                command: Command::GetSerialNumber
            }
        ));
        assert!(err.is_bridge_error());
        assert!(!Error::InvalidEpc("empty".into()).is_bridge_error());
    }

    #[test]
    fn test_no_payload() {
        assert_eq!(std::mem::size_of::<GetSerialNumberPacket>(), 0);
        assert_eq!(GetSerialNumberPacket::new().to_object().body, Body::Empty);
        assert_eq!(format!("{:?}", GetSerialNumberPacket::new()), "GetSerialNumberPacket");
    }
}
