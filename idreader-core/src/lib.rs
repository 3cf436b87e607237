//! # idreader-core
//!
//! Core command model for !D Hand RFID readers.
//!
//! This crate provides the low-level primitives:
//! - Command kinds and the [`SendablePacket`] capability
//! - Every request packet, including [`GetSerialNumberPacket`]
//! - The native core object model and copy-on-bridge constructors
//! - Device error codes
//! - Firmware images
//! - Connection session state

pub mod command;
pub mod constants;
pub mod error;
pub mod error_code;
pub mod firmware;
pub mod native;
pub mod packet;
pub mod requests;
pub mod serial_number;
pub mod session;

pub use command::Command;
pub use error::{Error, Result};
pub use error_code::{ErrorCategory, ErrorCode};
pub use firmware::FirmwareImage;
pub use native::{Body, ButtonEvent, DeviceError, Event, NativeObject, ProgramEpcResult, TagObservation};
pub use packet::{Packet, SendablePacket};
pub use requests::*;
pub use serial_number::GetSerialNumberPacket;
pub use session::{Session, SessionState};
