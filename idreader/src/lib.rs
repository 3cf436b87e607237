//! # idreader
//!
//! Unofficial Rust SDK for handheld !D Hand RFID readers.
//!
//! ## Features
//!
//! - Typed request packets, bridged to and from the native core
//! - Async/await API using Tokio
//! - Trigger-driven inventory, barcode and EPC programming actions
//! - Pipelined firmware updates
//! - Settings persisted as TOML
//!
//! ## Quick Start
//!
//! ```no_run
//! use idreader::{ChannelTransport, Reader};
//!
//! #[tokio::main]
//! async fn main() -> idreader::Result<()> {
//!     // The peer side is played by the native core
//!     let (transport, _peer) = ChannelTransport::pair("!D Hand 2");
//!     let mut reader = Reader::new(transport);
//!     reader.connect().await?;
//!
//!     let serial = reader.get_serial_number().await?;
//!     println!("{}: {}", reader.info(), serial);
//!
//!     reader.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod barcode;
pub mod battery;
pub mod error;
pub mod firmware;
pub mod inventory;
pub mod program;
pub mod reader;
pub mod settings;

// Re-exports
pub use action::{Action, Notice, Reaction};
pub use barcode::BarcodeAction;
pub use battery::BatteryMonitor;
pub use error::{Error, Result};
pub use firmware::{FirmwareUpdate, UpdateState};
pub use inventory::{InventoryAction, ObservationCounter};
pub use program::ProgramAction;
pub use reader::Reader;
pub use settings::ReaderSettings;

// Re-export lower layers
pub use idreader_core::{
    Command, DeviceError, ErrorCode, Event, FirmwareImage, GetSerialNumberPacket, NativeObject,
    Packet, SendablePacket,
};
pub use idreader_transport::{ChannelPeer, ChannelTransport, Transport};
pub use idreader_types::{
    Barcode, DeviceInfo, EpcObservation, Feedback, Gen2Settings, LedMode, Regulation,
};
