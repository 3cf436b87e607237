//! Type definitions for idreader

pub mod device_info;
pub mod error;
pub mod feedback;
pub mod observation;
pub mod power;
pub mod regulation;
pub mod rfid;

pub use device_info::DeviceInfo;
pub use error::{Error, Result};
pub use feedback::{Feedback, LedMode, SpeakerSound, VibrationPattern};
pub use observation::{Barcode, EpcObservation};
pub use power::{ChargingStatus, OutputPowerRange, PowerSource, PowerState};
pub use regulation::Regulation;
pub use rfid::{Gen2Session, Gen2Settings, InventoryFlag, RfidSession, Select, Target};
