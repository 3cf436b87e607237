//! Observed EPCs and barcodes

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

/// One observed EPC
///
/// Two observations are equal when their EPC is equal, regardless of
/// rssi, count or timestamp.
#[derive(Debug, Clone)]
pub struct EpcObservation {
    /// EPC as uppercase hexadecimal
    pub hex: String,

    /// Last time the EPC was observed
    pub timestamp: DateTime<Utc>,

    /// Signal strength of the first observation
    pub rssi: i16,

    /// Number of times the EPC has been observed
    pub count: u32,
}

impl EpcObservation {
    pub fn new(hex: impl Into<String>, rssi: i16) -> Self {
        Self {
            hex: hex.into().to_ascii_uppercase(),
            timestamp: Utc::now(),
            rssi,
            count: 1,
        }
    }

    /// Build an observation from raw EPC bytes
    pub fn from_epc(epc: &[u8], rssi: i16) -> Self {
        Self::new(hex::encode_upper(epc), rssi)
    }

    /// Count another sighting of the same EPC
    pub fn observe_again(&mut self) {
        self.count += 1;
        self.timestamp = Utc::now();
    }
}

impl PartialEq for EpcObservation {
    fn eq(&self, other: &Self) -> bool {
        self.hex == other.hex
    }
}

impl Eq for EpcObservation {}

impl Hash for EpcObservation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hex.hash(state);
    }
}

impl fmt::Display for EpcObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EpcObservation({}, {}, {}, {})",
            self.hex,
            self.timestamp.to_rfc3339(),
            self.rssi,
            self.count
        )
    }
}

/// A scanned barcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode {
    /// Barcode value, e.g. 0123456789
    pub value: String,

    /// Symbology name, e.g. EAN13, Code39
    pub symbology: String,
}

impl Barcode {
    /// Decode raw scanner data; non UTF-8 data is rendered as lowercase hex
    pub fn from_data(data: &[u8], symbology: impl Into<String>) -> Self {
        let value = match std::str::from_utf8(data) {
            Ok(text) => text.to_string(),
            Err(_) => hex::encode(data),
        };

        Self {
            value,
            symbology: symbology.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_hex() {
        let a = EpcObservation::new("e2801160", -40);
        let mut b = EpcObservation::new("E2801160", -70);
        b.observe_again();

        assert_eq!(a, b);
        assert_eq!(b.count, 2);
        assert_eq!(a.hex, "E2801160");
    }

    #[test]
    fn test_from_epc() {
        let observation = EpcObservation::from_epc(&[0xE2, 0x00, 0x3A], -55);
        assert_eq!(observation.hex, "E2003A");
        assert_eq!(observation.count, 1);
    }

    #[test]
    fn test_observe_again_refreshes_timestamp() {
        let mut observation = EpcObservation::new("AA", 0);
        let first = observation.timestamp;
        observation.observe_again();
        assert!(observation.timestamp >= first);
    }

    #[test]
    fn test_barcode_utf8() {
        let barcode = Barcode::from_data(b"0123456789", "EAN13");
        assert_eq!(barcode.value, "0123456789");
        assert_eq!(barcode.symbology, "EAN13");
    }

    #[test]
    fn test_barcode_binary_falls_back_to_hex() {
        let barcode = Barcode::from_data(&[0xFF, 0x00, 0xAB], "DataMatrix");
        assert_eq!(barcode.value, "ff00ab");
    }
}
