//! Battery and radio output power

use std::fmt;

/// Where the reader draws power from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSource {
    Battery,
    Usb,
    Wireless,
}

/// Charging status derived from the power source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargingStatus {
    NotCharging,
    ChargingWireless,
    ChargingUsb,
}

impl From<PowerSource> for ChargingStatus {
    fn from(source: PowerSource) -> Self {
        match source {
            PowerSource::Battery => Self::NotCharging,
            PowerSource::Usb => Self::ChargingUsb,
            PowerSource::Wireless => Self::ChargingWireless,
        }
    }
}

/// Power state reported by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerState {
    /// Battery level in percent
    pub battery_level: u8,

    /// Battery health in percent
    pub battery_health: u8,

    pub source: PowerSource,
}

impl PowerState {
    pub fn charging_status(&self) -> ChargingStatus {
        self.source.into()
    }
}

/// Allowed output power in tenths of dBm, as dictated by the regulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPowerRange {
    pub min: u16,
    pub max: u16,
}

impl OutputPowerRange {
    pub fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Clamp a requested power into the range
    pub fn clamp(&self, power: u16) -> u16 {
        power.clamp(self.min, self.max.max(self.min))
    }

    pub fn contains(&self, power: u16) -> bool {
        (self.min..=self.max).contains(&power)
    }
}

impl fmt::Display for OutputPowerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} - {:.1} dBm",
            f64::from(self.min) / 10.0,
            f64::from(self.max) / 10.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let range = OutputPowerRange::new(140, 260);
        assert_eq!(range.clamp(100), 140);
        assert_eq!(range.clamp(200), 200);
        assert_eq!(range.clamp(300), 260);
    }

    #[test]
    fn test_clamp_inverted_range() {
        // A reader reporting max below min still yields min
        let range = OutputPowerRange::new(200, 100);
        assert_eq!(range.clamp(150), 200);
    }

    #[test]
    fn test_charging_status() {
        let state = PowerState {
            battery_level: 80,
            battery_health: 95,
            source: PowerSource::Usb,
        };
        assert_eq!(state.charging_status(), ChargingStatus::ChargingUsb);
        assert_eq!(ChargingStatus::from(PowerSource::Battery), ChargingStatus::NotCharging);
    }

    #[test]
    fn test_display() {
        assert_eq!(OutputPowerRange::new(140, 265).to_string(), "14.0 - 26.5 dBm");
    }
}
