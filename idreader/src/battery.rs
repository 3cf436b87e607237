//! Battery monitoring

use idreader_core::constants::interaction::{BATTERY_WARNING_CRITICAL, BATTERY_WARNING_LOW};
use idreader_types::{Feedback, PowerState};
use tracing::warn;

use crate::action::{Notice, Reaction};

/// Issues low battery warnings for the selected reader
///
/// Warns once when the level drops below the low threshold and once more
/// below the critical threshold.
#[derive(Debug, Default)]
pub struct BatteryMonitor {
    warned_low: bool,
    warned_critical: bool,
}

impl BatteryMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arm the warnings, e.g. after another reader was selected
    pub fn reset(&mut self) {
        self.warned_low = false;
        self.warned_critical = false;
    }

    /// Check a fresh power state
    pub fn check(&mut self, state: &PowerState) -> Reaction {
        let level = state.battery_level;
        let mut reaction = Reaction::new();
        reaction.notify(Notice::BatteryLevel(level));

        let warn = if level < BATTERY_WARNING_CRITICAL && !self.warned_critical {
            self.warned_critical = true;
            self.warned_low = true;
            true
        } else if level < BATTERY_WARNING_LOW && !self.warned_low {
            self.warned_critical = false;
            self.warned_low = true;
            true
        } else {
            false
        };

        if warn {
            warn!(level, "Reader battery low");
            reaction
                .feedback(Feedback::BatteryLow)
                .notify(Notice::BatteryWarning(level));
        }

        reaction
    }
}
