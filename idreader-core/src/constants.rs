//! Protocol constants

use std::time::Duration;

/// Default timeout while waiting for a reader response (seconds)
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Firmware upload constants
pub mod firmware {
    /// Size of one firmware block in bytes
    pub const BLOCK_SIZE: usize = 256;

    /// Blocks in flight before waiting for acknowledgements
    pub const PIPELINE_DEPTH: usize = 5;

    /// Readers older than this version accept one block at a time
    pub const PIPELINING_SINCE_VERSION: u32 = 62;

    /// Transfer errors tolerated before the upload is abandoned
    pub const MAX_FAILURES: usize = 15;

    /// After a transfer error the upload restarts at a multiple of this
    pub const REWIND_BOUNDARY: usize = 16;
}

/// User interaction constants
pub mod interaction {
    use super::Duration;

    /// Minimum interval between two "new tag" feedback signals
    pub const FEEDBACK_INTERVAL: Duration = Duration::from_millis(100);

    /// Time the barcode scanner may take before giving up
    pub const BARCODE_READ_TIMEOUT: Duration = Duration::from_secs(20);

    /// Battery warning thresholds (percent)
    pub const BATTERY_WARNING_LOW: u8 = 20;
    pub const BATTERY_WARNING_CRITICAL: u8 = 10;
}

/// Output power bounds used before a reader reports its own (tenths of dBm)
pub mod output_power {
    pub const MINIMUM: u16 = 140;
    pub const MAXIMUM: u16 = 260;
}
