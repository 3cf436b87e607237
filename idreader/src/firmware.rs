//! Firmware update
//!
//! Blocks are streamed with a small number in flight. The reader
//! acknowledges every stored block; acknowledgements only count in order.
//! Transfer errors rewind the upload to the last multiple of
//! [`REWIND_BOUNDARY`] acknowledged blocks. Once every block is stored the
//! upgrade is requested and the reader reboots. Whether the update took is
//! only known after it reconnects, see [`FirmwareUpdate::verify`].

use idreader_core::{
    constants::firmware::{MAX_FAILURES, PIPELINE_DEPTH, PIPELINING_SINCE_VERSION, REWIND_BOUNDARY},
    ErrorCode, Event, FirmwareImage,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::action::{Action, Notice, Reaction};

/// Update progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Idle,

    /// Blocks are being uploaded
    Transferring,

    /// Upgrade requested, waiting for the reader to reboot
    Upgrading,

    /// Reader went away after the upgrade request
    Rebooting,

    Succeeded,

    Failed,
}

/// Pipelined firmware upload
#[derive(Debug)]
pub struct FirmwareUpdate {
    image: FirmwareImage,
    version: u32,
    window: usize,
    next: usize,
    acked: usize,
    failures: usize,
    state: UpdateState,
}

impl FirmwareUpdate {
    /// Prepare uploading `image` (firmware `version`) to a reader running
    /// `reader_version`
    pub fn new(image: FirmwareImage, version: u32, reader_version: u32) -> Self {
        let window = if reader_version < PIPELINING_SINCE_VERSION {
            1
        } else {
            PIPELINE_DEPTH
        };

        Self {
            image,
            version,
            window,
            next: 0,
            acked: 0,
            failures: 0,
            state: UpdateState::Idle,
        }
    }

    /// Check if the reader runs older firmware than this update
    pub fn is_update_available(&self, reader_version: u32) -> bool {
        self.version > reader_version
    }

    pub fn state(&self) -> UpdateState {
        self.state
    }

    /// Blocks allowed in flight
    pub fn window(&self) -> usize {
        self.window
    }

    /// Acknowledged blocks in percent
    pub fn progress(&self) -> u8 {
        let total = self.image.block_count();
        if total == 0 {
            return 0;
        }

        (self.acked as f64 / total as f64 * 100.0).round() as u8
    }

    /// Decide the outcome once the reader reconnected with `reader_version`
    pub fn verify(&mut self, reader_version: u32) -> UpdateState {
        if matches!(self.state, UpdateState::Upgrading | UpdateState::Rebooting) {
            self.state = if self.is_update_available(reader_version) {
                warn!(reader_version, "Reader still runs old firmware after update");
                UpdateState::Failed
            } else {
                info!(reader_version, "Firmware update complete");
                UpdateState::Succeeded
            };
        }

        self.state
    }

    fn send_first(&mut self, reaction: &mut Reaction) {
        self.next = 0;
        self.acked = 0;
        reaction.notify(Notice::Progress(self.progress()));
        self.send_next(reaction);
    }

    /// Fill the window
    fn send_next(&mut self, reaction: &mut Reaction) {
        // Before the first acknowledgement only one block goes out
        let limit = if self.acked == 0 { 1 } else { self.acked + self.window };

        while self.next < limit {
            match self.image.block_packet(self.next) {
                Some(packet) => {
                    reaction.send(packet);
                    self.next += 1;
                }
                None => break,
            }
        }
    }

    fn fail(&mut self, reaction: &mut Reaction) {
        self.state = UpdateState::Failed;
        reaction.notify(Notice::UpdateFailed);
    }

    fn rewind(&mut self, reaction: &mut Reaction) {
        self.failures += 1;
        if self.failures > MAX_FAILURES {
            warn!("Too many failures, cancelling update");
            self.fail(reaction);
            return;
        }

        self.next = REWIND_BOUNDARY * (self.acked.saturating_sub(1) / REWIND_BOUNDARY);
        self.acked = self.next;

        debug!(next = self.next, failures = self.failures, "Rewinding firmware upload");

        if self.next == 0 {
            self.send_first(reaction);
        } else {
            self.send_next(reaction);
        }
    }

    fn acknowledge(&mut self, number: u16, reaction: &mut Reaction) {
        if number as usize != self.acked {
            return;
        }

        self.acked += 1;
        reaction.notify(Notice::Progress(self.progress()));

        if self.acked == self.image.block_count() {
            debug!("All blocks stored, requesting upgrade");
            self.state = UpdateState::Upgrading;
            reaction.send(self.image.upgrade_packet()).notify(Notice::UpgradeStarted);
        } else {
            self.send_next(reaction);
        }
    }
}

impl Action for FirmwareUpdate {
    fn start(&mut self) -> Reaction {
        let mut reaction = Reaction::new();

        info!(
            blocks = self.image.block_count(),
            window = self.window,
            "Starting firmware update"
        );

        self.failures = 0;
        self.state = UpdateState::Transferring;
        self.send_first(&mut reaction);
        reaction
    }

    fn stop(&mut self) -> Reaction {
        if self.state == UpdateState::Transferring {
            self.state = UpdateState::Idle;
        }
        Reaction::default()
    }

    fn handle(&mut self, event: &Event, _now: Instant) -> Reaction {
        let mut reaction = Reaction::new();
        let upgrading = self.state == UpdateState::Upgrading;

        if self.state != UpdateState::Transferring && !upgrading {
            return reaction;
        }

        match event {
            Event::StoreFirmwareBlockCompleted(number) if !upgrading => {
                self.acknowledge(*number, &mut reaction);
            }
            Event::Disconnected if upgrading => {
                self.state = UpdateState::Rebooting;
                reaction.notify(Notice::Rebooting);
            }
            Event::Error(err) => match err.code {
                code if code.is_transfer_error() => {
                    warn!("Transfer error during firmware update: {}", err);
                    if upgrading {
                        self.fail(&mut reaction);
                    } else {
                        self.rewind(&mut reaction);
                    }
                }
                ErrorCode::IncorrectFirmwareCrc
                | ErrorCode::IncorrectFirmwareSignature
                | ErrorCode::RfidBusy => {
                    warn!("Firmware update rejected: {}", err);
                    self.fail(&mut reaction);
                }
                _ => warn!("Unhandled error during firmware update: {}", err),
            },
            _ => {}
        }

        reaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idreader_core::{
        constants::firmware::BLOCK_SIZE, Command, DeviceError, Packet, SendablePacket,
    };
    use pretty_assertions::assert_eq;

    fn image(blocks: usize) -> FirmwareImage {
        FirmwareImage::new(vec![0x5A; BLOCK_SIZE * blocks]).unwrap()
    }

    fn block_numbers(reaction: &Reaction) -> Vec<u16> {
        reaction
            .packets
            .iter()
            .filter_map(|p| match p {
                Packet::StoreFirmwareBlock(block) => Some(block.number),
                _ => None,
            })
            .collect()
    }

    fn ack(update: &mut FirmwareUpdate, number: u16) -> Reaction {
        update.handle(&Event::StoreFirmwareBlockCompleted(number), Instant::now())
    }

    fn error(update: &mut FirmwareUpdate, code: ErrorCode) -> Reaction {
        update.handle(&Event::Error(DeviceError::new(code)), Instant::now())
    }

    #[test]
    fn test_window_depends_on_reader_version() {
        assert_eq!(FirmwareUpdate::new(image(1), 65, 61).window(), 1);
        assert_eq!(FirmwareUpdate::new(image(1), 65, 62).window(), 5);
    }

    #[test]
    fn test_update_available() {
        let update = FirmwareUpdate::new(image(1), 65, 64);
        assert!(update.is_update_available(64));
        assert!(!update.is_update_available(65));
    }

    #[test]
    fn test_pipelined_transfer() {
        let mut update = FirmwareUpdate::new(image(10), 65, 64);

        let reaction = update.start();
        assert_eq!(block_numbers(&reaction), [0]);
        assert_eq!(reaction.notices, [Notice::Progress(0)]);

        // First acknowledgement opens the window
        let reaction = ack(&mut update, 0);
        assert_eq!(block_numbers(&reaction), [1, 2, 3, 4, 5]);
        assert_eq!(reaction.notices, [Notice::Progress(10)]);

        let reaction = ack(&mut update, 1);
        assert_eq!(block_numbers(&reaction), [6]);

        // Out of order acknowledgement is ignored
        assert!(ack(&mut update, 3).is_empty());

        for n in 2..9 {
            ack(&mut update, n);
        }

        let reaction = ack(&mut update, 9);
        assert_eq!(update.progress(), 100);
        assert_eq!(update.state(), UpdateState::Upgrading);
        assert_eq!(reaction.packets.len(), 1);
        assert_eq!(reaction.packets[0].command(), Command::StartFirmwareUpgrade);
        assert_eq!(
            reaction.notices,
            [Notice::Progress(100), Notice::UpgradeStarted]
        );
    }

    #[test]
    fn test_single_block_window() {
        let mut update = FirmwareUpdate::new(image(3), 65, 50);

        assert_eq!(block_numbers(&update.start()), [0]);
        assert_eq!(block_numbers(&ack(&mut update, 0)), [1]);
        assert_eq!(block_numbers(&ack(&mut update, 1)), [2]);
    }

    #[test]
    fn test_transfer_error_rewinds_to_boundary() {
        let mut update = FirmwareUpdate::new(image(40), 65, 64);
        update.start();
        for n in 0..20 {
            ack(&mut update, n);
        }

        let reaction = error(&mut update, ErrorCode::InvalidCrc);
        assert_eq!(block_numbers(&reaction), [16, 17, 18, 19, 20]);

        // The next expected acknowledgement is block 16
        assert_eq!(block_numbers(&ack(&mut update, 16)), [21]);
    }

    #[test]
    fn test_transfer_error_before_boundary_restarts() {
        let mut update = FirmwareUpdate::new(image(20), 65, 64);
        update.start();
        for n in 0..5 {
            ack(&mut update, n);
        }

        let reaction = error(&mut update, ErrorCode::StoreFailed);
        assert_eq!(block_numbers(&reaction), [0]);
        assert_eq!(reaction.notices, [Notice::Progress(0)]);
    }

    #[test]
    fn test_too_many_failures() {
        let mut update = FirmwareUpdate::new(image(4), 65, 64);
        update.start();

        for _ in 0..15 {
            let reaction = error(&mut update, ErrorCode::InvalidData);
            assert_eq!(block_numbers(&reaction), [0]);
        }
        assert_eq!(update.state(), UpdateState::Transferring);

        let reaction = error(&mut update, ErrorCode::InvalidData);
        assert_eq!(reaction.notices, [Notice::UpdateFailed]);
        assert_eq!(update.state(), UpdateState::Failed);

        // Failed updates ignore everything
        assert!(ack(&mut update, 0).is_empty());
    }

    #[test]
    fn test_transfer_error_after_upgrade_fails() {
        let mut update = FirmwareUpdate::new(image(1), 65, 64);
        update.start();
        ack(&mut update, 0);
        assert_eq!(update.state(), UpdateState::Upgrading);

        let reaction = error(&mut update, ErrorCode::InvalidCrc);
        assert_eq!(reaction.notices, [Notice::UpdateFailed]);
    }

    #[test]
    fn test_signature_rejected() {
        let mut update = FirmwareUpdate::new(image(1), 65, 64);
        update.start();
        ack(&mut update, 0);

        error(&mut update, ErrorCode::IncorrectFirmwareSignature);
        assert_eq!(update.state(), UpdateState::Failed);
    }

    #[test]
    fn test_unhandled_error_is_ignored() {
        let mut update = FirmwareUpdate::new(image(2), 65, 64);
        update.start();

        assert!(error(&mut update, ErrorCode::AntennaMismatch).is_empty());
        assert_eq!(update.state(), UpdateState::Transferring);
    }

    #[test]
    fn test_reboot_and_verify() {
        let mut update = FirmwareUpdate::new(image(1), 65, 64);
        update.start();
        ack(&mut update, 0);

        let reaction = update.handle(&Event::Disconnected, Instant::now());
        assert_eq!(reaction.notices, [Notice::Rebooting]);
        assert_eq!(update.state(), UpdateState::Rebooting);

        assert_eq!(update.verify(65), UpdateState::Succeeded);
    }

    #[test]
    fn test_verify_old_version_fails() {
        let mut update = FirmwareUpdate::new(image(1), 65, 64);
        update.start();
        ack(&mut update, 0);

        assert_eq!(update.verify(64), UpdateState::Failed);
    }

    #[test]
    fn test_verify_before_upgrade_does_nothing() {
        let mut update = FirmwareUpdate::new(image(2), 65, 64);
        update.start();
        assert_eq!(update.verify(65), UpdateState::Transferring);
    }
}
