//! Reader actions
//!
//! An action reacts to reader events (trigger presses, observations, errors)
//! and decides which packets to send next. Actions never talk to the
//! transport themselves: every callback returns a [`Reaction`] that the
//! [`Reader`](crate::Reader) applies.

use idreader_core::{DeviceError, Event, Packet, SetUserLedModePacket, UserFeedbackPacket};
use idreader_types::{Barcode, EpcObservation, Feedback, LedMode};
use tokio::time::Instant;

/// Something an action wants the application to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Reading, scanning or programming started
    Started,

    /// Reading, scanning or programming stopped
    Stopped,

    /// EPCs observed in one inventory round
    Observations {
        observations: Vec<EpcObservation>,

        /// EPCs not seen before in this session
        new: usize,
    },

    Barcode(Barcode),

    TagProgrammed,

    /// The operation failed, with a message for the user
    Failed(String),

    /// The reader does not know the command; its firmware needs an update
    OutdatedFirmware,

    /// An error the action has no handling for
    Unhandled(DeviceError),

    /// Firmware upload progress in percent
    Progress(u8),

    /// Every firmware block is stored and the upgrade was requested
    UpgradeStarted,

    /// The reader went away after the upgrade was requested
    Rebooting,

    UpdateFailed,

    BatteryLevel(u8),

    BatteryWarning(u8),
}

/// Packets to send and notices to report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    pub packets: Vec<Packet>,
    pub notices: Vec<Notice>,
}

impl Reaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a packet
    pub fn send(&mut self, packet: impl Into<Packet>) -> &mut Self {
        self.packets.push(packet.into());
        self
    }

    pub fn notify(&mut self, notice: Notice) -> &mut Self {
        self.notices.push(notice);
        self
    }

    /// Queue a LED mode change
    pub fn light(&mut self, mode: LedMode) -> &mut Self {
        self.send(SetUserLedModePacket::new(mode))
    }

    /// Queue user feedback
    pub fn feedback(&mut self, feedback: Feedback) -> &mut Self {
        self.send(UserFeedbackPacket::from_feedback(feedback))
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty() && self.notices.is_empty()
    }

    /// Append another reaction
    pub fn extend(&mut self, other: Reaction) {
        self.packets.extend(other.packets);
        self.notices.extend(other.notices);
    }
}

/// Behaviour bound to the reader while it is selected
pub trait Action {
    /// Called once before the action is used
    fn prepare(&mut self) -> Reaction {
        Reaction::default()
    }

    /// Enables the action
    fn start(&mut self) -> Reaction;

    /// Disables the action, stopping whatever the reader is doing for it
    fn stop(&mut self) -> Reaction;

    /// Handles an event from the reader
    fn handle(&mut self, event: &Event, now: Instant) -> Reaction;

    /// Moment at which [`on_timeout`](Action::on_timeout) should run
    fn deadline(&self) -> Option<Instant> {
        None
    }

    fn on_timeout(&mut self, _now: Instant) -> Reaction {
        Reaction::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idreader_core::{Command, SendablePacket, StopInventoryPacket};

    #[test]
    fn test_reaction_builder() {
        let mut reaction = Reaction::new();
        assert!(reaction.is_empty());

        reaction
            .send(StopInventoryPacket::new())
            .light(LedMode::On)
            .feedback(Feedback::Alert)
            .notify(Notice::Stopped);

        let commands: Vec<_> = reaction.packets.iter().map(|p| p.command()).collect();
        assert_eq!(
            commands,
            [Command::StopInventory, Command::SetUserLedMode, Command::UserFeedback]
        );
        assert_eq!(reaction.notices, [Notice::Stopped]);
    }

    #[test]
    fn test_reaction_extend() {
        let mut first = Reaction::new();
        first.notify(Notice::Started);

        let mut second = Reaction::new();
        second.light(LedMode::Blinking).notify(Notice::Progress(10));

        first.extend(second);
        assert_eq!(first.packets.len(), 1);
        assert_eq!(first.notices, [Notice::Started, Notice::Progress(10)]);
    }
}
