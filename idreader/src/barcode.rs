//! Barcode scanning

use idreader_core::{
    constants::interaction::BARCODE_READ_TIMEOUT, ButtonEvent, ErrorCode, Event, StartBarcodeReaderPacket,
    StopBarcodeReaderPacket,
};
use idreader_types::{Barcode, Feedback, LedMode};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::action::{Action, Notice, Reaction};

/// Trigger-driven barcode scanning
#[derive(Debug, Default)]
pub struct BarcodeAction {
    started: bool,
    reading: bool,
    read_deadline: Option<Instant>,
}

impl BarcodeAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reading(&self) -> bool {
        self.reading
    }

    fn start_reading(&mut self, now: Instant, reaction: &mut Reaction) {
        if self.started && !self.reading {
            debug!("Starting barcode reader");
            self.reading = true;
            self.read_deadline = Some(now + BARCODE_READ_TIMEOUT);
            reaction
                .send(StartBarcodeReaderPacket::new())
                .light(LedMode::Blinking);
        }
    }

    fn stop_reading(&mut self, reaction: &mut Reaction) {
        if self.started && self.reading {
            debug!("Stopping barcode reader");
            self.reading = false;
            self.read_deadline = None;
            reaction
                .send(StopBarcodeReaderPacket::new())
                .light(LedMode::On)
                .notify(Notice::Stopped);
        }
    }
}

impl Action for BarcodeAction {
    fn prepare(&mut self) -> Reaction {
        self.started = false;
        Reaction::default()
    }

    fn start(&mut self) -> Reaction {
        self.started = true;
        Reaction::default()
    }

    fn stop(&mut self) -> Reaction {
        let mut reaction = Reaction::new();
        if self.started && self.reading {
            reaction.feedback(Feedback::Alert);
        }
        self.stop_reading(&mut reaction);
        self.started = false;
        reaction
    }

    fn handle(&mut self, event: &Event, now: Instant) -> Reaction {
        let mut reaction = Reaction::new();

        if !self.started {
            return reaction;
        }

        match event {
            Event::Button(ButtonEvent::Up) => {
                if self.reading {
                    reaction.feedback(Feedback::Alert);
                    self.stop_reading(&mut reaction);
                } else {
                    self.start_reading(now, &mut reaction);
                }
            }
            Event::BarcodeStarted if self.reading => {
                reaction.notify(Notice::Started);
            }
            Event::BarcodeStopped if self.reading => {
                self.reading = false;
                self.read_deadline = None;
            }
            Event::BarcodeData { data, symbology } if self.reading => {
                self.stop_reading(&mut reaction);
                reaction
                    .feedback(Feedback::Success)
                    .notify(Notice::Barcode(Barcode::from_data(data, symbology.clone())));
            }
            Event::Error(err) if self.reading => {
                self.stop_reading(&mut reaction);
                reaction.feedback(Feedback::Failure);

                match err.code {
                    ErrorCode::BarcodeReaderBusy => {
                        reaction.notify(Notice::Failed(
                            "The !D Hand is busy with another barcode reader task".into(),
                        ));
                    }
                    ErrorCode::UnknownCommand => {
                        reaction.notify(Notice::OutdatedFirmware);
                    }
                    _ => {
                        warn!("Unhandled error while reading barcode: {}", err);
                        reaction.notify(Notice::Unhandled(err.clone()));
                    }
                }
            }
            _ => {}
        }

        reaction
    }

    fn deadline(&self) -> Option<Instant> {
        self.read_deadline
    }

    fn on_timeout(&mut self, now: Instant) -> Reaction {
        let mut reaction = Reaction::new();

        if self.reading && self.read_deadline.is_some_and(|deadline| now >= deadline) {
            debug!("Barcode reading timed out");
            reaction
                .feedback(Feedback::Failure)
                .notify(Notice::Failed("Barcode reading timed out".into()));
            self.stop_reading(&mut reaction);
        }

        reaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use idreader_core::{Command, DeviceError, SendablePacket};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn commands(reaction: &Reaction) -> Vec<Command> {
        reaction.packets.iter().map(|p| p.command()).collect()
    }

    fn scanning(now: Instant) -> BarcodeAction {
        let mut action = BarcodeAction::new();
        action.prepare();
        action.start();
        action.handle(&Event::Button(ButtonEvent::Up), now);
        action
    }

    #[test]
    fn test_button_starts_scanner() {
        let now = Instant::now();
        let action = scanning(now);

        assert!(action.is_reading());
        assert_eq!(action.deadline(), Some(now + Duration::from_secs(20)));
    }

    #[test]
    fn test_started_notice() {
        let now = Instant::now();
        let mut action = scanning(now);

        let reaction = action.handle(&Event::BarcodeStarted, now);
        assert_eq!(reaction.notices, [Notice::Started]);
    }

    #[test]
    fn test_barcode_read() {
        let now = Instant::now();
        let mut action = scanning(now);

        let event = Event::BarcodeData {
            data: Bytes::from_static(b"0123456789"),
            symbology: "EAN13".into(),
        };
        let reaction = action.handle(&event, now);

        assert_eq!(
            commands(&reaction),
            [Command::StopBarcodeReader, Command::SetUserLedMode, Command::UserFeedback]
        );
        assert_eq!(
            reaction.notices,
            [
                Notice::Stopped,
                Notice::Barcode(Barcode {
                    value: "0123456789".into(),
                    symbology: "EAN13".into(),
                }),
            ]
        );
        assert_eq!(action.deadline(), None);
    }

    #[test]
    fn test_binary_barcode_as_hex() {
        let now = Instant::now();
        let mut action = scanning(now);

        let event = Event::BarcodeData {
            data: Bytes::from_static(&[0xFF, 0x00, 0xAB]),
            symbology: "DataMatrix".into(),
        };
        let reaction = action.handle(&event, now);

        let barcode = reaction.notices.iter().find_map(|n| match n {
            Notice::Barcode(barcode) => Some(barcode.value.clone()),
            _ => None,
        });
        assert_eq!(barcode.as_deref(), Some("ff00ab"));
    }

    #[test]
    fn test_timeout() {
        let now = Instant::now();
        let mut action = scanning(now);

        // Not due yet
        assert!(action.on_timeout(now + Duration::from_secs(10)).is_empty());

        let reaction = action.on_timeout(now + Duration::from_secs(20));
        assert_eq!(
            commands(&reaction),
            [Command::UserFeedback, Command::StopBarcodeReader, Command::SetUserLedMode]
        );
        assert_eq!(
            reaction.notices,
            [Notice::Failed("Barcode reading timed out".into()), Notice::Stopped]
        );
        assert!(!action.is_reading());
    }

    #[test]
    fn test_busy_error() {
        let now = Instant::now();
        let mut action = scanning(now);

        let reaction = action.handle(
            &Event::Error(DeviceError::new(ErrorCode::BarcodeReaderBusy)),
            now,
        );
        assert_eq!(
            reaction.notices,
            [
                Notice::Stopped,
                Notice::Failed("The !D Hand is busy with another barcode reader task".into()),
            ]
        );
    }

    #[test]
    fn test_reader_stopped_by_itself() {
        let now = Instant::now();
        let mut action = scanning(now);

        assert!(action.handle(&Event::BarcodeStopped, now).is_empty());
        assert!(!action.is_reading());
        assert_eq!(action.deadline(), None);

        // Next press starts again
        let reaction = action.handle(&Event::Button(ButtonEvent::Up), now);
        assert_eq!(
            commands(&reaction),
            [Command::StartBarcodeReader, Command::SetUserLedMode]
        );
    }
}
