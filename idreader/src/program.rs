//! EPC programming
//!
//! Pressing the trigger writes the configured EPC to the single tag in
//! front of the reader.

use idreader_core::{ButtonEvent, Error as CoreError, ErrorCode, Event, ProgramEpcPacket};
use idreader_types::{Feedback, LedMode};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::action::{Action, Notice, Reaction};

/// Trigger-driven EPC programming
#[derive(Debug, Default)]
pub struct ProgramAction {
    started: bool,
    writing: bool,
    hex: Option<String>,
}

impl ProgramAction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program `hex` on the next trigger press
    pub fn with_hex(mut self, hex: impl Into<String>) -> Self {
        self.hex = Some(hex.into());
        self
    }

    pub fn set_hex(&mut self, hex: Option<String>) {
        self.hex = hex;
    }

    pub fn is_writing(&self) -> bool {
        self.writing
    }

    fn write(&mut self, reaction: &mut Reaction) {
        if !self.started || self.writing {
            return;
        }

        let packet = match ProgramEpcPacket::from_hex(self.hex.as_deref().unwrap_or_default(), 0) {
            Ok(packet) => packet,
            Err(CoreError::InvalidEpc(reason)) => {
                reaction.notify(Notice::Failed(reason));
                return;
            }
            Err(e) => {
                reaction.notify(Notice::Failed(e.to_string()));
                return;
            }
        };

        debug!("Programming EPC {}", self.hex.as_deref().unwrap_or_default());
        self.writing = true;
        reaction
            .notify(Notice::Started)
            .light(LedMode::Blinking)
            .send(packet);
    }

    /// Leave the writing state after the reader answered
    fn finish(&mut self, reaction: &mut Reaction) {
        self.writing = false;
        reaction.light(LedMode::On).notify(Notice::Stopped);
    }
}

impl Action for ProgramAction {
    fn prepare(&mut self) -> Reaction {
        self.started = false;
        Reaction::default()
    }

    fn start(&mut self) -> Reaction {
        self.started = true;
        Reaction::default()
    }

    fn stop(&mut self) -> Reaction {
        self.started = false;
        let mut reaction = Reaction::new();
        reaction.light(LedMode::On);
        reaction
    }

    fn handle(&mut self, event: &Event, _now: Instant) -> Reaction {
        let mut reaction = Reaction::new();

        match event {
            Event::Button(ButtonEvent::Up) => self.write(&mut reaction),
            Event::ProgramEpcResult(result) if self.started && self.writing => {
                self.finish(&mut reaction);

                if result.is_success() {
                    reaction.feedback(Feedback::Success).notify(Notice::TagProgrammed);
                } else {
                    reaction
                        .feedback(Feedback::Failure)
                        .notify(Notice::Failed(result.message().into()));
                }
            }
            Event::Error(err) if self.started && self.writing => {
                self.writing = false;
                reaction.light(LedMode::On).feedback(Feedback::Failure).notify(Notice::Stopped);

                let reason = match err.code {
                    ErrorCode::InvalidData => Some("An invalid HEX value was provided"),
                    ErrorCode::RfidBusy => Some("The !D Hand is busy with another RFID task"),
                    ErrorCode::AntennaMismatch => {
                        Some("Antenna problem, check if the reader is near metal objects")
                    }
                    _ => None,
                };

                match (reason, err.code) {
                    (Some(reason), _) => {
                        reaction.notify(Notice::Failed(reason.into()));
                    }
                    (None, ErrorCode::UnknownCommand) => {
                        reaction.notify(Notice::OutdatedFirmware);
                    }
                    (None, _) => {
                        warn!("Unhandled error while programming: {}", err);
                        reaction.notify(Notice::Unhandled(err.clone()));
                    }
                }
            }
            _ => {}
        }

        reaction
    }
}
