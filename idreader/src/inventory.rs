//! EPC inventory
//!
//! Pressing the trigger starts a smart inventory, pressing it again stops it.
//! Observations are counted per EPC for as long as the action lives.

use std::collections::HashMap;

use idreader_core::{
    constants::interaction::FEEDBACK_INTERVAL, ButtonEvent, ErrorCode, Event, StartInventorySmartPacket,
    StopInventoryPacket, TagObservation,
};
use idreader_types::{EpcObservation, Feedback, LedMode};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::action::{Action, Notice, Reaction};

/// Counts observations in memory
///
/// Unique observations keep the order in which they were first seen.
#[derive(Debug, Default)]
pub struct ObservationCounter {
    unique: Vec<EpcObservation>,
    index: HashMap<String, usize>,
    total: usize,
}

impl ObservationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique observations, in order of first sighting
    pub fn observations(&self) -> &[EpcObservation] {
        &self.unique
    }

    pub fn unique_count(&self) -> usize {
        self.unique.len()
    }

    /// Number of observations including duplicates
    pub fn total_count(&self) -> usize {
        self.total
    }

    /// Count a batch of observations, returning how many EPCs are new
    pub fn add(&mut self, observations: &[EpcObservation]) -> usize {
        self.total += observations.len();

        let mut new = 0;
        for observation in observations {
            match self.index.get(&observation.hex) {
                Some(&i) => self.unique[i].observe_again(),
                None => {
                    self.index.insert(observation.hex.clone(), self.unique.len());
                    self.unique.push(observation.clone());
                    new += 1;
                }
            }
        }

        new
    }

    pub fn reset(&mut self) {
        self.unique.clear();
        self.index.clear();
        self.total = 0;
    }
}

/// Trigger-driven EPC inventory
#[derive(Debug, Default)]
pub struct InventoryAction {
    started: bool,
    reading: bool,
    last_feedback: Option<Instant>,
    counter: ObservationCounter,
}

impl InventoryAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reading(&self) -> bool {
        self.reading
    }

    pub fn counter(&self) -> &ObservationCounter {
        &self.counter
    }

    fn start_reading(&mut self, reaction: &mut Reaction) {
        if self.started && !self.reading {
            debug!("Starting inventory");
            self.reading = true;
            reaction
                .send(StartInventorySmartPacket::new())
                .light(LedMode::Blinking)
                .notify(Notice::Started);
        }
    }

    fn stop_reading(&mut self, reaction: &mut Reaction) {
        if self.started && self.reading {
            debug!("Stopping inventory");
            self.reading = false;
            reaction
                .send(StopInventoryPacket::new())
                .light(LedMode::On)
                .notify(Notice::Stopped);
        }
    }

    fn observe(&mut self, tags: &[TagObservation], now: Instant, reaction: &mut Reaction) {
        let observations: Vec<_> = tags
            .iter()
            .map(|tag| EpcObservation::from_epc(&tag.epc, tag.rssi))
            .collect();

        let new = self.counter.add(&observations);

        // Rate limited, the reader cannot keep up with a signal per tag
        let due = self
            .last_feedback
            .is_none_or(|last| now.duration_since(last) > FEEDBACK_INTERVAL);
        if new > 0 && due {
            self.last_feedback = Some(now);
            reaction.feedback(Feedback::NotifySubtle);
        }

        reaction.notify(Notice::Observations { observations, new });
    }
}

impl Action for InventoryAction {
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

        match event {
            Event::Button(ButtonEvent::Up) => {
                if self.started && self.reading {
                    reaction.feedback(Feedback::Alert);
                    self.stop_reading(&mut reaction);
                } else {
                    self.start_reading(&mut reaction);
                }
            }
            Event::InventoryObservation(tags) if self.started && self.reading => {
                self.observe(tags, now, &mut reaction);
            }
            Event::Error(err) if self.started && self.reading => {
                self.stop_reading(&mut reaction);
                reaction.feedback(Feedback::Failure);

                if err.code == ErrorCode::UnknownCommand {
                    reaction.notify(Notice::OutdatedFirmware);
                } else {
                    warn!("Unhandled error during inventory: {}", err);
                    reaction.notify(Notice::Unhandled(err.clone()));
                }
            }
            _ => {}
        }

        reaction
    }
}
