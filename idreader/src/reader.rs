//! High-level reader interface

use std::collections::VecDeque;
use std::time::Duration;

use idreader_core::{
    constants::DEFAULT_TIMEOUT, Command, DeviceError, ErrorCode, Event, GetOutputPowerPacket,
    GetPowerStatePacket, GetRegulationPacket, GetSerialNumberPacket, GetVersionPacket, Packet,
    ResetPacket, SendablePacket, Session, SetEpcGen2SessionPacket, SetOutputPowerPacket,
    SetRegulationPacket, SetUserLedModePacket, UserFeedbackPacket,
};
use idreader_transport::{Error as TransportError, Transport};
use idreader_types::{
    DeviceInfo, Feedback, Gen2Settings, LedMode, OutputPowerRange, PowerState, Regulation,
};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::{
    action::{Action, Notice, Reaction},
    battery::BatteryMonitor,
    error::{Error, Result},
    settings::ReaderSettings,
};

const MANUFACTURER: &str = "Nedap";

/// !D Hand reader
///
/// High-level interface for a reader behind a [`Transport`].
///
/// # Examples
///
/// ```no_run
/// use idreader::{ChannelTransport, Reader};
///
/// #[tokio::main]
/// async fn main() -> idreader::Result<()> {
///     let (transport, _peer) = ChannelTransport::pair("!D Hand 2");
///     let mut reader = Reader::new(transport);
///
///     reader.connect().await?;
///     println!("Connected!");
///
///     let serial = reader.get_serial_number().await?;
///     println!("Serial number: {}", serial);
///
///     reader.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Reader {
    transport: Box<dyn Transport>,
    session: Session,
    timeout: Duration,
    info: DeviceInfo,
    supported_regulations: Vec<Regulation>,
    regulation: Option<Regulation>,
    output_power_range: Option<OutputPowerRange>,
    output_power: Option<u16>,

    /// Events that arrived while waiting for a response
    pending: VecDeque<Event>,
}

impl Reader {
    /// Create a new reader on top of a transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        let info = DeviceInfo::new(transport.remote_name(), MANUFACTURER);

        Self {
            transport: Box::new(transport),
            session: Session::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            info,
            supported_regulations: Vec::new(),
            regulation: None,
            output_power_range: None,
            output_power: None,
            pending: VecDeque::new(),
        }
    }

    /// Set response timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set accessory details (model, hardware revision, ...)
    pub fn with_info(mut self, info: DeviceInfo) -> Self {
        self.info = info;
        self
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.session.is_connected() && self.transport.is_connected()
    }

    /// Check if connected and initialised
    pub fn is_ready(&self) -> bool {
        self.session.is_ready() && self.transport.is_connected()
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Regulations the reader supports, known once connected
    pub fn supported_regulations(&self) -> &[Regulation] {
        &self.supported_regulations
    }

    pub fn supports_regulation(&self, regulation: Regulation) -> bool {
        self.supported_regulations.contains(&regulation)
    }

    /// Regulation confirmed by the reader
    pub fn regulation(&self) -> Option<Regulation> {
        self.regulation
    }

    /// Output power range of the current regulation
    pub fn output_power_range(&self) -> Option<OutputPowerRange> {
        self.output_power_range
    }

    /// Output power in tenths of dBm
    ///
    /// Falls back to the maximum of the range, or 0 when no range is known.
    pub fn output_power(&self) -> u16 {
        self.output_power
            .or(self.output_power_range.map(|range| range.max))
            .unwrap_or(0)
    }

    /// Connect to the reader
    ///
    /// Switches the LED on and retrieves the supported regulations.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The transport fails to connect
    /// - The reader doesn't respond
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.transport.remote_name());

        self.transport.connect().await?;
        self.session.initialize()?;
        self.pending.clear();

        if let Err(e) = self.initialize().await {
            warn!("Failed to set up reader: {}", e);
            if let Err(e) = self.transport.disconnect().await {
                debug!("Disconnect after failed setup: {}", e);
            }
            self.session.close();
            return Err(e);
        }

        self.session.mark_ready()?;
        info!("Connected to {} and ready", self.info.name);
        Ok(())
    }

    /// Disconnect from the reader
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.session.is_connected() && !self.transport.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.remote_name());

        self.transport.disconnect().await?;
        self.session.close();
        self.pending.clear();

        info!("Disconnected");
        Ok(())
    }

    /// Get the serial number
    pub async fn get_serial_number(&mut self) -> Result<String> {
        debug!("Getting serial number...");

        self.send(GetSerialNumberPacket::packet()).await?;
        let serial = self
            .await_response(Command::GetSerialNumber, |event| match event {
                Event::SerialNumber(serial) => Some(serial.clone()),
                _ => None,
            })
            .await?;

        debug!("Serial number: {}", serial);
        self.info.serial_number = Some(serial.clone());
        Ok(serial)
    }

    /// Get the firmware version
    pub async fn get_version(&mut self) -> Result<u32> {
        debug!("Getting version...");

        self.send(GetVersionPacket::new()).await?;
        let version = self
            .await_response(Command::GetVersion, |event| match event {
                Event::Version(version) => Some(*version),
                _ => None,
            })
            .await?;

        self.info.firmware_version = Some(version);
        Ok(version)
    }

    /// Get battery and charging state
    pub async fn get_power_state(&mut self) -> Result<PowerState> {
        self.send(GetPowerStatePacket::new()).await?;
        self.await_response(Command::GetPowerState, |event| match event {
            Event::PowerState(state) => Some(*state),
            _ => None,
        })
        .await
    }

    /// Retrieve the power state and let `monitor` decide on warnings
    pub async fn check_battery(&mut self, monitor: &mut BatteryMonitor) -> Result<Vec<Notice>> {
        let state = self.get_power_state().await?;
        self.apply(monitor.check(&state)).await
    }

    /// Select the regulation the reader operates under
    ///
    /// `None` clears the regulation. An unsupported regulation clears it too.
    /// Once the reader confirms, the output power range is re-read.
    pub async fn set_regulation(&mut self, regulation: Option<Regulation>) -> Result<()> {
        let Some(regulation) = regulation else {
            info!("Regulation cleared");
            self.regulation = None;
            return Ok(());
        };

        if !self.supports_regulation(regulation) {
            warn!("Regulation {} not supported, clearing", regulation);
            self.regulation = None;
            return Err(Error::UnsupportedRegulation(regulation));
        }

        info!("Setting regulation to {}", regulation);
        self.send(SetRegulationPacket::new(regulation)).await?;

        let confirmed = self
            .await_response(Command::SetRegulation, |event| match event {
                Event::Regulation { current, .. } => Some(*current),
                _ => None,
            })
            .await
            .inspect_err(|e| {
                if e.device_code() == Some(ErrorCode::NoRegulationSelected) {
                    warn!("No regulation selected, configure a regulation first");
                    self.regulation = None;
                }
            })?;

        self.regulation_confirmed(confirmed).await
    }

    /// Set output power in tenths of dBm
    ///
    /// The value is clamped into the range of the current regulation; the
    /// applied value is returned.
    pub async fn set_output_power(&mut self, power: u16) -> Result<u16> {
        let Some(range) = self.output_power_range else {
            warn!("Cannot set output power, range not determined yet");
            self.output_power = None;
            return Err(Error::OutputPowerUnknown);
        };

        let power = range.clamp(power);
        self.output_power = Some(power);

        debug!("Setting output power to {:.1} dBm", power as f64 / 10.0);
        self.send(SetOutputPowerPacket::new(power)).await?;
        Ok(power)
    }

    /// Configure the inventory session
    pub async fn set_gen2_settings(&mut self, settings: &Gen2Settings) -> Result<()> {
        debug!("Setting Gen2 session {:?}", settings);
        self.send(SetEpcGen2SessionPacket::from_settings(settings)).await
    }

    pub async fn light(&mut self, mode: LedMode) -> Result<()> {
        self.send(SetUserLedModePacket::new(mode)).await
    }

    pub async fn feedback(&mut self, feedback: Feedback) -> Result<()> {
        self.send(UserFeedbackPacket::from_feedback(feedback)).await
    }

    /// Reset the reader and restore its regulation
    pub async fn reset(&mut self) -> Result<()> {
        warn!("Resetting reader...");

        self.send(ResetPacket::new()).await?;
        let regulation = self.regulation.unwrap_or(Regulation::NoneSelected);
        self.send(SetRegulationPacket::new(regulation)).await
    }

    /// Apply persisted settings
    ///
    /// Returns `false`, after clearing the regulation, when the reader does
    /// not support the configured regulation.
    pub async fn apply_settings(&mut self, settings: &ReaderSettings) -> Result<bool> {
        match settings.regulation.filter(|r| self.supports_regulation(*r)) {
            Some(regulation) => {
                self.set_regulation(Some(regulation)).await?;
                self.set_output_power(settings.output_power_or_max()).await?;
                self.set_gen2_settings(&settings.gen2()).await?;
                Ok(true)
            }
            None => {
                warn!(
                    "{} is not compatible with regulation {:?}",
                    self.info.name, settings.regulation
                );
                self.set_regulation(None).await?;
                Ok(false)
            }
        }
    }

    /// Send a packet without waiting for a response
    pub async fn send(&mut self, packet: impl SendablePacket) -> Result<()> {
        self.ensure_connected()?;

        trace!("Sending: {:?}", packet);
        self.transport.send(packet.to_object()).await?;

        Ok(())
    }

    /// Next event from the reader, or `None` if nothing arrived within `wait`
    ///
    /// Events buffered while waiting for responses are delivered first. A
    /// completed reset sets the reader up again and a regulation confirmation
    /// re-reads the output power range.
    pub async fn next_event(&mut self, wait: Duration) -> Result<Option<Event>> {
        let event = match self.pending.pop_front() {
            Some(event) => event,
            None => {
                self.ensure_connected()?;

                match self.transport.receive(wait).await {
                    Ok(event) => event,
                    Err(TransportError::ReadTimeout) => return Ok(None),
                    Err(e) => return Err(self.transport_failed(e)),
                }
            }
        };

        match &event {
            Event::Disconnected if self.session.is_connected() => self.lost().await,
            Event::ResetCompleted => {
                info!("Reset completed");
                self.initialize().await?;
            }
            Event::Regulation { current, .. } => self.regulation_confirmed(*current).await?,
            _ => {}
        }

        Ok(Some(event))
    }

    /// Send the packets of a reaction, returning its notices
    pub async fn apply(&mut self, reaction: Reaction) -> Result<Vec<Notice>> {
        for packet in reaction.packets {
            self.send(packet).await?;
        }

        Ok(reaction.notices)
    }

    /// Feed the next event, or the action's timeout, to `action`
    ///
    /// Waits at most `wait`, or until the action's deadline if that is sooner.
    pub async fn drive<A: Action + ?Sized>(
        &mut self,
        action: &mut A,
        wait: Duration,
    ) -> Result<Vec<Notice>> {
        let now = Instant::now();
        let until = action
            .deadline()
            .map_or(now + wait, |deadline| deadline.min(now + wait));

        let event = self.next_event(until.saturating_duration_since(now)).await?;

        let now = Instant::now();
        let reaction = match event {
            Some(event) => action.handle(&event, now),
            None if action.deadline().is_some_and(|deadline| now >= deadline) => {
                action.on_timeout(now)
            }
            None => Reaction::default(),
        };

        self.apply(reaction).await
    }

    // Helper methods

    async fn initialize(&mut self) -> Result<()> {
        debug!("Setting up reader");

        self.light(LedMode::On).await?;

        debug!("Retrieving supported regulations");
        self.send(GetRegulationPacket::new()).await?;
        self.supported_regulations = self
            .await_response(Command::GetRegulation, |event| match event {
                Event::Regulation { supported, .. } => Some(supported.clone()),
                _ => None,
            })
            .await?;

        debug!("Supported regulations: {:?}", self.supported_regulations);
        Ok(())
    }

    async fn regulation_confirmed(&mut self, regulation: Regulation) -> Result<()> {
        if regulation == Regulation::NoneSelected {
            debug!("Reader has no regulation selected");
            self.regulation = None;
            return Ok(());
        }

        debug!("Confirmed regulation {}", regulation);
        self.regulation = Some(regulation);
        self.retrieve_output_power().await
    }

    async fn retrieve_output_power(&mut self) -> Result<()> {
        debug!("Retrieving output power range");

        self.send(GetOutputPowerPacket::new()).await?;
        let range = self
            .await_response(Command::GetOutputPower, |event| match event {
                Event::OutputPower { range, .. } => Some(*range),
                _ => None,
            })
            .await?;

        debug!("Output power range: {}", range);
        self.output_power_range = Some(range);
        self.output_power = self.output_power.map(|power| range.clamp(power));
        Ok(())
    }

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    /// Wait for the event answering `command`
    ///
    /// Unrelated events are buffered for [`next_event`](Self::next_event).
    async fn await_response<T>(
        &mut self,
        command: Command,
        mut accept: impl FnMut(&Event) -> Option<T>,
    ) -> Result<T> {
        let deadline = Instant::now() + self.timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());

            let event = match self.transport.receive(remaining).await {
                Ok(event) => event,
                Err(TransportError::ReadTimeout) => return Err(Error::Timeout(command)),
                Err(e) => return Err(self.transport_failed(e)),
            };

            if let Some(value) = accept(&event) {
                return Ok(value);
            }

            match event {
                Event::Error(err) if err.request.as_ref().is_none_or(|r| r.command == command) => {
                    return Err(device_error(err));
                }
                Event::Disconnected => {
                    self.lost().await;
                    self.pending.push_back(Event::Disconnected);
                    return Err(Error::NotConnected);
                }
                event => {
                    trace!("Buffering {} while waiting for {}", event, command);
                    self.pending.push_back(event);
                }
            }
        }
    }

    /// The reader went away
    async fn lost(&mut self) {
        info!("{} disconnected", self.info.name);
        self.session.close();
        if let Err(e) = self.transport.disconnect().await {
            debug!("Disconnect after loss: {}", e);
        }
    }

    fn transport_failed(&mut self, e: TransportError) -> Error {
        if e.requires_reconnect() {
            self.session.close();
        }
        e.into()
    }
}

/// Turn a device error into an error carrying the failed request
fn device_error(err: DeviceError) -> Error {
    let packet = err
        .request
        .as_ref()
        .and_then(|object| match Packet::with_object(object) {
            Ok(packet) => Some(packet),
            Err(e) => {
                warn!("Cannot rebuild failed request {}: {}", object, e);
                None
            }
        });

    Error::Device {
        code: err.code,
        packet,
    }
}
