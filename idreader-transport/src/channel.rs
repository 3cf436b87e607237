//! In-process channel transport
//!
//! Connects a reader to anything that can play the native core: a simulator,
//! a test, or a bridge to a platform accessory framework.

use std::time::Duration;

use async_trait::async_trait;
use idreader_core::{Event, NativeObject};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::{error::*, Transport};

/// Reader side of a channel pair
pub struct ChannelTransport {
    name: String,
    outbound: mpsc::UnboundedSender<NativeObject>,
    inbound: mpsc::UnboundedReceiver<Event>,
    connected: bool,
}

/// Native core side of a channel pair
pub struct ChannelPeer {
    objects: mpsc::UnboundedReceiver<NativeObject>,
    events: Option<mpsc::UnboundedSender<Event>>,
}

impl ChannelTransport {
    /// Create a connected pair of transport and peer
    pub fn pair(name: impl Into<String>) -> (Self, ChannelPeer) {
        let (outbound, objects) = mpsc::unbounded_channel();
        let (events, inbound) = mpsc::unbounded_channel();

        let transport = Self {
            name: name.into(),
            outbound,
            inbound,
            connected: false,
        };

        let peer = ChannelPeer {
            objects,
            events: Some(events),
        };

        (transport, peer)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Err(Error::AlreadyConnected);
        }

        if self.outbound.is_closed() {
            return Err(Error::ConnectionClosed);
        }

        debug!("Connected to {}", self.name);
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.connected {
            debug!("Disconnecting from {}...", self.name);
        }

        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(&mut self, object: NativeObject) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        trace!("Sending {}", object);

        self.outbound
            .send(object)
            .map_err(|_| Error::ConnectionClosed)
    }

    async fn receive(&mut self, wait: Duration) -> Result<Event> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        let event = timeout(wait, self.inbound.recv())
            .await
            .map_err(|_| Error::ReadTimeout)?;

        match event {
            Some(event) => {
                trace!("Received {}", event);
                Ok(event)
            }
            None => {
                self.connected = false;
                Err(Error::ConnectionClosed)
            }
        }
    }

    fn remote_name(&self) -> String {
        self.name.clone()
    }
}

impl ChannelPeer {
    /// Wait for the next object sent by the reader
    pub async fn recv(&mut self) -> Option<NativeObject> {
        self.objects.recv().await
    }

    /// Next object sent by the reader, if one is queued
    pub fn try_recv(&mut self) -> Option<NativeObject> {
        self.objects.try_recv().ok()
    }

    /// Hand an event to the reader
    ///
    /// Returns `false` when the reader side is gone or the peer was closed.
    pub fn emit(&self, event: Event) -> bool {
        self.events
            .as_ref()
            .is_some_and(|events| events.send(event).is_ok())
    }

    /// Close the link from the native core side
    pub fn close(&mut self) {
        self.events = None;
    }
}
