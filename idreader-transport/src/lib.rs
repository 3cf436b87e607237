//! Transport layer for !D Hand readers
//!
//! The native core owns framing and the physical link. A [`Transport`] hands
//! it [`NativeObject`]s and returns the [`Event`]s it produces.

pub mod channel;
pub mod error;

pub use channel::{ChannelPeer, ChannelTransport};
pub use error::{Error, Result};

use std::time::Duration;

use async_trait::async_trait;
use idreader_core::{Event, NativeObject};

/// Seam between the reader and the native core
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to reader
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from reader
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Hand a command object to the native core
    async fn send(&mut self, object: NativeObject) -> Result<()>;

    /// Receive the next event (with timeout)
    async fn receive(&mut self, timeout: Duration) -> Result<Event>;

    /// Name of the connected accessory
    fn remote_name(&self) -> String;
}
