//! Transport errors

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Read timeout")]
    ReadTimeout,

    #[error("Connection closed by remote")]
    ConnectionClosed,
}

impl Error {
    /// The link is gone and the reader has to be connected again
    pub fn requires_reconnect(&self) -> bool {
        matches!(self, Self::NotConnected | Self::ConnectionClosed)
    }
}
