//! Connection session
//!
//! A session tracks how far a reader got in its connection sequence:
//! - Disconnected
//! - Connected (link up, reader not yet configured)
//! - Ready (supported regulations retrieved)

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not connected
    Disconnected,

    /// Link established, initialisation in progress
    Connected,

    /// Initialised and ready for commands
    Ready,
}

/// Session manager
///
/// Thread-safe and can be cloned cheaply (Arc internally).
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    /// Create a new disconnected session
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::Disconnected)),
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        !matches!(self.state(), SessionState::Disconnected)
    }

    /// Check if initialised
    pub fn is_ready(&self) -> bool {
        matches!(self.state(), SessionState::Ready)
    }

    /// Mark the link as established
    pub fn initialize(&self) -> Result<()> {
        let mut state = self.state.write();

        if *state != SessionState::Disconnected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot initialize from state: {:?}",
                *state
            )));
        }

        *state = SessionState::Connected;
        Ok(())
    }

    /// Mark the reader as initialised
    pub fn mark_ready(&self) -> Result<()> {
        let mut state = self.state.write();

        if *state != SessionState::Connected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot become ready from state: {:?}",
                *state
            )));
        }

        *state = SessionState::Ready;
        Ok(())
    }

    /// Close session
    pub fn close(&self) {
        *self.state.write() = SessionState::Disconnected;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(!session.is_connected());
        assert!(!session.is_ready());
    }

    #[test]
    fn test_session_lifecycle() {
        let session = Session::new();
        session.initialize().unwrap();
        assert!(session.is_connected());
        assert!(!session.is_ready());

        session.mark_ready().unwrap();
        assert!(session.is_ready());

        session.close();
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn test_invalid_state_transitions() {
        let session = Session::new();

        // Cannot become ready without connecting
        assert!(session.mark_ready().is_err());

        // Cannot initialize twice
        session.initialize().unwrap();
        assert!(session.initialize().is_err());
    }

    #[test]
    fn test_session_clone() {
        let session1 = Session::new();
        session1.initialize().unwrap();

        let session2 = session1.clone();
        session1.mark_ready().unwrap();

        // Both share same state
        assert!(session2.is_ready());
    }
}
