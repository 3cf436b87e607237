//! EPC Gen2 inventory session settings

use serde::{Deserialize, Serialize};

/// Gen2 session used for inventory rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RfidSession {
    #[serde(rename = "Session 0")]
    S0,
    #[default]
    #[serde(rename = "Session 1")]
    S1,
    #[serde(rename = "Session 2")]
    S2,
    #[serde(rename = "Session 3")]
    S3,
}

/// Inventoried flag the reader targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    #[default]
    #[serde(rename = "Target A")]
    A,
    #[serde(rename = "Target B")]
    B,
    /// Alternate between A and B
    #[serde(rename = "Both")]
    Both,
}

/// Gen2 flag value as sent to the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryFlag {
    A,
    B,
}

/// SL flag selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Select {
    #[default]
    Any,
    Asserted,
    Deasserted,
}

/// User-facing inventory settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gen2Settings {
    pub session: RfidSession,
    pub target: Target,
    pub select: Select,
}

/// Resolved session configuration, ready to be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gen2Session {
    pub session: RfidSession,
    pub target: InventoryFlag,
    pub select: Select,
    pub auto_flip: bool,
}

impl Gen2Settings {
    pub fn new(session: RfidSession, target: Target, select: Select) -> Self {
        Self {
            session,
            target,
            select,
        }
    }

    /// Resolve into the reader's representation.
    ///
    /// `Target::Both` starts at flag A with auto-flip enabled.
    pub fn resolve(&self) -> Gen2Session {
        let (target, auto_flip) = match self.target {
            Target::A => (InventoryFlag::A, false),
            Target::B => (InventoryFlag::B, false),
            Target::Both => (InventoryFlag::A, true),
        };

        Gen2Session {
            session: self.session,
            target,
            select: self.select,
            auto_flip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Gen2Settings::default();
        assert_eq!(settings.session, RfidSession::S1);
        assert_eq!(settings.target, Target::A);
        assert_eq!(settings.select, Select::Any);
    }

    #[test]
    fn test_resolve_single_target() {
        let resolved = Gen2Settings::new(RfidSession::S2, Target::B, Select::Asserted).resolve();
        assert_eq!(resolved.session, RfidSession::S2);
        assert_eq!(resolved.target, InventoryFlag::B);
        assert_eq!(resolved.select, Select::Asserted);
        assert!(!resolved.auto_flip);
    }

    #[test]
    fn test_resolve_both_enables_auto_flip() {
        let resolved = Gen2Settings::new(RfidSession::S0, Target::Both, Select::Any).resolve();
        assert_eq!(resolved.target, InventoryFlag::A);
        assert!(resolved.auto_flip);
    }
}
