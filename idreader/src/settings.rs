//! Persisted reader settings
//!
//! Settings are stored as TOML and re-applied whenever a reader is selected.

use std::path::Path;

use idreader_types::{Gen2Settings, Regulation, RfidSession, Select, Target};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

pub use idreader_core::constants::output_power::{
    MAXIMUM as MAXIMUM_OUTPUT_POWER, MINIMUM as MINIMUM_OUTPUT_POWER,
};

/// Settings applied to the selected reader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReaderSettings {
    #[serde(default)]
    pub session: RfidSession,

    #[serde(default)]
    pub target: Target,

    #[serde(default)]
    pub select: Select,

    /// Output power in tenths of dBm
    pub output_power: Option<u16>,

    pub regulation: Option<Regulation>,
}

impl ReaderSettings {
    /// Inventory session settings
    pub fn gen2(&self) -> Gen2Settings {
        Gen2Settings::new(self.session, self.target, self.select)
    }

    /// Configured output power, falling back to the maximum
    pub fn output_power_or_max(&self) -> u16 {
        self.output_power.unwrap_or(MAXIMUM_OUTPUT_POWER)
    }

    /// Parses TOML settings from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&s)?)
    }

    /// Reads settings from `path`, or returns the defaults if that fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path.as_ref())
            .inspect_err(|e| debug!("Using default settings: {}", e))
            .unwrap_or_default()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let s = toml::to_string_pretty(self)?;
        std::fs::write(path, s)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = ReaderSettings::default();
        assert_eq!(settings.session, RfidSession::S1);
        assert_eq!(settings.target, Target::A);
        assert_eq!(settings.select, Select::Any);
        assert_eq!(settings.output_power_or_max(), 260);
        assert!(settings.regulation.is_none());
    }

    #[test]
    fn test_parse() {
        let settings: ReaderSettings = toml::from_str(
            r#"
            session = "Session 2"
            target = "Both"
            output-power = 200
            regulation = "etsi"
            "#,
        )
        .unwrap();

        assert_eq!(settings.session, RfidSession::S2);
        assert_eq!(settings.target, Target::Both);
        assert_eq!(settings.select, Select::Any);
        assert_eq!(settings.output_power, Some(200));
        assert_eq!(settings.regulation, Some(Regulation::Etsi));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reader.toml");

        let settings = ReaderSettings {
            select: Select::Deasserted,
            output_power: Some(180),
            regulation: Some(Regulation::Japan),
            ..Default::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(ReaderSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ReaderSettings::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(settings, ReaderSettings::default());
    }

    #[test]
    fn test_load_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reader.toml");
        std::fs::write(&path, "session = \"Session 9\"").unwrap();

        assert!(matches!(
            ReaderSettings::load(&path),
            Err(crate::Error::SettingsParse(_))
        ));
    }
}
