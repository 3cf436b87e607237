//! Radio regulations
//!
//! A reader must run under the regulation of the country it operates in.
//! Each regulation fixes the allowed frequencies and output power range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Regulation the reader radio operates under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Regulation {
    NoneSelected,
    Etsi,
    FccIc,
    Australia,
    Bangladesh,
    Brazil,
    Brunei,
    China,
    Indonesia,
    Japan,
    Korea,
    Malaysia,
    NewZealand,
    Peru,
    Russia,
    Taiwan,
    Venezuela,
    Vietnam,
}

/// ISO 3166 alpha-2 country code to regulation
const COUNTRIES: &[(&str, Regulation)] = &[
    ("AR", Regulation::FccIc),
    ("AM", Regulation::Etsi),
    ("AU", Regulation::Australia),
    ("AT", Regulation::Etsi),
    ("AZ", Regulation::Etsi),
    ("BD", Regulation::Bangladesh),
    ("BE", Regulation::Etsi),
    ("BY", Regulation::Etsi),
    ("BA", Regulation::Etsi),
    ("BR", Regulation::Brazil),
    ("BN", Regulation::Brunei),
    ("BG", Regulation::Etsi),
    ("CA", Regulation::FccIc),
    ("CN", Regulation::China),
    ("CO", Regulation::FccIc),
    ("CR", Regulation::FccIc),
    ("HR", Regulation::Etsi),
    ("CY", Regulation::Etsi),
    ("CZ", Regulation::Etsi),
    ("DK", Regulation::Etsi),
    ("DO", Regulation::FccIc),
    ("EE", Regulation::Etsi),
    ("FI", Regulation::Etsi),
    ("FR", Regulation::Etsi),
    ("DE", Regulation::Etsi),
    ("GR", Regulation::Etsi),
    ("HK", Regulation::China),
    ("HU", Regulation::Etsi),
    ("IS", Regulation::Etsi),
    ("IN", Regulation::Etsi),
    ("ID", Regulation::Indonesia),
    ("IR", Regulation::Etsi),
    ("IE", Regulation::Etsi),
    ("IT", Regulation::Etsi),
    ("JP", Regulation::Japan),
    ("JO", Regulation::Etsi),
    ("KR", Regulation::Korea),
    ("LV", Regulation::Etsi),
    ("LT", Regulation::Etsi),
    ("LU", Regulation::Etsi),
    ("MK", Regulation::Etsi),
    ("MY", Regulation::Malaysia),
    ("MT", Regulation::Etsi),
    ("MX", Regulation::FccIc),
    ("MD", Regulation::Etsi),
    ("NL", Regulation::Etsi),
    ("NG", Regulation::Etsi),
    ("NZ", Regulation::NewZealand),
    ("NO", Regulation::Etsi),
    ("OM", Regulation::Etsi),
    ("PA", Regulation::FccIc),
    ("PE", Regulation::Peru),
    ("PL", Regulation::Etsi),
    ("PT", Regulation::Etsi),
    ("RO", Regulation::Etsi),
    ("RU", Regulation::Russia),
    ("SA", Regulation::Etsi),
    ("RS", Regulation::Etsi),
    ("SG", Regulation::China),
    ("SK", Regulation::Etsi),
    ("SI", Regulation::Etsi),
    ("ZA", Regulation::Etsi),
    ("ES", Regulation::Etsi),
    ("SE", Regulation::Etsi),
    ("CH", Regulation::Etsi),
    ("TW", Regulation::Taiwan),
    ("TH", Regulation::China),
    ("TN", Regulation::Etsi),
    ("TR", Regulation::Etsi),
    ("AE", Regulation::Etsi),
    ("GB", Regulation::Etsi),
    ("US", Regulation::FccIc),
    ("UY", Regulation::FccIc),
    ("VE", Regulation::Venezuela),
    ("VN", Regulation::Vietnam),
];

impl Regulation {
    /// Every regulation, `NoneSelected` first
    pub const ALL: [Regulation; 18] = [
        Self::NoneSelected,
        Self::Etsi,
        Self::FccIc,
        Self::Australia,
        Self::Bangladesh,
        Self::Brazil,
        Self::Brunei,
        Self::China,
        Self::Indonesia,
        Self::Japan,
        Self::Korea,
        Self::Malaysia,
        Self::NewZealand,
        Self::Peru,
        Self::Russia,
        Self::Taiwan,
        Self::Venezuela,
        Self::Vietnam,
    ];

    /// Regulations a user can pick (everything except `NoneSelected`)
    pub fn selectable() -> impl Iterator<Item = Regulation> {
        Self::ALL.into_iter().filter(|r| *r != Self::NoneSelected)
    }

    /// Regulation for an ISO 3166 alpha-2 country code (case-insensitive)
    pub fn for_country(code: &str) -> Option<Regulation> {
        COUNTRIES
            .iter()
            .find(|(country, _)| country.eq_ignore_ascii_case(code))
            .map(|(_, regulation)| *regulation)
    }

    /// Country codes that operate under this regulation
    pub fn countries(self) -> Vec<&'static str> {
        COUNTRIES
            .iter()
            .filter(|(_, regulation)| *regulation == self)
            .map(|(country, _)| *country)
            .collect()
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::NoneSelected => "None selected",
            Self::Etsi => "ETSI",
            Self::FccIc => "FCC/IC",
            Self::Australia => "Australia",
            Self::Bangladesh => "Bangladesh",
            Self::Brazil => "Brazil",
            Self::Brunei => "Brunei",
            Self::China => "China",
            Self::Indonesia => "Indonesia",
            Self::Japan => "Japan",
            Self::Korea => "Korea",
            Self::Malaysia => "Malaysia",
            Self::NewZealand => "New Zealand",
            Self::Peru => "Peru",
            Self::Russia => "Russia",
            Self::Taiwan => "Taiwan",
            Self::Venezuela => "Venezuela",
            Self::Vietnam => "Vietnam",
        }
    }
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Regulation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Parse(format!("unknown regulation: {}", s)))
    }
}
