//! Loyalty programs supported by the exchange.
//!
//! The set is fixed reference data. Variants are appended, never
//! reordered, because codes are persisted in the store.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExchangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Program {
    Xpoints,
    Skymiles,
    Aadvantage,
    Mileageplus,
    Bonvoy,
    Honors,
    MembershipRewards,
    UltimateRewards,
}

impl Program {
    pub const ALL: [Program; 8] = [
        Program::Xpoints,
        Program::Skymiles,
        Program::Aadvantage,
        Program::Mileageplus,
        Program::Bonvoy,
        Program::Honors,
        Program::MembershipRewards,
        Program::UltimateRewards,
    ];

    /// Stable code used on the wire and in the store.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Xpoints           => "XPOINTS",
            Self::Skymiles          => "SKYMILES",
            Self::Aadvantage        => "AADVANTAGE",
            Self::Mileageplus       => "MILEAGEPLUS",
            Self::Bonvoy            => "BONVOY",
            Self::Honors            => "HONORS",
            Self::MembershipRewards => "MEMBERSHIP_REWARDS",
            Self::UltimateRewards   => "ULTIMATE_REWARDS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Xpoints           => "XPoints",
            Self::Skymiles          => "Delta SkyMiles",
            Self::Aadvantage        => "American AAdvantage",
            Self::Mileageplus       => "United MileagePlus",
            Self::Bonvoy            => "Marriott Bonvoy",
            Self::Honors            => "Hilton Honors",
            Self::MembershipRewards => "Amex Membership Rewards",
            Self::UltimateRewards   => "Chase Ultimate Rewards",
        }
    }

    /// Case-insensitive lookup by code. `None` for codes outside the set.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Program {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| ExchangeError::UnknownProgram { code: s.to_string() })
    }
}

/// Accepts codes in any case, same as `from_code`.
impl<'de> Deserialize<'de> for Program {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::from_code(&code)
            .ok_or_else(|| de::Error::custom(format!("unknown program '{code}'")))
    }
}
