//! Reward catalog — read-only list of redeemable rewards priced in dollars.
//!
//! Point costs are never stored here. They are recomputed per program by
//! the translator from `base_cost_dollars` and the rate table.

use crate::error::{ExchangeError, ExchangeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardCategory {
    Travel,
    Hotels,
    Dining,
    Shopping,
    GiftCards,
    Entertainment,
    Experiences,
    Cashback,
}

impl RewardCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Travel        => "Travel",
            Self::Hotels        => "Hotels",
            Self::Dining        => "Dining",
            Self::Shopping      => "Shopping",
            Self::GiftCards     => "Gift Cards",
            Self::Entertainment => "Entertainment",
            Self::Experiences   => "Experiences",
            Self::Cashback      => "Cash Back",
        }
    }
}

impl fmt::Display for RewardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardDescriptor {
    pub reward_id:         String,
    pub category:          RewardCategory,
    pub description:       String,
    pub base_cost_dollars: f64,
    /// Scales the computed point cost for this reward only
    /// (e.g. 1.5 for peak-season redemptions).
    #[serde(default = "default_multiplier")]
    pub points_multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default)]
pub struct RewardCatalog {
    rewards: Vec<RewardDescriptor>,
}

impl RewardCatalog {
    /// Validate and wrap a list of descriptors.
    pub fn new(rewards: Vec<RewardDescriptor>) -> ExchangeResult<Self> {
        for r in &rewards {
            if !(r.base_cost_dollars.is_finite() && r.base_cost_dollars > 0.0) {
                return Err(ExchangeError::InvalidConfig(format!(
                    "reward '{}' has non-positive base cost {}",
                    r.reward_id, r.base_cost_dollars
                )));
            }
            if !(r.points_multiplier.is_finite() && r.points_multiplier > 0.0) {
                return Err(ExchangeError::InvalidConfig(format!(
                    "reward '{}' has non-positive multiplier {}",
                    r.reward_id, r.points_multiplier
                )));
            }
        }

        let mut ids: Vec<&str> = rewards.iter().map(|r| r.reward_id.as_str()).collect();
        ids.sort_unstable();
        if let Some(dup) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(ExchangeError::InvalidConfig(format!(
                "duplicate reward id '{}'",
                dup[0]
            )));
        }

        Ok(Self { rewards })
    }

    pub fn rewards(&self) -> &[RewardDescriptor] {
        &self.rewards
    }

    pub fn get(&self, reward_id: &str) -> Option<&RewardDescriptor> {
        self.rewards.iter().find(|r| r.reward_id == reward_id)
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}
