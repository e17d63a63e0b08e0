//! Published exchange rates between program pairs, and the verification
//! view that compares each published rate with the rate implied by the
//! coefficient table.

use crate::{
    error::{ExchangeError, ExchangeResult},
    program::Program,
    rate_table::RateTable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishedRate {
    pub from: Program,
    pub to:   Program,
    /// Destination points per source point.
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateVerification {
    pub from:             Program,
    pub to:               Program,
    pub published_rate:   f64,
    pub implied_rate:     f64,
    /// (published − implied) / implied
    pub deviation:        f64,
    pub within_tolerance: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RateBoard {
    rates: BTreeMap<(Program, Program), f64>,
}

impl RateBoard {
    pub fn new(published: &[PublishedRate]) -> ExchangeResult<Self> {
        let mut rates = BTreeMap::new();
        for p in published {
            if !(p.rate.is_finite() && p.rate > 0.0) {
                return Err(ExchangeError::InvalidConfig(format!(
                    "published rate {} -> {} must be positive, got {}",
                    p.from, p.to, p.rate
                )));
            }
            if p.from == p.to {
                return Err(ExchangeError::InvalidConfig(format!(
                    "published rate {} -> {} converts a program into itself",
                    p.from, p.to
                )));
            }
            if rates.insert((p.from, p.to), p.rate).is_some() {
                return Err(ExchangeError::InvalidConfig(format!(
                    "duplicate published rate {} -> {}",
                    p.from, p.to
                )));
            }
        }
        Ok(Self { rates })
    }

    /// Published rate for a pair. Converting a program into itself is 1.0.
    pub fn rate(&self, from: Program, to: Program) -> ExchangeResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        self.rates
            .get(&(from, to))
            .copied()
            .ok_or_else(|| ExchangeError::RateUnavailable {
                from: from.to_string(),
                to:   to.to_string(),
            })
    }

    /// Rate that would keep dollar value constant:
    /// coefficient[from] / coefficient[to].
    pub fn implied_rate(table: &RateTable, from: Program, to: Program) -> f64 {
        table.coefficient(from) / table.coefficient(to)
    }

    /// One row per published pair, in (from, to) order.
    pub fn verify(&self, table: &RateTable, tolerance: f64) -> Vec<RateVerification> {
        self.rates
            .iter()
            .map(|(&(from, to), &published_rate)| {
                let implied_rate = Self::implied_rate(table, from, to);
                let deviation = (published_rate - implied_rate) / implied_rate;
                if deviation.abs() > tolerance {
                    log::warn!(
                        "rate_board: {from} -> {to} published {published_rate} deviates {:.1}% from implied {implied_rate:.4}",
                        deviation * 100.0
                    );
                }
                RateVerification {
                    from,
                    to,
                    published_rate,
                    implied_rate,
                    deviation,
                    within_tolerance: deviation.abs() <= tolerance,
                }
            })
            .collect()
    }

    /// Destinations reachable from `from` with a published rate.
    pub fn destinations(&self, from: Program) -> Vec<(Program, f64)> {
        self.rates
            .iter()
            .filter(|((f, _), _)| *f == from)
            .map(|((_, t), r)| (*t, *r))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
