//! Conversion calculator — amount × rate, one rounding rule everywhere.
//!
//! Preview and commit both go through `ConversionCalculator::quote`, so the
//! amount a user is shown is the amount that gets credited.

use crate::{
    error::{ExchangeError, ExchangeResult},
    types::{round_cents, round_points, Points},
};
use serde::{Deserialize, Serialize};

/// Dollars-per-point used for the illustrative estimate on a quote.
pub const PREVIEW_DOLLAR_COEFFICIENT: f64 = 0.015;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionQuote {
    pub source_amount:          Points,
    pub rate:                   f64,
    /// round(source_amount × rate)
    pub destination_amount:     Points,
    pub fee:                    Points,
    /// destination_amount − fee; what is credited on commit.
    pub net_amount:             Points,
    /// destination_amount × preview coefficient, in cents.
    pub estimated_dollar_value: f64,
}

#[derive(Debug, Clone)]
pub struct ConversionCalculator {
    preview_coefficient: f64,
    fee_rate:            f64,
}

impl Default for ConversionCalculator {
    fn default() -> Self {
        Self {
            preview_coefficient: PREVIEW_DOLLAR_COEFFICIENT,
            fee_rate:            0.0,
        }
    }
}

impl ConversionCalculator {
    pub fn new(preview_coefficient: f64, fee_rate: f64) -> ExchangeResult<Self> {
        if !(preview_coefficient.is_finite() && preview_coefficient > 0.0) {
            return Err(ExchangeError::InvalidConfig(format!(
                "preview coefficient must be positive, got {preview_coefficient}"
            )));
        }
        if !(fee_rate.is_finite() && (0.0..1.0).contains(&fee_rate)) {
            return Err(ExchangeError::InvalidConfig(format!(
                "fee rate must be in [0, 1), got {fee_rate}"
            )));
        }
        Ok(Self {
            preview_coefficient,
            fee_rate,
        })
    }

    pub fn fee_rate(&self) -> f64 {
        self.fee_rate
    }

    /// Quote a conversion of `amount` source points at `rate` destination
    /// points per source point.
    pub fn quote(&self, amount: Points, rate: f64) -> ExchangeResult<ConversionQuote> {
        if amount <= 0 {
            return Err(ExchangeError::InvalidAmount { amount });
        }
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ExchangeError::InvalidRate { rate });
        }

        let destination_amount = round_points(amount as f64 * rate);
        let fee = round_points(destination_amount as f64 * self.fee_rate);
        let net_amount = destination_amount - fee;
        if destination_amount <= 0 || net_amount <= 0 {
            return Err(ExchangeError::AmountTooSmall { amount });
        }
        let estimated_dollar_value =
            round_cents(destination_amount as f64 * self.preview_coefficient);

        log::debug!(
            "conversion: {amount} @ {rate} -> {destination_amount} (fee {fee}, est ${estimated_dollar_value:.2})"
        );

        Ok(ConversionQuote {
            source_amount: amount,
            rate,
            destination_amount,
            fee,
            net_amount,
            estimated_dollar_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_is_taken_from_destination() {
        let calc = ConversionCalculator::new(PREVIEW_DOLLAR_COEFFICIENT, 0.02).unwrap();
        let q = calc.quote(1000, 1.25).unwrap();
        assert_eq!(q.destination_amount, 1250);
        assert_eq!(q.fee, 25);
        assert_eq!(q.net_amount, 1225);
    }

    #[test]
    fn fee_that_eats_the_whole_credit_is_rejected() {
        let calc = ConversionCalculator::new(PREVIEW_DOLLAR_COEFFICIENT, 0.6).unwrap();
        // round(0.8) = 1, fee round(0.6) = 1, nothing left to credit
        assert!(matches!(
            calc.quote(1, 0.8),
            Err(ExchangeError::AmountTooSmall { amount: 1 })
        ));
        assert_eq!(calc.quote(10, 0.8).unwrap().net_amount, 3);
    }

    #[test]
    fn rejects_bad_fee_rate() {
        assert!(ConversionCalculator::new(PREVIEW_DOLLAR_COEFFICIENT, 1.0).is_err());
        assert!(ConversionCalculator::new(PREVIEW_DOLLAR_COEFFICIENT, -0.1).is_err());
        assert!(ConversionCalculator::new(0.0, 0.0).is_err());
    }
}
