//! Rate table — dollars of value represented by one point, per program.
//!
//! This is the single canonical coefficient table. The translator, the
//! conversion preview, the rate board and the narratives all read it.

use crate::{
    error::{ExchangeError, ExchangeResult},
    program::Program,
    types::Points,
};
use std::collections::HashMap;

/// Coefficient applied when a program has no entry.
pub const DEFAULT_COEFFICIENT: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct RateTable {
    coefficients:        HashMap<Program, f64>,
    default_coefficient: f64,
}

impl RateTable {
    /// Build a table, rejecting any coefficient that is not a positive
    /// finite number. A table with a bad coefficient would yield infinite
    /// or negative point costs.
    pub fn new(
        coefficients: HashMap<Program, f64>,
        default_coefficient: f64,
    ) -> ExchangeResult<Self> {
        if !is_valid_coefficient(default_coefficient) {
            return Err(ExchangeError::InvalidConfig(format!(
                "default coefficient must be positive and finite, got {default_coefficient}"
            )));
        }
        if let Some((program, value)) = coefficients
            .iter()
            .find(|(_, v)| !is_valid_coefficient(**v))
        {
            return Err(ExchangeError::InvalidConfig(format!(
                "coefficient for {program} must be positive and finite, got {value}"
            )));
        }
        Ok(Self {
            coefficients,
            default_coefficient,
        })
    }

    pub fn default_coefficient(&self) -> f64 {
        self.default_coefficient
    }

    /// Coefficient for a known program, falling back to the default.
    pub fn coefficient(&self, program: Program) -> f64 {
        self.coefficients
            .get(&program)
            .copied()
            .unwrap_or(self.default_coefficient)
    }

    /// Coefficient for a raw program code. Unknown codes resolve to the
    /// default coefficient rather than failing.
    pub fn coefficient_for_code(&self, code: &str) -> f64 {
        match Program::from_code(code) {
            Some(program) => self.coefficient(program),
            None => {
                log::debug!(
                    "rate_table: unknown program '{code}', using default {}",
                    self.default_coefficient
                );
                self.default_coefficient
            }
        }
    }

    /// Dollar value of a balance: `points × coefficient`, unrounded.
    pub fn points_dollar_value(&self, points: Points, program: Program) -> f64 {
        points as f64 * self.coefficient(program)
    }

    /// Programs with an explicit entry, in code order.
    pub fn programs(&self) -> Vec<Program> {
        let mut programs: Vec<Program> = self.coefficients.keys().copied().collect();
        programs.sort();
        programs
    }
}

fn is_valid_coefficient(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RateTable {
        let mut c = HashMap::new();
        c.insert(Program::Xpoints, 0.01);
        c.insert(Program::MembershipRewards, 0.02);
        RateTable::new(c, DEFAULT_COEFFICIENT).unwrap()
    }

    #[test]
    fn missing_program_uses_default() {
        let t = table();
        assert_eq!(t.coefficient(Program::Honors), DEFAULT_COEFFICIENT);
        assert_eq!(t.coefficient_for_code("NOT_A_PROGRAM"), DEFAULT_COEFFICIENT);
        assert_eq!(t.coefficient_for_code("membership_rewards"), 0.02);
    }

    #[test]
    fn rejects_non_positive_coefficients() {
        let mut c = HashMap::new();
        c.insert(Program::Bonvoy, 0.0);
        assert!(RateTable::new(c, DEFAULT_COEFFICIENT).is_err());

        let mut c = HashMap::new();
        c.insert(Program::Bonvoy, f64::NAN);
        assert!(RateTable::new(c, DEFAULT_COEFFICIENT).is_err());

        assert!(RateTable::new(HashMap::new(), -0.01).is_err());
    }
}
