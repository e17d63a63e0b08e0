use crate::{
    catalog::{RewardCatalog, RewardCategory, RewardDescriptor},
    conversion::{ConversionCalculator, PREVIEW_DOLLAR_COEFFICIENT},
    error::{ExchangeError, ExchangeResult},
    narrative::FallbackEntry,
    program::Program,
    rate_board::{PublishedRate, RateBoard},
    rate_table::{RateTable, DEFAULT_COEFFICIENT},
};
use serde::Deserialize;
use std::collections::HashMap;

// ── Data files ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct RateTableFile {
    #[serde(default = "default_coefficient")]
    default_coefficient: f64,
    #[serde(default = "preview_coefficient")]
    preview_coefficient: f64,
    #[serde(default)]
    conversion_fee_rate: f64,
    #[serde(default = "verification_tolerance")]
    verification_tolerance: f64,
    coefficients: HashMap<Program, f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExchangeRatesFile {
    rates: Vec<PublishedRate>,
}

#[derive(Debug, Clone, Deserialize)]
struct RewardCatalogFile {
    rewards: Vec<RewardDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
struct FallbackTableFile {
    categories: Vec<FallbackEntry>,
}

fn default_coefficient() -> f64 {
    DEFAULT_COEFFICIENT
}

fn preview_coefficient() -> f64 {
    PREVIEW_DOLLAR_COEFFICIENT
}

fn verification_tolerance() -> f64 {
    0.25
}

// ── Assembled config ───────────────────────────────────────────────

/// All reference data for the exchange. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub rate_table:             RateTable,
    pub catalog:                RewardCatalog,
    pub rate_board:             RateBoard,
    pub calculator:             ConversionCalculator,
    pub fallback_table:         Vec<FallbackEntry>,
    /// Max relative deviation between a published and implied rate
    /// before verification flags the pair.
    pub verification_tolerance: f64,
}

impl ExchangeConfig {
    /// Load from the data/ directory.
    /// In tests, use ExchangeConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let rate_file: RateTableFile = read_json(&format!("{data_dir}/rates/rate_table.json"))?;
        let rates_file: ExchangeRatesFile =
            read_json(&format!("{data_dir}/rates/exchange_rates.json"))?;
        let catalog_file: RewardCatalogFile =
            read_json(&format!("{data_dir}/rewards/reward_catalog.json"))?;
        let fallback_file: FallbackTableFile =
            read_json(&format!("{data_dir}/narratives/fallback_table.json"))?;

        let config = Self {
            rate_table: RateTable::new(rate_file.coefficients, rate_file.default_coefficient)?,
            catalog: RewardCatalog::new(catalog_file.rewards)?,
            rate_board: RateBoard::new(&rates_file.rates)?,
            calculator: ConversionCalculator::new(
                rate_file.preview_coefficient,
                rate_file.conversion_fee_rate,
            )?,
            fallback_table: fallback_file.categories,
            verification_tolerance: checked_tolerance(rate_file.verification_tolerance)?,
        };

        log::info!(
            "config: loaded {} coefficients, {} rewards, {} published rates from {data_dir}",
            config.rate_table.programs().len(),
            config.catalog.len(),
            config.rate_board.len(),
        );
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let coefficients: HashMap<Program, f64> = [
            (Program::Xpoints,           0.01),
            (Program::Skymiles,          0.012),
            (Program::Aadvantage,        0.014),
            (Program::Mileageplus,       0.013),
            (Program::Bonvoy,            0.008),
            (Program::Honors,            0.005),
            (Program::MembershipRewards, 0.02),
            (Program::UltimateRewards,   0.02),
        ]
        .into_iter()
        .collect();

        let reward = |id: &str, category, description: &str, cost: f64, multiplier: f64| {
            RewardDescriptor {
                reward_id:         id.into(),
                category,
                description:       description.into(),
                base_cost_dollars: cost,
                points_multiplier: multiplier,
            }
        };
        let rewards = vec![
            reward("flight_domestic", RewardCategory::Travel, "Round-trip domestic economy flight", 300.0, 1.0),
            reward("flight_business", RewardCategory::Travel, "International business-class seat", 2500.0, 1.0),
            reward("hotel_night", RewardCategory::Hotels, "One night at a partner hotel", 150.0, 1.0),
            reward("resort_weekend", RewardCategory::Hotels, "Resort weekend, peak season", 400.0, 1.25),
            reward("dinner_for_two", RewardCategory::Dining, "Dinner for two", 100.0, 1.0),
            reward("coffee_card", RewardCategory::Dining, "Coffee shop gift card", 10.0, 1.0),
            reward("retail_card_50", RewardCategory::GiftCards, "$50 retail gift card", 50.0, 1.0),
            reward("concert_tickets", RewardCategory::Entertainment, "Pair of concert tickets", 120.0, 1.0),
            reward("spa_day", RewardCategory::Experiences, "Spa day", 200.0, 1.0),
            reward("statement_credit_25", RewardCategory::Cashback, "$25 statement credit", 25.0, 1.0),
        ];

        let published = vec![
            PublishedRate { from: Program::Xpoints,           to: Program::Skymiles,    rate: 0.8 },
            PublishedRate { from: Program::Xpoints,           to: Program::Mileageplus, rate: 0.75 },
            PublishedRate { from: Program::MembershipRewards, to: Program::Xpoints,     rate: 1.25 },
            PublishedRate { from: Program::MembershipRewards, to: Program::Skymiles,    rate: 1.0 },
            PublishedRate { from: Program::UltimateRewards,   to: Program::Honors,      rate: 2.0 },
        ];

        let fallback_table = vec![
            FallbackEntry {
                category:    RewardCategory::Travel,
                description: "Put your points toward flights and getaways".into(),
            },
            FallbackEntry {
                category:    RewardCategory::Dining,
                description: "Treat yourself to a meal out".into(),
            },
        ];

        Self {
            rate_table: RateTable::new(coefficients, DEFAULT_COEFFICIENT)
                .expect("test coefficients are positive"),
            catalog: RewardCatalog::new(rewards).expect("test catalog is valid"),
            rate_board: RateBoard::new(&published).expect("test rates are valid"),
            calculator: ConversionCalculator::default(),
            fallback_table,
            verification_tolerance: verification_tolerance(),
        }
    }
}

fn checked_tolerance(tolerance: f64) -> ExchangeResult<f64> {
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        return Err(ExchangeError::InvalidConfig(format!(
            "verification tolerance must be a non-negative number, got {tolerance}"
        )));
    }
    Ok(tolerance)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    serde_json::from_str(&content).map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_must_be_non_negative_and_finite() {
        assert_eq!(checked_tolerance(0.0).unwrap(), 0.0);
        assert_eq!(checked_tolerance(0.25).unwrap(), 0.25);
        for bad in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(checked_tolerance(bad), Err(ExchangeError::InvalidConfig(_))));
        }
    }
}
