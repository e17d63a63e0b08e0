//! Point translator — what a balance buys, per program.
//!
//! For every catalog reward the point cost is recomputed for the requested
//! program:
//!
//!   points_required = round(base_cost_dollars / coefficient × multiplier)
//!
//! then filtered by category and balance cap and ordered as the caller asks.
//! The translator borrows the rate table and catalog and never mutates
//! them, so one instance can be shared across threads.

use crate::{
    catalog::{RewardCatalog, RewardCategory, RewardDescriptor},
    program::Program,
    rate_table::RateTable,
    types::{round_cents, round_points, Points},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordering of a translated reward list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardOrder {
    /// Ascending by points required.
    #[default]
    CheapestFirst,
    /// Descending by points required.
    BestValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateQuery {
    #[serde(default)]
    pub category:    Option<RewardCategory>,
    #[serde(default)]
    pub balance_cap: Option<Points>,
    #[serde(default)]
    pub order:       RewardOrder,
}

impl TranslateQuery {
    pub fn ordered(order: RewardOrder) -> Self {
        Self { order, ..Self::default() }
    }

    pub fn with_category(mut self, category: RewardCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_cap(mut self, cap: Points) -> Self {
        self.balance_cap = Some(cap);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedReward {
    pub reward_id:         String,
    pub category:          RewardCategory,
    pub description:       String,
    pub points_required:   Points,
    pub dollar_equivalent: f64,
}

/// Per-category roll-up of what a balance can afford.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category:         RewardCategory,
    pub affordable_count: usize,
    pub cheapest:         TranslatedReward,
}

pub struct PointTranslator<'a> {
    rates:   &'a RateTable,
    catalog: &'a RewardCatalog,
}

impl<'a> PointTranslator<'a> {
    pub fn new(rates: &'a RateTable, catalog: &'a RewardCatalog) -> Self {
        Self { rates, catalog }
    }

    /// `points × coefficient[program]`, unrounded.
    pub fn points_dollar_value(&self, points: Points, program: Program) -> f64 {
        self.rates.points_dollar_value(points, program)
    }

    /// Point cost of one reward in the given program.
    pub fn points_required(&self, reward: &RewardDescriptor, program: Program) -> Points {
        required_at(reward, self.rates.coefficient(program))
    }

    /// Translate a balance into the catalog rewards for `program`.
    ///
    /// A balance of zero or less yields an empty list. The balance itself
    /// does not cap results; set `query.balance_cap` for that.
    pub fn translate_points(
        &self,
        points: Points,
        program: Program,
        query: &TranslateQuery,
    ) -> Vec<TranslatedReward> {
        self.translate_at(points, self.rates.coefficient(program), query)
    }

    /// Same as `translate_points` for a raw program code. Unknown codes
    /// use the default coefficient.
    pub fn translate_points_for_code(
        &self,
        points: Points,
        code: &str,
        query: &TranslateQuery,
    ) -> Vec<TranslatedReward> {
        self.translate_at(points, self.rates.coefficient_for_code(code), query)
    }

    /// Rewards the balance can pay for, most expensive first.
    pub fn affordable_rewards(&self, program: Program, balance: Points) -> Vec<TranslatedReward> {
        let query = TranslateQuery::ordered(RewardOrder::BestValue).with_cap(balance);
        self.translate_points(balance, program, &query)
    }

    /// For each category with at least one affordable reward: how many are
    /// affordable and which is cheapest. Categories in declaration order.
    pub fn category_summary(&self, points: Points, program: Program) -> Vec<CategorySummary> {
        let query = TranslateQuery::ordered(RewardOrder::CheapestFirst).with_cap(points);
        let mut by_category: BTreeMap<RewardCategory, CategorySummary> = BTreeMap::new();

        for reward in self.translate_points(points, program, &query) {
            by_category
                .entry(reward.category)
                .and_modify(|s| s.affordable_count += 1)
                .or_insert_with(|| CategorySummary {
                    category:         reward.category,
                    affordable_count: 1,
                    cheapest:         reward,
                });
        }
        by_category.into_values().collect()
    }

    fn translate_at(
        &self,
        points: Points,
        coefficient: f64,
        query: &TranslateQuery,
    ) -> Vec<TranslatedReward> {
        if points <= 0 {
            return Vec::new();
        }

        let mut out: Vec<TranslatedReward> = self
            .catalog
            .rewards()
            .iter()
            .filter(|r| query.category.map_or(true, |c| r.category == c))
            .map(|r| TranslatedReward {
                reward_id:         r.reward_id.clone(),
                category:          r.category,
                description:       r.description.clone(),
                points_required:   required_at(r, coefficient),
                dollar_equivalent: round_cents(r.base_cost_dollars),
            })
            .filter(|r| query.balance_cap.map_or(true, |cap| r.points_required <= cap))
            .collect();

        match query.order {
            RewardOrder::CheapestFirst => out.sort_by(|a, b| {
                a.points_required
                    .cmp(&b.points_required)
                    .then_with(|| a.reward_id.cmp(&b.reward_id))
            }),
            RewardOrder::BestValue => out.sort_by(|a, b| {
                b.points_required
                    .cmp(&a.points_required)
                    .then_with(|| a.reward_id.cmp(&b.reward_id))
            }),
        }

        log::debug!(
            "translator: {points} pts at {coefficient} $/pt -> {} rewards",
            out.len()
        );
        out
    }
}

fn required_at(reward: &RewardDescriptor, coefficient: f64) -> Points {
    round_points(reward.base_cost_dollars / coefficient * reward.points_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_scales_cost() {
        let reward = RewardDescriptor {
            reward_id:         "peak_flight".into(),
            category:          RewardCategory::Travel,
            description:       "Peak-season domestic flight".into(),
            base_cost_dollars: 300.0,
            points_multiplier: 1.5,
        };
        assert_eq!(required_at(&reward, 0.01), 45_000);
    }

    #[test]
    fn cost_rounds_to_nearest_point() {
        let reward = RewardDescriptor {
            reward_id:         "coffee".into(),
            category:          RewardCategory::Dining,
            description:       "Coffee".into(),
            base_cost_dollars: 5.0,
            points_multiplier: 1.0,
        };
        // 5 / 0.012 = 416.67
        assert_eq!(required_at(&reward, 0.012), 417);
    }
}
