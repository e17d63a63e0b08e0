use pointswap_core::{
    catalog::RewardCategory,
    config::ExchangeConfig,
    program::Program,
    rate_table::DEFAULT_COEFFICIENT,
    translator::{PointTranslator, RewardOrder, TranslateQuery},
    types::round_points,
};

// ── Test helpers ────────────────────────────────────────────────────────────

fn ids(rewards: &[pointswap_core::translator::TranslatedReward]) -> Vec<&str> {
    rewards.iter().map(|r| r.reward_id.as_str()).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn every_known_program_has_positive_coefficient() {
    let config = ExchangeConfig::default_test();
    for program in Program::ALL {
        let c = config.rate_table.coefficient(program);
        assert!(c > 0.0 && c.is_finite(), "{program} has coefficient {c}");
    }
}

#[test]
fn dollar_value_is_points_times_coefficient() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);
    for program in Program::ALL {
        for points in [0, 1, 999, 25_000, 1_000_000] {
            assert_eq!(
                translator.points_dollar_value(points, program),
                points as f64 * config.rate_table.coefficient(program)
            );
        }
    }
    assert_eq!(translator.points_dollar_value(2_500, Program::MembershipRewards), 50.0);
}

/// XPOINTS is worth one cent, so a $100 reward costs 10,000 points.
#[test]
fn hundred_dollar_reward_costs_ten_thousand_xpoints() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);
    let dinner = config.catalog.get("dinner_for_two").unwrap();

    assert_eq!(translator.points_required(dinner, Program::Xpoints), 10_000);

    let affordable = translator.affordable_rewards(Program::Xpoints, 10_000);
    assert!(ids(&affordable).contains(&"dinner_for_two"));

    let affordable = translator.affordable_rewards(Program::Xpoints, 9_999);
    assert!(!ids(&affordable).contains(&"dinner_for_two"));
}

#[test]
fn affordable_rewards_fit_balance_and_sort_descending() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);

    for program in Program::ALL {
        for balance in [500, 5_000, 20_000, 80_000] {
            let rewards = translator.affordable_rewards(program, balance);
            assert!(rewards.iter().all(|r| r.points_required <= balance));
            assert!(rewards
                .windows(2)
                .all(|w| w[0].points_required >= w[1].points_required));
        }
    }

    let rewards = translator.affordable_rewards(Program::Xpoints, 10_000);
    assert_eq!(
        ids(&rewards),
        vec!["dinner_for_two", "retail_card_50", "statement_credit_25", "coffee_card"]
    );
}

#[test]
fn zero_or_negative_balance_translates_to_nothing() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);
    let query = TranslateQuery::default();

    assert!(translator.translate_points(0, Program::Xpoints, &query).is_empty());
    assert!(translator.translate_points(-50, Program::Xpoints, &query).is_empty());
    assert!(translator.affordable_rewards(Program::Bonvoy, 0).is_empty());
    assert!(translator.category_summary(-1, Program::Honors).is_empty());
}

#[test]
fn unknown_program_code_uses_default_coefficient() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);

    let rewards = translator.translate_points_for_code(
        1_000,
        "CORNER_STORE_STAMPS",
        &TranslateQuery::default(),
    );
    assert_eq!(rewards.len(), config.catalog.len());
    for r in &rewards {
        let base = config.catalog.get(&r.reward_id).unwrap();
        assert_eq!(
            r.points_required,
            round_points(base.base_cost_dollars / DEFAULT_COEFFICIENT * base.points_multiplier)
        );
    }
}

/// More valuable points buy the same reward for fewer points.
#[test]
fn points_required_non_increasing_in_coefficient() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);

    let mut programs = Program::ALL.to_vec();
    programs.sort_by(|a, b| {
        config
            .rate_table
            .coefficient(*a)
            .partial_cmp(&config.rate_table.coefficient(*b))
            .unwrap()
    });

    for reward in config.catalog.rewards() {
        let costs: Vec<i64> = programs
            .iter()
            .map(|p| translator.points_required(reward, *p))
            .collect();
        assert!(
            costs.windows(2).all(|w| w[0] >= w[1]),
            "{} costs not monotone: {costs:?}",
            reward.reward_id
        );
    }
}

#[test]
fn ordering_is_selected_by_caller() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);

    let cheapest = translator.translate_points(
        50_000,
        Program::Skymiles,
        &TranslateQuery::ordered(RewardOrder::CheapestFirst),
    );
    let best = translator.translate_points(
        50_000,
        Program::Skymiles,
        &TranslateQuery::ordered(RewardOrder::BestValue),
    );

    assert_eq!(cheapest.len(), best.len());
    assert!(cheapest
        .windows(2)
        .all(|w| w[0].points_required <= w[1].points_required));
    assert!(best
        .windows(2)
        .all(|w| w[0].points_required >= w[1].points_required));
    assert_eq!(cheapest.first().unwrap().reward_id, "coffee_card");
    assert_eq!(best.first().unwrap().reward_id, "flight_business");
}

#[test]
fn category_filter_and_cap_combine() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);

    let query = TranslateQuery::ordered(RewardOrder::CheapestFirst)
        .with_category(RewardCategory::Hotels)
        .with_cap(20_000);
    let rewards = translator.translate_points(100_000, Program::Xpoints, &query);

    assert_eq!(ids(&rewards), vec!["hotel_night"]);
    assert_eq!(rewards[0].points_required, 15_000);
    assert_eq!(rewards[0].dollar_equivalent, 150.0);
}

#[test]
fn per_reward_multiplier_applies() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);
    let resort = config.catalog.get("resort_weekend").unwrap();

    // $400 at 1 cent, × 1.25
    assert_eq!(translator.points_required(resort, Program::Xpoints), 50_000);
}

#[test]
fn category_summary_groups_affordable_rewards() {
    let config = ExchangeConfig::default_test();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);

    let summary = translator.category_summary(10_000, Program::Xpoints);
    let categories: Vec<RewardCategory> = summary.iter().map(|s| s.category).collect();
    assert_eq!(
        categories,
        vec![
            RewardCategory::Dining,
            RewardCategory::GiftCards,
            RewardCategory::Cashback
        ]
    );
    assert_eq!(summary[0].affordable_count, 2);
    assert_eq!(summary[0].cheapest.reward_id, "coffee_card");
}
