use pointswap_core::{
    conversion::{ConversionCalculator, PREVIEW_DOLLAR_COEFFICIENT},
    error::ExchangeError,
};

#[test]
fn thousand_points_at_one_and_a_quarter() {
    let calc = ConversionCalculator::default();
    let quote = calc.quote(1_000, 1.25).unwrap();

    assert_eq!(quote.destination_amount, 1_250);
    assert_eq!(quote.fee, 0);
    assert_eq!(quote.net_amount, 1_250);
    assert_eq!(quote.estimated_dollar_value, 18.75);
}

#[test]
fn destination_rounds_half_away_from_zero() {
    let calc = ConversionCalculator::default();

    // 333 × 0.75 = 249.75
    assert_eq!(calc.quote(333, 0.75).unwrap().destination_amount, 250);
    // 3 × 0.5 = 1.5
    assert_eq!(calc.quote(3, 0.5).unwrap().destination_amount, 2);
    // 7 × 0.3 = 2.1
    assert_eq!(calc.quote(7, 0.3).unwrap().destination_amount, 2);
}

#[test]
fn non_positive_amount_rejected() {
    let calc = ConversionCalculator::default();
    for amount in [0, -1, -10_000] {
        match calc.quote(amount, 1.0) {
            Err(ExchangeError::InvalidAmount { amount: a }) => assert_eq!(a, amount),
            other => panic!("expected InvalidAmount for {amount}, got {other:?}"),
        }
    }
}

#[test]
fn non_positive_or_non_finite_rate_rejected() {
    let calc = ConversionCalculator::default();
    for rate in [0.0, -1.25, f64::NAN, f64::INFINITY] {
        let err = calc.quote(1_000, rate).unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidRate { .. }), "rate {rate}: {err:?}");
        assert!(err.is_validation());
    }
}

#[test]
fn estimate_uses_configured_coefficient() {
    let calc = ConversionCalculator::new(0.02, 0.0).unwrap();
    let quote = calc.quote(500, 2.0).unwrap();
    assert_eq!(quote.destination_amount, 1_000);
    assert_eq!(quote.estimated_dollar_value, 20.0);

    let default = ConversionCalculator::default().quote(500, 2.0).unwrap();
    assert_eq!(default.estimated_dollar_value, 1_000.0 * PREVIEW_DOLLAR_COEFFICIENT);
}

#[test]
fn conversion_that_rounds_to_nothing_rejected() {
    let calc = ConversionCalculator::default();

    // 1 × 0.4 = 0.4 rounds to zero destination points
    let err = calc.quote(1, 0.4).unwrap_err();
    assert!(matches!(err, ExchangeError::AmountTooSmall { amount: 1 }), "{err:?}");
    assert!(err.is_validation());

    // 2 × 0.4 = 0.8 rounds up to one point and goes through
    assert_eq!(calc.quote(2, 0.4).unwrap().net_amount, 1);
}
