use pointswap_core::{config::ExchangeConfig, program::Program, translator::PointTranslator};

fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn shipped_data_directory_loads() {
    let config = ExchangeConfig::load(&data_dir()).unwrap();

    assert_eq!(config.rate_table.programs().len(), Program::ALL.len());
    assert_eq!(config.rate_table.coefficient(Program::Xpoints), 0.01);
    assert!(!config.catalog.is_empty());
    assert!(!config.rate_board.is_empty());
    assert_eq!(config.fallback_table.len(), 8);
}

/// The same $100 reward costs 10,000 XPOINTS with the shipped tables too.
#[test]
fn shipped_tables_price_dinner_at_ten_thousand_xpoints() {
    let config = ExchangeConfig::load(&data_dir()).unwrap();
    let translator = PointTranslator::new(&config.rate_table, &config.catalog);
    let dinner = config.catalog.get("dinner_for_two").unwrap();
    assert_eq!(translator.points_required(dinner, Program::Xpoints), 10_000);
}

#[test]
fn missing_data_directory_is_an_error() {
    let err = ExchangeConfig::load("/definitely/not/here").unwrap_err();
    assert!(err.to_string().contains("Cannot read"));
}
