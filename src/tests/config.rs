use crate::{config::AppConfig, data::Period, error::ExchangeError, logging::{init_logging, LogFormat}};

#[test]
fn test_default_config_is_valid() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.feed.path, "20200317.csv");
    assert_eq!(config.simulation.user, "simuser");
    assert_eq!(config.wallet.balances.get("USDT"), Some(&10000.0));
    assert_eq!(config.wallet.balances.get("BTC"), Some(&0.5));
    assert_eq!(config.period().unwrap(), Period::Daily);
}

#[test]
fn test_invalid_values_rejected() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(matches!(config.validate(), Err(ExchangeError::Configuration(_))));

    let mut config = AppConfig::default();
    config.simulation.period = "weekly".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.wallet.balances.insert("ETH".to_string(), -1.0);
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.feed.path.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_period_parsing_ignores_case() {
    let mut config = AppConfig::default();
    config.simulation.period = "Monthly".to_string();
    assert_eq!(config.period().unwrap(), Period::Monthly);
}

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merkel.toml");
    let path = path.to_str().unwrap();

    let mut config = AppConfig::default();
    config.simulation.steps = 12;
    config.simulation.period = "yearly".to_string();
    config.save_to_file(path).unwrap();

    let content = std::fs::read_to_string(path).unwrap();
    let parsed: AppConfig = toml::from_str(&content).unwrap();
    assert_eq!(parsed.simulation.steps, 12);
    assert_eq!(parsed.period().unwrap(), Period::Yearly);
    assert_eq!(parsed.wallet.balances, config.wallet.balances);
}

#[test]
fn test_bad_toml_is_configuration_error() {
    let err: ExchangeError = toml::from_str::<AppConfig>("feed = 3").unwrap_err().into();
    assert!(matches!(err, ExchangeError::Configuration(_)));
}

#[test]
fn test_simulation_defaults() {
    let config = AppConfig::default();
    assert!(config.simulation.simulate_orders);
    assert_eq!(config.simulation.seed, 2020);

    let parsed: AppConfig = toml::from_str(r#"
        [feed]
        path = "feed.csv"
        owner = "dataset"

        [simulation]
        user = "trader"
        steps = 1
        period = "daily"

        [wallet.balances]
        BTC = 1.0

        [ledger]
        path = "ledger.csv"

        [logging]
        level = "info"
        format = "compact"
        include_target = false
    "#).unwrap();
    assert!(!parsed.simulation.simulate_orders);
    assert_eq!(parsed.simulation.seed, 2020);
    assert!(parsed.validate().is_ok());
}

#[test]
fn test_log_format_and_init() {
    assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
    assert_eq!(LogFormat::parse("Pretty"), LogFormat::Pretty);
    assert_eq!(LogFormat::parse("unknown"), LogFormat::Pretty);

    let config = AppConfig::default();
    assert!(init_logging(&config.logging).is_ok());
}
