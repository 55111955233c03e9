//! Tests for the TOML pricing policy and the SDK builder.

mod common;

use std::io::Write;

use price_data_sdk::config::{default_db_path, DEFAULT_DB_NAME};
use price_data_sdk::{PriceDataError, PriceDataSdk, PricingPolicy, SeasonalAdjustment};

#[test]
fn defaults() {
    let policy = PricingPolicy::default();
    assert_eq!(policy.seasonal_adjustment, SeasonalAdjustment::Multiply);
    assert_eq!(policy.std_dev, 5.0);
    assert_eq!(policy.peak_bonus, 20.0);
    assert_eq!(policy.off_peak_penalty, 40.0);
    assert_eq!(policy.reference_timezone, "Europe/London");
    assert!(policy.apply_energy_mix);
    policy.validate().unwrap();
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let policy = PricingPolicy::from_toml_str(
        r#"
        seasonal_adjustment = "subtract"
        std_dev = 2.5

        [discount_rates]
        wind = 0.2
        "#,
    )
    .unwrap();
    assert_eq!(policy.seasonal_adjustment, SeasonalAdjustment::Subtract);
    assert_eq!(policy.std_dev, 2.5);
    assert_eq!(policy.discount_rates.wind, 0.2);
    assert_eq!(policy.discount_rates.solar, 0.10);
    assert_eq!(policy.peak_bonus, 20.0);
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = PricingPolicy::from_toml_str("std_dev = \"wide\"").unwrap_err();
    assert!(matches!(err, PriceDataError::Config(_)));
}

#[test]
fn invalid_values_are_rejected() {
    assert!(PricingPolicy::from_toml_str("std_dev = 0.0").is_err());
    assert!(PricingPolicy::from_toml_str("reference_timezone = \"Nowhere/Special\"").is_err());
    assert!(PricingPolicy::from_toml_str("[discount_rates]\nhydro = -0.1").is_err());
}

#[test]
fn builder_reads_policy_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "apply_energy_mix = false").unwrap();
    writeln!(file, "peak_bonus = 5.0").unwrap();
    file.flush().unwrap();

    let sdk = PriceDataSdk::builder()
        .in_memory()
        .policy_file(file.path())
        .build()
        .unwrap();
    assert!(!sdk.policy().apply_energy_mix);
    assert_eq!(sdk.policy().peak_bonus, 5.0);
}

#[test]
fn builder_rejects_invalid_policy() {
    let policy = PricingPolicy {
        std_dev: -1.0,
        ..PricingPolicy::default()
    };
    let err = PriceDataSdk::builder()
        .in_memory()
        .policy(policy)
        .build()
        .err()
        .unwrap();
    assert!(err.is_validation());
}

#[test]
fn default_path_ends_with_db_name() {
    assert!(default_db_path().ends_with(DEFAULT_DB_NAME));
}

#[test]
fn display_names_the_database() {
    let (sdk, _tmp_dir) = common::file_sdk();
    let shown = sdk.to_string();
    assert!(shown.contains("prices.db"));
    assert!(shown.contains("Europe/London"));
    assert!(common::sdk().to_string().contains(":memory:"));
}
