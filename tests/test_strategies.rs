//! Tests for the random number strategies and the flat price generator.

mod common;

use common::{date, request};
use price_data_sdk::models::Strategy;
use price_data_sdk::strategies::MAX_COUNT;
use price_data_sdk::{Commodity, CountryCode, Granularity, PriceDataError};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn strategies_draw_within_range() {
    let sdk = common::sdk();
    for strategy in Strategy::ALL {
        let numbers = sdk.generate_random_numbers(*strategy, 200).unwrap();
        assert_eq!(numbers.len(), 200);
        for n in numbers {
            assert!((0.0..=100.0).contains(&n), "{strategy}: {n}");
            assert!(((n * 100.0).round() / 100.0 - n).abs() < 1e-9);
        }
    }
}

#[test]
fn zero_count_is_empty() {
    let sdk = common::sdk();
    assert!(sdk.generate_random_numbers(Strategy::Uniform, 0).unwrap().is_empty());
}

#[test]
fn seeded_draws_repeat() {
    let sdk = common::sdk();
    let numbers = sdk.random_numbers();
    let a = numbers
        .generate(Strategy::Basic, 10, &mut StdRng::seed_from_u64(5))
        .unwrap();
    let b = numbers
        .generate(Strategy::Basic, 10, &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn strategy_names_parse() {
    assert_eq!("basic".parse::<Strategy>().unwrap(), Strategy::Basic);
    assert_eq!("uniform".parse::<Strategy>().unwrap(), Strategy::Uniform);
    let err = "gaussian".parse::<Strategy>().unwrap_err();
    assert!(matches!(err, PriceDataError::InvalidArgument(_)));
}

#[test]
fn flat_prices_ignore_dst() {
    let sdk = common::sdk();
    let mut rng = StdRng::seed_from_u64(11);
    let hourly = sdk
        .random_numbers()
        .flat_prices(CountryCode::Gb, Granularity::Hourly, &mut rng)
        .unwrap();
    let half_hourly = sdk
        .random_numbers()
        .flat_prices(CountryCode::Gb, Granularity::HalfHourly, &mut rng)
        .unwrap();
    assert_eq!(hourly.len(), 24);
    assert_eq!(half_hourly.len(), 48);

    // Draws sit around the undiscounted base price of 61
    let mean = hourly.iter().sum::<f64>() / hourly.len() as f64;
    assert!((mean - 61.0).abs() < 5.0, "mean {mean}");
}

#[test]
fn oversized_count_is_rejected_and_generation_continues() {
    let sdk = common::sdk();
    for strategy in Strategy::ALL {
        let err = sdk.generate_random_numbers(*strategy, usize::MAX).unwrap_err();
        assert!(matches!(err, PriceDataError::InvalidArgument(_)));
        assert!(err.is_validation());
    }
    assert!(sdk.generate_random_numbers(Strategy::Basic, MAX_COUNT + 1).is_err());
    assert_eq!(sdk.generate_random_numbers(Strategy::Basic, MAX_COUNT).unwrap().len(), MAX_COUNT);

    let req = request(date(2025, 6, 1), CountryCode::Gb, Granularity::Hourly, Commodity::Power);
    assert_eq!(sdk.get_or_generate(&req).unwrap().len(), 24);
}

#[test]
fn sdk_flat_prices_by_granularity() {
    let sdk = common::sdk();
    let hourly = sdk.generate_flat_prices(CountryCode::Nl, Granularity::Hourly).unwrap();
    let half_hourly = sdk
        .generate_flat_prices(CountryCode::Nl, Granularity::HalfHourly)
        .unwrap();
    assert_eq!(hourly.len(), 24);
    assert_eq!(half_hourly.len(), 48);
    // Flat prices are never persisted
    assert_eq!(sdk.prices().count().unwrap(), 0);
}
