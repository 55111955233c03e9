//! Tests for the async wrapper.

#![cfg(feature = "async")]

use price_data_sdk::models::Strategy;
use price_data_sdk::{AsyncPriceDataSdk, CountryCode, GeneratePricesParams, Granularity};

fn params(granularity: &str) -> GeneratePricesParams {
    GeneratePricesParams {
        for_date: "2025-10-26".to_string(),
        country_code: "GB".to_string(),
        granularity: granularity.to_string(),
        commodity: "power".to_string(),
    }
}

#[tokio::test]
async fn model_prices_is_cached_across_clones() {
    let sdk = AsyncPriceDataSdk::builder().in_memory().seed(1).build().await.unwrap();
    let other = sdk.clone();

    let first = sdk.model_prices(params("hh")).await.unwrap();
    let second = other.model_prices(params("hh")).await.unwrap();
    assert_eq!(first.prices.len(), 50);
    assert_eq!(first, second);

    let count = sdk.run(|s| s.prices().count()).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn validation_errors_pass_through() {
    let sdk = AsyncPriceDataSdk::builder().in_memory().build().await.unwrap();
    let err = sdk.model_prices(params("daily")).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn random_numbers() {
    let sdk = AsyncPriceDataSdk::builder().in_memory().build().await.unwrap();
    let numbers = sdk.generate_random_numbers(Strategy::Basic, 5).await.unwrap();
    assert_eq!(numbers.len(), 5);
}

#[tokio::test]
async fn flat_prices() {
    let sdk = AsyncPriceDataSdk::builder().in_memory().build().await.unwrap();
    let prices = sdk
        .generate_flat_prices(CountryCode::De, Granularity::HalfHourly)
        .await
        .unwrap();
    assert_eq!(prices.len(), 48);
}
