//! Shared test fixtures for the price data SDK integration tests.
//!
//! Every fixture seeds the SDK's random source so sampled prices are
//! reproducible within a test run.

#![allow(dead_code)]

use chrono::NaiveDate;
use price_data_sdk::{
    Commodity, CountryCode, Granularity, PriceDataSdk, PriceRequest, PricingPolicy,
};

pub const SEED: u64 = 42;

/// In-memory SDK with the default policy and a fixed seed.
pub fn sdk() -> PriceDataSdk {
    sdk_with_policy(PricingPolicy::default())
}

/// In-memory SDK with the given policy and a fixed seed.
pub fn sdk_with_policy(policy: PricingPolicy) -> PriceDataSdk {
    PriceDataSdk::builder()
        .in_memory()
        .policy(policy)
        .seed(SEED)
        .build()
        .unwrap()
}

/// File-backed SDK inside a fresh temporary directory.
///
/// Returns `(PriceDataSdk, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for as long as the database file is in use.
pub fn file_sdk() -> (PriceDataSdk, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let sdk = open_file_sdk(&tmp_dir, SEED);
    (sdk, tmp_dir)
}

/// Open (or reopen) the database file inside `dir`.
pub fn open_file_sdk(dir: &tempfile::TempDir, seed: u64) -> PriceDataSdk {
    PriceDataSdk::builder()
        .db_path(dir.path().join("prices.db"))
        .seed(seed)
        .build()
        .unwrap()
}

/// A policy whose draws collapse onto the mean, so prices are exact.
pub fn near_deterministic_policy() -> PricingPolicy {
    PricingPolicy {
        std_dev: 1e-9,
        ..PricingPolicy::default()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn request(
    for_date: NaiveDate,
    country: CountryCode,
    granularity: Granularity,
    commodity: Commodity,
) -> PriceRequest {
    PriceRequest::new(for_date, country, granularity, commodity)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
