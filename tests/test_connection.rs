//! Tests for the DuckDB store: bootstrap and history persistence.

mod common;

use common::{date, request};
use price_data_sdk::connection::HistoryLookup;
use price_data_sdk::{Commodity, CountryCode, Granularity, PriceSeries, ReferenceTable, Store};

fn bootstrapped() -> Store {
    let store = Store::open_in_memory().unwrap();
    store.bootstrap(&ReferenceTable::builtin()).unwrap();
    store
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[test]
fn bootstrap_creates_every_table() {
    let store = bootstrapped();
    for table in price_data_sdk::config::config_tables() {
        assert!(store.has_table("config", table).unwrap(), "missing config.{table}");
    }
    assert!(store.has_table("prices", "daily_prices").unwrap());
    assert!(!store.has_table("prices", "nope").unwrap());
}

#[test]
fn config_rows_have_one_based_ids() {
    let store = bootstrapped();
    let rows = store
        .execute("SELECT id, granularity FROM config.granularity ORDER BY id", &[])
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["granularity"], "h");
    assert_eq!(rows[1]["granularity"], "hh");

    let count = store
        .execute_scalar("SELECT COUNT(*) FROM config.energy_mix", &[])
        .unwrap();
    assert_eq!(count.and_then(|v| v.as_i64()), Some(24));
}

#[test]
fn rebootstrap_keeps_history() {
    let store = bootstrapped();
    let req = request(date(2025, 1, 1), CountryCode::Gb, Granularity::Hourly, Commodity::Power);
    store
        .insert_if_absent(&PriceSeries::new(req, vec![1.5; 24]))
        .unwrap();

    store.bootstrap(&ReferenceTable::builtin()).unwrap();

    let rows = store
        .execute("SELECT COUNT(*) AS n FROM config.country_codes", &[])
        .unwrap();
    assert_eq!(rows[0]["n"], 4);
    assert!(matches!(store.find_series(&req).unwrap(), HistoryLookup::Hit(_)));
}

// ---------------------------------------------------------------------------
// History rows
// ---------------------------------------------------------------------------

#[test]
fn insert_if_absent_keeps_the_first_row() {
    let store = bootstrapped();
    let req = request(date(2025, 4, 1), CountryCode::Nl, Granularity::Hourly, Commodity::Crude);

    assert!(store.insert_if_absent(&PriceSeries::new(req, vec![10.25, -3.5])).unwrap());
    assert!(!store.insert_if_absent(&PriceSeries::new(req, vec![99.0])).unwrap());

    match store.find_series(&req).unwrap() {
        HistoryLookup::Hit(stored) => {
            assert_eq!(stored.series.prices, vec![10.25, -3.5]);
            assert!(stored.created_at.is_some());
        }
        other => panic!("expected a hit, got {other:?}"),
    }
}

#[test]
fn find_series_distinguishes_miss_and_malformed() {
    let store = bootstrapped();
    let req = request(date(2025, 4, 2), CountryCode::De, Granularity::HalfHourly, Commodity::Power);
    assert_eq!(store.find_series(&req).unwrap(), HistoryLookup::Miss);

    store
        .raw()
        .unwrap()
        .execute_batch(
            "INSERT INTO prices.daily_prices (date, country_code, commodity, granularity, prices) \
             VALUES ('2025-04-02', 'DE', 'power', 'hh', NULL)",
        )
        .unwrap();
    assert!(matches!(store.find_series(&req).unwrap(), HistoryLookup::Malformed(_)));

    assert_eq!(store.delete_series(&req).unwrap(), 1);
    assert_eq!(store.find_series(&req).unwrap(), HistoryLookup::Miss);
}

#[test]
fn raw_sql_through_the_sdk() {
    let sdk = common::sdk();
    let rows = sdk
        .sql(
            "SELECT country_code FROM config.country_codes WHERE country_base_price > CAST(? AS INTEGER) ORDER BY id",
            &["57".to_string()],
        )
        .unwrap();
    let codes: Vec<&str> = rows.iter().filter_map(|r| r["country_code"].as_str()).collect();
    assert_eq!(codes, vec!["GB", "FR"]);
}
