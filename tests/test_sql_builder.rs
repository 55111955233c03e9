//! Unit tests for the SqlBuilder query construction.

use price_data_sdk::SqlBuilder;

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("prices.daily_prices").build();
    assert_eq!(sql, "SELECT *\nFROM prices.daily_prices");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("prices.daily_prices")
        .select(&["date", "prices"])
        .build();
    assert!(sql.starts_with("SELECT date, prices\n"));
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_equality_with_param() {
    let (sql, params) = SqlBuilder::new("prices.daily_prices")
        .where_eq("country_code", "FR")
        .build();
    assert!(sql.contains("WHERE country_code = ?"));
    assert_eq!(params, vec!["FR"]);
}

#[test]
fn where_in_adds_in_clause() {
    let (sql, params) = SqlBuilder::new("prices.daily_prices")
        .where_in("commodity", &["power", "crude"])
        .build();
    assert!(sql.contains("commodity IN (?, ?)"));
    assert_eq!(params, vec!["power", "crude"]);
}

#[test]
fn where_in_empty_produces_false() {
    let (sql, params) = SqlBuilder::new("prices.daily_prices")
        .where_in("commodity", &[])
        .build();
    assert!(sql.contains("WHERE FALSE"));
    assert!(params.is_empty());
}

#[test]
fn conditions_are_joined_with_and_in_order() {
    let (sql, params) = SqlBuilder::new("prices.daily_prices")
        .where_eq("country_code", "GB")
        .where_clause("date BETWEEN CAST(? AS DATE) AND CAST(? AS DATE)", &["2025-01-01", "2025-01-31"])
        .build();
    assert!(sql.contains(
        "WHERE country_code = ? AND date BETWEEN CAST(? AS DATE) AND CAST(? AS DATE)"
    ));
    assert_eq!(params, vec!["GB", "2025-01-01", "2025-01-31"]);
}

// ---------------------------------------------------------------------------
// ORDER BY / LIMIT
// ---------------------------------------------------------------------------

#[test]
fn order_by_and_limit_come_last() {
    let (sql, _) = SqlBuilder::new("prices.daily_prices")
        .where_eq("granularity", "hh")
        .order_by(&["date ASC", "country_code ASC"])
        .limit(5)
        .build();
    assert!(sql.ends_with("ORDER BY date ASC, country_code ASC\nLIMIT 5"));
}

#[test]
fn values_never_reach_the_sql_text() {
    let (sql, params) = SqlBuilder::new("prices.daily_prices")
        .where_eq("country_code", "GB'; DROP TABLE x; --")
        .build();
    assert!(!sql.contains("DROP"));
    assert_eq!(params.len(), 1);
}
