//! Read-only queries against the `prices.daily_prices` history table.

use chrono::NaiveDate;

use crate::config;
use crate::connection::{HistoryLookup, Store};
use crate::error::Result;
use crate::models::{Commodity, CountryCode, Granularity, PriceRequest, PriceStats, StoredSeries};
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// HistoryFilter
// ---------------------------------------------------------------------------

/// Optional filters for listing stored series. Date bounds are inclusive.
///
/// An empty `country_codes` list matches every country.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub country_codes: Vec<CountryCode>,
    pub commodity: Option<Commodity>,
    pub granularity: Option<Granularity>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface over previously generated series.
pub struct PriceQuery<'a> {
    store: &'a Store,
}

impl<'a> PriceQuery<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// The stored series for an exact request tuple, if any.
    pub fn get(&self, request: &PriceRequest) -> Result<Option<StoredSeries>> {
        match self.store.find_series(request)? {
            HistoryLookup::Hit(stored) => Ok(Some(stored)),
            _ => Ok(None),
        }
    }

    /// Stored series matching `filter`, ordered by date then key columns.
    pub fn history(&self, filter: &HistoryFilter) -> Result<Vec<StoredSeries>> {
        let mut qb = SqlBuilder::new(config::HISTORY_TABLE);
        qb.select(&[Store::history_columns()]);

        if !filter.country_codes.is_empty() {
            let codes: Vec<&str> = filter.country_codes.iter().map(|c| c.as_str()).collect();
            qb.where_in("country_code", &codes);
        }
        if let Some(commodity) = filter.commodity {
            qb.where_eq("commodity", commodity.as_str());
        }
        if let Some(granularity) = filter.granularity {
            qb.where_eq("granularity", granularity.as_str());
        }

        let from = filter.date_from.map(|d| d.format("%Y-%m-%d").to_string());
        if let Some(from) = &from {
            qb.where_clause("date >= CAST(? AS DATE)", &[from.as_str()]);
        }
        let to = filter.date_to.map(|d| d.format("%Y-%m-%d").to_string());
        if let Some(to) = &to {
            qb.where_clause("date <= CAST(? AS DATE)", &[to.as_str()]);
        }

        qb.order_by(&["date ASC", "country_code ASC", "commodity ASC", "granularity ASC"]);
        if let Some(limit) = filter.limit {
            qb.limit(limit);
        }

        let (sql, params) = qb.build();
        let rows = self.store.execute(&sql, &params)?;
        Store::rows_to_stored(rows)
    }

    /// Number of stored series.
    pub fn count(&self) -> Result<i64> {
        let value = self
            .store
            .execute_scalar(&format!("SELECT COUNT(*) FROM {}", config::HISTORY_TABLE), &[])?;
        Ok(value.and_then(|v| v.as_i64()).unwrap_or(0))
    }

    /// Min / max / mean of a stored series, computed in DuckDB.
    pub fn stats(&self, request: &PriceRequest) -> Result<Option<PriceStats>> {
        let (sql, params) = SqlBuilder::new(config::HISTORY_TABLE)
            .select(&[
                "list_min(prices) AS min_price",
                "list_max(prices) AS max_price",
                "list_avg(prices) AS avg_price",
                "CAST(len(prices) AS BIGINT) AS data_points",
            ])
            .where_clause("date = CAST(? AS DATE)", &[request.date_key().as_str()])
            .where_eq("country_code", request.country_code.as_str())
            .where_eq("commodity", request.commodity.as_str())
            .where_eq("granularity", request.granularity.as_str())
            .where_clause("len(prices) > 0", &[])
            .limit(1)
            .build();

        let mut rows = self.store.execute_into::<PriceStats>(&sql, &params)?;
        Ok(rows.pop())
    }
}
