//! DuckDB store wrapper: schema bootstrap, row helpers and history persistence.
//!
//! The store owns a single DuckDB connection behind a mutex, so it can be
//! shared between threads. Each public method holds the lock for one
//! statement (or one short statement group) only.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use duckdb::{params, types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config;
use crate::error::{PriceDataError, Result};
use crate::models::{
    Commodity, Granularity, PriceRequest, PriceSeries, Strategy, StoredSeries,
};
use crate::reference::ReferenceTable;

/// Columns selected for every history read. Dates, lists and timestamps are
/// rendered as text so they round-trip through the generic row converter.
const HISTORY_COLUMNS: &str = "CAST(date AS VARCHAR) AS date, country_code, commodity, \
     granularity, CAST(prices AS VARCHAR) AS prices, CAST(created_at AS VARCHAR) AS created_at";

/// Outcome of looking up one request in the history table.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryLookup {
    /// A well-formed stored series.
    Hit(StoredSeries),
    /// A row exists but its prices column is null, empty or unparseable.
    Malformed(String),
    Miss,
}

/// Wraps a DuckDB connection holding the `config` and `prices` schemas.
pub struct Store {
    conn: Mutex<DuckDbConnection>,
}

impl Store {
    /// Open (or create) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = DuckDbConnection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened DuckDB database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, DuckDbConnection>> {
        self.conn
            .lock()
            .map_err(|_| PriceDataError::Internal("store lock poisoned".into()))
    }

    /// Lock and access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> Result<MutexGuard<'_, DuckDbConnection>> {
        self.lock()
    }

    // -- Generic query helpers ---------------------------------------------

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run
        let statement = rows_result
            .as_ref()
            .ok_or_else(|| PriceDataError::Internal("statement metadata unavailable".into()))?;
        let column_names: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let column_count = statement.column_count();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate().take(column_count) {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[String]) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(&self, sql: &str, params: &[String]) -> Result<Option<serde_json::Value>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Whether `schema.table` exists.
    pub fn has_table(&self, schema: &str, table: &str) -> Result<bool> {
        let count = self.execute_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = ? AND table_name = ?",
            &[schema.to_string(), table.to_string()],
        )?;
        Ok(count.and_then(|v| v.as_i64()).unwrap_or(0) > 0)
    }

    // -- Bootstrap ----------------------------------------------------------

    /// Create both schemas, rebuild the `config` tables from `reference` and
    /// create the history table if it does not exist yet.
    ///
    /// Config tables are dropped and recreated every time; history rows are
    /// never touched.
    pub fn bootstrap(&self, reference: &ReferenceTable) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(&format!(
            "CREATE SCHEMA IF NOT EXISTS {}; CREATE SCHEMA IF NOT EXISTS {};",
            config::CONFIG_SCHEMA,
            config::PRICES_SCHEMA
        ))?;

        conn.execute_batch(
            "DROP TABLE IF EXISTS config.country_codes; \
             CREATE TABLE config.country_codes (id INTEGER, country_code VARCHAR, country_base_price INTEGER); \
             DROP TABLE IF EXISTS config.granularity; \
             CREATE TABLE config.granularity (id INTEGER, granularity VARCHAR); \
             DROP TABLE IF EXISTS config.commodity; \
             CREATE TABLE config.commodity (id INTEGER, commodity VARCHAR); \
             DROP TABLE IF EXISTS config.strategies; \
             CREATE TABLE config.strategies (id INTEGER, strategy VARCHAR); \
             DROP TABLE IF EXISTS config.energy_mix; \
             CREATE TABLE config.energy_mix (id INTEGER, country_code VARCHAR, energy_source VARCHAR, percentage DOUBLE);",
        )?;

        {
            let mut stmt = conn.prepare("INSERT INTO config.country_codes VALUES (?, ?, ?)")?;
            for (id, (code, price)) in (1_i32..).zip(reference.base_price_rows()) {
                stmt.execute(params![id, code.as_str(), price])?;
            }
        }
        insert_names(&conn, "granularity", Granularity::ALL.iter().map(|g| g.as_str()))?;
        insert_names(&conn, "commodity", Commodity::ALL.iter().map(|c| c.as_str()))?;
        insert_names(&conn, "strategies", Strategy::ALL.iter().map(|s| s.as_str()))?;
        {
            let mut stmt = conn.prepare("INSERT INTO config.energy_mix VALUES (?, ?, ?, ?)")?;
            for (id, (code, source, pct)) in (1_i32..).zip(reference.energy_mix_rows()) {
                stmt.execute(params![id, code.as_str(), source.as_str(), pct])?;
            }
        }

        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (\
               date DATE NOT NULL, \
               country_code VARCHAR NOT NULL, \
               commodity VARCHAR NOT NULL, \
               granularity VARCHAR NOT NULL, \
               prices DOUBLE[], \
               created_at TIMESTAMP DEFAULT current_timestamp, \
               PRIMARY KEY (date, country_code, commodity, granularity))",
            config::HISTORY_TABLE
        ))?;

        info!(
            tables = config::config_tables().len(),
            "bootstrapped config schema and history table"
        );
        Ok(())
    }

    // -- History ------------------------------------------------------------

    /// Look up the stored series for an exact request tuple.
    pub fn find_series(&self, request: &PriceRequest) -> Result<HistoryLookup> {
        let sql = format!(
            "SELECT {} FROM {} WHERE date = CAST(? AS DATE) AND country_code = ? \
             AND commodity = ? AND granularity = ?",
            HISTORY_COLUMNS,
            config::HISTORY_TABLE
        );
        let rows = self.execute(&sql, &key_params(request))?;

        let Some(row) = rows.into_iter().next() else {
            return Ok(HistoryLookup::Miss);
        };

        let raw = row_str(&row, "prices");
        match parse_prices(raw) {
            Some(prices) => Ok(HistoryLookup::Hit(StoredSeries {
                series: PriceSeries::new(*request, prices),
                created_at: row
                    .get("created_at")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            })),
            None => Ok(HistoryLookup::Malformed(raw.to_string())),
        }
    }

    /// Persist a series unless a row for the same tuple already exists.
    ///
    /// Returns `true` when this call inserted the row.
    pub fn insert_if_absent(&self, series: &PriceSeries) -> Result<bool> {
        let sql = format!(
            "INSERT INTO {} (date, country_code, commodity, granularity, prices) \
             VALUES (CAST(? AS DATE), ?, ?, ?, CAST(? AS DOUBLE[])) \
             ON CONFLICT DO NOTHING",
            config::HISTORY_TABLE
        );
        let mut params = key_params(&series.request);
        params.push(format_prices(&series.prices));

        let conn = self.lock()?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();
        let changed = conn.execute(&sql, param_values.as_slice())?;
        Ok(changed > 0)
    }

    /// Remove the stored row for a request tuple, returning the rows deleted.
    pub fn delete_series(&self, request: &PriceRequest) -> Result<usize> {
        let sql = format!(
            "DELETE FROM {} WHERE date = CAST(? AS DATE) AND country_code = ? \
             AND commodity = ? AND granularity = ?",
            config::HISTORY_TABLE
        );
        let params = key_params(request);
        let conn = self.lock()?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();
        Ok(conn.execute(&sql, param_values.as_slice())?)
    }

    /// Decode history rows returned with [`HISTORY_COLUMNS`], skipping
    /// malformed ones.
    pub(crate) fn rows_to_stored(
        rows: Vec<HashMap<String, serde_json::Value>>,
    ) -> Result<Vec<StoredSeries>> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let request = PriceRequest::parse(
                row_str(&row, "date"),
                row_str(&row, "country_code"),
                row_str(&row, "granularity"),
                row_str(&row, "commodity"),
            )?;
            let Some(prices) = parse_prices(row_str(&row, "prices")) else {
                continue;
            };
            out.push(StoredSeries {
                series: PriceSeries::new(request, prices),
                created_at: row
                    .get("created_at")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            });
        }
        Ok(out)
    }

    pub(crate) fn history_columns() -> &'static str {
        HISTORY_COLUMNS
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn insert_names<'a>(
    conn: &DuckDbConnection,
    table: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let mut stmt = conn.prepare(&format!("INSERT INTO config.{} VALUES (?, ?)", table))?;
    for (id, name) in (1_i32..).zip(names) {
        stmt.execute(params![id, name])?;
    }
    Ok(())
}

fn row_str<'a>(row: &'a HashMap<String, serde_json::Value>, key: &str) -> &'a str {
    row.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn key_params(request: &PriceRequest) -> Vec<String> {
    vec![
        request.date_key(),
        request.country_code.as_str().to_string(),
        request.commodity.as_str().to_string(),
        request.granularity.as_str().to_string(),
    ]
}

/// Render prices as a DuckDB list literal, e.g. `[61.2, 58.04]`.
fn format_prices(prices: &[f64]) -> String {
    let parts: Vec<String> = prices.iter().map(|p| p.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Parse a DuckDB `DOUBLE[]` rendered as text. Empty lists count as malformed.
fn parse_prices(raw: &str) -> Option<Vec<f64>> {
    let prices: Vec<f64> = serde_json::from_str(raw.trim()).ok()?;
    if prices.is_empty() {
        None
    } else {
        Some(prices)
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; fall back to string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        // Dates, lists and timestamps are cast to VARCHAR in SQL before reaching here
        _ => serde_json::Value::Null,
    }
}
