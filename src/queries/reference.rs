//! Read-only queries against the `config` reference tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config;
use crate::connection::Store;
use crate::error::{PriceDataError, Result};
use crate::models::CountryCode;
use crate::sql_builder::SqlBuilder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRow {
    pub id: i64,
    pub country_code: String,
    pub country_base_price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyMixRow {
    pub id: i64,
    pub country_code: String,
    pub energy_source: String,
    pub percentage: f64,
}

/// Query interface over the bootstrapped `config` schema.
pub struct ReferenceQuery<'a> {
    store: &'a Store,
}

impl<'a> ReferenceQuery<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn country_codes(&self) -> Result<Vec<CountryRow>> {
        let (sql, params) = SqlBuilder::new("config.country_codes")
            .order_by(&["id ASC"])
            .build();
        self.store.execute_into(&sql, &params)
    }

    /// Energy mix rows, optionally restricted to one country.
    pub fn energy_mix(&self, country: Option<CountryCode>) -> Result<Vec<EnergyMixRow>> {
        let mut qb = SqlBuilder::new("config.energy_mix");
        if let Some(code) = country {
            qb.where_eq("country_code", code.as_str());
        }
        qb.order_by(&["id ASC"]);
        let (sql, params) = qb.build();
        self.store.execute_into(&sql, &params)
    }

    /// All rows of one config table, by its unqualified name.
    pub fn table(&self, name: &str) -> Result<Vec<HashMap<String, Value>>> {
        if !config::config_tables().contains(&name) {
            return Err(PriceDataError::InvalidArgument(format!(
                "unknown config table '{}' (expected one of: {})",
                name,
                config::config_tables().join(", ")
            )));
        }
        let (sql, params) = SqlBuilder::new(&format!("{}.{}", config::CONFIG_SCHEMA, name))
            .order_by(&["id ASC"])
            .build();
        self.store.execute(&sql, &params)
    }
}
