//! Static reference data consumed by the price model.
//!
//! Base prices and energy mixes are seeded into the `config` schema at
//! bootstrap and read back from there; seasonality factors and peak hours
//! are built in. Every table is checked for completeness when a
//! [`ReferenceTable`] is constructed, so a missing entry fails at startup
//! rather than in the middle of a request.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::connection::Store;
use crate::error::{PriceDataError, Result};
use crate::models::{Commodity, CountryCode, EnergySource, Season};

const HOURS_PER_DAY: u32 = 24;
const MIX_TOLERANCE: f64 = 0.01;

/// Read-only lookup tables for the price model.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    base_prices: BTreeMap<CountryCode, i64>,
    seasonality: HashMap<(Season, Commodity), f64>,
    peak_hours: HashMap<(Season, Commodity), Vec<u32>>,
    energy_mix: BTreeMap<CountryCode, BTreeMap<EnergySource, f64>>,
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self {
            base_prices: builtin_base_prices(),
            seasonality: builtin_seasonality(),
            peak_hours: builtin_peak_hours(),
            energy_mix: builtin_energy_mix(),
        }
    }
}

impl ReferenceTable {
    /// Build a table from explicit mappings, validating completeness.
    pub fn new(
        base_prices: BTreeMap<CountryCode, i64>,
        seasonality: HashMap<(Season, Commodity), f64>,
        peak_hours: HashMap<(Season, Commodity), Vec<u32>>,
        energy_mix: BTreeMap<CountryCode, BTreeMap<EnergySource, f64>>,
    ) -> Result<Self> {
        let table = Self {
            base_prices,
            seasonality,
            peak_hours,
            energy_mix,
        };
        table.validate()?;
        Ok(table)
    }

    /// The built-in tables.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load base prices and energy mixes from the store's `config` schema.
    ///
    /// Seasonality and peak hours come from the built-in tables.
    pub fn load(store: &Store) -> Result<Self> {
        let mut base_prices = BTreeMap::new();
        let rows = store.execute(
            "SELECT country_code, country_base_price FROM config.country_codes ORDER BY id",
            &[],
        )?;
        for row in rows {
            let code: CountryCode = parse_cell(&row, "country_codes", "country_code")?;
            let price = row
                .get("country_base_price")
                .and_then(|v| v.as_i64())
                .ok_or_else(|| missing_cell("country_codes", "country_base_price"))?;
            base_prices.insert(code, price);
        }

        let mut energy_mix: BTreeMap<CountryCode, BTreeMap<EnergySource, f64>> = BTreeMap::new();
        let rows = store.execute(
            "SELECT country_code, energy_source, percentage FROM config.energy_mix ORDER BY id",
            &[],
        )?;
        for row in rows {
            let code: CountryCode = parse_cell(&row, "energy_mix", "country_code")?;
            let source: EnergySource = parse_cell(&row, "energy_mix", "energy_source")?;
            let pct = row
                .get("percentage")
                .and_then(|v| v.as_f64())
                .ok_or_else(|| missing_cell("energy_mix", "percentage"))?;
            energy_mix.entry(code).or_default().insert(source, pct);
        }

        debug!(
            countries = base_prices.len(),
            mixes = energy_mix.len(),
            "loaded reference tables from store"
        );

        Self::new(
            base_prices,
            builtin_seasonality(),
            builtin_peak_hours(),
            energy_mix,
        )
    }

    /// Check that every country, season and commodity combination is covered.
    pub fn validate(&self) -> Result<()> {
        for country in CountryCode::ALL {
            match self.base_prices.get(country) {
                Some(price) if *price > 0 => {}
                Some(price) => {
                    return Err(PriceDataError::Lookup(format!(
                        "base price for {} must be positive, got {}",
                        country, price
                    )))
                }
                None => {
                    return Err(PriceDataError::Lookup(format!(
                        "no base price for country {}",
                        country
                    )))
                }
            }

            let mix = self.energy_mix.get(country).ok_or_else(|| {
                PriceDataError::Lookup(format!("no energy mix for country {}", country))
            })?;
            let mut total = 0.0;
            for (source, pct) in mix {
                if !(0.0..=100.0).contains(pct) {
                    return Err(PriceDataError::Lookup(format!(
                        "energy mix share {}% for {} in {} is out of range",
                        pct, source, country
                    )));
                }
                total += pct;
            }
            if (total - 100.0).abs() > MIX_TOLERANCE {
                return Err(PriceDataError::Lookup(format!(
                    "energy mix for {} sums to {}%, expected 100%",
                    country, total
                )));
            }
        }

        for season in Season::ALL {
            for commodity in Commodity::ALL {
                let key = (*season, *commodity);
                if !self.seasonality.contains_key(&key) {
                    return Err(PriceDataError::Lookup(format!(
                        "no seasonality factor for {} / {}",
                        season, commodity
                    )));
                }
                let peaks = self.peak_hours.get(&key).ok_or_else(|| {
                    PriceDataError::Lookup(format!("no peak hours for {} / {}", season, commodity))
                })?;
                if let Some(hour) = peaks.iter().find(|h| **h >= HOURS_PER_DAY) {
                    return Err(PriceDataError::Lookup(format!(
                        "peak hour {} for {} / {} is outside 0..24",
                        hour, season, commodity
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn base_price(&self, country: CountryCode) -> Result<i64> {
        self.base_prices
            .get(&country)
            .copied()
            .ok_or_else(|| PriceDataError::Lookup(format!("no base price for country {}", country)))
    }

    pub fn seasonality_factor(&self, season: Season, commodity: Commodity) -> Result<f64> {
        self.seasonality
            .get(&(season, commodity))
            .copied()
            .ok_or_else(|| {
                PriceDataError::Lookup(format!(
                    "no seasonality factor for {} / {}",
                    season, commodity
                ))
            })
    }

    /// Peak hour indices (0..24) for a season and commodity, ascending.
    pub fn peak_hours(&self, season: Season, commodity: Commodity) -> Result<&[u32]> {
        self.peak_hours
            .get(&(season, commodity))
            .map(|v| v.as_slice())
            .ok_or_else(|| {
                PriceDataError::Lookup(format!("no peak hours for {} / {}", season, commodity))
            })
    }

    /// Complement of [`peak_hours`](Self::peak_hours) within the 24-hour day.
    pub fn off_peak_hours(&self, season: Season, commodity: Commodity) -> Result<Vec<u32>> {
        let peaks = self.peak_hours(season, commodity)?;
        Ok((0..HOURS_PER_DAY).filter(|h| !peaks.contains(h)).collect())
    }

    /// Percentage share per generation source for a country.
    pub fn energy_mix(&self, country: CountryCode) -> Result<&BTreeMap<EnergySource, f64>> {
        self.energy_mix
            .get(&country)
            .ok_or_else(|| PriceDataError::Lookup(format!("no energy mix for country {}", country)))
    }

    /// `(country, base_price)` rows in declaration order.
    pub fn base_price_rows(&self) -> Vec<(CountryCode, i64)> {
        CountryCode::ALL
            .iter()
            .filter_map(|c| self.base_prices.get(c).map(|p| (*c, *p)))
            .collect()
    }

    /// `(country, source, percentage)` rows in declaration order.
    pub fn energy_mix_rows(&self) -> Vec<(CountryCode, EnergySource, f64)> {
        let mut rows = Vec::new();
        for country in CountryCode::ALL {
            if let Some(mix) = self.energy_mix.get(country) {
                for source in EnergySource::ALL {
                    if let Some(pct) = mix.get(source) {
                        rows.push((*country, *source, *pct));
                    }
                }
            }
        }
        rows
    }
}

// ---------------------------------------------------------------------------
// Config row helpers
// ---------------------------------------------------------------------------

fn missing_cell(table: &str, column: &str) -> PriceDataError {
    PriceDataError::Lookup(format!("config.{} has a NULL {}", table, column))
}

/// Parse a text cell of a config row into one of the closed enums.
///
/// Bad stored values are a lookup failure, not caller input.
fn parse_cell<T: FromStr<Err = PriceDataError>>(
    row: &HashMap<String, Value>,
    table: &str,
    column: &str,
) -> Result<T> {
    let raw = row
        .get(column)
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing_cell(table, column))?;
    raw.parse().map_err(|e: PriceDataError| {
        PriceDataError::Lookup(format!("config.{}.{}: {}", table, column, e))
    })
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

fn builtin_base_prices() -> BTreeMap<CountryCode, i64> {
    BTreeMap::from([
        (CountryCode::Gb, 61),
        (CountryCode::Fr, 58),
        (CountryCode::Nl, 52),
        (CountryCode::De, 57),
    ])
}

fn builtin_seasonality() -> HashMap<(Season, Commodity), f64> {
    use Commodity::*;
    use Season::*;

    HashMap::from([
        ((Spring, Power), 0.5),
        ((Summer, Power), 1.5),
        ((Autumn, Power), 0.5),
        ((Winter, Power), 1.5),
        ((Spring, NaturalGas), 0.8),
        ((Summer, NaturalGas), 0.5),
        ((Autumn, NaturalGas), 1.0),
        ((Winter, NaturalGas), 1.5),
        ((Spring, Crude), 0.8),
        ((Summer, Crude), 1.0),
        ((Autumn, Crude), 1.2),
        ((Winter, Crude), 1.5),
    ])
}

fn builtin_peak_hours() -> HashMap<(Season, Commodity), Vec<u32>> {
    use Commodity::*;
    use Season::*;

    let window = |start: u32| (start..start + 10).collect::<Vec<u32>>();

    HashMap::from([
        ((Spring, Power), window(8)),
        ((Spring, NaturalGas), window(6)),
        ((Spring, Crude), window(7)),
        ((Summer, Power), window(9)),
        ((Summer, NaturalGas), window(7)),
        ((Summer, Crude), window(8)),
        ((Autumn, Power), window(8)),
        ((Autumn, NaturalGas), window(6)),
        ((Autumn, Crude), window(7)),
        ((Winter, Power), window(7)),
        ((Winter, NaturalGas), window(6)),
        ((Winter, Crude), window(7)),
    ])
}

fn builtin_energy_mix() -> BTreeMap<CountryCode, BTreeMap<EnergySource, f64>> {
    let mix = |shares: [f64; 6]| -> BTreeMap<EnergySource, f64> {
        EnergySource::ALL.iter().copied().zip(shares).collect()
    };

    // wind, solar, nuclear, hydro, biofuel, natural_gas
    BTreeMap::from([
        (CountryCode::Gb, mix([29.0, 5.0, 14.0, 2.0, 11.0, 39.0])),
        (CountryCode::Fr, mix([8.0, 4.0, 65.0, 11.0, 2.0, 10.0])),
        (CountryCode::Nl, mix([27.0, 17.0, 3.0, 0.0, 6.0, 47.0])),
        (CountryCode::De, mix([31.0, 12.0, 0.0, 4.0, 9.0, 44.0])),
    ])
}
