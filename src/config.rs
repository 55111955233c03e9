use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PriceDataError, Result};
use crate::models::EnergySource;

pub const DEFAULT_DB_NAME: &str = "price_data.db";
pub const REFERENCE_TIMEZONE: &str = "Europe/London";

pub const CONFIG_SCHEMA: &str = "config";
pub const PRICES_SCHEMA: &str = "prices";
pub const HISTORY_TABLE: &str = "prices.daily_prices";

/// Reference tables rebuilt under the `config` schema on every bootstrap.
pub fn config_tables() -> [&'static str; 5] {
    [
        "country_codes",
        "granularity",
        "commodity",
        "strategies",
        "energy_mix",
    ]
}

pub fn default_db_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("price-data-sdk").join(DEFAULT_DB_NAME)
    } else {
        PathBuf::from(DEFAULT_DB_NAME)
    }
}

// ---------------------------------------------------------------------------
// SeasonalAdjustment — How the seasonality factor moves the base price
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalAdjustment {
    /// `base * factor`
    #[default]
    Multiply,
    /// `base - factor`
    Subtract,
}

impl SeasonalAdjustment {
    pub fn apply(&self, base_price: f64, factor: f64) -> f64 {
        match self {
            SeasonalAdjustment::Multiply => base_price * factor,
            SeasonalAdjustment::Subtract => base_price - factor,
        }
    }
}

// ---------------------------------------------------------------------------
// DiscountRates — Per-source discount applied to the power base price
// ---------------------------------------------------------------------------

/// Fraction of the base price removed per 100% share of a source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscountRates {
    pub wind: f64,
    pub solar: f64,
    pub nuclear: f64,
    pub hydro: f64,
    pub biofuel: f64,
    pub natural_gas: f64,
}

impl Default for DiscountRates {
    fn default() -> Self {
        Self {
            wind: 0.12,
            solar: 0.10,
            nuclear: 0.06,
            hydro: 0.08,
            biofuel: 0.04,
            natural_gas: 0.0,
        }
    }
}

impl DiscountRates {
    pub fn rate(&self, source: EnergySource) -> f64 {
        match source {
            EnergySource::Wind => self.wind,
            EnergySource::Solar => self.solar,
            EnergySource::Nuclear => self.nuclear,
            EnergySource::Hydro => self.hydro,
            EnergySource::Biofuel => self.biofuel,
            EnergySource::NaturalGas => self.natural_gas,
        }
    }
}

// ---------------------------------------------------------------------------
// PricingPolicy — Tunable arithmetic of the price model
// ---------------------------------------------------------------------------

/// The arithmetic knobs of the price model.
///
/// Loadable from TOML; every field falls back to its default when omitted:
///
/// ```toml
/// seasonal_adjustment = "multiply"
/// std_dev = 5.0
/// peak_bonus = 20.0
/// off_peak_penalty = 40.0
/// reference_timezone = "Europe/London"
/// apply_energy_mix = true
///
/// [discount_rates]
/// wind = 0.12
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub seasonal_adjustment: SeasonalAdjustment,
    pub std_dev: f64,
    pub peak_bonus: f64,
    pub off_peak_penalty: f64,
    pub reference_timezone: String,
    pub apply_energy_mix: bool,
    pub discount_rates: DiscountRates,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            seasonal_adjustment: SeasonalAdjustment::Multiply,
            std_dev: 5.0,
            peak_bonus: 20.0,
            off_peak_penalty: 40.0,
            reference_timezone: REFERENCE_TIMEZONE.to_string(),
            apply_energy_mix: true,
            discount_rates: DiscountRates::default(),
        }
    }
}

impl PricingPolicy {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let policy: PricingPolicy = toml::from_str(contents)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Reject policies the model cannot sample from.
    pub fn validate(&self) -> Result<()> {
        if !self.std_dev.is_finite() || self.std_dev <= 0.0 {
            return Err(PriceDataError::InvalidArgument(format!(
                "std_dev must be a positive number, got {}",
                self.std_dev
            )));
        }
        if !self.peak_bonus.is_finite() || !self.off_peak_penalty.is_finite() {
            return Err(PriceDataError::InvalidArgument(
                "peak_bonus and off_peak_penalty must be finite".to_string(),
            ));
        }
        crate::calendar::parse_timezone(&self.reference_timezone)?;
        for source in EnergySource::ALL {
            let rate = self.discount_rates.rate(*source);
            if !(0.0..=1.0).contains(&rate) {
                return Err(PriceDataError::InvalidArgument(format!(
                    "discount rate for {} must be within 0..=1, got {}",
                    source, rate
                )));
            }
        }
        Ok(())
    }
}
