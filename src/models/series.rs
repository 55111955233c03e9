use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::options::{Commodity, CountryCode, Granularity};
use super::request::PriceRequest;

// ---------------------------------------------------------------------------
// PriceSeries — A generated (or stored) day of prices
// ---------------------------------------------------------------------------

/// Ordered prices for exactly one [`PriceRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub request: PriceRequest,
    pub prices: Vec<f64>,
}

impl PriceSeries {
    pub fn new(request: PriceRequest, prices: Vec<f64>) -> Self {
        Self { request, prices }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Arithmetic mean, or `None` for an empty series.
    pub fn mean(&self) -> Option<f64> {
        if self.prices.is_empty() {
            return None;
        }
        Some(self.prices.iter().sum::<f64>() / self.prices.len() as f64)
    }

    /// Min / max / mean summary, or `None` for an empty series.
    pub fn stats(&self) -> Option<PriceStats> {
        let mean = self.mean()?;
        let min = self.prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(PriceStats {
            min_price: min,
            max_price: max,
            avg_price: mean,
            data_points: self.prices.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// PriceResponse — Boundary response shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub commodity: Commodity,
    pub date: NaiveDate,
    pub country_code: CountryCode,
    pub granularity: Granularity,
    pub prices: Vec<f64>,
}

impl From<PriceSeries> for PriceResponse {
    fn from(series: PriceSeries) -> Self {
        let PriceSeries { request, prices } = series;
        Self {
            commodity: request.commodity,
            date: request.for_date,
            country_code: request.country_code,
            granularity: request.granularity,
            prices,
        }
    }
}

// ---------------------------------------------------------------------------
// StoredSeries — A history row as read back from the store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSeries {
    pub series: PriceSeries,
    /// Insertion timestamp as rendered by DuckDB.
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// PriceStats — Aggregated statistics for one series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub data_points: usize,
}
