use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::options::{Commodity, CountryCode, Granularity};
use crate::error::{PriceDataError, Result};

// ---------------------------------------------------------------------------
// PriceRequest — The validated tuple that keys a generated series
// ---------------------------------------------------------------------------

/// A validated request for one day of prices.
///
/// Immutable once built; the four fields together form the history key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRequest {
    pub for_date: NaiveDate,
    pub country_code: CountryCode,
    pub granularity: Granularity,
    pub commodity: Commodity,
}

impl PriceRequest {
    pub fn new(
        for_date: NaiveDate,
        country_code: CountryCode,
        granularity: Granularity,
        commodity: Commodity,
    ) -> Self {
        Self {
            for_date,
            country_code,
            granularity,
            commodity,
        }
    }

    /// Validate raw boundary strings into a request.
    ///
    /// Fields are checked in order (date, country, granularity, commodity)
    /// and the first failure is returned.
    pub fn parse(
        for_date: &str,
        country_code: &str,
        granularity: &str,
        commodity: &str,
    ) -> Result<Self> {
        Ok(Self {
            for_date: parse_for_date(for_date)?,
            country_code: country_code.parse()?,
            granularity: granularity.parse()?,
            commodity: commodity.parse()?,
        })
    }

    /// The date in `YYYY-MM-DD` form, as stored in the history table.
    pub fn date_key(&self) -> String {
        self.for_date.format("%Y-%m-%d").to_string()
    }
}

// ---------------------------------------------------------------------------
// GeneratePricesParams — Raw boundary payload
// ---------------------------------------------------------------------------

/// Unvalidated request body as received from the CLI or HTTP boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePricesParams {
    pub for_date: String,
    pub country_code: String,
    pub granularity: String,
    pub commodity: String,
}

impl GeneratePricesParams {
    pub fn validate(&self) -> Result<PriceRequest> {
        PriceRequest::parse(
            &self.for_date,
            &self.country_code,
            &self.granularity,
            &self.commodity,
        )
    }
}

/// Parse a request date.
///
/// Accepts a plain date (`2025-03-30`), a naive timestamp
/// (`2025-03-30T00:00:00`, optionally with a space separator) or an RFC 3339
/// timestamp. Only the calendar date is kept.
pub fn parse_for_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(ts.date());
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.date_naive());
    }

    Err(PriceDataError::InvalidArgument(format!(
        "invalid for_date '{}' (expected YYYY-MM-DD or an ISO 8601 timestamp)",
        value
    )))
}
