use std::time::Instant;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use super::energy_mix::discounted_base_price;
use crate::calendar;
use crate::config::PricingPolicy;
use crate::error::{PriceDataError, Result};
use crate::models::{Commodity, CountryCode, PriceRequest, PriceSeries};
use crate::reference::ReferenceTable;

/// Samples a day of prices from the reference tables and a pricing policy.
///
/// Each price is an independent normal draw around the seasonally adjusted
/// base price, shifted up at peak hours and down at off-peak hours, rounded
/// to two decimals.
///
/// Peak and off-peak sets are expressed as hour indices 0..24 and applied to
/// series positions as-is. For half-hourly series this means only the first
/// 24 positions are adjusted and the index refers to a half-hour slot rather
/// than an hour. On 23-hour days index 23 falls outside the hourly series
/// and is skipped; on 25-hour days position 24 is left unadjusted.
pub struct PriceModel<'a> {
    reference: &'a ReferenceTable,
    policy: &'a PricingPolicy,
}

impl<'a> PriceModel<'a> {
    pub fn new(reference: &'a ReferenceTable, policy: &'a PricingPolicy) -> Self {
        Self { reference, policy }
    }

    /// Country base price, discounted by the energy mix for power when the
    /// policy enables it.
    pub fn base_price(&self, country: CountryCode, commodity: Commodity) -> Result<f64> {
        let base = self.reference.base_price(country)? as f64;

        if commodity == Commodity::Power && self.policy.apply_energy_mix {
            let mix = self.reference.energy_mix(country)?;
            return Ok(discounted_base_price(
                base,
                mix,
                &self.policy.discount_rates,
            ));
        }
        Ok(base)
    }

    /// Mean of the sampling distribution for a request.
    pub fn mean_price(&self, request: &PriceRequest) -> Result<f64> {
        let base = self.base_price(request.country_code, request.commodity)?;
        let season = calendar::season_of(request.for_date)?;
        let factor = self
            .reference
            .seasonality_factor(season, request.commodity)?;
        Ok(self.policy.seasonal_adjustment.apply(base, factor))
    }

    /// Number of prices a request produces.
    pub fn series_len(&self, request: &PriceRequest) -> Result<usize> {
        let hours = calendar::hours_in_day(request.for_date, &self.policy.reference_timezone)?;
        Ok(hours as usize * request.granularity.samples_per_hour())
    }

    /// Generate a series drawing from the supplied random source.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &PriceRequest,
        rng: &mut R,
    ) -> Result<PriceSeries> {
        let started = Instant::now();

        let season = calendar::season_of(request.for_date)?;
        let mean = self.mean_price(request)?;
        let peak_hours = self.reference.peak_hours(season, request.commodity)?;
        let off_peak_hours = self.reference.off_peak_hours(season, request.commodity)?;
        let len = self.series_len(request)?;

        let normal = Normal::new(mean, self.policy.std_dev).map_err(|e| {
            PriceDataError::InvalidArgument(format!(
                "cannot sample N({}, {}): {}",
                mean, self.policy.std_dev, e
            ))
        })?;

        let mut prices: Vec<f64> = (0..len).map(|_| normal.sample(&mut *rng)).collect();

        for hour in peak_hours {
            if let Some(price) = prices.get_mut(*hour as usize) {
                *price += self.policy.peak_bonus;
            }
        }
        for hour in &off_peak_hours {
            if let Some(price) = prices.get_mut(*hour as usize) {
                *price -= self.policy.off_peak_penalty;
            }
        }
        for price in prices.iter_mut() {
            *price = round_price(*price);
        }

        debug!(
            date = %request.for_date,
            country = %request.country_code,
            commodity = %request.commodity,
            granularity = %request.granularity,
            season = %season,
            mean,
            len,
            elapsed = ?started.elapsed(),
            "generated price series"
        );

        Ok(PriceSeries::new(*request, prices))
    }
}

/// Round to two decimal places.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
