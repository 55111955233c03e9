//! Random number strategies and the flat (unshaped) price generator.

use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::PricingPolicy;
use crate::error::{PriceDataError, Result};
use crate::models::{CountryCode, Granularity, Strategy};
use crate::pricing::model::round_price;
use crate::reference::ReferenceTable;

const UPPER_BOUND: f64 = 100.0;
const FLAT_HOURS: usize = 24;

/// Largest `count` accepted by [`RandomNumbers::generate`].
pub const MAX_COUNT: usize = 100_000;

/// Random number generation bound to the reference tables and policy.
pub struct RandomNumbers<'a> {
    reference: &'a ReferenceTable,
    policy: &'a PricingPolicy,
}

impl<'a> RandomNumbers<'a> {
    pub fn new(reference: &'a ReferenceTable, policy: &'a PricingPolicy) -> Self {
        Self { reference, policy }
    }

    /// Draw `count` numbers in `0..100`, rounded to two decimals.
    ///
    /// Counts above [`MAX_COUNT`] are rejected before anything is drawn.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        strategy: Strategy,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        if count > MAX_COUNT {
            return Err(PriceDataError::InvalidArgument(format!(
                "count {} exceeds the maximum of {}",
                count, MAX_COUNT
            )));
        }

        let numbers = match strategy {
            Strategy::Basic => {
                let mut numbers = Vec::new();
                for _ in 0..count {
                    numbers.push(round_price(rng.gen_range(0.0..UPPER_BOUND)));
                }
                numbers
            }
            Strategy::Uniform => {
                let dist = Uniform::new(0.0, UPPER_BOUND);
                (0..count)
                    .map(|_| round_price(dist.sample(&mut *rng)))
                    .collect()
            }
        };
        Ok(numbers)
    }

    /// Normal draws around a country's base price with no seasonal or
    /// peak shaping: 24 values hourly, 48 half-hourly.
    pub fn flat_prices<R: Rng + ?Sized>(
        &self,
        country: CountryCode,
        granularity: Granularity,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        let base = self.reference.base_price(country)? as f64;
        let normal = Normal::new(base, self.policy.std_dev).map_err(|e| {
            PriceDataError::InvalidArgument(format!("cannot sample around {}: {}", base, e))
        })?;
        let len = FLAT_HOURS * granularity.samples_per_hour();
        Ok((0..len).map(|_| normal.sample(&mut *rng)).collect())
    }
}
