//! Energy-mix discount for the composite power commodity.
//!
//! Each generation source removes `share * rate` of the base price, where
//! `share` is its percentage of the country's mix. Rates are non-negative, so
//! raising any one share never raises the discounted price.

use std::collections::BTreeMap;

use crate::config::DiscountRates;
use crate::models::EnergySource;

/// Fraction of the base price removed by a country's energy mix.
pub fn discount_fraction(mix: &BTreeMap<EnergySource, f64>, rates: &DiscountRates) -> f64 {
    mix.iter()
        .map(|(source, pct)| pct / 100.0 * rates.rate(*source))
        .sum()
}

/// Base price after the energy-mix discount, floored at zero.
pub fn discounted_base_price(
    base_price: f64,
    mix: &BTreeMap<EnergySource, f64>,
    rates: &DiscountRates,
) -> f64 {
    let fraction = discount_fraction(mix, rates).clamp(0.0, 1.0);
    base_price * (1.0 - fraction)
}
