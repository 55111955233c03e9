//! Price model: turns a validated request into a day of sampled prices.

pub mod energy_mix;
pub mod model;

pub use energy_mix::{discount_fraction, discounted_base_price};
pub use model::PriceModel;
