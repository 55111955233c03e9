//! Read-only query interfaces.
//!
//! Each module provides a query struct that borrows the [`Store`](crate::connection::Store)
//! and exposes methods returning `Result<T>`.

pub mod prices;
pub mod reference;

pub use prices::{HistoryFilter, PriceQuery};
pub use reference::{CountryRow, EnergyMixRow, ReferenceQuery};
