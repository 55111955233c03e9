//! Price Data SDK for Rust.
//!
//! Synthesizes plausible hourly or half-hourly commodity price series for a
//! country and date, and persists every generated series in DuckDB so that an
//! identical request is answered from history instead of being sampled again.
//!
//! # Quick start
//!
//! ```no_run
//! use price_data_sdk::{PriceDataSdk, PriceRequest};
//!
//! let sdk = PriceDataSdk::builder().in_memory().build().unwrap();
//!
//! let request = PriceRequest::parse("2025-03-30", "GB", "h", "power").unwrap();
//! let series = sdk.get_or_generate(&request).unwrap();
//! assert_eq!(series.len(), 23); // UK spring-forward day
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod pricing;
pub mod queries;
pub mod reference;
pub mod sql_builder;
pub mod strategies;

#[cfg(feature = "async")]
pub use async_client::AsyncPriceDataSdk;
pub use cache::{CacheStatus, CachedSeries, HistoricCache};
pub use config::{PricingPolicy, SeasonalAdjustment};
pub use connection::Store;
pub use error::{PriceDataError, Result};
pub use models::{
    Commodity, CountryCode, GeneratePricesParams, Granularity, PriceRequest, PriceResponse,
    PriceSeries, Season,
};
pub use pricing::PriceModel;
pub use reference::ReferenceTable;
pub use sql_builder::SqlBuilder;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use cache::{lock_rng, KeyLocks};
use strategies::RandomNumbers;

// ---------------------------------------------------------------------------
// PriceDataSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PriceDataSdk`] instance.
///
/// Use [`PriceDataSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PriceDataSdkBuilder::build) to create the SDK.
#[derive(Default)]
pub struct PriceDataSdkBuilder {
    db_path: Option<PathBuf>,
    in_memory: bool,
    policy: Option<PricingPolicy>,
    policy_file: Option<PathBuf>,
    reference: Option<ReferenceTable>,
    seed: Option<u64>,
}

impl PriceDataSdkBuilder {
    /// Set the DuckDB database file.
    ///
    /// If not set, `price_data.db` under the platform data directory is used
    /// (e.g. `~/.local/share/price-data-sdk` on Linux).
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Use a private in-memory database. History is lost on drop.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Set the pricing policy. Defaults to [`PricingPolicy::default()`].
    pub fn policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Load the pricing policy from a TOML file. Takes precedence over
    /// [`policy()`](Self::policy).
    pub fn policy_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.policy_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Seed the reference tables written to the store at bootstrap.
    pub fn reference(mut self, reference: ReferenceTable) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Seed the SDK's random source for reproducible sampling.
    ///
    /// Without a seed, system entropy is used.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the SDK: open the store, bootstrap the schemas and load the
    /// reference tables back from it.
    pub fn build(self) -> Result<PriceDataSdk> {
        let policy = match &self.policy_file {
            Some(path) => PricingPolicy::from_file(path)?,
            None => self.policy.unwrap_or_default(),
        };
        policy.validate()?;

        let (store, db_path) = if self.in_memory {
            (Store::open_in_memory()?, None)
        } else {
            let path = self.db_path.unwrap_or_else(config::default_db_path);
            (Store::open(&path)?, Some(path))
        };

        let seed_tables = self.reference.unwrap_or_default();
        seed_tables.validate()?;
        store.bootstrap(&seed_tables)?;
        let reference = ReferenceTable::load(&store)?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            db = %db_path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| ":memory:".into()),
            timezone = %policy.reference_timezone,
            "price data SDK ready"
        );

        Ok(PriceDataSdk {
            store,
            reference,
            policy,
            locks: KeyLocks::new(),
            rng: Mutex::new(rng),
            db_path,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceDataSdk
// ---------------------------------------------------------------------------

/// The main entry point for the Price Data SDK.
///
/// Owns the [`Store`], the loaded [`ReferenceTable`] and the
/// [`PricingPolicy`], and exposes each component as a lightweight borrowing
/// wrapper. Safe to share between threads.
pub struct PriceDataSdk {
    store: Store,
    reference: ReferenceTable,
    policy: PricingPolicy,
    locks: KeyLocks,
    rng: Mutex<StdRng>,
    db_path: Option<PathBuf>,
}

impl PriceDataSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> PriceDataSdkBuilder {
        PriceDataSdkBuilder::default()
    }

    // -- Component accessors -----------------------------------------------

    /// The price model over this SDK's reference tables and policy.
    pub fn model(&self) -> PriceModel<'_> {
        PriceModel::new(&self.reference, &self.policy)
    }

    /// The history-backed cache in front of the price model.
    pub fn cache(&self) -> HistoricCache<'_> {
        HistoricCache::new(&self.store, self.model(), &self.locks, &self.rng)
    }

    /// Query interface over stored series.
    pub fn prices(&self) -> queries::PriceQuery<'_> {
        queries::PriceQuery::new(&self.store)
    }

    /// Query interface over the `config` tables.
    pub fn reference_tables(&self) -> queries::ReferenceQuery<'_> {
        queries::ReferenceQuery::new(&self.store)
    }

    /// Random number strategies.
    pub fn random_numbers(&self) -> RandomNumbers<'_> {
        RandomNumbers::new(&self.reference, &self.policy)
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // -- Operations ---------------------------------------------------------

    /// Sample a fresh series without touching history.
    pub fn generate(&self, request: &PriceRequest) -> Result<PriceSeries> {
        let mut rng = lock_rng(&self.rng);
        self.model().generate(request, &mut *rng)
    }

    /// Return the stored series for `request`, generating and persisting it
    /// on first use.
    pub fn get_or_generate(&self, request: &PriceRequest) -> Result<PriceSeries> {
        self.cache().get_or_generate(request)
    }

    /// Validate raw boundary fields and answer with the response shape.
    pub fn model_prices(&self, params: &GeneratePricesParams) -> Result<PriceResponse> {
        let request = params.validate()?;
        Ok(self.get_or_generate(&request)?.into())
    }

    /// Draw `count` numbers with a random number strategy.
    ///
    /// `count` is capped at [`strategies::MAX_COUNT`].
    pub fn generate_random_numbers(
        &self,
        strategy: models::Strategy,
        count: usize,
    ) -> Result<Vec<f64>> {
        let mut rng = lock_rng(&self.rng);
        self.random_numbers().generate(strategy, count, &mut *rng)
    }

    /// A day of unshaped prices around a country's base price: 24 values
    /// hourly, 48 half-hourly, with no seasonal, peak or DST adjustment.
    pub fn generate_flat_prices(
        &self,
        country: CountryCode,
        granularity: Granularity,
    ) -> Result<Vec<f64>> {
        let mut rng = lock_rng(&self.rng);
        self.random_numbers()
            .flat_prices(country, granularity, &mut *rng)
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.store.execute(query, params)
    }

    /// Consume the SDK and release the database handle.
    pub fn close(self) {
        drop(self);
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for PriceDataSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let db = self
            .db_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        write!(
            f,
            "PriceDataSdk(db={}, timezone={}, adjustment={:?}, energy_mix={})",
            db,
            self.policy.reference_timezone,
            self.policy.seasonal_adjustment,
            self.policy.apply_energy_mix
        )
    }
}
