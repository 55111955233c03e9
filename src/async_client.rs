//! Async wrapper around [`PriceDataSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use price_data_sdk::{AsyncPriceDataSdk, PriceRequest};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncPriceDataSdk::builder().in_memory().build().await.unwrap();
//!
//!     let request = PriceRequest::parse("2025-05-02", "FR", "hh", "crude").unwrap();
//!     let _series = sdk.run(move |s| s.get_or_generate(&request)).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{PriceDataError, Result};
use crate::models::{CountryCode, GeneratePricesParams, Granularity, PriceResponse, Strategy};
use crate::{PriceDataSdk, PricingPolicy};

// ---------------------------------------------------------------------------
// AsyncPriceDataSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncPriceDataSdk`] instance.
#[derive(Default)]
pub struct AsyncPriceDataSdkBuilder {
    db_path: Option<PathBuf>,
    in_memory: bool,
    policy: Option<PricingPolicy>,
    seed: Option<u64>,
}

impl AsyncPriceDataSdkBuilder {
    /// Set the DuckDB database file.
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Use a private in-memory database.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the async SDK on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncPriceDataSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = PriceDataSdk::builder();
            if self.in_memory {
                builder = builder.in_memory();
            } else if let Some(path) = self.db_path {
                builder = builder.db_path(path);
            }
            if let Some(policy) = self.policy {
                builder = builder.policy(policy);
            }
            if let Some(seed) = self.seed {
                builder = builder.seed(seed);
            }
            Ok(AsyncPriceDataSdk {
                inner: Arc::new(builder.build()?),
            })
        })
        .await
        .map_err(|e| PriceDataError::Internal(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncPriceDataSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`PriceDataSdk`].
///
/// The SDK is already thread-safe, so it is shared behind an [`Arc`] and each
/// call is dispatched to the blocking pool. Cloning is cheap.
#[derive(Clone)]
pub struct AsyncPriceDataSdk {
    inner: Arc<PriceDataSdk>,
}

impl AsyncPriceDataSdk {
    pub fn builder() -> AsyncPriceDataSdkBuilder {
        AsyncPriceDataSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&PriceDataSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&sdk))
            .await
            .map_err(|e| PriceDataError::Internal(format!("Task join error: {e}")))?
    }

    /// Validate boundary fields and return the cached-or-generated response.
    pub async fn model_prices(&self, params: GeneratePricesParams) -> Result<PriceResponse> {
        self.run(move |s| s.model_prices(&params)).await
    }

    pub async fn generate_random_numbers(&self, strategy: Strategy, count: usize) -> Result<Vec<f64>> {
        self.run(move |s| s.generate_random_numbers(strategy, count))
            .await
    }

    pub async fn generate_flat_prices(
        &self,
        country: CountryCode,
        granularity: Granularity,
    ) -> Result<Vec<f64>> {
        self.run(move |s| s.generate_flat_prices(country, granularity))
            .await
    }
}
