//! Historic cache: return the stored series for a request, or generate,
//! persist and return a new one.
//!
//! The check-generate-persist sequence runs under a per-key mutex, and the
//! insert itself is `ON CONFLICT DO NOTHING` against the history table's
//! primary key. The returned series is always the one read back from the
//! store, so concurrent callers for the same key observe identical prices
//! even when they race across processes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::connection::{HistoryLookup, Store};
use crate::error::{PriceDataError, Result};
use crate::models::{PriceRequest, PriceSeries};
use crate::pricing::PriceModel;

// ---------------------------------------------------------------------------
// KeyLocks
// ---------------------------------------------------------------------------

/// One mutex per request tuple currently being resolved.
///
/// Entries are dropped once no caller holds or waits on them.
#[derive(Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<PriceRequest, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn acquire(&self, key: &PriceRequest) -> Arc<Mutex<()>> {
        let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(*key).or_default().clone()
    }

    fn release(&self, key: &PriceRequest, handle: Arc<Mutex<()>>) {
        let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map plus ours means nobody else is waiting
        if Arc::strong_count(&handle) <= 2 {
            map.remove(key);
        }
    }
}

/// Lock the shared random source.
///
/// A panic while drawing leaves the generator state valid, so poisoning is
/// cleared instead of failing every later draw.
pub(crate) fn lock_rng(rng: &Mutex<StdRng>) -> MutexGuard<'_, StdRng> {
    rng.lock().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------------------
// CachedSeries
// ---------------------------------------------------------------------------

/// How a series returned by the cache was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Read from the store unchanged.
    Hit,
    /// Generated and persisted by this call (or by a racing caller).
    Generated,
    /// A malformed stored row was replaced by a freshly generated one.
    Regenerated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedSeries {
    pub series: PriceSeries,
    pub status: CacheStatus,
}

// ---------------------------------------------------------------------------
// HistoricCache
// ---------------------------------------------------------------------------

/// Cache-or-compute front for the price model, backed by the history table.
pub struct HistoricCache<'a> {
    store: &'a Store,
    model: PriceModel<'a>,
    locks: &'a KeyLocks,
    rng: &'a Mutex<StdRng>,
}

impl<'a> HistoricCache<'a> {
    pub fn new(
        store: &'a Store,
        model: PriceModel<'a>,
        locks: &'a KeyLocks,
        rng: &'a Mutex<StdRng>,
    ) -> Self {
        Self {
            store,
            model,
            locks,
            rng,
        }
    }

    /// Return the stored series for `request`, generating and persisting it
    /// on a miss.
    pub fn get_or_generate(&self, request: &PriceRequest) -> Result<PriceSeries> {
        Ok(self.fetch(request)?.series)
    }

    /// Like [`get_or_generate`](Self::get_or_generate) but reports whether
    /// the series was a hit.
    pub fn fetch(&self, request: &PriceRequest) -> Result<CachedSeries> {
        self.resolve(request, || {
            let mut rng = lock_rng(self.rng);
            self.model.generate(request, &mut *rng)
        })
    }

    /// Like [`fetch`](Self::fetch) but draws from the given random source on
    /// a miss.
    pub fn fetch_with_rng<R: Rng + ?Sized>(
        &self,
        request: &PriceRequest,
        rng: &mut R,
    ) -> Result<CachedSeries> {
        self.resolve(request, || self.model.generate(request, rng))
    }

    /// Stored series for `request`, without generating anything.
    ///
    /// Malformed rows read as `None`.
    pub fn lookup(&self, request: &PriceRequest) -> Result<Option<PriceSeries>> {
        match self.store.find_series(request)? {
            HistoryLookup::Hit(stored) if self.is_well_formed(&stored.series)? => {
                Ok(Some(stored.series))
            }
            _ => Ok(None),
        }
    }

    fn resolve<F>(&self, request: &PriceRequest, generate: F) -> Result<CachedSeries>
    where
        F: FnOnce() -> Result<PriceSeries>,
    {
        let handle = self.locks.acquire(request);
        let result = {
            // The guarded unit carries no state, so a poisoned lock is still usable
            let _guard = handle.lock().unwrap_or_else(|e| e.into_inner());
            self.resolve_locked(request, generate)
        };
        self.locks.release(request, handle);
        result
    }

    fn resolve_locked<F>(&self, request: &PriceRequest, generate: F) -> Result<CachedSeries>
    where
        F: FnOnce() -> Result<PriceSeries>,
    {
        let mut status = CacheStatus::Generated;

        match self.store.find_series(request)? {
            HistoryLookup::Hit(stored) => {
                if self.is_well_formed(&stored.series)? {
                    debug!(key = ?request, "history hit");
                    return Ok(CachedSeries {
                        series: stored.series,
                        status: CacheStatus::Hit,
                    });
                }
                warn!(
                    key = ?request,
                    len = stored.series.len(),
                    "stored series has the wrong length, regenerating"
                );
                self.store.delete_series(request)?;
                status = CacheStatus::Regenerated;
            }
            HistoryLookup::Malformed(raw) => {
                warn!(key = ?request, raw = %raw, "stored series is malformed, regenerating");
                self.store.delete_series(request)?;
                status = CacheStatus::Regenerated;
            }
            HistoryLookup::Miss => {}
        }

        let generated = generate()?;
        let inserted = self.store.insert_if_absent(&generated)?;
        if inserted {
            info!(key = ?request, len = generated.len(), "persisted new price series");
        } else {
            debug!(key = ?request, "series persisted concurrently, using stored row");
        }

        match self.store.find_series(request)? {
            HistoryLookup::Hit(stored) => Ok(CachedSeries {
                series: stored.series,
                status,
            }),
            _ => Err(PriceDataError::Internal(format!(
                "series for {:?} missing after insert",
                request
            ))),
        }
    }

    fn is_well_formed(&self, series: &PriceSeries) -> Result<bool> {
        Ok(series.len() == self.model.series_len(&series.request)?)
    }
}
