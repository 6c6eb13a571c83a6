//! Catalog synchronization: cache-first load and forced refresh.

use log::{debug, warn};

use crate::api::{RemoteCatalog, DEFAULT_LIMIT};
use crate::error::CatalogError;
use crate::model::Pokemon;
use crate::store::CatalogStore;

/// Orchestrates "read cache, else fetch and populate" over an injected
/// remote client and store.
///
/// `load`/`refresh` against the same store are not safe to run
/// concurrently; callers serialize them (the triggering control is
/// disabled while one is in flight).
pub struct CatalogSynchronizer<C, S> {
    remote: C,
    store: S,
}

impl<C: RemoteCatalog, S: CatalogStore> CatalogSynchronizer<C, S> {
    pub fn new(remote: C, store: S) -> Self {
        Self { remote, store }
    }

    /// Serve the cached catalog when the store holds at least one record;
    /// otherwise fetch the default working set, write it through, and
    /// return it. Exactly one of {cache read} or {cache write} happens per
    /// call. The cache is trusted until an explicit [`refresh`] — there is
    /// no freshness check.
    ///
    /// [`refresh`]: CatalogSynchronizer::refresh
    pub async fn load(&self) -> Result<Vec<Pokemon>, CatalogError> {
        let cached = report("cache read", self.store.read_all().await)?;
        if !cached.is_empty() {
            debug!("cache hit: {} records", cached.len());
            return Ok(cached);
        }

        debug!("cache miss, fetching {DEFAULT_LIMIT} records");
        let fetched = report("catalog fetch", self.remote.fetch_list(DEFAULT_LIMIT).await)?;
        report("cache write", self.store.write_all(&fetched).await)?;
        Ok(fetched)
    }

    /// Drop the whole cache, fetch up to `limit` records, and write the new
    /// working set through. Always hits the network, warm cache or not.
    ///
    /// A fetch or write failure after the clear leaves the cache empty
    /// rather than restoring the dropped rows; the next `load` falls back
    /// to the network.
    pub async fn refresh(&self, limit: u32) -> Result<Vec<Pokemon>, CatalogError> {
        report("cache clear", self.store.clear_all().await)?;
        let fetched = report("catalog fetch", self.remote.fetch_list(limit).await)?;
        report("cache write", self.store.write_all(&fetched).await)?;
        Ok(fetched)
    }
}

fn report<T>(stage: &str, result: Result<T, CatalogError>) -> Result<T, CatalogError> {
    if let Err(err) = &result {
        warn!("{stage} failed: {err}");
    }
    result
}
