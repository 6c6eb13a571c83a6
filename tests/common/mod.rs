//! Shared doubles for the integration tests: a scripted remote catalog and
//! a store whose writes can be made to fail.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use pokedex::error::CatalogError;
use pokedex::model::{Pokemon, PokemonStat};
use pokedex::store::{CatalogStore, FavoriteRow, MemoryCatalogStore};
use pokedex::RemoteCatalog;

/// Deterministic fake record for id `id`.
pub fn sample_record(id: u32) -> Pokemon {
    Pokemon {
        id,
        name: format!("specimen-{id}"),
        image_url: format!("https://sprites.test/{id}.png"),
        types: vec!["normal".to_string()],
        stats: vec![
            PokemonStat {
                name: "hp".to_string(),
                base_stat: 30 + id % 50,
            },
            PokemonStat {
                name: "attack".to_string(),
                base_stat: 40 + id % 30,
            },
        ],
    }
}

/// Remote double serving ids `1..=universe`, counting list calls and
/// failing on demand.
pub struct MockRemote {
    pub universe: u32,
    pub list_calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl MockRemote {
    pub fn with_universe(universe: u32) -> Self {
        Self {
            universe,
            list_calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn failure() -> CatalogError {
        // A synthesized shape mismatch stands in for any remote failure.
        match serde_json::from_str::<serde_json::Value>("") {
            Ok(_) => unreachable!("empty body never decodes"),
            Err(err) => CatalogError::Decode(err),
        }
    }
}

#[async_trait]
impl RemoteCatalog for MockRemote {
    async fn fetch_list(&self, limit: u32) -> Result<Vec<Pokemon>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok((1..=self.universe.min(limit)).map(sample_record).collect())
    }

    async fn fetch_by_id(&self, id: u32) -> Result<Pokemon, CatalogError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok(sample_record(id))
    }
}

/// Store double delegating to [`MemoryCatalogStore`], with catalog writes
/// that fail while the flag is set.
pub struct FlakyStore {
    pub inner: MemoryCatalogStore,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryCatalogStore::new(),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_failing_writes(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for FlakyStore {
    async fn write_all(&self, records: &[Pokemon]) -> Result<(), CatalogError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("disk full").into());
        }
        self.inner.write_all(records).await
    }

    async fn read_all(&self) -> Result<Vec<Pokemon>, CatalogError> {
        self.inner.read_all().await
    }

    async fn clear_all(&self) -> Result<(), CatalogError> {
        self.inner.clear_all().await
    }

    async fn insert_favorite(&self, row: FavoriteRow) -> Result<(), CatalogError> {
        self.inner.insert_favorite(row).await
    }

    async fn remove_favorite(&self, id: u32) -> Result<(), CatalogError> {
        self.inner.remove_favorite(id).await
    }

    async fn read_favorites(&self) -> Result<Vec<FavoriteRow>, CatalogError> {
        self.inner.read_favorites().await
    }
}
