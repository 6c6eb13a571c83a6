//! Local catalog store: nested cache rows plus the flat favorites table.
//!
//! The cache keeps one parent row per record and one child row per type and
//! per stat, each child carrying the parent id. Children are owned by their
//! parent and go away with it. Favorites are an independent table holding a
//! lossy `{id, name, image_url}` projection.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::CatalogError;
use crate::model::{Pokemon, PokemonStat};

/// Parent row of the catalog cache.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RecordRow {
    id: u32,
    name: String,
    image_url: String,
}

/// Child row: one type tag, keyed to its parent record.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TypeRow {
    pokemon_id: u32,
    slot: u32,
    name: String,
}

/// Child row: one named stat, keyed to its parent record.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StatRow {
    pokemon_id: u32,
    slot: u32,
    name: String,
    base_stat: u32,
}

/// Flat favorites row — the lossy projection persisted by
/// [`crate::favorites::FavoritesRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRow {
    pub id: u32,
    pub name: String,
    pub image_url: String,
}

impl FavoriteRow {
    pub fn from_record(pokemon: &Pokemon) -> Self {
        Self {
            id: pokemon.id,
            name: pokemon.name.clone(),
            image_url: pokemon.image_url.clone(),
        }
    }

    /// Rebuild a record from the projection; types and stats are gone.
    pub fn into_record(self) -> Pokemon {
        Pokemon {
            id: self.id,
            name: self.name,
            image_url: self.image_url,
            types: Vec::new(),
            stats: Vec::new(),
        }
    }
}

/// Persistence seam for the catalog cache and the favorites table.
///
/// Injected into the synchronizer and the favorites registry so tests can
/// substitute [`MemoryCatalogStore`] or a failing double.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist every record as one parent row plus its child rows. No
    /// de-duplication against existing rows; clear first when replacing.
    async fn write_all(&self, records: &[Pokemon]) -> Result<(), CatalogError>;

    /// Reconstruct all cached records. A record with no child rows comes
    /// back with empty `types`/`stats`, never as an error.
    async fn read_all(&self) -> Result<Vec<Pokemon>, CatalogError>;

    /// Delete every parent row and all cascading children. Favorites are
    /// untouched.
    async fn clear_all(&self) -> Result<(), CatalogError>;

    async fn insert_favorite(&self, row: FavoriteRow) -> Result<(), CatalogError>;

    /// Delete all favorite rows matching `id`; zero matches is fine.
    async fn remove_favorite(&self, id: u32) -> Result<(), CatalogError>;

    async fn read_favorites(&self) -> Result<Vec<FavoriteRow>, CatalogError>;
}

#[async_trait]
impl<S: CatalogStore + ?Sized> CatalogStore for Arc<S> {
    async fn write_all(&self, records: &[Pokemon]) -> Result<(), CatalogError> {
        (**self).write_all(records).await
    }

    async fn read_all(&self) -> Result<Vec<Pokemon>, CatalogError> {
        (**self).read_all().await
    }

    async fn clear_all(&self) -> Result<(), CatalogError> {
        (**self).clear_all().await
    }

    async fn insert_favorite(&self, row: FavoriteRow) -> Result<(), CatalogError> {
        (**self).insert_favorite(row).await
    }

    async fn remove_favorite(&self, id: u32) -> Result<(), CatalogError> {
        (**self).remove_favorite(id).await
    }

    async fn read_favorites(&self) -> Result<Vec<FavoriteRow>, CatalogError> {
        (**self).read_favorites().await
    }
}

/// File-backed store: one directory per parent record, child rows as JSON
/// files inside it, favorites as flat files. Removing the parent directory
/// removes its children with it, so a crash mid-write never leaves orphaned
/// children visible to a later read of a cleared cache.
pub struct FsCatalogStore {
    root: PathBuf,
}

impl FsCatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn catalog_dir(&self) -> PathBuf {
        self.root.join("catalog")
    }

    fn record_dir(&self, id: u32) -> PathBuf {
        self.catalog_dir().join(id.to_string())
    }

    fn favorites_dir(&self) -> PathBuf {
        self.root.join("favorites")
    }
}

async fn write_json<T: Serialize>(path: &Path, row: &T) -> Result<(), CatalogError> {
    let bytes = serde_json::to_vec(row)?;
    fs::write(path, bytes).await?;
    Ok(())
}

/// Read and decode every file in `dir`; a missing directory is an empty
/// table, not an error.
async fn read_json_rows<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, CatalogError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut rows = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let bytes = fs::read(entry.path()).await?;
        rows.push(serde_json::from_slice(&bytes)?);
    }
    Ok(rows)
}

#[async_trait]
impl CatalogStore for FsCatalogStore {
    async fn write_all(&self, records: &[Pokemon]) -> Result<(), CatalogError> {
        for record in records {
            let dir = self.record_dir(record.id);
            let types_dir = dir.join("types");
            let stats_dir = dir.join("stats");
            fs::create_dir_all(&types_dir).await?;
            fs::create_dir_all(&stats_dir).await?;

            let parent = RecordRow {
                id: record.id,
                name: record.name.clone(),
                image_url: record.image_url.clone(),
            };
            write_json(&dir.join("record.json"), &parent).await?;

            for (slot, name) in record.types.iter().enumerate() {
                let row = TypeRow {
                    pokemon_id: record.id,
                    slot: slot as u32,
                    name: name.clone(),
                };
                write_json(&types_dir.join(format!("{slot}.json")), &row).await?;
            }
            for (slot, stat) in record.stats.iter().enumerate() {
                let row = StatRow {
                    pokemon_id: record.id,
                    slot: slot as u32,
                    name: stat.name.clone(),
                    base_stat: stat.base_stat,
                };
                write_json(&stats_dir.join(format!("{slot}.json")), &row).await?;
            }
        }
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Pokemon>, CatalogError> {
        let mut entries = match fs::read_dir(self.catalog_dir()).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let dir = entry.path();
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let parent: RecordRow = match fs::read(dir.join("record.json")).await {
                Ok(bytes) => serde_json::from_slice(&bytes)?,
                // A directory without its parent row is a torn write; the
                // record never finished landing, so it is not in the cache.
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };

            let mut type_rows: Vec<TypeRow> = read_json_rows(&dir.join("types")).await?;
            type_rows.sort_by_key(|row| row.slot);
            let mut stat_rows: Vec<StatRow> = read_json_rows(&dir.join("stats")).await?;
            stat_rows.sort_by_key(|row| row.slot);

            records.push(Pokemon {
                id: parent.id,
                name: parent.name,
                image_url: parent.image_url,
                types: type_rows.into_iter().map(|row| row.name).collect(),
                stats: stat_rows
                    .into_iter()
                    .map(|row| PokemonStat {
                        name: row.name,
                        base_stat: row.base_stat,
                    })
                    .collect(),
            });
        }
        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    async fn clear_all(&self) -> Result<(), CatalogError> {
        match fs::remove_dir_all(self.catalog_dir()).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn insert_favorite(&self, row: FavoriteRow) -> Result<(), CatalogError> {
        let dir = self.favorites_dir();
        fs::create_dir_all(&dir).await?;
        write_json(&dir.join(format!("{}.json", row.id)), &row).await
    }

    async fn remove_favorite(&self, id: u32) -> Result<(), CatalogError> {
        match fs::remove_file(self.favorites_dir().join(format!("{id}.json"))).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn read_favorites(&self) -> Result<Vec<FavoriteRow>, CatalogError> {
        let mut rows: Vec<FavoriteRow> = read_json_rows(&self.favorites_dir()).await?;
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }
}

#[derive(Default)]
struct MemoryTables {
    records: Vec<RecordRow>,
    types: Vec<TypeRow>,
    stats: Vec<StatRow>,
    favorites: Vec<FavoriteRow>,
}

/// In-memory backend with the same row layout as [`FsCatalogStore`]. Used
/// as the store double in tests and for ephemeral previews.
#[derive(Default)]
pub struct MemoryCatalogStore {
    tables: Mutex<MemoryTables>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryTables>, CatalogError> {
        self.tables
            .lock()
            .map_err(|_| io::Error::other("store mutex poisoned").into())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn write_all(&self, records: &[Pokemon]) -> Result<(), CatalogError> {
        let mut tables = self.lock()?;
        for record in records {
            tables.records.push(RecordRow {
                id: record.id,
                name: record.name.clone(),
                image_url: record.image_url.clone(),
            });
            for (slot, name) in record.types.iter().enumerate() {
                tables.types.push(TypeRow {
                    pokemon_id: record.id,
                    slot: slot as u32,
                    name: name.clone(),
                });
            }
            for (slot, stat) in record.stats.iter().enumerate() {
                tables.stats.push(StatRow {
                    pokemon_id: record.id,
                    slot: slot as u32,
                    name: stat.name.clone(),
                    base_stat: stat.base_stat,
                });
            }
        }
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Pokemon>, CatalogError> {
        let tables = self.lock()?;
        let mut records: Vec<Pokemon> = tables
            .records
            .iter()
            .map(|parent| {
                let mut type_rows: Vec<&TypeRow> = tables
                    .types
                    .iter()
                    .filter(|row| row.pokemon_id == parent.id)
                    .collect();
                type_rows.sort_by_key(|row| row.slot);
                let mut stat_rows: Vec<&StatRow> = tables
                    .stats
                    .iter()
                    .filter(|row| row.pokemon_id == parent.id)
                    .collect();
                stat_rows.sort_by_key(|row| row.slot);

                Pokemon {
                    id: parent.id,
                    name: parent.name.clone(),
                    image_url: parent.image_url.clone(),
                    types: type_rows.into_iter().map(|row| row.name.clone()).collect(),
                    stats: stat_rows
                        .into_iter()
                        .map(|row| PokemonStat {
                            name: row.name.clone(),
                            base_stat: row.base_stat,
                        })
                        .collect(),
                }
            })
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    async fn clear_all(&self) -> Result<(), CatalogError> {
        let mut tables = self.lock()?;
        tables.records.clear();
        tables.types.clear();
        tables.stats.clear();
        Ok(())
    }

    async fn insert_favorite(&self, row: FavoriteRow) -> Result<(), CatalogError> {
        self.lock()?.favorites.push(row);
        Ok(())
    }

    async fn remove_favorite(&self, id: u32) -> Result<(), CatalogError> {
        self.lock()?.favorites.retain(|row| row.id != id);
        Ok(())
    }

    async fn read_favorites(&self) -> Result<Vec<FavoriteRow>, CatalogError> {
        let mut rows = self.lock()?.favorites.clone();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }
}
