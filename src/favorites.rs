//! Favorites registry: CRUD over the favorites table with an observable
//! membership set.

use tokio::sync::watch;

use crate::error::CatalogError;
use crate::model::Pokemon;
use crate::store::{CatalogStore, FavoriteRow};

/// Favorites CRUD backed by an injected store.
///
/// Membership checks run against an in-memory projection of the favorite
/// rows, re-read from the store after every mutation. Mutations take
/// `&mut self`, which serializes add/remove and keeps duplicate rows out.
pub struct FavoritesRegistry<S> {
    store: S,
    entries: Vec<FavoriteRow>,
    changes: watch::Sender<Vec<Pokemon>>,
}

impl<S: CatalogStore> FavoritesRegistry<S> {
    /// Open the registry over `store`, loading the current projection.
    pub async fn open(store: S) -> Result<Self, CatalogError> {
        let entries = store.read_favorites().await?;
        let (changes, _) = watch::channel(project(&entries));
        Ok(Self {
            store,
            entries,
            changes,
        })
    }

    /// Persist the lossy projection of `pokemon`. Adding an id that is
    /// already a favorite is a no-op, so a later single remove fully clears
    /// membership.
    pub async fn add(&mut self, pokemon: &Pokemon) -> Result<(), CatalogError> {
        if self.is_favorite(pokemon.id) {
            return Ok(());
        }
        self.store
            .insert_favorite(FavoriteRow::from_record(pokemon))
            .await?;
        self.reload().await
    }

    /// Delete all favorite rows matching `id`; zero matches is fine.
    pub async fn remove(&mut self, id: u32) -> Result<(), CatalogError> {
        self.store.remove_favorite(id).await?;
        self.reload().await
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.entries.iter().any(|row| row.id == id)
    }

    /// Favorites reconstructed as records; `types` and `stats` come back
    /// empty because the projection never stored them.
    pub fn list(&self) -> Vec<Pokemon> {
        project(&self.entries)
    }

    /// Push-on-change view of the favorites set for UI binding. A new
    /// snapshot is published after every successful add/remove.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Pokemon>> {
        self.changes.subscribe()
    }

    async fn reload(&mut self) -> Result<(), CatalogError> {
        self.entries = self.store.read_favorites().await?;
        self.changes.send_replace(project(&self.entries));
        Ok(())
    }
}

fn project(rows: &[FavoriteRow]) -> Vec<Pokemon> {
    rows.iter().cloned().map(FavoriteRow::into_record).collect()
}
