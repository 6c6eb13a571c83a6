//! Pokedex catalog core
//!
//! Catalog synchronization against the public PokeAPI, a persisted offline
//! cache, a favorites registry, and the battle/quiz minigame logic. UI
//! concerns live in the surrounding application; it calls in through
//! [`CatalogSynchronizer`], [`FavoritesRegistry`], and the `battle`/`quiz`
//! modules.

pub mod api;
pub mod battle;
pub mod error;
pub mod favorites;
pub mod model;
pub mod quiz;
pub mod store;
pub mod sync;

pub use api::{PokeApiClient, RemoteCatalog, DEFAULT_LIMIT, MAX_POKEMON_ID};
pub use error::CatalogError;
pub use favorites::FavoritesRegistry;
pub use model::{Pokemon, PokemonStat};
pub use store::{CatalogStore, FsCatalogStore, MemoryCatalogStore};
pub use sync::CatalogSynchronizer;
