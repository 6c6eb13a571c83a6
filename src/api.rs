//! PokeAPI client: paginated index plus per-record detail fetches.

use async_trait::async_trait;
use log::warn;
use serde::Deserialize;

use crate::error::CatalogError;
use crate::model::{Pokemon, PokemonStat};

pub const API_BASE: &str = "https://pokeapi.co/api/v2/pokemon";

/// Working-set size fetched by a plain `load`.
pub const DEFAULT_LIMIT: u32 = 151;

/// Highest id in the shipped configuration; opponent draws stay inside it.
pub const MAX_POKEMON_ID: u32 = 151;

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    sprites: SpriteSet,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct SpriteSet {
    front_default: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

impl From<PokemonResponse> for Pokemon {
    fn from(response: PokemonResponse) -> Self {
        Pokemon {
            id: response.id,
            name: response.name,
            image_url: response.sprites.front_default.unwrap_or_default(),
            types: response
                .types
                .into_iter()
                .map(|slot| slot.type_info.name)
                .collect(),
            stats: response
                .stats
                .into_iter()
                .map(|slot| PokemonStat {
                    name: slot.stat.name,
                    base_stat: slot.base_stat,
                })
                .collect(),
        }
    }
}

/// Remote source of catalog records.
///
/// Injected into [`crate::sync::CatalogSynchronizer`] so tests can stand in
/// a double for the live API.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Fetch up to `limit` fully-detailed records.
    async fn fetch_list(&self, limit: u32) -> Result<Vec<Pokemon>, CatalogError>;

    /// Fetch one record directly by its numeric id.
    async fn fetch_by_id(&self, id: u32) -> Result<Pokemon, CatalogError>;
}

#[async_trait]
impl<R: RemoteCatalog + ?Sized> RemoteCatalog for std::sync::Arc<R> {
    async fn fetch_list(&self, limit: u32) -> Result<Vec<Pokemon>, CatalogError> {
        (**self).fetch_list(limit).await
    }

    async fn fetch_by_id(&self, id: u32) -> Result<Pokemon, CatalogError> {
        (**self).fetch_by_id(id).await
    }
}

/// HTTP client for the live PokeAPI.
pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    /// Point the client at a different endpoint (test servers, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, CatalogError> {
        let response = self.client.get(url).send().await?;
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch_detail(&self, url: &str) -> Result<Pokemon, CatalogError> {
        let response: PokemonResponse = self.fetch_json(url).await?;
        Ok(response.into())
    }
}

impl Default for PokeApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteCatalog for PokeApiClient {
    async fn fetch_list(&self, limit: u32) -> Result<Vec<Pokemon>, CatalogError> {
        let url = format!("{}?limit={limit}", self.base_url);
        let index: ListResponse = self.fetch_json(&url).await?;

        let mut records = Vec::with_capacity(index.results.len());
        for entry in index.results {
            match self.fetch_detail(&entry.url).await {
                Ok(pokemon) => records.push(pokemon),
                // One bad entry does not fail the whole list; it is dropped
                // for this sync cycle.
                Err(err) => warn!("skipping {}: {err}", entry.name),
            }
        }
        Ok(records)
    }

    async fn fetch_by_id(&self, id: u32) -> Result<Pokemon, CatalogError> {
        let url = format!("{}/{id}", self.base_url);
        self.fetch_detail(&url).await
    }
}
