use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// One creature record in the catalog.
///
/// Equality and hashing are identity-based: two records with the same `id`
/// compare equal even when the remaining fields differ. A record
/// reconstructed from the lossy favorites projection may lag behind the
/// authoritative network copy, and still has to match its cached sibling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Sprite URL; empty for records rebuilt from a projection that
    /// dropped the detail fields.
    pub image_url: String,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
}

/// One named numeric stat of a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub name: String,
    pub base_stat: u32,
}

impl PartialEq for Pokemon {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Pokemon {}

impl Hash for Pokemon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Pokemon {
    /// Display form of the name, capitalized the way the list and battle
    /// screens show it.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn record(id: u32, name: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            image_url: format!("https://sprites.test/{id}.png"),
            types: vec!["grass".to_string()],
            stats: vec![PokemonStat {
                name: "hp".to_string(),
                base_stat: 45,
            }],
        }
    }

    #[test]
    fn equality_is_identity_based() {
        let full = record(1, "bulbasaur");
        let partial = Pokemon {
            id: 1,
            name: "bulbasaur".to_string(),
            image_url: String::new(),
            types: Vec::new(),
            stats: Vec::new(),
        };
        assert_eq!(full, partial);
        assert_ne!(record(1, "bulbasaur"), record(2, "bulbasaur"));
    }

    #[test]
    fn hashing_follows_identity() {
        let mut seen = HashSet::new();
        seen.insert(record(7, "squirtle"));
        let projection = Pokemon {
            id: 7,
            name: "squirtle".to_string(),
            image_url: String::new(),
            types: Vec::new(),
            stats: Vec::new(),
        };
        assert!(seen.contains(&projection));
    }

    #[test]
    fn display_name_capitalizes() {
        assert_eq!(record(4, "charmander").display_name(), "Charmander");
        let empty = Pokemon {
            id: 9,
            name: String::new(),
            image_url: String::new(),
            types: Vec::new(),
            stats: Vec::new(),
        };
        assert_eq!(empty.display_name(), "");
    }
}
