//! Domain data shapes shared across layers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the remote catalog.
pub type CharacterId = u32;

/// Named reference to an origin or last-known location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A character record as returned by the catalog. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: String,
    #[serde(default)]
    pub origin: LocationRef,
    #[serde(default)]
    pub location: LocationRef,
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

/// One page of the paginated catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub characters: Vec<Character>,
    pub has_more: bool,
}

/// `GET /character?page={n}` body.
#[derive(Debug, Deserialize)]
pub(crate) struct PageResponse {
    pub results: Vec<Character>,
    pub info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageInfo {
    pub next: Option<String>,
}

/// `GET /character/?name={term}` body. The catalog answers a miss with `{"error": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SearchResponse {
    Found { results: Vec<Character> },
    NotFound { error: String },
}

/// Persisted mapping from character id to "is favorite".
///
/// Absent entries read as `false`. Iteration follows insertion order, which is
/// the order the favorites view displays. Serialises as a JSON object keyed by
/// the id as a string, e.g. `{"1":true,"2":false}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    entries: IndexMap<CharacterId, bool>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: CharacterId) -> bool {
        self.entries.get(&id).copied().unwrap_or(false)
    }

    /// Existing keys keep their position; new keys go to the end.
    pub fn set(&mut self, id: CharacterId, favorite: bool) {
        self.entries.insert(id, favorite);
    }

    /// Ids currently marked favorite, in insertion order.
    pub fn favorite_ids(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.entries
            .iter()
            .filter(|(_, favorite)| **favorite)
            .map(|(id, _)| *id)
    }

    /// Number of ids marked favorite.
    pub fn len(&self) -> usize {
        self.favorite_ids().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for FavoriteSet {
    // `{1: false}` and `{}` are the same set
    fn eq(&self, other: &Self) -> bool {
        self.favorite_ids().eq(other.favorite_ids())
    }
}

impl Eq for FavoriteSet {}

impl FromIterator<(CharacterId, bool)> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = (CharacterId, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A search term. The empty term means "no active search".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self(term.into())
    }

    pub fn term(&self) -> &str {
        &self.0
    }

    /// Whitespace-only input counts as empty.
    pub fn is_active(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SearchQuery {
    fn from(term: &str) -> Self {
        Self::new(term)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_character_from_catalog_json() {
        let raw = json!({
            "id": 1,
            "name": "Rick Sanchez",
            "status": "Alive",
            "species": "Human",
            "type": "",
            "gender": "Male",
            "origin": { "name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1" },
            "location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
            "image": "https://rickandmortyapi.com/api/character/avatar/1.jpeg",
            "episode": ["https://rickandmortyapi.com/api/episode/1"],
            "url": "https://rickandmortyapi.com/api/character/1",
            "created": "2017-11-04T18:48:46.250Z"
        });
        let character: Character = serde_json::from_value(raw).unwrap();
        assert_eq!(character.id, 1);
        assert_eq!(character.location.name, "Citadel of Ricks");
        assert_eq!(character.episode.len(), 1);
    }

    #[test]
    fn test_character_missing_required_field_fails() {
        let raw = json!({ "id": 1, "name": "Rick Sanchez" });
        assert!(serde_json::from_value::<Character>(raw).is_err());
    }

    #[test]
    fn test_favorite_set_absent_is_false() {
        let set = FavoriteSet::new();
        assert!(!set.get(42));
        assert!(set.is_empty());
    }

    #[test]
    fn test_favorite_set_json_shape() {
        let mut set = FavoriteSet::new();
        set.set(2, true);
        set.set(1, false);
        set.set(7, true);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"{"2":true,"1":false,"7":true}"#);

        let back: FavoriteSet = serde_json::from_str(r#"{"2":true,"1":false,"7":true}"#).unwrap();
        assert_eq!(back.favorite_ids().collect::<Vec<_>>(), vec![2, 7]);
    }

    #[test]
    fn test_favorite_set_false_entries_do_not_affect_equality() {
        let mut with_false = FavoriteSet::new();
        with_false.set(3, false);
        assert_eq!(with_false, FavoriteSet::new());
    }

    #[test]
    fn test_favorite_set_rejects_non_boolean_values() {
        assert!(serde_json::from_str::<FavoriteSet>(r#"{"1":"yes"}"#).is_err());
        assert!(serde_json::from_str::<FavoriteSet>(r#"{"abc":true}"#).is_err());
    }

    #[test]
    fn test_search_response_variants() {
        let miss: SearchResponse =
            serde_json::from_value(json!({ "error": "There is nothing here" })).unwrap();
        assert!(matches!(miss, SearchResponse::NotFound { .. }));

        let hit: SearchResponse = serde_json::from_value(json!({
            "info": { "count": 1, "pages": 1, "next": null, "prev": null },
            "results": [serde_json::to_value(fixtures::character(1, "Rick Sanchez")).unwrap()]
        }))
        .unwrap();
        assert!(matches!(hit, SearchResponse::Found { results } if results.len() == 1));
    }

    #[test]
    fn test_search_query_activity() {
        assert!(!SearchQuery::default().is_active());
        assert!(!SearchQuery::new("   ").is_active());
        assert!(SearchQuery::from("Rick").is_active());
    }
}
