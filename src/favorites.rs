//! Locally persisted favorites.
//!
//! The store owns the only copy of the [`FavoriteSet`] and rewrites the whole
//! blob after every mutation. Persistence failures are logged and swallowed:
//! the in-memory set stays authoritative for the rest of the session.

use crate::app::ports::KeyValueStore;
use crate::constants::FAVORITES_KEY;
use crate::domain::{CharacterId, FavoriteSet};
use metrics::counter;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// How `toggle` treats an id that is already a favorite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TogglePolicy {
    /// Flip the flag either way.
    #[default]
    Toggle,
    /// Favorites can be added but never removed through `toggle`.
    AddOnly,
}

pub struct FavoritesStore {
    kv: Arc<dyn KeyValueStore>,
    policy: TogglePolicy,
    set: FavoriteSet,
}

impl FavoritesStore {
    /// Open the store and read the persisted set.
    pub fn open(kv: Arc<dyn KeyValueStore>, policy: TogglePolicy) -> Self {
        let set = read_set(kv.as_ref());
        info!("Loaded {} favorites ({:?} policy)", set.len(), policy);
        Self { kv, policy, set }
    }

    /// Re-read the persisted blob. Absent or corrupt data yields an empty set.
    pub fn load(&mut self) -> FavoriteSet {
        self.set = read_set(self.kv.as_ref());
        self.set.clone()
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.set
    }

    pub fn is_favorite(&self, id: CharacterId) -> bool {
        self.set.get(id)
    }

    pub fn policy(&self) -> TogglePolicy {
        self.policy
    }

    /// Flip `id` and persist the full set before returning.
    ///
    /// Under [`TogglePolicy::AddOnly`] toggling an existing favorite changes
    /// nothing and writes nothing.
    pub fn toggle(&mut self, id: CharacterId) -> FavoriteSet {
        let current = self.set.get(id);
        if current && self.policy == TogglePolicy::AddOnly {
            debug!("Character {} already a favorite, add-only policy keeps it", id);
            return self.set.clone();
        }
        self.set.set(id, !current);
        debug!("Character {} favorite -> {}", id, !current);
        self.persist();
        self.set.clone()
    }

    fn persist(&self) {
        let blob = match serde_json::to_string(&self.set) {
            Ok(blob) => blob,
            Err(e) => {
                error!("Failed to serialize favorites: {}", e);
                return;
            }
        };
        if let Err(e) = self.kv.set(FAVORITES_KEY, &blob) {
            counter!("favorites_persist_failures_total").increment(1);
            error!("Failed to save favorites: {}", e);
        }
    }
}

fn read_set(kv: &dyn KeyValueStore) -> FavoriteSet {
    let blob = match kv.get(FAVORITES_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => return FavoriteSet::new(),
        Err(e) => {
            warn!("Failed to load favorites, starting empty: {}", e);
            return FavoriteSet::new();
        }
    };
    serde_json::from_str(&blob).unwrap_or_else(|e| {
        warn!("Ignoring corrupt favorites blob: {}", e);
        FavoriteSet::new()
    })
}
