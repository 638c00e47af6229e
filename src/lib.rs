pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod favorites;
pub mod logging;
pub mod reconciler;
pub mod storage;

// Layered boundaries: ports in app, adapters in infra
pub mod app;
pub mod infra;

// Domain data shapes shared across layers
pub mod domain;

pub use catalog::RemoteCatalog;
pub use domain::{CatalogPage, Character, CharacterId, FavoriteSet, LocationRef, SearchQuery};
pub use error::{CatalogError, Result};
pub use favorites::{FavoritesStore, TogglePolicy};
pub use reconciler::{Reconciler, ViewScope};
