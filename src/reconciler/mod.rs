//! Merges catalog results with favorites into the list a screen displays.

pub mod debounce;
pub mod state;

pub use debounce::{DebouncedSearch, Debouncer};
pub use state::{transition, DisplayItem, Effect, ListEvent, ListState, Mode, Ticket, ViewScope};

use crate::app::ports::CatalogPort;
use crate::domain::{CharacterId, FavoriteSet, SearchQuery};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Executes state-machine effects against the catalog, one at a time.
pub struct Reconciler {
    catalog: Arc<dyn CatalogPort>,
    state: ListState,
}

impl Reconciler {
    pub fn new(catalog: Arc<dyn CatalogPort>, scope: ViewScope, favorites: FavoriteSet) -> Self {
        Self {
            catalog,
            state: ListState::new(scope, favorites),
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn catalog(&self) -> Arc<dyn CatalogPort> {
        self.catalog.clone()
    }

    /// Apply one event without running the resulting effect.
    pub fn dispatch(&mut self, event: ListEvent) -> Option<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effect) = state.apply(event);
        self.state = state;
        effect
    }

    /// Apply an event and run whatever it triggers until the state settles.
    pub async fn handle(&mut self, event: ListEvent) {
        let mut next = self.dispatch(event);
        while let Some(effect) = next {
            let outcome = perform(self.catalog.as_ref(), effect).await;
            next = self.dispatch(outcome);
        }
    }

    /// Start the screen: first catalog page, or the favorites list.
    pub async fn start(&mut self) {
        match self.state.scope() {
            ViewScope::Browse => self.load_more().await,
            ViewScope::Favorites => {
                let favorites = self.state.favorites().clone();
                self.favorites_changed(favorites).await
            }
        }
    }

    pub async fn load_more(&mut self) {
        self.handle(ListEvent::LoadMore).await
    }

    pub async fn search(&mut self, term: &str) {
        self.handle(ListEvent::SearchChanged(SearchQuery::new(term))).await
    }

    pub async fn clear_search(&mut self) {
        self.handle(ListEvent::SearchCleared).await
    }

    pub async fn favorites_changed(&mut self, favorites: FavoriteSet) {
        self.handle(ListEvent::FavoritesChanged(favorites)).await
    }

    pub fn select(&mut self, id: CharacterId) {
        self.dispatch(ListEvent::Select(id));
    }

    pub fn deselect(&mut self) {
        self.dispatch(ListEvent::Deselect);
    }
}

/// Run one effect and turn its outcome into the event that reports it.
///
/// Failures never escape: they become the matching `*Failed` event.
#[instrument(skip(catalog))]
pub async fn perform(catalog: &dyn CatalogPort, effect: Effect) -> ListEvent {
    match effect {
        Effect::FetchPage { ticket, page } => match catalog.fetch_page(page).await {
            Ok(page) => ListEvent::PageLoaded { ticket, page },
            Err(e) => {
                warn!("Failed to load page: {}", e);
                ListEvent::PageFailed { ticket }
            }
        },
        Effect::Search { ticket, term } => match catalog.search_by_name(&term).await {
            Ok(results) => ListEvent::SearchResolved { ticket, results },
            Err(e) => {
                warn!("Search for '{}' failed: {}", term, e);
                ListEvent::SearchFailed { ticket }
            }
        },
        Effect::FetchFavorites { ticket, ids } => {
            debug!("Fetching {} favorite characters", ids.len());
            // all-or-nothing: one failed id fails the batch
            let fetches = ids.iter().map(|id| catalog.fetch_character(*id));
            match try_join_all(fetches).await {
                Ok(characters) => ListEvent::FavoritesResolved { ticket, characters },
                Err(e) => {
                    warn!("Failed to load favorite characters: {}", e);
                    ListEvent::FavoritesFailed { ticket }
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use crate::app::ports::CatalogPort;
    use crate::domain::{CatalogPage, Character, CharacterId};
    use crate::error::{CatalogError, Result};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Page(u32),
        Search(String),
        Character(CharacterId),
    }

    /// Scripted catalog that records every call.
    #[derive(Default)]
    pub struct MockCatalog {
        pub pages: Mutex<HashMap<u32, VecDeque<Result<CatalogPage>>>>,
        pub searches: Mutex<HashMap<String, Vec<Character>>>,
        pub characters: Mutex<HashMap<CharacterId, Character>>,
        pub calls: Mutex<Vec<Call>>,
    }

    fn offline() -> CatalogError {
        CatalogError::Network {
            status: None,
            message: "simulated network error".to_string(),
        }
    }

    impl MockCatalog {
        pub fn page(self, page: u32, result: Result<CatalogPage>) -> Self {
            self.pages.lock().unwrap().entry(page).or_default().push_back(result);
            self
        }

        pub fn search(self, term: &str, results: Vec<Character>) -> Self {
            self.searches.lock().unwrap().insert(term.to_string(), results);
            self
        }

        pub fn character(self, character: Character) -> Self {
            self.characters.lock().unwrap().insert(character.id, character);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogPort for MockCatalog {
        async fn fetch_page(&self, page: u32) -> Result<CatalogPage> {
            self.calls.lock().unwrap().push(Call::Page(page));
            self.pages
                .lock()
                .unwrap()
                .get_mut(&page)
                .and_then(|queue| queue.pop_front())
                .unwrap_or_else(|| Err(offline()))
        }

        async fn search_by_name(&self, term: &str) -> Result<Vec<Character>> {
            self.calls.lock().unwrap().push(Call::Search(term.to_string()));
            self.searches.lock().unwrap().get(term).cloned().ok_or_else(offline)
        }

        async fn fetch_character(&self, id: CharacterId) -> Result<Character> {
            self.calls.lock().unwrap().push(Call::Character(id));
            self.characters.lock().unwrap().get(&id).cloned().ok_or_else(offline)
        }
    }
}
