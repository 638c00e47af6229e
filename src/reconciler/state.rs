//! Pure list state machine.
//!
//! `ListState::apply` takes an event and returns the next state plus at most
//! one [`Effect`] for the driver to execute. Every effect carries a ticket;
//! the response event must quote it back and is dropped unless it matches the
//! request still pending for that kind. That single rule gives the in-flight
//! pagination guard, abandons pagination when a search starts, and fences
//! stale search and favorites responses.

use crate::constants::FIRST_PAGE;
use crate::domain::{CatalogPage, Character, CharacterId, FavoriteSet, SearchQuery};
use tracing::debug;

/// Which screen the list backs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewScope {
    /// Whole catalog, paginated.
    #[default]
    Browse,
    /// Only characters marked favorite.
    Favorites,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Nothing requested yet, or nothing to show.
    #[default]
    Idle,
    /// No search term; paginated catalog or the favorites list.
    Browsing,
    /// Non-empty search term.
    Searching,
}

pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage { ticket: Ticket, page: u32 },
    Search { ticket: Ticket, term: String },
    FetchFavorites { ticket: Ticket, ids: Vec<CharacterId> },
}

impl Effect {
    pub fn ticket(&self) -> Ticket {
        match self {
            Effect::FetchPage { ticket, .. }
            | Effect::Search { ticket, .. }
            | Effect::FetchFavorites { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ListEvent {
    /// Scroll reached the end of the list.
    LoadMore,
    PageLoaded { ticket: Ticket, page: CatalogPage },
    PageFailed { ticket: Ticket },
    /// New search input. An inactive query behaves like `SearchCleared`.
    SearchChanged(SearchQuery),
    SearchCleared,
    SearchResolved { ticket: Ticket, results: Vec<Character> },
    SearchFailed { ticket: Ticket },
    FavoritesChanged(FavoriteSet),
    FavoritesResolved { ticket: Ticket, characters: Vec<Character> },
    FavoritesFailed { ticket: Ticket },
    Select(CharacterId),
    Deselect,
}

/// One row ready for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayItem<'a> {
    pub character: &'a Character,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ListState {
    scope: ViewScope,
    mode: Mode,
    query: SearchQuery,
    items: Vec<Character>,
    favorites: FavoriteSet,
    next_page: u32,
    has_more: bool,
    last_ticket: Ticket,
    pending_page: Option<Ticket>,
    pending_search: Option<Ticket>,
    pending_favorites: Option<Ticket>,
    selected: Option<Character>,
}

impl ListState {
    pub fn new(scope: ViewScope, favorites: FavoriteSet) -> Self {
        Self {
            scope,
            favorites,
            next_page: FIRST_PAGE,
            has_more: true,
            ..Self::default()
        }
    }

    pub fn scope(&self) -> ViewScope {
        self.scope
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn items(&self) -> &[Character] {
        &self.items
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    /// Page number the next `LoadMore` will request.
    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn page_in_flight(&self) -> bool {
        self.pending_page.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_page.is_some()
            || self.pending_search.is_some()
            || self.pending_favorites.is_some()
    }

    /// A finished search that matched nothing.
    pub fn is_empty_search(&self) -> bool {
        self.mode == Mode::Searching && self.pending_search.is_none() && self.items.is_empty()
    }

    pub fn selected(&self) -> Option<&Character> {
        self.selected.as_ref()
    }

    pub fn display(&self) -> Vec<DisplayItem<'_>> {
        self.items
            .iter()
            .map(|character| DisplayItem {
                character,
                is_favorite: self.favorites.get(character.id),
            })
            .collect()
    }

    fn issue(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.last_ticket
    }

    pub fn apply(mut self, event: ListEvent) -> (Self, Option<Effect>) {
        let effect = match event {
            ListEvent::LoadMore => self.on_load_more(),
            ListEvent::PageLoaded { ticket, page } => {
                self.on_page_loaded(ticket, page);
                None
            }
            ListEvent::PageFailed { ticket } => {
                if self.pending_page == Some(ticket) {
                    // cursor and has_more untouched so the same page can be retried
                    self.pending_page = None;
                    debug!("Page {} failed, retry allowed", self.next_page);
                }
                None
            }
            ListEvent::SearchChanged(query) if !query.is_active() => self.on_search_cleared(),
            ListEvent::SearchChanged(query) => self.on_search_changed(query),
            ListEvent::SearchCleared => self.on_search_cleared(),
            ListEvent::SearchResolved { ticket, results } => {
                self.on_search_resolved(ticket, results);
                None
            }
            ListEvent::SearchFailed { ticket } => {
                if self.pending_search == Some(ticket) {
                    self.pending_search = None;
                    self.items.clear();
                }
                None
            }
            ListEvent::FavoritesChanged(favorites) => self.on_favorites_changed(favorites),
            ListEvent::FavoritesResolved { ticket, characters } => {
                self.on_favorites_resolved(ticket, characters);
                None
            }
            ListEvent::FavoritesFailed { ticket } => {
                if self.pending_favorites == Some(ticket) {
                    // previous list stays on screen
                    self.pending_favorites = None;
                }
                None
            }
            ListEvent::Select(id) => {
                if let Some(found) = self.items.iter().find(|c| c.id == id) {
                    self.selected = Some(found.clone());
                }
                None
            }
            ListEvent::Deselect => {
                self.selected = None;
                None
            }
        };
        (self, effect)
    }

    fn on_load_more(&mut self) -> Option<Effect> {
        if self.scope != ViewScope::Browse || self.mode == Mode::Searching {
            return None;
        }
        if self.pending_page.is_some() || !self.has_more {
            return None;
        }
        let ticket = self.issue();
        self.pending_page = Some(ticket);
        self.mode = Mode::Browsing;
        Some(Effect::FetchPage {
            ticket,
            page: self.next_page,
        })
    }

    fn on_page_loaded(&mut self, ticket: Ticket, page: CatalogPage) {
        if self.pending_page != Some(ticket) {
            debug!("Dropping stale page response (ticket {})", ticket);
            return;
        }
        self.pending_page = None;
        self.items.extend(page.characters);
        self.next_page += 1;
        self.has_more = page.has_more;
    }

    fn on_search_changed(&mut self, query: SearchQuery) -> Option<Effect> {
        let ticket = self.issue();
        let term = query.term().trim().to_string();
        self.query = query;
        self.mode = Mode::Searching;
        self.pending_page = None;
        self.pending_favorites = None;
        self.pending_search = Some(ticket);
        Some(Effect::Search { ticket, term })
    }

    fn on_search_resolved(&mut self, ticket: Ticket, results: Vec<Character>) {
        if self.pending_search != Some(ticket) {
            debug!("Dropping stale search response (ticket {})", ticket);
            return;
        }
        self.pending_search = None;
        self.items = match self.scope {
            ViewScope::Browse => results,
            ViewScope::Favorites => results
                .into_iter()
                .filter(|c| self.favorites.get(c.id))
                .collect(),
        };
    }

    fn on_search_cleared(&mut self) -> Option<Effect> {
        self.query = SearchQuery::default();
        self.pending_search = None;
        match self.scope {
            ViewScope::Browse => {
                self.items.clear();
                self.next_page = FIRST_PAGE;
                self.has_more = true;
                self.pending_page = None;
                self.mode = Mode::Idle;
                self.on_load_more()
            }
            ViewScope::Favorites => self.refresh_favorites(),
        }
    }

    fn on_favorites_changed(&mut self, favorites: FavoriteSet) -> Option<Effect> {
        self.favorites = favorites;
        if self.scope != ViewScope::Favorites {
            return None;
        }
        // drop un-favorited rows now rather than after the refetch
        let favorites = &self.favorites;
        self.items.retain(|c| favorites.get(c.id));
        if self.mode == Mode::Searching {
            return None;
        }
        self.refresh_favorites()
    }

    fn refresh_favorites(&mut self) -> Option<Effect> {
        let ids: Vec<CharacterId> = self.favorites.favorite_ids().collect();
        if ids.is_empty() {
            self.items.clear();
            self.pending_favorites = None;
            self.mode = Mode::Idle;
            return None;
        }
        let ticket = self.issue();
        self.pending_favorites = Some(ticket);
        self.mode = Mode::Browsing;
        Some(Effect::FetchFavorites { ticket, ids })
    }

    fn on_favorites_resolved(&mut self, ticket: Ticket, characters: Vec<Character>) {
        if self.pending_favorites != Some(ticket) {
            debug!("Dropping stale favorites response (ticket {})", ticket);
            return;
        }
        self.pending_favorites = None;
        let favorites = &self.favorites;
        self.items = characters
            .into_iter()
            .filter(|c| favorites.get(c.id))
            .collect();
    }
}

/// Free-function form of [`ListState::apply`].
pub fn transition(state: ListState, event: ListEvent) -> (ListState, Option<Effect>) {
    state.apply(event)
}
