use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::{ApiError, ContentApi, SearchQuery};
use crate::projection::{AttractionProjector, AttractionViewModel};
use crate::saved::SavedItemsRegistry;

// Orchestrator for the discovery flows: category browsing, the curated home
// rails, and the single-attraction detail view. All mutable application
// state lives here; presentation reads it through cloned snapshots and
// mutates it only through the operations below.

// Curated keyword rails shown on the home screen.
pub const FEATURED_KEYWORD: &str = "beach";
pub const EXPLORE_KEYWORD: &str = "adventure";
pub const RAIL_RESULT_LIMIT: u32 = 4;

const RAIL_DESCRIPTION_WORDS: usize = 10;
const GRID_DESCRIPTION_WORDS: usize = 20;

/// Where the browser is in its lifecycle. There is no terminal state; the
/// browser lives for the application session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserPhase {
    Uninitialized,
    CategoriesLoaded,
    CategorySelected,
}

impl Default for BrowserPhase {
    fn default() -> Self {
        BrowserPhase::Uninitialized
    }
}

/// Read-only copy of the browser's application state, handed to the
/// presentation layer. Superseded wholesale by the next snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowserSnapshot {
    pub phase: BrowserPhase,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub attractions: Vec<AttractionViewModel>,
    pub featured: Vec<AttractionViewModel>,
    pub explore: Vec<AttractionViewModel>,
    pub detail: Option<AttractionViewModel>,
    pub detail_loading: bool,
    pub logged_in: bool,
}

// One logical fetch target. Issuing a token supersedes every earlier fetch
// for the slot; a response may only commit while its token is still the
// latest, so a slow stale response can never overwrite a newer one.
#[derive(Debug, Default)]
struct FetchSlot {
    issued: AtomicU64,
}

impl FetchSlot {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == token
    }
}

pub struct CategoryBrowser {
    api: Arc<dyn ContentApi>,
    saved: SavedItemsRegistry,
    state: Mutex<BrowserSnapshot>,
    categories_slot: FetchSlot,
    list_slot: FetchSlot,
    detail_slot: FetchSlot,
    featured_slot: FetchSlot,
    explore_slot: FetchSlot,
    grid_projector: AttractionProjector,
    rail_projector: AttractionProjector,
    detail_projector: AttractionProjector,
}

impl CategoryBrowser {
    pub fn new(api: Arc<dyn ContentApi>) -> Self {
        Self {
            api,
            saved: SavedItemsRegistry::new(),
            state: Mutex::new(BrowserSnapshot::default()),
            categories_slot: FetchSlot::default(),
            list_slot: FetchSlot::default(),
            detail_slot: FetchSlot::default(),
            featured_slot: FetchSlot::default(),
            explore_slot: FetchSlot::default(),
            grid_projector: AttractionProjector::with_word_limit(GRID_DESCRIPTION_WORDS),
            rail_projector: AttractionProjector::with_word_limit(RAIL_DESCRIPTION_WORDS),
            detail_projector: AttractionProjector::new(),
        }
    }

    pub fn snapshot(&self) -> BrowserSnapshot {
        self.state.lock().clone()
    }

    pub fn saved(&self) -> &SavedItemsRegistry {
        &self.saved
    }

    /// Flips the session's login flag and returns the new value. This is
    /// the whole of authentication here.
    pub fn toggle_login(&self) -> bool {
        let mut state = self.state.lock();
        state.logged_in = !state.logged_in;
        state.logged_in
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.lock().logged_in
    }

    /// Fetches the category-name list. On the first success the browser
    /// moves out of Uninitialized; reloading later re-affirms whatever
    /// phase it is in. On failure every slot keeps its previous value.
    pub async fn load_categories(&self) -> Result<(), ApiError> {
        let token = self.categories_slot.issue();
        match self.api.fetch_categories().await {
            Ok(categories) => {
                if self.categories_slot.is_current(token) {
                    let mut state = self.state.lock();
                    state.categories = categories;
                    if state.phase == BrowserPhase::Uninitialized {
                        state.phase = BrowserPhase::CategoriesLoaded;
                    }
                } else {
                    tracing::debug!("discarding stale category list response");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch category list");
                Err(err)
            }
        }
    }

    /// Keyword-searches the selected category and replaces the attraction
    /// list with projections of the results. Selection and list commit
    /// together, so a failed fetch leaves both as they were.
    pub async fn select_category(&self, name: &str) -> Result<(), ApiError> {
        let token = self.list_slot.issue();
        let query = SearchQuery::keyword(name);
        match self.api.search_attractions(&query).await {
            Ok(records) => {
                let attractions: Vec<AttractionViewModel> = records
                    .iter()
                    .map(|record| self.grid_projector.project(record))
                    .collect();
                if self.list_slot.is_current(token) {
                    let mut state = self.state.lock();
                    state.selected_category = Some(name.to_string());
                    state.attractions = attractions;
                    state.phase = BrowserPhase::CategorySelected;
                } else {
                    tracing::debug!(category = name, "discarding stale attraction list");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(category = name, error = %err, "failed to fetch attractions");
                Err(err)
            }
        }
    }

    /// Fetches one attraction by uuid into the detail slot, untruncated.
    /// A search that returns no record commits an empty detail rather than
    /// erroring.
    pub async fn load_attraction(&self, id: &str) -> Result<(), ApiError> {
        let token = self.detail_slot.issue();
        self.state.lock().detail_loading = true;

        let query = SearchQuery::uuids(&[id]);
        match self.api.search_attractions(&query).await {
            Ok(records) => {
                let detail = records
                    .first()
                    .map(|record| self.detail_projector.project(record));
                if self.detail_slot.is_current(token) {
                    let mut state = self.state.lock();
                    state.detail = detail;
                    state.detail_loading = false;
                } else {
                    tracing::debug!(uuid = id, "discarding stale detail response");
                }
                Ok(())
            }
            Err(err) => {
                if self.detail_slot.is_current(token) {
                    self.state.lock().detail_loading = false;
                }
                tracing::warn!(uuid = id, error = %err, "failed to fetch attraction details");
                Err(err)
            }
        }
    }

    /// Loads the home screen's featured rail.
    pub async fn load_featured(&self) -> Result<(), ApiError> {
        self.load_rail(
            &self.featured_slot,
            FEATURED_KEYWORD,
            &self.rail_projector,
            |state, models| state.featured = models,
        )
        .await
    }

    /// Loads the home screen's explore rail, shown while no category is
    /// selected.
    pub async fn load_explore(&self) -> Result<(), ApiError> {
        self.load_rail(
            &self.explore_slot,
            EXPLORE_KEYWORD,
            &self.grid_projector,
            |state, models| state.explore = models,
        )
        .await
    }

    /// Everything the home screen needs, fetched concurrently. Each load
    /// fails independently; the first error is reported after all three
    /// settle.
    pub async fn bootstrap(&self) -> Result<(), ApiError> {
        let (categories, featured, explore) = futures::join!(
            self.load_categories(),
            self.load_featured(),
            self.load_explore()
        );
        categories.and(featured).and(explore)
    }

    async fn load_rail(
        &self,
        slot: &FetchSlot,
        keyword: &str,
        projector: &AttractionProjector,
        commit: fn(&mut BrowserSnapshot, Vec<AttractionViewModel>),
    ) -> Result<(), ApiError> {
        let token = slot.issue();
        let query = SearchQuery::keyword(keyword).with_limit(RAIL_RESULT_LIMIT);
        match self.api.search_attractions(&query).await {
            Ok(records) => {
                let models = records
                    .iter()
                    .map(|record| projector.project(record))
                    .collect();
                if slot.is_current(token) {
                    commit(&mut self.state.lock(), models);
                } else {
                    tracing::debug!(keyword, "discarding stale rail response");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(keyword, error = %err, "failed to fetch home rail");
                Err(err)
            }
        }
    }
}
