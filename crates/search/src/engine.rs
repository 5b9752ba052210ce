//! Async search engine tying the catalog, index, planner and curator together.
//!
//! The engine owns its [`CatalogStore`] and the current catalog state: one
//! snapshot, the index built from it (if the build succeeded) and the browse
//! lists. Refreshes swap the whole state atomically, so a running query keeps
//! the snapshot it started with.

use crate::curator::BrowseLists;
use crate::debounce::Debouncer;
use crate::error::{Result, SearchError};
use crate::index::{CatalogSnapshot, FuzzyIndex};
use crate::planner::{QueryPlanner, SearchResponse};
use nutrilog_core::config::{BrowseConfig, ConfigSchema, IndexConfig};
use nutrilog_core::{CatalogStore, FoodId, FoodRecord};
use nutrilog_telemetry::{metrics, names, Timer};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of a debounced search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was the latest one and ran to completion
    Completed(SearchResponse),
    /// A newer query arrived; this one's results were dropped
    Superseded,
}

impl SearchOutcome {
    pub fn completed(self) -> Option<SearchResponse> {
        match self {
            Self::Completed(response) => Some(response),
            Self::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// Counters for this engine instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Queries that reached the planner
    pub executed: u64,
    /// Queries dropped before or after planning
    pub superseded: u64,
}

#[derive(Debug, Default)]
struct EngineState {
    snapshot: CatalogSnapshot,
    index: Option<Arc<FuzzyIndex>>,
    browse: BrowseLists,
}

/// Food search over a catalog store.
pub struct FoodSearch {
    store: Arc<dyn CatalogStore>,
    index_config: IndexConfig,
    browse_config: BrowseConfig,
    planner: QueryPlanner,
    debouncer: Debouncer,
    state: RwLock<Arc<EngineState>>,
    revisions: AtomicU64,
    executed: AtomicU64,
    superseded: AtomicU64,
}

impl FoodSearch {
    /// Create an engine with an empty state. Call [`FoodSearch::refresh`] to load the catalog.
    pub fn new(store: Arc<dyn CatalogStore>, config: &ConfigSchema) -> Self {
        Self {
            store,
            index_config: config.index.clone(),
            browse_config: config.browse.clone(),
            planner: QueryPlanner::new(config.search.clone()),
            debouncer: Debouncer::new(Duration::from_millis(config.search.debounce_ms)),
            state: RwLock::new(Arc::new(EngineState::default())),
            revisions: AtomicU64::new(0),
            executed: AtomicU64::new(0),
            superseded: AtomicU64::new(0),
        }
    }

    /// Create an engine and load the catalog.
    pub async fn open(store: Arc<dyn CatalogStore>, config: &ConfigSchema) -> Result<Self> {
        let engine = Self::new(store, config);
        engine.refresh().await?;
        Ok(engine)
    }

    /// Re-read the catalog, rebuild the index and the browse lists.
    ///
    /// The revision is taken before reading, so when refreshes overlap the
    /// one that started last wins, whatever order the reads finish in.
    /// A failed read leaves the previous state in place and is returned.
    /// A failed index build is logged and leaves the engine without an index,
    /// so queries use the substring fallback until the next successful build.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let revision = self.revisions.fetch_add(1, Ordering::SeqCst) + 1;
        let records = match self.store.read_all().await {
            Ok(records) => records,
            Err(e) => {
                metrics().increment(names::CATALOG_ERROR);
                error!(error = %e, revision, "Catalog read failed");
                return Err(SearchError::Catalog(e));
            }
        };

        let snapshot = CatalogSnapshot::new(revision, records);

        let build_snapshot = snapshot.clone();
        let config = self.index_config.clone();
        let built = tokio::task::spawn_blocking(move || FuzzyIndex::build(build_snapshot, &config))
            .await
            .map_err(SearchError::from)
            .and_then(|result| result);

        let index = match built {
            Ok(index) => Some(Arc::new(index)),
            Err(e) => {
                metrics().increment(names::SEARCH_INDEX_ERROR);
                warn!(error = %e, revision, "Index build failed, falling back to substring search");
                None
            }
        };

        let browse = BrowseLists::from_records(snapshot.records(), &self.browse_config);
        let record_count = snapshot.len();
        let indexed = index.is_some();

        let mut state = self.state.write().await;
        if state.snapshot.revision() > revision {
            debug!(revision, current = state.snapshot.revision(), "Dropping catalog from an older refresh");
            return Ok(());
        }
        *state = Arc::new(EngineState {
            snapshot,
            index,
            browse,
        });
        drop(state);

        metrics().increment(names::INDEX_REBUILD);
        metrics().gauge(names::INDEX_RECORDS, record_count as u64);
        info!(revision, records = record_count, indexed, "Catalog refreshed");
        Ok(())
    }

    /// Debounced search; only the latest query in an idle window runs.
    ///
    /// Non-blank queries wait out the debounce window before running. A blank
    /// query skips the wait, returns an idle response at once and supersedes
    /// any pending query.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let ticket = self.debouncer.issue();
        if query.trim().is_empty() {
            return SearchOutcome::Completed(SearchResponse::idle(query));
        }

        if !self.debouncer.settle(&ticket).await {
            self.mark_superseded();
            debug!(generation = ticket.generation(), query, "Query superseded before execution");
            return SearchOutcome::Superseded;
        }

        let response = self.execute(query).await;

        if !self.debouncer.is_current(&ticket) {
            self.mark_superseded();
            debug!(generation = ticket.generation(), query, "Discarding stale results");
            return SearchOutcome::Superseded;
        }

        SearchOutcome::Completed(response)
    }

    /// Run `query` immediately, bypassing the debounce window.
    pub async fn search_now(&self, query: &str) -> SearchResponse {
        if query.trim().is_empty() {
            return SearchResponse::idle(query);
        }
        self.execute(query).await
    }

    async fn execute(&self, query: &str) -> SearchResponse {
        let state = self.state.read().await.clone();
        let planner = self.planner.clone();
        let owned = query.to_string();

        let timer = Timer::start(names::SEARCH_DURATION_MS);
        let planned = tokio::task::spawn_blocking(move || {
            planner.plan(&owned, &state.snapshot, state.index.as_deref())
        })
        .await;
        timer.stop();

        self.executed.fetch_add(1, Ordering::Relaxed);
        metrics().increment(names::SEARCH_EXECUTED);

        match planned {
            Ok(response) => response,
            Err(e) => {
                metrics().increment(names::SEARCH_INDEX_ERROR);
                error!(error = %e, query, "Search task failed, returning no results");
                SearchResponse::no_matches(query)
            }
        }
    }

    fn mark_superseded(&self) {
        self.superseded.fetch_add(1, Ordering::Relaxed);
        metrics().increment(names::SEARCH_SUPERSEDED);
    }

    /// Save a copy of `food` as a user favorite, then refresh.
    #[instrument(skip(self, food), fields(food = %food.name))]
    pub async fn add_favorite(&self, food: &FoodRecord) -> Result<FoodRecord> {
        let inserted = match self.store.insert(food.as_favorite()).await {
            Ok(inserted) => inserted,
            Err(e) => {
                metrics().increment(names::CATALOG_ERROR);
                error!(error = %e, "Saving favorite failed");
                return Err(SearchError::Catalog(e));
            }
        };
        info!(id = %inserted.id, "Favorite saved");

        self.refresh().await?;
        Ok(inserted)
    }

    /// User favorites for the browse screen.
    pub async fn popular(&self) -> Vec<FoodRecord> {
        self.state.read().await.browse.popular.clone()
    }

    /// Most recently added foods for the browse screen.
    pub async fn recent(&self) -> Vec<FoodRecord> {
        self.state.read().await.browse.recent.clone()
    }

    pub async fn browse(&self) -> BrowseLists {
        self.state.read().await.browse.clone()
    }

    pub async fn find(&self, id: FoodId) -> Option<FoodRecord> {
        let state = self.state.read().await.clone();
        state.snapshot.records().iter().find(|r| r.id == id).cloned()
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.state.read().await.snapshot.clone()
    }

    /// False when the last index build failed.
    pub async fn has_index(&self) -> bool {
        self.state.read().await.index.is_some()
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            executed: self.executed.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for FoodSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoodSearch")
            .field("planner", &self.planner)
            .field("debounce", &self.debouncer.delay())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
