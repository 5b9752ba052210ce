//! End-to-end tests for the debounced search engine.

use async_trait::async_trait;
use nutrilog_core::config::ConfigSchema;
use nutrilog_core::seed::seed_catalog;
use nutrilog_core::{CatalogStore, Error, FoodId, FoodRecord, FoodSource, InMemoryCatalog, Nutrients};
use nutrilog_search::{FoodSearch, Quality, ResultSource, SearchError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

async fn seeded() -> Arc<FoodSearch> {
    let store = Arc::new(InMemoryCatalog::with_records(seed_catalog()));
    Arc::new(FoodSearch::open(store, &ConfigSchema::default()).await.unwrap())
}

/// Store whose reads always fail.
struct UnavailableStore;

#[async_trait]
impl CatalogStore for UnavailableStore {
    async fn read_all(&self) -> nutrilog_core::Result<Vec<FoodRecord>> {
        Err(Error::catalog_unavailable("disk on fire"))
    }

    async fn insert(&self, _record: FoodRecord) -> nutrilog_core::Result<FoodRecord> {
        Err(Error::catalog_unavailable("disk on fire"))
    }
}

/// Store returning a fixed record list as-is.
struct FixedStore(Vec<FoodRecord>);

#[async_trait]
impl CatalogStore for FixedStore {
    async fn read_all(&self) -> nutrilog_core::Result<Vec<FoodRecord>> {
        Ok(self.0.clone())
    }

    async fn insert(&self, record: FoodRecord) -> nutrilog_core::Result<FoodRecord> {
        Ok(record)
    }
}

/// Store whose first read is slow and returns the catalog as it was then.
struct SlowFirstReadStore {
    reads: AtomicUsize,
}

impl SlowFirstReadStore {
    fn apple() -> FoodRecord {
        FoodRecord::new("Apple", Nutrients::new(52.0, 0.3, 13.8, 0.2)).with_id(FoodId(1))
    }

    fn kiwi() -> FoodRecord {
        FoodRecord::new("Kiwi", Nutrients::new(61.0, 1.1, 14.7, 0.5)).with_id(FoodId(2))
    }
}

#[async_trait]
impl CatalogStore for SlowFirstReadStore {
    async fn read_all(&self) -> nutrilog_core::Result<Vec<FoodRecord>> {
        if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(500)).await;
            return Ok(vec![Self::apple()]);
        }
        Ok(vec![Self::apple(), Self::kiwi()])
    }

    async fn insert(&self, record: FoodRecord) -> nutrilog_core::Result<FoodRecord> {
        Ok(record)
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_older_refresh_does_not_overwrite_newer() {
    let store = Arc::new(SlowFirstReadStore {
        reads: AtomicUsize::new(0),
    });
    let engine = Arc::new(FoodSearch::new(store, &ConfigSchema::default()));

    let older = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    engine.refresh().await.unwrap();
    assert_eq!(engine.snapshot().await.len(), 2);

    older.await.unwrap().unwrap();
    assert_eq!(engine.snapshot().await.len(), 2);
    let response = engine.search_now("kiwi").await;
    assert_eq!(response.foods().next().unwrap().name, "Kiwi");
}

#[tokio::test]
async fn test_results_dropped_when_newer_query_arrives_mid_execution() {
    let mut config = ConfigSchema::default();
    config.search.debounce_ms = 0;
    let store = Arc::new(InMemoryCatalog::with_records(seed_catalog()));
    let engine = Arc::new(FoodSearch::open(store, &config).await.unwrap());

    let older = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.search("chicken").await })
    };
    // lets the older query run until it waits on its planning task
    tokio::task::yield_now().await;

    let newer = engine.search("rice").await;

    assert!(older.await.unwrap().is_superseded());
    assert_eq!(newer.completed().unwrap().query, "rice");
    let stats = engine.stats();
    assert_eq!(stats.executed, 2);
    assert_eq!(stats.superseded, 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_runs_only_last_query() {
    let engine = seeded().await;

    let mut handles = Vec::new();
    for query in ["chi", "chic", "chick"] {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move { engine.search(query).await }));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    assert!(outcomes[0].is_superseded());
    assert!(outcomes[1].is_superseded());
    let response = outcomes.pop().unwrap().completed().unwrap();
    assert_eq!(response.query, "chick");
    assert!(response.foods().any(|f| f.name.starts_with("Chicken")));

    let stats = engine.stats();
    assert_eq!(stats.executed, 1);
    assert_eq!(stats.superseded, 2);
}

#[tokio::test(start_paused = true)]
async fn test_spaced_queries_all_run() {
    let engine = seeded().await;

    assert!(engine.search("rice").await.completed().is_some());
    assert!(engine.search("salmon").await.completed().is_some());
    assert_eq!(engine.stats().executed, 2);
}

#[tokio::test(start_paused = true)]
async fn test_blank_query_is_idle_without_executing() {
    let engine = seeded().await;

    let response = engine.search("   ").await.completed().unwrap();
    assert_eq!(response.source, ResultSource::Idle);
    assert!(response.is_empty());
    assert!(response.quality.is_none());
    assert_eq!(engine.stats().executed, 0);
}

#[tokio::test(start_paused = true)]
async fn test_blank_query_supersedes_pending_query() {
    let engine = seeded().await;

    let pending = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.search("banana").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let cleared = engine.search("").await;

    assert!(pending.await.unwrap().is_superseded());
    assert!(cleared.completed().unwrap().results.is_empty());
    assert_eq!(engine.stats().executed, 0);
}

#[tokio::test]
async fn test_typo_still_finds_food() {
    let engine = seeded().await;

    let response = engine.search_now("bananna").await;
    assert_eq!(response.source, ResultSource::Index);
    assert_eq!(response.foods().next().unwrap().name, "Banana");
    let report = response.quality.unwrap();
    assert!(report.quality_kept <= report.total_found);
    assert!(response.results.iter().all(|r| r.score.unwrap() < 0.5));
}

#[tokio::test]
async fn test_favorite_is_searchable_and_popular() {
    let engine = seeded().await;
    assert!(engine.popular().await.is_empty());

    let banana = engine
        .snapshot()
        .await
        .records()
        .iter()
        .find(|r| r.name == "Banana")
        .cloned()
        .unwrap();
    let saved = engine.add_favorite(&banana).await.unwrap();
    assert_eq!(saved.source, FoodSource::User);
    assert_ne!(saved.id, banana.id);

    let popular = engine.popular().await;
    assert_eq!(popular.len(), 1);
    assert_eq!(popular[0].id, saved.id);

    let response = engine.search_now("Banana").await;
    let ids: Vec<FoodId> = response.foods().map(|f| f.id).collect();
    assert!(ids.contains(&saved.id));
    assert!(ids.contains(&banana.id));
    assert_eq!(engine.find(saved.id).await.unwrap().name, "Banana");
}

#[tokio::test]
async fn test_recent_lists_newest_first() {
    let engine = seeded().await;
    let records = engine.snapshot().await.records().to_vec();

    let first = engine.add_favorite(&records[0]).await.unwrap();
    let second = engine.add_favorite(&records[1]).await.unwrap();

    let recent = engine.recent().await;
    assert_eq!(recent[0].id, second.id);
    assert_eq!(recent[1].id, first.id);
    assert!(recent.len() <= ConfigSchema::default().browse.recent_limit);
}

#[tokio::test]
async fn test_unreadable_catalog_yields_empty_results() {
    let engine = FoodSearch::new(Arc::new(UnavailableStore), &ConfigSchema::default());

    let err = engine.refresh().await.unwrap_err();
    assert!(matches!(err, SearchError::Catalog(_)));

    let response = engine.search_now("chicken").await;
    assert!(response.is_empty());
    assert_eq!(response.source, ResultSource::NoMatches);
    assert!(engine.popular().await.is_empty());
}

#[tokio::test]
async fn test_failed_favorite_reports_error() {
    let engine = FoodSearch::new(Arc::new(UnavailableStore), &ConfigSchema::default());
    let food = FoodRecord::new("Banana", Nutrients::new(89.0, 1.1, 22.8, 0.3));

    assert!(engine.add_favorite(&food).await.is_err());
}

#[tokio::test]
async fn test_index_build_failure_falls_back_to_substring() {
    // duplicate ids make the catalog unindexable
    let records = vec![
        FoodRecord::new("Chicken breast", Nutrients::new(165.0, 31.0, 0.0, 3.6)).with_id(FoodId(1)),
        FoodRecord::new("Chicken thigh", Nutrients::new(209.0, 26.0, 0.0, 10.9)).with_id(FoodId(1)),
        FoodRecord::new("Rice", Nutrients::new(130.0, 2.7, 28.2, 0.3)).with_id(FoodId(2)),
    ];
    let engine = FoodSearch::open(Arc::new(FixedStore(records)), &ConfigSchema::default())
        .await
        .unwrap();
    assert!(!engine.has_index().await);

    let response = engine.search_now("chicken").await;
    assert_eq!(response.source, ResultSource::Fallback);
    assert_eq!(response.results.len(), 2);
    assert!(response.results.iter().all(|r| r.score.is_none()));
    assert_eq!(response.quality.unwrap().quality, Quality::Low);

    // typos cannot be rescued without the index
    assert!(engine.search_now("chikcen").await.is_empty());
}
