//! Food search for Nutrilog.
//!
//! This crate provides:
//! - Approximate matching over food names (full weight) and tags (half weight)
//! - Quality filtering and tiering of index results
//! - Substring fallback when the index finds nothing acceptable
//! - Last-query-wins debouncing
//! - "Popular" and "recent" browse lists
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nutrilog_core::{config::ConfigSchema, seed::seed_catalog, InMemoryCatalog};
//! use nutrilog_search::FoodSearch;
//!
//! # async fn run() -> nutrilog_search::Result<()> {
//! let store = Arc::new(InMemoryCatalog::with_records(seed_catalog()));
//! let engine = FoodSearch::open(store, &ConfigSchema::default()).await?;
//!
//! if let Some(response) = engine.search("chiken").await.completed() {
//!     for food in response.foods() {
//!         println!("{}", food.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod curator;
mod debounce;
mod engine;
mod error;
mod fuzzy;
mod index;
mod planner;

pub use curator::{popular, recent, BrowseLists};
pub use debounce::{Debouncer, Ticket};
pub use engine::{FoodSearch, SearchOutcome, SearchStats};
pub use error::{Result, SearchError, SearchErrorCode};
pub use fuzzy::{field_norm, score_field, MatchOptions, Pattern};
pub use index::{CatalogSnapshot, FuzzyIndex, IndexHit};
pub use planner::{Quality, QualityReport, QueryPlanner, RankedResult, ResultSource, SearchResponse};
