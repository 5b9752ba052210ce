//! Query planning: index search, quality filtering, substring fallback.
//!
//! For a non-empty query:
//! 1. Search the fuzzy index (best score first).
//! 2. Keep hits scoring strictly below the quality threshold, at most `max_results`.
//! 3. If nothing survives and the query has enough characters, fall back to a
//!    case-insensitive substring match on names, in catalog order, at most
//!    `fallback_limit` entries, unscored.
//!
//! A food whose name equals the query, ignoring case, is always listed first
//! on either path, ahead of the caps.
//!
//! Failures never escape the planner: a stale index is logged and answered
//! with an empty response.

use crate::index::{CatalogSnapshot, FuzzyIndex, IndexHit};
use nutrilog_core::config::SearchConfig;
use nutrilog_core::FoodRecord;
use nutrilog_telemetry::{metrics, names};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
}

impl Quality {
    /// Tier for a kept-result count; `None` when nothing was kept.
    pub fn classify(kept: usize) -> Option<Quality> {
        match kept {
            0 => None,
            1..=5 => Some(Quality::Low),
            6..=10 => Some(Quality::Medium),
            _ => Some(Quality::High),
        }
    }
}

/// Summary of how a completed search went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub quality: Quality,
    /// Index hits before filtering
    pub total_found: usize,
    /// Results returned
    pub quality_kept: usize,
    /// Score cutoff applied
    pub threshold: f64,
}

/// Which path produced the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Query was empty, nothing ran
    Idle,
    Index,
    Fallback,
    /// Both paths ran and found nothing
    NoMatches,
}

/// A food plus its index score. Fallback results carry no score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub food: FoodRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Everything a caller needs to render one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<RankedResult>,
    pub quality: Option<QualityReport>,
    pub source: ResultSource,
}

impl SearchResponse {
    /// Response for a blank query.
    pub fn idle(query: &str) -> Self {
        Self {
            query: query.to_string(),
            results: Vec::new(),
            quality: None,
            source: ResultSource::Idle,
        }
    }

    pub(crate) fn no_matches(query: &str) -> Self {
        Self {
            source: ResultSource::NoMatches,
            ..Self::idle(query)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn foods(&self) -> impl Iterator<Item = &FoodRecord> {
        self.results.iter().map(|r| &r.food)
    }
}

/// Stateless planner; all inputs arrive per call.
#[derive(Debug, Clone, Default)]
pub struct QueryPlanner {
    config: SearchConfig,
}

impl QueryPlanner {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Plan and run `query` against `snapshot`.
    ///
    /// `index` is `None` when the last build failed; every query then takes the
    /// fallback path.
    pub fn plan(&self, query: &str, snapshot: &CatalogSnapshot, index: Option<&FuzzyIndex>) -> SearchResponse {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return SearchResponse::idle(query);
        }

        let hits = match index {
            Some(index) => {
                if let Err(e) = index.ensure_fresh(snapshot) {
                    metrics().increment(names::SEARCH_INDEX_ERROR);
                    warn!(error = %e, query = trimmed, "Index unusable, returning no results");
                    return SearchResponse::no_matches(query);
                }
                index.search(trimmed)
            }
            None => Vec::new(),
        };

        let total_found = hits.len();
        let threshold = self.config.quality_threshold;
        let records = snapshot.records();

        // product scoring can rank tag-heavy records above an exact name
        let needle = trimmed.to_lowercase();
        let (exact, rest): (Vec<IndexHit>, Vec<IndexHit>) = hits.into_iter().partition(|hit| {
            records
                .get(hit.position)
                .is_some_and(|food| is_exact_name(food, &needle))
        });

        let kept: Vec<RankedResult> = exact
            .into_iter()
            .chain(rest.into_iter().filter(|hit| hit.score < threshold))
            .take(self.config.max_results)
            .filter_map(|hit| {
                records.get(hit.position).map(|food| RankedResult {
                    food: food.clone(),
                    score: Some(hit.score),
                })
            })
            .collect();

        if let Some(quality) = Quality::classify(kept.len()) {
            debug!(query = trimmed, total_found, kept = kept.len(), ?quality, "Index results");
            return SearchResponse {
                query: query.to_string(),
                quality: Some(QualityReport {
                    quality,
                    total_found,
                    quality_kept: kept.len(),
                    threshold,
                }),
                results: kept,
                source: ResultSource::Index,
            };
        }

        if trimmed.chars().count() < self.config.fallback_min_chars {
            return SearchResponse::no_matches(query);
        }

        let fallback = substring_matches(records, trimmed, self.config.fallback_limit);
        if fallback.is_empty() {
            debug!(query = trimmed, total_found, "No matches");
            return SearchResponse::no_matches(query);
        }

        metrics().increment(names::SEARCH_FALLBACK);
        debug!(query = trimmed, total_found, found = fallback.len(), "Substring fallback results");

        SearchResponse {
            query: query.to_string(),
            quality: Some(QualityReport {
                quality: Quality::Low,
                total_found,
                quality_kept: fallback.len(),
                threshold,
            }),
            results: fallback,
            source: ResultSource::Fallback,
        }
    }
}

fn is_exact_name(food: &FoodRecord, needle: &str) -> bool {
    food.name.trim().to_lowercase() == needle
}

/// Case-insensitive substring match on `name`, exact names first, then catalog order.
fn substring_matches(records: &[FoodRecord], query: &str, limit: usize) -> Vec<RankedResult> {
    let needle = query.to_lowercase();
    let (exact, partial): (Vec<&FoodRecord>, Vec<&FoodRecord>) = records
        .iter()
        .filter(|food| food.name.to_lowercase().contains(&needle))
        .partition(|food| is_exact_name(food, &needle));

    exact
        .into_iter()
        .chain(partial)
        .take(limit)
        .map(|food| RankedResult {
            food: food.clone(),
            score: None,
        })
        .collect()
}
