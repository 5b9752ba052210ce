//! Fuzzy index over a catalog snapshot.
//!
//! The index is built once per snapshot and never updated in place; a catalog
//! change produces a new snapshot revision and a fresh index.

use crate::error::{Result, SearchError};
use crate::fuzzy::{field_norm, score_field, MatchOptions, Pattern};
use nutrilog_core::config::IndexConfig;
use nutrilog_core::food::validate_catalog;
use nutrilog_core::FoodRecord;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Immutable view of the catalog at one point in time.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    revision: u64,
    records: Arc<Vec<FoodRecord>>,
}

impl CatalogSnapshot {
    pub fn new(revision: u64, records: Vec<FoodRecord>) -> Self {
        Self {
            revision,
            records: Arc::new(records),
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn records(&self) -> &[FoodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One index hit: position in the snapshot and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    pub position: usize,
    pub score: f64,
}

#[derive(Debug)]
struct IndexedField {
    text: String,
    chars: Vec<char>,
    norm: f64,
}

impl IndexedField {
    fn new(raw: &str, ignore_norm: bool) -> Self {
        let text = raw.to_lowercase();
        let chars = text.chars().collect();
        let norm = if ignore_norm { 1.0 } else { field_norm(raw) };
        Self { text, chars, norm }
    }

    fn score(&self, pattern: &Pattern, options: &MatchOptions) -> Option<f64> {
        score_field(pattern, &self.text, &self.chars, options)
    }
}

#[derive(Debug)]
struct IndexedFood {
    name: IndexedField,
    tags: Vec<IndexedField>,
}

/// Approximate-match index over `name` and `tags`.
#[derive(Debug)]
pub struct FuzzyIndex {
    snapshot: CatalogSnapshot,
    entries: Vec<IndexedFood>,
    options: MatchOptions,
    name_weight: f64,
    tags_weight: f64,
    searches: AtomicU64,
}

impl FuzzyIndex {
    /// Build an index for `snapshot`.
    ///
    /// Fails if the snapshot breaks a record invariant or the weights are unusable.
    pub fn build(snapshot: CatalogSnapshot, config: &IndexConfig) -> Result<Self> {
        let total_weight = config.name_weight + config.tags_weight;
        if !(config.name_weight > 0.0 && config.tags_weight > 0.0 && total_weight.is_finite()) {
            return Err(SearchError::IndexBuild(
                "field weights must be positive and finite".to_string(),
            ));
        }
        validate_catalog(snapshot.records())
            .map_err(|e| SearchError::IndexBuild(e.message))?;

        let entries = snapshot
            .records()
            .iter()
            .map(|record| IndexedFood {
                name: IndexedField::new(&record.name, config.ignore_field_norm),
                tags: record
                    .tags
                    .iter()
                    .map(|tag| IndexedField::new(tag, config.ignore_field_norm))
                    .collect(),
            })
            .collect();

        Ok(Self {
            snapshot,
            entries,
            options: MatchOptions::from(config),
            name_weight: config.name_weight / total_weight,
            tags_weight: config.tags_weight / total_weight,
            searches: AtomicU64::new(0),
        })
    }

    /// Revision of the snapshot this index was built from.
    pub fn revision(&self) -> u64 {
        self.snapshot.revision()
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of searches run against this index.
    pub fn search_count(&self) -> u64 {
        self.searches.load(Ordering::Relaxed)
    }

    /// Fail if this index was built from a different snapshot than `snapshot`.
    pub fn ensure_fresh(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        if self.revision() != snapshot.revision() {
            return Err(SearchError::StaleIndex {
                index_revision: self.revision(),
                catalog_revision: snapshot.revision(),
            });
        }
        Ok(())
    }

    pub fn record(&self, position: usize) -> Option<&FoodRecord> {
        self.snapshot.records().get(position)
    }

    /// All matching records, best first. Ties keep catalog order.
    pub fn search(&self, text: &str) -> Vec<IndexHit> {
        self.searches.fetch_add(1, Ordering::Relaxed);
        let pattern = Pattern::new(text);
        if pattern.len() < self.options.min_match_char_length {
            return Vec::new();
        }

        let mut hits: Vec<IndexHit> = self.scan(&pattern);
        hits.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then(a.position.cmp(&b.position))
        });
        hits
    }

    #[cfg(feature = "parallel")]
    fn scan(&self, pattern: &Pattern) -> Vec<IndexHit> {
        use rayon::prelude::*;
        self.entries
            .par_iter()
            .enumerate()
            .filter_map(|(position, entry)| self.score_entry(position, entry, pattern))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn scan(&self, pattern: &Pattern) -> Vec<IndexHit> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| self.score_entry(position, entry, pattern))
            .collect()
    }

    /// Product of `score ^ (weight * norm)` over every matching field value.
    fn score_entry(&self, position: usize, entry: &IndexedFood, pattern: &Pattern) -> Option<IndexHit> {
        let fields = std::iter::once((&entry.name, self.name_weight))
            .chain(entry.tags.iter().map(|tag| (tag, self.tags_weight)));

        let mut total = 1.0;
        let mut matched = false;
        for (field, weight) in fields {
            if let Some(score) = field.score(pattern, &self.options) {
                matched = true;
                let score = if score == 0.0 { f64::EPSILON } else { score };
                total *= score.powf(weight * field.norm);
            }
        }

        matched.then_some(IndexHit { position, score: total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrilog_core::{FoodId, Nutrients};

    fn food(id: u64, name: &str, tags: &[&str]) -> FoodRecord {
        FoodRecord::new(name, Nutrients::new(100.0, 1.0, 1.0, 1.0))
            .with_id(FoodId(id))
            .with_tags(tags.iter().copied())
    }

    fn index(records: Vec<FoodRecord>) -> FuzzyIndex {
        FuzzyIndex::build(CatalogSnapshot::new(1, records), &IndexConfig::default()).unwrap()
    }

    #[test]
    fn test_exact_name_ranks_first() {
        let idx = index(vec![
            food(1, "Chicken thigh", &["poultry"]),
            food(2, "Chickpeas", &["legumes"]),
            food(3, "Chicken", &[]),
        ]);

        let hits = idx.search("chicken");
        assert_eq!(hits[0].position, 2);
        assert!(hits.iter().all(|h| h.score >= 0.0 && h.score <= 1.0));
        assert!(hits.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn test_tag_only_match_scores_worse_than_name_match() {
        let idx = index(vec![
            food(1, "Salmon fillet", &["fish"]),
            food(2, "Fish sticks", &[]),
        ]);

        let hits = idx.search("fish");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].position, 1);
    }

    #[test]
    fn test_short_query_searches_nothing() {
        let idx = index(vec![food(1, "Egg", &[])]);
        assert!(idx.search("e").is_empty());
        assert_eq!(idx.search_count(), 1);
    }

    #[test]
    fn test_no_match_is_empty() {
        let idx = index(vec![food(1, "Banana", &["fruit"])]);
        assert!(idx.search("qqqqqq").is_empty());
    }

    #[test]
    fn test_build_rejects_invalid_catalog() {
        let snapshot = CatalogSnapshot::new(1, vec![food(1, "A", &[]), food(1, "B", &[])]);
        let err = FuzzyIndex::build(snapshot, &IndexConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::IndexBuild(_)));
    }

    #[test]
    fn test_ensure_fresh() {
        let idx = index(vec![food(1, "Apple", &[])]);
        assert!(idx.ensure_fresh(&CatalogSnapshot::new(1, Vec::new())).is_ok());

        let err = idx.ensure_fresh(&CatalogSnapshot::new(2, Vec::new())).unwrap_err();
        assert!(matches!(
            err,
            SearchError::StaleIndex { index_revision: 1, catalog_revision: 2 }
        ));
    }
}
