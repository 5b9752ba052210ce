//! Browse lists shown before any query is typed.

use nutrilog_core::config::BrowseConfig;
use nutrilog_core::{FoodRecord, FoodSource};
use serde::{Deserialize, Serialize};

/// User-saved foods, in catalog order, at most `limit`.
pub fn popular(records: &[FoodRecord], limit: usize) -> Vec<FoodRecord> {
    records
        .iter()
        .filter(|r| r.source == FoodSource::User)
        .take(limit)
        .cloned()
        .collect()
}

/// The `limit` most recently inserted foods, newest first.
pub fn recent(records: &[FoodRecord], limit: usize) -> Vec<FoodRecord> {
    let mut newest: Vec<&FoodRecord> = records.iter().collect();
    newest.sort_by(|a, b| b.id.cmp(&a.id));
    newest.into_iter().take(limit).cloned().collect()
}

/// Both browse lists for one catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseLists {
    pub popular: Vec<FoodRecord>,
    pub recent: Vec<FoodRecord>,
}

impl BrowseLists {
    pub fn from_records(records: &[FoodRecord], config: &BrowseConfig) -> Self {
        Self {
            popular: popular(records, config.popular_limit),
            recent: recent(records, config.recent_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrilog_core::{FoodId, Nutrients};

    fn food(id: u64, source: FoodSource) -> FoodRecord {
        FoodRecord::new(format!("Food {}", id), Nutrients::default())
            .with_id(FoodId(id))
            .with_source(source)
    }

    #[test]
    fn test_popular_is_user_only_in_catalog_order_capped() {
        let records: Vec<FoodRecord> = (1..=20)
            .map(|id| {
                let source = if id % 2 == 0 { FoodSource::User } else { FoodSource::Curated };
                food(id, source)
            })
            .collect();

        let list = popular(&records, 8);
        let ids: Vec<u64> = list.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![2, 4, 6, 8, 10, 12, 14, 16]);
    }

    #[test]
    fn test_recent_is_newest_first() {
        // catalog order need not match id order
        let records = vec![
            food(3, FoodSource::Curated),
            food(10, FoodSource::User),
            food(1, FoodSource::Curated),
            food(7, FoodSource::Curated),
        ];

        let ids: Vec<u64> = recent(&records, 3).iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![10, 7, 3]);
    }

    #[test]
    fn test_lists_on_empty_catalog() {
        let lists = BrowseLists::from_records(&[], &BrowseConfig::default());
        assert!(lists.popular.is_empty());
        assert!(lists.recent.is_empty());
    }
}
