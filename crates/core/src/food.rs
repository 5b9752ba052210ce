//! Food catalog data model.
//!
//! A [`FoodRecord`] is read-only to search and scaling. Records are created by
//! seeding the catalog or by saving a favorite, and receive their [`FoodId`]
//! from the [`CatalogStore`](crate::catalog::CatalogStore) on insert.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Catalog identity. Stores assign ids in insertion order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FoodId(pub u64);

impl FoodId {
    /// Placeholder id on records that have not been inserted yet
    pub const UNASSIGNED: FoodId = FoodId(0);
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Energy and macronutrients for a fixed quantity of food.
///
/// On a [`FoodRecord`] these are per 100 grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    /// Energy in kcal
    pub kcal: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrate in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
}

impl Nutrients {
    #[inline]
    pub fn new(kcal: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            kcal,
            protein,
            carbs,
            fat,
        }
    }

    /// Returns true if every value is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.kcal, self.protein, self.carbs, self.fat]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Multiply every value by `factor`.
    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            kcal: self.kcal * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }
}

impl std::ops::Add for Nutrients {
    type Output = Nutrients;

    fn add(self, rhs: Nutrients) -> Nutrients {
        Nutrients {
            kcal: self.kcal + rhs.kcal,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl std::ops::AddAssign for Nutrients {
    fn add_assign(&mut self, rhs: Nutrients) {
        *self = *self + rhs;
    }
}

/// A named serving preset, e.g. "1 cup" = 240 g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Serving {
    pub label: String,
    pub grams: f64,
}

impl Serving {
    pub fn new(label: impl Into<String>, grams: f64) -> Self {
        Self {
            label: label.into(),
            grams,
        }
    }
}

/// Where a catalog entry came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodSource {
    /// Shipped with the seed catalog
    #[default]
    Curated,
    /// Saved by the user as a favorite
    User,
}

/// A food in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    #[serde(default)]
    pub id: FoodId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub per100g: Nutrients,
    #[serde(default)]
    pub servings: Vec<Serving>,
    #[serde(default)]
    pub source: FoodSource,
    #[serde(default)]
    pub verified: bool,
}

impl FoodRecord {
    /// Create an unverified curated record with no tags or servings.
    pub fn new(name: impl Into<String>, per100g: Nutrients) -> Self {
        Self {
            id: FoodId::UNASSIGNED,
            name: name.into(),
            brand: None,
            tags: Vec::new(),
            per100g,
            servings: Vec::new(),
            source: FoodSource::Curated,
            verified: false,
        }
    }

    pub fn with_id(mut self, id: FoodId) -> Self {
        self.id = id;
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_serving(mut self, label: impl Into<String>, grams: f64) -> Self {
        self.servings.push(Serving::new(label, grams));
        self
    }

    pub fn with_source(mut self, source: FoodSource) -> Self {
        self.source = source;
        self
    }

    pub fn verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    /// Copy of this record as a user favorite: user source, verified.
    ///
    /// The id is reset so the store assigns a fresh one.
    pub fn as_favorite(&self) -> Self {
        Self {
            id: FoodId::UNASSIGNED,
            source: FoodSource::User,
            verified: true,
            ..self.clone()
        }
    }

    /// Check the record-level invariants.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_record(format!("food {} has an empty name", self.id)));
        }
        if !self.per100g.is_valid() {
            return Err(Error::invalid_record(format!(
                "food {} ({}) has negative or non-finite nutrients",
                self.id, self.name
            )));
        }
        if let Some(serving) = self
            .servings
            .iter()
            .find(|s| !(s.grams.is_finite() && s.grams > 0.0))
        {
            return Err(Error::invalid_record(format!(
                "food {} ({}) serving '{}' must weigh more than 0 g",
                self.id, self.name, serving.label
            )));
        }
        Ok(())
    }
}

/// Validate every record and check that ids are unique.
pub fn validate_catalog(records: &[FoodRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        record.validate()?;
        if !seen.insert(record.id) {
            return Err(Error::invalid_record(format!(
                "duplicate food id {} in catalog",
                record.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken() -> FoodRecord {
        FoodRecord::new("Chicken breast", Nutrients::new(165.0, 31.0, 0.0, 3.6))
            .with_id(FoodId(1))
            .with_tags(["poultry", "meat"])
            .with_serving("1 breast", 120.0)
    }

    #[test]
    fn test_nutrients_validation() {
        assert!(Nutrients::new(0.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!Nutrients::new(-1.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!Nutrients::new(f64::NAN, 0.0, 0.0, 0.0).is_valid());
    }

    #[test]
    fn test_nutrients_add() {
        let total = Nutrients::new(100.0, 1.0, 2.0, 3.0) + Nutrients::new(50.0, 0.5, 0.5, 0.5);
        assert_eq!(total, Nutrients::new(150.0, 1.5, 2.5, 3.5));
    }

    #[test]
    fn test_as_favorite_forces_user_and_verified() {
        let favorite = chicken().as_favorite();
        assert_eq!(favorite.source, FoodSource::User);
        assert!(favorite.verified);
        assert_eq!(favorite.id, FoodId::UNASSIGNED);
        assert_eq!(favorite.name, "Chicken breast");
        assert_eq!(favorite.servings.len(), 1);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let record = FoodRecord::new("   ", Nutrients::default());
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_gram_serving() {
        let record = chicken().with_serving("nothing", 0.0);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_catalog_rejects_duplicate_ids() {
        let records = vec![chicken(), chicken()];
        assert!(validate_catalog(&records).is_err());
        assert!(validate_catalog(&records[..1]).is_ok());
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: FoodRecord = serde_json::from_str(
            r#"{"name": "Apple", "per100g": {"kcal": 52, "protein": 0.3, "carbs": 14, "fat": 0.2}}"#,
        )
        .unwrap();

        assert_eq!(record.id, FoodId::UNASSIGNED);
        assert_eq!(record.source, FoodSource::Curated);
        assert!(record.tags.is_empty());
        assert!(!record.verified);
    }
}
