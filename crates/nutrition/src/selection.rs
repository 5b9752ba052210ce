//! Serving selection: a preset from the food, or a custom gram amount.

use crate::error::{Result, ServingError};
use nutrilog_core::FoodRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grams used when a food has no serving presets.
pub const DEFAULT_SERVING_GRAMS: f64 = 100.0;

/// A gram quantity that is finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Grams(f64);

impl Grams {
    /// Validate a raw gram amount.
    pub fn new(grams: f64) -> Result<Self> {
        if !grams.is_finite() {
            return Err(ServingError::NonFiniteGrams);
        }
        if grams <= 0.0 {
            return Err(ServingError::NonPositiveGrams(grams));
        }
        Ok(Self(grams))
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Grams {
    type Error = ServingError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Grams> for f64 {
    fn from(grams: Grams) -> f64 {
        grams.0
    }
}

impl fmt::Display for Grams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} g", self.0)
    }
}

/// How much of a food the user is logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ServingSelection {
    /// A preset copied from the food, e.g. "1 cup" = 240 g
    Named { label: String, grams: Grams },
    /// A free gram amount
    Custom { grams: Grams },
}

impl ServingSelection {
    pub fn named(label: impl Into<String>, grams: f64) -> Result<Self> {
        Ok(Self::Named {
            label: label.into(),
            grams: Grams::new(grams)?,
        })
    }

    pub fn custom(grams: f64) -> Result<Self> {
        Ok(Self::Custom {
            grams: Grams::new(grams)?,
        })
    }

    /// Look up a preset on `food` by label, ignoring case.
    pub fn named_from(food: &FoodRecord, label: &str) -> Result<Self> {
        let wanted = label.trim();
        food.servings
            .iter()
            .find(|s| s.label.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ServingError::UnknownServing {
                food: food.name.clone(),
                label: wanted.to_string(),
            })
            .and_then(|s| Self::named(s.label.clone(), s.grams))
    }

    /// Selection pre-filled when a food is picked: its first preset, else 100 g.
    pub fn default_for(food: &FoodRecord) -> Result<Self> {
        match food.servings.first() {
            Some(serving) => Self::named(serving.label.clone(), serving.grams),
            None => Self::custom(DEFAULT_SERVING_GRAMS),
        }
    }

    pub fn grams(&self) -> Grams {
        match self {
            Self::Named { grams, .. } | Self::Custom { grams } => *grams,
        }
    }

    /// Human-readable label, e.g. "1 cup (240 g)" or "150 g".
    pub fn describe(&self) -> String {
        match self {
            Self::Named { label, grams } => format!("{} ({})", label, grams),
            Self::Custom { grams } => grams.to_string(),
        }
    }
}
