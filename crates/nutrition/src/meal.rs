//! Aggregation of several logged servings.
//!
//! Totals are summed from raw payloads and rounded once, at display time.

use crate::resolver::{DisplayNutrients, NutrientPayload};
use nutrilog_core::Nutrients;
use serde::{Deserialize, Serialize};

/// Running totals for a meal or a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealTotals {
    pub entries: usize,
    pub grams: f64,
    pub raw: Nutrients,
}

impl MealTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, payload: &NutrientPayload) {
        self.entries += 1;
        self.grams += payload.grams;
        self.raw += payload.raw;
    }

    pub fn display(&self) -> DisplayNutrients {
        DisplayNutrients::from(&self.raw)
    }
}

impl<'a> FromIterator<&'a NutrientPayload> for MealTotals {
    fn from_iter<I: IntoIterator<Item = &'a NutrientPayload>>(iter: I) -> Self {
        let mut totals = MealTotals::new();
        for payload in iter {
            totals.add(payload);
        }
        totals
    }
}
