//! Nutrient scaling for a chosen food and serving.

use crate::error::Result;
use crate::selection::{Grams, ServingSelection};
use nutrilog_core::{FoodId, FoodRecord, Nutrients};
use serde::{Deserialize, Serialize};

/// Nutrients for one logged serving.
///
/// `raw` is unrounded; use [`NutrientPayload::display`] only for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientPayload {
    pub food_id: FoodId,
    pub grams: f64,
    pub raw: Nutrients,
}

impl NutrientPayload {
    pub fn display(&self) -> DisplayNutrients {
        DisplayNutrients::from(&self.raw)
    }
}

/// Rounded values for presentation: whole kcal, macros to 0.1 g.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayNutrients {
    pub kcal: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl From<&Nutrients> for DisplayNutrients {
    fn from(raw: &Nutrients) -> Self {
        Self {
            kcal: raw.kcal.round() as i64,
            protein: round_tenth(raw.protein),
            carbs: round_tenth(raw.carbs),
            fat: round_tenth(raw.fat),
        }
    }
}

#[inline]
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[inline]
fn scale(per100g: f64, grams: f64) -> f64 {
    per100g * grams / 100.0
}

/// Scale per-100 g values to `grams`.
pub fn scale_nutrients(per100g: &Nutrients, grams: Grams) -> Nutrients {
    let g = grams.get();
    Nutrients {
        kcal: scale(per100g.kcal, g),
        protein: scale(per100g.protein, g),
        carbs: scale(per100g.carbs, g),
        fat: scale(per100g.fat, g),
    }
}

/// Compute the nutrient payload for `food` at `selection`.
///
/// Selections can only hold positive gram amounts, so this cannot fail.
pub fn resolve_serving(food: &FoodRecord, selection: &ServingSelection) -> NutrientPayload {
    let grams = selection.grams();
    NutrientPayload {
        food_id: food.id,
        grams: grams.get(),
        raw: scale_nutrients(&food.per100g, grams),
    }
}

/// Resolve a raw gram amount, rejecting values that are not positive.
pub fn resolve_grams(food: &FoodRecord, grams: f64) -> Result<NutrientPayload> {
    let selection = ServingSelection::custom(grams)?;
    Ok(resolve_serving(food, &selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServingError;
    use proptest::prelude::*;

    fn chicken() -> FoodRecord {
        FoodRecord::new("Chicken breast", Nutrients::new(165.0, 31.0, 0.0, 3.6))
            .with_id(FoodId(7))
            .with_serving("1 breast", 120.0)
    }

    #[test]
    fn test_scaling_is_exact_before_rounding() {
        let payload = resolve_grams(&chicken(), 150.0).unwrap();

        assert_eq!(payload.raw.kcal, 247.5);
        assert_eq!(payload.display().kcal, 248);
        assert_eq!(payload.raw.protein, 46.5);
        assert_eq!(payload.grams, 150.0);
        assert_eq!(payload.food_id, FoodId(7));
    }

    #[test]
    fn test_macros_round_to_one_decimal() {
        let payload = resolve_grams(&chicken(), 33.0).unwrap();
        // 3.6 * 33 / 100 = 1.188
        assert!((payload.raw.fat - 1.188).abs() < 1e-12);
        assert_eq!(payload.display().fat, 1.2);
        // 31 * 33 / 100 = 10.23
        assert_eq!(payload.display().protein, 10.2);
    }

    #[test]
    fn test_named_serving() {
        let selection = ServingSelection::default_for(&chicken()).unwrap();
        let payload = resolve_serving(&chicken(), &selection);

        assert_eq!(payload.grams, 120.0);
        assert_eq!(payload.raw.kcal, 198.0);
    }

    #[test]
    fn test_rejects_non_positive_grams() {
        assert_eq!(
            resolve_grams(&chicken(), 0.0),
            Err(ServingError::NonPositiveGrams(0.0))
        );
        assert!(resolve_grams(&chicken(), -10.0).is_err());
    }

    #[test]
    fn test_resolve_is_pure() {
        let selection = ServingSelection::custom(87.0).unwrap();
        let first = resolve_serving(&chicken(), &selection);
        let second = resolve_serving(&chicken(), &selection);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_scaling_is_linear(grams in 1u32..5_000, kcal in 0.0f64..900.0) {
            let food = FoodRecord::new("x", Nutrients::new(kcal, 0.0, 0.0, 0.0));
            let single = resolve_grams(&food, grams as f64).unwrap();
            let double = resolve_grams(&food, grams as f64 * 2.0).unwrap();

            prop_assert!((double.raw.kcal - 2.0 * single.raw.kcal).abs() < 1e-9);
            prop_assert!((single.raw.kcal - kcal * grams as f64 / 100.0).abs() < 1e-9);
        }

        #[test]
        fn prop_display_within_rounding_step(grams in 1u32..2_000, protein in 0.0f64..100.0) {
            let food = FoodRecord::new("x", Nutrients::new(0.0, protein, 0.0, 0.0));
            let payload = resolve_grams(&food, grams as f64).unwrap();

            prop_assert!((payload.display().protein - payload.raw.protein).abs() <= 0.05 + 1e-9);
        }
    }
}
