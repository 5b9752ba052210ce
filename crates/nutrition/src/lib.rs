//! Serving resolution and nutrient scaling for Nutrilog.
//!
//! This crate provides:
//! - Tagged serving selections whose gram amount is validated at construction
//! - Linear per-100 g scaling with unrounded results
//! - Display rounding (whole kcal, macros to 0.1 g)
//! - Meal totals that round only after summing
//!
//! # Example
//!
//! ```
//! use nutrilog_core::{FoodRecord, Nutrients};
//! use nutrilog_nutrition::{resolve_serving, ServingSelection};
//!
//! let chicken = FoodRecord::new("Chicken breast", Nutrients::new(165.0, 31.0, 0.0, 3.6));
//! let selection = ServingSelection::custom(150.0).unwrap();
//!
//! let payload = resolve_serving(&chicken, &selection);
//! assert_eq!(payload.raw.kcal, 247.5);
//! assert_eq!(payload.display().kcal, 248);
//! ```

mod error;
mod meal;
mod resolver;
mod selection;

pub use error::{Result, ServingError, ServingErrorCode};
pub use meal::MealTotals;
pub use resolver::{
    resolve_grams, resolve_serving, scale_nutrients, DisplayNutrients, NutrientPayload,
};
pub use selection::{Grams, ServingSelection, DEFAULT_SERVING_GRAMS};
