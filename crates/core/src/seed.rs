//! Curated starter catalog written by `nutrilog init`.

use crate::food::{FoodRecord, Nutrients};

fn curated(name: &str, kcal: f64, protein: f64, carbs: f64, fat: f64) -> FoodRecord {
    FoodRecord::new(name, Nutrients::new(kcal, protein, carbs, fat)).verified(true)
}

/// The curated foods, in catalog order. Ids are unassigned.
pub fn seed_catalog() -> Vec<FoodRecord> {
    vec![
        curated("Chicken breast, roasted", 165.0, 31.0, 0.0, 3.6)
            .with_tags(["poultry", "meat", "protein"])
            .with_serving("1 breast", 120.0)
            .with_serving("1 oz", 28.35),
        curated("Chicken thigh, roasted", 209.0, 26.0, 0.0, 10.9)
            .with_tags(["poultry", "meat"])
            .with_serving("1 thigh", 52.0),
        curated("Egg, whole, boiled", 155.0, 12.6, 1.1, 10.6)
            .with_tags(["eggs", "breakfast", "protein"])
            .with_serving("1 large", 50.0),
        curated("Salmon, atlantic, baked", 206.0, 22.1, 0.0, 12.4)
            .with_tags(["fish", "seafood", "omega-3"])
            .with_serving("1 fillet", 154.0),
        curated("Tuna, canned in water", 116.0, 25.5, 0.0, 0.8)
            .with_tags(["fish", "seafood", "pantry"])
            .with_serving("1 can", 142.0),
        curated("Greek yogurt, plain, nonfat", 59.0, 10.2, 3.6, 0.4)
            .with_tags(["dairy", "breakfast"])
            .with_serving("1 cup", 245.0),
        curated("Milk, whole", 61.0, 3.2, 4.8, 3.3)
            .with_tags(["dairy", "drink"])
            .with_serving("1 cup", 244.0),
        curated("Cheddar cheese", 403.0, 24.9, 1.3, 33.1)
            .with_tags(["dairy", "cheese"])
            .with_serving("1 slice", 28.0),
        curated("Rice, white, cooked", 130.0, 2.7, 28.2, 0.3)
            .with_tags(["grain", "carbs"])
            .with_serving("1 cup", 158.0),
        curated("Rice, brown, cooked", 123.0, 2.7, 25.6, 1.0)
            .with_tags(["grain", "carbs", "whole grain"])
            .with_serving("1 cup", 195.0),
        curated("Oats, rolled, dry", 379.0, 13.2, 67.7, 6.5)
            .with_tags(["grain", "breakfast"])
            .with_serving("1/2 cup", 40.0),
        curated("Bread, whole wheat", 247.0, 13.0, 41.0, 3.4)
            .with_tags(["grain", "bakery"])
            .with_serving("1 slice", 32.0),
        curated("Pasta, cooked", 158.0, 5.8, 30.9, 0.9)
            .with_tags(["grain", "carbs"])
            .with_serving("1 cup", 140.0),
        curated("Potato, baked, with skin", 93.0, 2.5, 21.2, 0.1)
            .with_tags(["vegetable", "carbs"])
            .with_serving("1 medium", 173.0),
        curated("Sweet potato, baked", 90.0, 2.0, 20.7, 0.2)
            .with_tags(["vegetable", "carbs"])
            .with_serving("1 medium", 114.0),
        curated("Broccoli, steamed", 35.0, 2.4, 7.2, 0.4)
            .with_tags(["vegetable", "greens"])
            .with_serving("1 cup", 156.0),
        curated("Spinach, raw", 23.0, 2.9, 3.6, 0.4)
            .with_tags(["vegetable", "greens", "salad"])
            .with_serving("1 cup", 30.0),
        curated("Banana", 89.0, 1.1, 22.8, 0.3)
            .with_tags(["fruit"])
            .with_serving("1 medium", 118.0),
        curated("Apple", 52.0, 0.3, 13.8, 0.2)
            .with_tags(["fruit"])
            .with_serving("1 medium", 182.0),
        curated("Blueberries", 57.0, 0.7, 14.5, 0.3)
            .with_tags(["fruit", "berries"])
            .with_serving("1 cup", 148.0),
        curated("Avocado", 160.0, 2.0, 8.5, 14.7)
            .with_tags(["fruit", "healthy fats"])
            .with_serving("1/2 fruit", 68.0),
        curated("Almonds", 579.0, 21.2, 21.6, 49.9)
            .with_tags(["nuts", "snack", "healthy fats"])
            .with_serving("1 oz", 28.0),
        curated("Peanut butter", 588.0, 25.1, 20.0, 50.4)
            .with_tags(["nuts", "spread"])
            .with_serving("2 tbsp", 32.0),
        curated("Olive oil", 884.0, 0.0, 0.0, 100.0)
            .with_tags(["oil", "healthy fats"])
            .with_serving("1 tbsp", 13.5),
        curated("Lentils, boiled", 116.0, 9.0, 20.1, 0.4)
            .with_tags(["legumes", "protein", "vegan"])
            .with_serving("1 cup", 198.0),
        curated("Chickpeas, canned", 139.0, 7.0, 22.5, 2.6)
            .with_tags(["legumes", "vegan", "pantry"])
            .with_serving("1 cup", 240.0),
        curated("Tofu, firm", 144.0, 17.3, 2.8, 8.7)
            .with_tags(["soy", "protein", "vegan"])
            .with_serving("1/2 cup", 126.0),
        curated("Dark chocolate, 70-85%", 598.0, 7.8, 45.9, 42.6)
            .with_tags(["sweets", "snack"])
            .with_serving("1 square", 10.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::{validate_catalog, FoodId};

    #[test]
    fn test_seed_catalog_is_valid() {
        let records: Vec<FoodRecord> = seed_catalog()
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.with_id(FoodId(i as u64 + 1)))
            .collect();
        assert!(validate_catalog(&records).is_ok());
    }

    #[test]
    fn test_seed_catalog_has_servings() {
        assert!(seed_catalog().iter().all(|r| !r.servings.is_empty()));
    }
}
