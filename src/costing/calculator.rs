//! Material cost calculation
//!
//! Converts a purchase quantity and a recipe quantity into a shared base unit
//! and prices the recipe quantity from the purchase price.

use serde::Serialize;

use super::units::{is_recognized, lookup_unit, UnitCategory};

/// Convert an amount in the given unit into its category's base unit.
///
/// Mass goes to grams, length to centimeters. Unrecognized units are
/// treated as countable and returned unchanged. The amount is not validated.
pub fn normalize(amount: f64, unit: &str) -> f64 {
    amount * lookup_unit(unit).factor
}

/// Round a currency value to two decimal places.
///
/// Rounds the exact binary value, ties to even, so `1.115` (stored as
/// 1.11499999...) becomes 1.11. Scaling by 100 first would round twice.
pub fn round_to_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Cost of the recipe quantity of a material, given what was paid for the
/// purchase quantity.
///
/// Example: bought 5 lb for 20.00, a recipe uses 4 oz.
///
/// Both quantities are normalized independently; units from different
/// categories are not rejected. A purchase quantity that normalizes to zero
/// yields 0.0.
pub fn calculate_material_cost(
    purchase_price: f64,
    purchase_amount: f64,
    purchase_unit: &str,
    recipe_amount: f64,
    recipe_unit: &str,
) -> f64 {
    let purchased = normalize(purchase_amount, purchase_unit);
    let used = normalize(recipe_amount, recipe_unit);

    if purchased == 0.0 {
        return 0.0;
    }

    let cost_per_base_unit = purchase_price / purchased;
    round_to_cents(cost_per_base_unit * used)
}

/// Two recognized units that belong to different physical categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMismatch {
    pub purchase_unit: String,
    pub purchase_category: UnitCategory,
    pub recipe_unit: String,
    pub recipe_category: UnitCategory,
}

/// Report a category mismatch between two units, if there is one.
///
/// Only recognized mass/length units are compared. A countable or unknown
/// unit on either side never counts as a mismatch.
pub fn check_compatibility(purchase_unit: &str, recipe_unit: &str) -> Option<CategoryMismatch> {
    if !is_recognized(purchase_unit) || !is_recognized(recipe_unit) {
        return None;
    }

    let purchase_category = lookup_unit(purchase_unit).category;
    let recipe_category = lookup_unit(recipe_unit).category;
    if purchase_category == recipe_category {
        return None;
    }

    Some(CategoryMismatch {
        purchase_unit: purchase_unit.trim().to_string(),
        purchase_category,
        recipe_unit: recipe_unit.trim().to_string(),
        recipe_category,
    })
}
