//! Utility to price a recipe quantity from the command line
//!
//! Usage: material_cost <price> <purchase_amount> <purchase_unit> <recipe_amount> <recipe_unit>
//! Example: material_cost 20 5 lb 4 oz

use marketlens::costing::{calculate_material_cost, check_compatibility, normalize};

fn parse_number(label: &str, raw: &str) -> Result<f64, String> {
    raw.parse()
        .map_err(|e| format!("Invalid {label} '{raw}': {e}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [price, purchase_amount, purchase_unit, recipe_amount, recipe_unit] = args.as_slice() else {
        eprintln!("Usage: material_cost <price> <purchase_amount> <purchase_unit> <recipe_amount> <recipe_unit>");
        std::process::exit(2);
    };

    let price = parse_number("price", price)?;
    let purchase_amount = parse_number("purchase_amount", purchase_amount)?;
    let recipe_amount = parse_number("recipe_amount", recipe_amount)?;

    if let Some(mismatch) = check_compatibility(purchase_unit, recipe_unit) {
        eprintln!(
            "Warning: '{}' is {} but '{}' is {}",
            mismatch.purchase_unit,
            mismatch.purchase_category.as_str(),
            mismatch.recipe_unit,
            mismatch.recipe_category.as_str()
        );
    }

    let cost = calculate_material_cost(price, purchase_amount, purchase_unit, recipe_amount, recipe_unit);

    println!("Purchased: {} base units", normalize(purchase_amount, purchase_unit));
    println!("Used:      {} base units", normalize(recipe_amount, recipe_unit));
    println!("Cost:      {:.2}", cost);

    Ok(())
}
