//! Material costing module
//!
//! Unit normalization and recipe cost calculation.

pub mod calculator;
pub mod units;

pub use calculator::{
    calculate_material_cost, check_compatibility, normalize, round_to_cents, CategoryMismatch,
};
pub use units::{base_factor, categorize_unit, is_recognized, lookup_unit, UnitCategory, UnitSpec};
