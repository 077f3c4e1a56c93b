//! Unit categories and conversion constants
//!
//! Every recognized alias maps to exactly one category and one fixed factor
//! into that category's base unit. Unknown aliases are countable (factor 1).

use serde::{Deserialize, Serialize};

/// Physical category of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Mass units, normalized to grams
    Mass,
    /// Length units, normalized to centimeters
    Length,
    /// Count/each and anything unrecognized (identity)
    Count,
}

impl UnitCategory {
    /// Canonical base unit for this category
    pub fn base_unit(&self) -> &'static str {
        match self {
            UnitCategory::Mass => "g",
            UnitCategory::Length => "cm",
            UnitCategory::Count => "each",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Mass => "mass",
            UnitCategory::Length => "length",
            UnitCategory::Count => "count",
        }
    }
}

// ============================================================================
// Mass Conversion Constants (to grams)
// ============================================================================

/// Grams per pound
pub const G_PER_LB: f64 = 453.592;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;

// ============================================================================
// Length Conversion Constants (to centimeters)
// ============================================================================

/// Centimeters per meter
pub const CM_PER_M: f64 = 100.0;
/// Centimeters per inch
pub const CM_PER_IN: f64 = 2.54;
/// Centimeters per foot
pub const CM_PER_FT: f64 = 30.48;

/// A recognized unit: its category and factor into the base unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSpec {
    pub category: UnitCategory,
    pub factor: f64,
}

impl UnitSpec {
    const fn new(category: UnitCategory, factor: f64) -> Self {
        Self { category, factor }
    }

    /// Identity spec used for countable and unrecognized units
    pub const COUNT: UnitSpec = UnitSpec::new(UnitCategory::Count, 1.0);
}

// ============================================================================
// Unit Recognition
// ============================================================================

/// Look up a recognized alias (expects an already lower-cased, trimmed key)
fn recognized(alias: &str) -> Option<UnitSpec> {
    use UnitCategory::{Length, Mass};

    let spec = match alias {
        "lb" | "lbs" | "pound" | "pounds" => UnitSpec::new(Mass, G_PER_LB),
        "oz" | "ounce" | "ounces" => UnitSpec::new(Mass, G_PER_OZ),
        "kg" | "kilogram" => UnitSpec::new(Mass, G_PER_KG),
        "g" | "gram" => UnitSpec::new(Mass, 1.0),

        "m" | "meter" => UnitSpec::new(Length, CM_PER_M),
        "in" | "inch" | "inches" => UnitSpec::new(Length, CM_PER_IN),
        "ft" | "foot" | "feet" => UnitSpec::new(Length, CM_PER_FT),

        _ => return None,
    };

    Some(spec)
}

/// Normalize a raw unit string into a lookup key
pub fn unit_key(unit: &str) -> String {
    unit.trim().to_lowercase()
}

/// Whether the unit string is one of the recognized mass or length aliases
pub fn is_recognized(unit: &str) -> bool {
    recognized(&unit_key(unit)).is_some()
}

/// Resolve a unit string to its category and factor.
///
/// Unrecognized units (including the empty string) resolve to
/// [`UnitSpec::COUNT`].
pub fn lookup_unit(unit: &str) -> UnitSpec {
    recognized(&unit_key(unit)).unwrap_or(UnitSpec::COUNT)
}

/// Determine the category of a unit string
pub fn categorize_unit(unit: &str) -> UnitCategory {
    lookup_unit(unit).category
}

/// Conversion factor from the unit into its category's base unit
pub fn base_factor(unit: &str) -> f64 {
    lookup_unit(unit).factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_mass_units() {
        for unit in ["lb", "lbs", "pound", "pounds", "oz", "ounce", "ounces", "kg", "kilogram", "g", "gram"] {
            assert_eq!(categorize_unit(unit), UnitCategory::Mass, "unit {unit}");
        }
    }

    #[test]
    fn test_categorize_length_units() {
        for unit in ["m", "meter", "in", "inch", "inches", "ft", "foot", "feet"] {
            assert_eq!(categorize_unit(unit), UnitCategory::Length, "unit {unit}");
        }
    }

    #[test]
    fn test_categorize_count_units() {
        assert_eq!(categorize_unit("each"), UnitCategory::Count);
        assert_eq!(categorize_unit("widget"), UnitCategory::Count);
        assert_eq!(categorize_unit(""), UnitCategory::Count);
        // "grams" and "kilograms" are not in the alias table
        assert_eq!(categorize_unit("grams"), UnitCategory::Count);
        assert_eq!(categorize_unit("kilograms"), UnitCategory::Count);
    }

    #[test]
    fn test_base_factor() {
        assert_eq!(base_factor("lb"), G_PER_LB);
        assert_eq!(base_factor("oz"), G_PER_OZ);
        assert_eq!(base_factor("ft"), CM_PER_FT);
        assert_eq!(base_factor("spool"), 1.0);
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        assert_eq!(lookup_unit("  KG "), lookup_unit("kg"));
        assert_eq!(lookup_unit("\tInches\n"), lookup_unit("inches"));
        assert!(is_recognized(" Feet"));
        assert!(!is_recognized("yard"));
    }

    #[test]
    fn test_base_units() {
        assert_eq!(UnitCategory::Mass.base_unit(), "g");
        assert_eq!(UnitCategory::Length.base_unit(), "cm");
        assert_eq!(UnitCategory::Count.base_unit(), "each");
    }
}
