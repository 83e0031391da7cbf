use crate::domain::model::{NormalizedNutrient, NutrientFact};

/// Amounts below this are treated as noise and dropped.
pub const MIN_NUTRIENT_AMOUNT: f64 = 0.1;

/// Raw provider labels (compared lower-cased) and the display names they collapse to.
const CANONICAL_NAMES: &[(&str, &str)] = &[
    ("fatty acids, total saturated", "Saturated Fats"),
    ("fatty acids, total trans", "Trans Fats"),
    ("vitamin d (d2 + d3), international units", "Vitamin D2 + D3"),
    ("potassium, k", "Potassium"),
    ("sodium, na", "Sodium"),
    ("calcium, ca", "Calcium"),
    ("iron, fe", "Iron"),
    ("fiber, total dietary", "Dietary Fiber"),
    ("total sugars", "Sugar"),
    ("carbohydrate, by difference", "Carbohydrates"),
];

/// Filter out negligible amounts, then rename to canonical display names.
pub fn normalize(facts: Vec<NutrientFact>) -> Vec<NormalizedNutrient> {
    facts
        .into_iter()
        .filter(|fact| fact.value >= MIN_NUTRIENT_AMOUNT)
        .map(|fact| NormalizedNutrient {
            name: canonical_name(&fact.name),
            amount: fact.value,
            unit: fact.unit,
        })
        .collect()
}

/// Unknown names pass through with their original casing.
pub fn canonical_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    CANONICAL_NAMES
        .iter()
        .find(|(from, _)| *from == lowered)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| raw.to_string())
}
