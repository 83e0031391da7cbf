use serde::{Deserialize, Serialize};

/// A nutrient as reported by a provider, before filtering or renaming.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientFact {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

impl NutrientFact {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNutrient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Nutrients grouped into fixed-width rows for display.
pub type NutritionGrid = Vec<Vec<NormalizedNutrient>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub name: String,
    pub brand: String,
    pub ingredients: String,
    pub nutrition: NutritionGrid,
    pub serving_size: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub food_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionGrid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
}

/// One label from the image classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// USDA data set a scan candidate was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoodDataType {
    SurveyFndds,
    Branded,
    Other(String),
}

impl FoodDataType {
    pub const SURVEY_FNDDS: &'static str = "Survey (FNDDS)";
    pub const BRANDED: &'static str = "Branded";

    pub fn parse(raw: &str) -> Self {
        match raw {
            Self::SURVEY_FNDDS => Self::SurveyFndds,
            Self::BRANDED => Self::Branded,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A food record returned when searching by a classifier label.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCandidate {
    pub data_type: FoodDataType,
    pub description: String,
    pub ingredients: String,
    pub serving_size: f64,
    pub serving_size_unit: String,
    pub package_weight: String,
    pub nutrients: Vec<NutrientFact>,
}

/// Which provider in the barcode chain produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSource {
    Usda,
    Nutritionix,
    OpenFoodFacts,
}

impl ProviderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usda => "usda",
            Self::Nutritionix => "nutritionix",
            Self::OpenFoodFacts => "open_food_facts",
        }
    }

    /// Response message clients already key off.
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Usda => "Barcode data received successfully",
            Self::Nutritionix => "Barcode data received successfully from Nutritionix",
            Self::OpenFoodFacts => "Barcode data received successfully from Open Food Facts",
        }
    }
}

impl std::fmt::Display for ProviderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub source: ProviderSource,
    pub summary: ProductSummary,
}
