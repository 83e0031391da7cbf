use crate::adapters::{decode_json, endpoint, error_for_status};
use crate::config::toml_config::NutritionixConfig;
use crate::core::chunker::nutrition_grid;
use crate::core::normalizer::normalize;
use crate::domain::model::{NutrientFact, ProductSummary, ProviderSource};
use crate::domain::ports::BarcodeProvider;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "nutritionix";

/// Nutritionix `attr_id` codes (USDA nutrient numbers) we surface, with display name and unit.
const ATTRIBUTES: &[(u32, &str, &str)] = &[
    (203, "Protein", "g"),
    (204, "Total lipid (fat)", "g"),
    (205, "Carbohydrate, by difference", "g"),
    (208, "Energy", "kcal"),
    (269, "Total Sugars", "g"),
    (291, "Fiber, total dietary", "g"),
    (301, "Calcium, Ca", "mg"),
    (303, "Iron, Fe", "mg"),
    (307, "Sodium, Na", "mg"),
    (318, "Vitamin A, IU", "IU"),
    (401, "Vitamin C, total ascorbic acid", "mg"),
    (601, "Cholesterol", "mg"),
    (605, "Fatty acids, total trans", "g"),
    (606, "Fatty acids, total saturated", "g"),
];

pub fn attribute(attr_id: u32) -> Option<(&'static str, &'static str)> {
    ATTRIBUTES
        .iter()
        .find(|(id, _, _)| *id == attr_id)
        .map(|(_, name, unit)| (*name, *unit))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub foods: Vec<NutritionixFood>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NutritionixFood {
    pub food_name: Option<String>,
    pub brand_name: Option<String>,
    pub nf_ingredient_statement: Option<String>,
    pub serving_qty: Option<f64>,
    pub serving_unit: Option<String>,
    pub serving_weight_grams: Option<f64>,
    #[serde(default)]
    pub full_nutrients: Vec<FullNutrient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullNutrient {
    pub attr_id: u32,
    pub value: Option<f64>,
}

impl NutritionixFood {
    /// Unmapped attribute IDs are dropped.
    fn nutrient_facts(&self) -> Vec<NutrientFact> {
        self.full_nutrients
            .iter()
            .filter_map(|n| {
                attribute(n.attr_id)
                    .map(|(name, unit)| NutrientFact::new(name, n.value.unwrap_or_default(), unit))
            })
            .collect()
    }

    fn serving_size_label(&self) -> String {
        match (
            self.serving_qty.filter(|q| *q > 0.0),
            self.serving_unit.as_deref().filter(|u| !u.is_empty()),
            self.serving_weight_grams.filter(|w| *w > 0.0),
        ) {
            (Some(qty), Some(unit), Some(weight)) => format!("{} {} ({:.0}g)", qty, unit, weight),
            _ => "N/A".to_string(),
        }
    }

    pub fn into_summary(self) -> ProductSummary {
        ProductSummary {
            nutrition: nutrition_grid(normalize(self.nutrient_facts())),
            serving_size: self.serving_size_label(),
            name: self.food_name.unwrap_or_default(),
            brand: self.brand_name.unwrap_or_default(),
            ingredients: self.nf_ingredient_statement.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct NutritionixClient {
    client: Client,
    base_url: String,
    app_id: String,
    api_key: String,
}

impl NutritionixClient {
    pub fn new(client: Client, config: &NutritionixConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            app_id: config.app_id.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl BarcodeProvider for NutritionixClient {
    fn source(&self) -> ProviderSource {
        ProviderSource::Nutritionix
    }

    async fn lookup(&self, barcode: &str) -> Result<Option<ProductSummary>> {
        let url = endpoint(&self.base_url, "search/item");
        tracing::debug!("Making Nutritionix request to: {}", url);

        let response = self
            .client
            .get(&url)
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.api_key)
            .query(&[("upc", barcode)])
            .send()
            .await
            .map_err(|e| GatewayError::upstream(PROVIDER, format!("Request failed: {}", e)))?;

        let response = error_for_status(PROVIDER, response).await?;
        let data: SearchResponse = decode_json(PROVIDER, response).await?;

        Ok(data.foods.into_iter().next().map(NutritionixFood::into_summary))
    }
}
