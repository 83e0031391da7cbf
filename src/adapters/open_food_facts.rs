use crate::adapters::{decode_json, error_for_status};
use crate::config::toml_config::OpenFoodFactsConfig;
use crate::core::chunker::nutrition_grid;
use crate::domain::model::{NormalizedNutrient, ProductSummary, ProviderSource};
use crate::domain::ports::BarcodeProvider;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

const PROVIDER: &str = "open_food_facts";

/// Nutriment keys surfaced to clients, in display order.
const NUTRIMENT_KEYS: &[&str] = &[
    "energy-kcal",
    "fat",
    "saturated-fat",
    "trans-fat",
    "cholesterol",
    "carbohydrates",
    "sugars",
    "fiber",
    "proteins",
    "salt",
    "sodium",
    "vitamin-a",
    "vitamin-c",
    "vitamin-d",
    "calcium",
    "iron",
    "potassium",
];

const DEFAULT_UNIT: &str = "g";

#[derive(Debug, Default, Deserialize)]
pub struct ProductResponse {
    pub product: Option<OffProduct>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct OffProduct {
    pub product_name: Option<String>,
    pub brands: Option<String>,
    pub ingredients_text: Option<String>,
    pub serving_size: Option<String>,
    /// Free-form: `<key>` holds the amount, `<key>_unit` the unit, plus many per-100g variants.
    #[serde(default)]
    pub nutriments: HashMap<String, Value>,
}

impl OffProduct {
    fn is_named(&self) -> bool {
        self.product_name.as_deref().is_some_and(|n| !n.is_empty())
    }

    pub fn into_summary(self) -> ProductSummary {
        ProductSummary {
            nutrition: nutrition_grid(format_nutriments(&self.nutriments)),
            name: self.product_name.unwrap_or_default(),
            brand: self.brands.unwrap_or_default(),
            ingredients: self.ingredients_text.unwrap_or_default(),
            serving_size: self.serving_size.unwrap_or_default(),
        }
    }
}

/// Pick the allow-listed nutriments with a positive numeric amount.
pub fn format_nutriments(nutriments: &HashMap<String, Value>) -> Vec<NormalizedNutrient> {
    NUTRIMENT_KEYS
        .iter()
        .filter_map(|key| {
            let amount = nutriments.get(*key)?.as_f64().filter(|a| *a > 0.0)?;
            let unit = nutriments
                .get(&format!("{}_unit", key))
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_UNIT);

            Some(NormalizedNutrient {
                name: display_name(key),
                amount,
                unit: unit.to_string(),
            })
        })
        .collect()
}

/// "saturated-fat" -> "Saturated Fat"
fn display_name(key: &str) -> String {
    key.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[derive(Clone)]
pub struct OpenFoodFactsClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl OpenFoodFactsClient {
    pub fn new(client: Client, config: &OpenFoodFactsConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn product_url(&self, barcode: &str) -> Result<Url> {
        let file_name = format!("{}.json", barcode);
        let mut url = Url::parse(&self.base_url).map_err(|e| GatewayError::ConfigError {
            message: format!("Invalid Open Food Facts base URL: {}", e),
        })?;

        url.path_segments_mut()
            .map_err(|_| GatewayError::ConfigError {
                message: "Open Food Facts base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "v2", "product", file_name.as_str()]);

        Ok(url)
    }
}

#[async_trait]
impl BarcodeProvider for OpenFoodFactsClient {
    fn source(&self) -> ProviderSource {
        ProviderSource::OpenFoodFacts
    }

    async fn lookup(&self, barcode: &str) -> Result<Option<ProductSummary>> {
        let url = self.product_url(barcode)?;
        tracing::debug!("Making Open Food Facts request to: {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| GatewayError::upstream(PROVIDER, format!("Request failed: {}", e)))?;

        let response = error_for_status(PROVIDER, response).await?;
        let data: ProductResponse = decode_json(PROVIDER, response).await?;

        Ok(data
            .product
            .filter(OffProduct::is_named)
            .map(OffProduct::into_summary))
    }
}
