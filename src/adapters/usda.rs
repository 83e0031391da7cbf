use crate::adapters::{decode_json, endpoint, error_for_status};
use crate::config::toml_config::UsdaConfig;
use crate::core::chunker::nutrition_grid;
use crate::core::normalizer::normalize;
use crate::domain::model::{
    FoodDataType, NutrientFact, ProductSummary, ProviderSource, ScanCandidate,
};
use crate::domain::ports::{BarcodeProvider, FoodSearch};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "usda";

/// Data sets searched when looking up a classifier label.
const SCAN_DATA_TYPES: &str = "Survey (FNDDS),Branded";

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub foods: Vec<UsdaFood>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaFood {
    pub data_type: Option<String>,
    pub description: Option<String>,
    pub brand_owner: Option<String>,
    pub ingredients: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_size_unit: Option<String>,
    pub package_weight: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<UsdaNutrient>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaNutrient {
    pub nutrient_name: Option<String>,
    pub value: Option<f64>,
    pub unit_name: Option<String>,
}

impl UsdaFood {
    fn nutrient_facts(&self) -> Vec<NutrientFact> {
        self.food_nutrients
            .iter()
            .map(|n| {
                NutrientFact::new(
                    n.nutrient_name.clone().unwrap_or_default(),
                    n.value.unwrap_or_default(),
                    n.unit_name.clone().unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Size and unit run together ("28g"), which is what existing clients display.
    fn serving_size_label(&self) -> String {
        format!(
            "{}{}",
            self.serving_size.unwrap_or_default(),
            self.serving_size_unit.as_deref().unwrap_or_default()
        )
    }

    pub fn into_summary(self) -> ProductSummary {
        ProductSummary {
            nutrition: nutrition_grid(normalize(self.nutrient_facts())),
            serving_size: self.serving_size_label(),
            name: self.description.unwrap_or_default(),
            brand: self.brand_owner.unwrap_or_default(),
            ingredients: self.ingredients.unwrap_or_default(),
        }
    }

    pub fn into_candidate(self) -> ScanCandidate {
        ScanCandidate {
            nutrients: self.nutrient_facts(),
            data_type: FoodDataType::parse(self.data_type.as_deref().unwrap_or_default()),
            description: self.description.unwrap_or_default(),
            ingredients: self.ingredients.unwrap_or_default(),
            serving_size: self.serving_size.unwrap_or_default(),
            serving_size_unit: self.serving_size_unit.unwrap_or_default(),
            package_weight: self.package_weight.unwrap_or_default(),
        }
    }
}

/// FoodData Central search client.
#[derive(Clone)]
pub struct UsdaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl UsdaClient {
    pub fn new(client: Client, config: &UsdaConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn search(&self, query: &[(&str, &str)]) -> Result<SearchResponse> {
        let url = endpoint(&self.base_url, "foods/search");
        tracing::debug!("Making USDA request to: {}", url);

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::upstream(PROVIDER, format!("Request failed: {}", e)))?;

        let response = error_for_status(PROVIDER, response).await?;
        decode_json(PROVIDER, response).await
    }
}

#[async_trait]
impl BarcodeProvider for UsdaClient {
    fn source(&self) -> ProviderSource {
        ProviderSource::Usda
    }

    async fn lookup(&self, barcode: &str) -> Result<Option<ProductSummary>> {
        let data = self.search(&[("query", barcode)]).await?;
        Ok(data.foods.into_iter().next().map(UsdaFood::into_summary))
    }
}

#[async_trait]
impl FoodSearch for UsdaClient {
    async fn search_label(&self, label: &str) -> Result<Vec<ScanCandidate>> {
        let data = self
            .search(&[("query", label), ("dataType", SCAN_DATA_TYPES)])
            .await
            .map_err(|e| {
                tracing::error!("USDA label search failed: {}", e);
                GatewayError::upstream(PROVIDER, "Failed to fetch data from USDA API")
            })?;

        tracing::debug!("USDA foods found: {}", data.foods.len());
        Ok(data.foods.into_iter().map(UsdaFood::into_candidate).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> UsdaClient {
        UsdaClient::new(
            Client::new(),
            &UsdaConfig {
                base_url: server.base_url(),
                api_key: "usda-key".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_lookup_maps_first_food() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/foods/search")
                    .query_param("query", "041196910759")
                    .header("x-api-key", "usda-key");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({
                        "foods": [
                            {
                                "description": "TOMATO SOUP",
                                "brandOwner": "Progresso",
                                "ingredients": "WATER, TOMATO PUREE",
                                "servingSize": 245.0,
                                "servingSizeUnit": "g",
                                "foodNutrients": [
                                    {"nutrientName": "Protein", "value": 2.04, "unitName": "G"},
                                    {"nutrientName": "Fatty acids, total saturated", "value": 0.2, "unitName": "G"},
                                    {"nutrientName": "Vitamin B-12", "value": 0.0, "unitName": "UG"}
                                ]
                            },
                            {"description": "SECOND MATCH"}
                        ]
                    }));
            })
            .await;

        let summary = client_for(&server)
            .lookup("041196910759")
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(summary.name, "TOMATO SOUP");
        assert_eq!(summary.brand, "Progresso");
        assert_eq!(summary.serving_size, "245g");
        assert_eq!(summary.nutrition.len(), 1);
        assert_eq!(summary.nutrition[0].len(), 2);
        assert_eq!(summary.nutrition[0][1].name, "Saturated Fats");
    }

    #[tokio::test]
    async fn test_lookup_empty_foods_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/foods/search");
                then.status(200).json_body(serde_json::json!({"foods": []}));
            })
            .await;

        let result = client_for(&server).lookup("000").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_lookup_error_status_is_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/foods/search");
                then.status(403).body("API_KEY_INVALID");
            })
            .await;

        let err = client_for(&server).lookup("000").await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamError { ref message, .. } if message.contains("403")));
    }

    #[tokio::test]
    async fn test_search_label_restricts_data_types() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/foods/search")
                    .query_param("query", "hotdog")
                    .query_param("dataType", "Survey (FNDDS),Branded");
                then.status(200).json_body(serde_json::json!({
                    "foods": [
                        {"dataType": "Branded", "description": "BEEF FRANKS", "packageWeight": "12 oz/340 g"},
                        {"dataType": "Survey (FNDDS)", "description": "Hot dog, plain"}
                    ]
                }));
            })
            .await;

        let candidates = client_for(&server).search_label("hotdog").await.unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].data_type, FoodDataType::Branded);
        assert_eq!(candidates[0].package_weight, "12 oz/340 g");
        assert_eq!(candidates[1].data_type, FoodDataType::SurveyFndds);
        assert_eq!(candidates[1].description, "Hot dog, plain");
    }

    #[test]
    fn test_serving_size_label_runs_size_and_unit_together() {
        let food = UsdaFood {
            serving_size: Some(28.5),
            serving_size_unit: Some("g".to_string()),
            ..UsdaFood::default()
        };
        assert_eq!(food.serving_size_label(), "28.5g");

        assert_eq!(UsdaFood::default().serving_size_label(), "0");
    }
}
