// Application layer: wires configured adapters into the two public operations.

use crate::adapters::build_http_client;
use crate::adapters::huggingface::HuggingFaceClassifier;
use crate::adapters::nutritionix::NutritionixClient;
use crate::adapters::open_food_facts::OpenFoodFactsClient;
use crate::adapters::usda::UsdaClient;
use crate::config::GatewayConfig;
use crate::core::resolver::BarcodeResolver;
use crate::core::scanner::FoodScanner;
use crate::domain::model::{Resolution, ScanResult};
use crate::domain::ports::BarcodeProvider;
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;

pub struct Gateway {
    resolver: BarcodeResolver,
    scanner: FoodScanner,
}

impl Gateway {
    pub fn new(resolver: BarcodeResolver, scanner: FoodScanner) -> Self {
        Self { resolver, scanner }
    }

    /// USDA, then Nutritionix, then Open Food Facts; image scans go classifier then USDA.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        let usda = Arc::new(UsdaClient::new(client.clone(), &config.usda));

        let providers: Vec<Arc<dyn BarcodeProvider>> = vec![
            usda.clone(),
            Arc::new(NutritionixClient::new(client.clone(), &config.nutritionix)),
            Arc::new(OpenFoodFactsClient::new(client.clone(), &config.open_food_facts)),
        ];

        let classifier = Arc::new(HuggingFaceClassifier::new(client, &config.huggingface));

        Ok(Self::new(
            BarcodeResolver::new(providers),
            FoodScanner::new(classifier, usda),
        ))
    }

    pub async fn resolve_by_barcode(&self, barcode: &str) -> Result<Resolution> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(GatewayError::invalid_input("No barcode data provided"));
        }
        self.resolver.resolve(barcode).await
    }

    pub async fn resolve_by_image(&self, image: &[u8]) -> Result<ScanResult> {
        if image.is_empty() {
            return Err(GatewayError::invalid_input("No image provided"));
        }
        self.scanner.scan(image).await
    }
}
