use crate::adapters::endpoint;
use crate::config::toml_config::HuggingFaceConfig;
use crate::domain::model::Prediction;
use crate::domain::ports::ImageClassifier;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

const PROVIDER: &str = "huggingface";

/// Image classification through the Hugging Face inference API.
#[derive(Clone)]
pub struct HuggingFaceClassifier {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HuggingFaceClassifier {
    pub fn new(client: Client, config: &HuggingFaceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl ImageClassifier for HuggingFaceClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>> {
        let url = endpoint(&self.base_url, &format!("models/{}", self.model));
        tracing::debug!("Sending {} image bytes to {}", image.len(), url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| {
                GatewayError::upstream(
                    PROVIDER,
                    format!("Failed to fetch data from Hugging Face: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Hugging Face API error {}: {}", status, body);
            return Err(GatewayError::upstream(
                PROVIDER,
                format!("Failed to fetch data from Hugging Face: {}", body),
            ));
        }

        // an unexpected payload means nothing was recognised, not an outage
        let bytes = response.bytes().await?;
        let mut predictions: Vec<Prediction> = match serde_json::from_slice(&bytes) {
            Ok(predictions) => predictions,
            Err(e) => {
                tracing::warn!("Unreadable Hugging Face predictions: {}", e);
                Vec::new()
            }
        };

        predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(predictions)
    }
}
