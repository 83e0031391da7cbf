// Adapters layer: one module per external provider, each decoding its own typed payload
// into the domain shapes.

pub mod huggingface;
pub mod nutritionix;
pub mod open_food_facts;
pub mod usda;

use crate::config::GatewayConfig;
use crate::utils::error::{GatewayError, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Longest slice of an error body kept in logs and messages.
const MAX_ERROR_BODY: usize = 512;

/// Shared outbound client; every provider call is bounded by the configured timeout.
pub fn build_http_client(config: &GatewayConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.http.user_agent.clone())
        .build()
        .map_err(GatewayError::ApiError)
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Returns the body text of a non-success response as an upstream error.
pub(crate) async fn error_for_status(provider: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(MAX_ERROR_BODY).collect();
    tracing::debug!("{} responded with {}: {}", provider, status, body);

    Err(GatewayError::upstream(
        provider,
        format!("HTTP {}: {}", status.as_u16(), body),
    ))
}

pub(crate) async fn decode_json<T: DeserializeOwned>(provider: &str, response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        GatewayError::upstream(provider, format!("Undecodable response body: {}", e))
    })
}
