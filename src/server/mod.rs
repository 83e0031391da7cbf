pub mod keepalive;

use crate::app::Gateway;
use crate::domain::model::{ProductSummary, ScanResult};
use crate::utils::error::{ErrorKind, GatewayError, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tower_http::trace::TraceLayer;

pub const APP_KEY_HEADER: &str = "x-app-key";

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub app_key: Arc<str>,
}

impl AppState {
    pub fn new(gateway: Arc<Gateway>, app_key: impl Into<Arc<str>>) -> Self {
        Self {
            gateway,
            app_key: app_key.into(),
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<()> {
        let presented = headers
            .get(APP_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let matches: bool = presented.as_bytes().ct_eq(self.app_key.as_bytes()).into();
        if self.app_key.is_empty() || !matches {
            tracing::warn!("Rejected request with missing or wrong app key");
            return Err(GatewayError::UnauthorizedError);
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeRequest {
    #[serde(default)]
    pub barcode_data: String,
}

#[derive(Deserialize)]
pub struct FoodScanRequest {
    #[serde(default)]
    pub image: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Upstream | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.user_friendly_message()).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/barcode", post(barcode))
        .route("/foodscan", post(food_scan))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> Result<()> {
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn index() -> &'static str {
    "Welcome to the NutriSight API!"
}

async fn barcode(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<ProductSummary>>> {
    state.authorize(&headers)?;

    let barcode = match parse_body::<BarcodeRequest>(&body) {
        Some(req) if !req.barcode_data.trim().is_empty() => req.barcode_data,
        _ => return Err(GatewayError::invalid_input("No barcode data provided")),
    };

    let resolution = state.gateway.resolve_by_barcode(&barcode).await?;
    Ok(Json(ApiResponse {
        message: resolution.source.success_message().to_string(),
        data: resolution.summary,
    }))
}

async fn food_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<ScanResult>>> {
    state.authorize(&headers)?;

    let encoded = match parse_body::<FoodScanRequest>(&body) {
        Some(req) if !req.image.trim().is_empty() => req.image,
        _ => return Err(GatewayError::invalid_input("No image provided")),
    };

    let image = decode_image(&encoded)?;
    tracing::debug!("Decoded {} image bytes", image.len());

    let result = state.gateway.resolve_by_image(&image).await?;
    Ok(Json(ApiResponse {
        message: "Food scan data received successfully".to_string(),
        data: result,
    }))
}

/// Decodes a JSON request body whatever its `Content-Type`.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Option<T> {
    match serde_json::from_slice(body) {
        Ok(req) => Some(req),
        Err(e) => {
            tracing::debug!("Rejected request body: {}", e);
            None
        }
    }
}

/// Accepts bare base64 or a `data:image/...;base64,` URL.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    let encoded = encoded.trim();
    let payload = match encoded.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| GatewayError::invalid_input("Invalid image format"))?,
        None => encoded,
    };

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| {
            tracing::debug!("Base64 decode failed: {}", e);
            GatewayError::invalid_input("Invalid image format")
        })
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down server gracefully...");
}
