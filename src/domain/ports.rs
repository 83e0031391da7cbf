use crate::domain::model::{Prediction, ProductSummary, ProviderSource, ScanCandidate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A barcode lookup against one external provider.
///
/// `Ok(None)` means the provider answered but had nothing usable; `Err` means the call itself
/// failed (network, non-success status, undecodable body).
#[async_trait]
pub trait BarcodeProvider: Send + Sync {
    fn source(&self) -> ProviderSource;

    async fn lookup(&self, barcode: &str) -> Result<Option<ProductSummary>>;
}

/// Predictions come back ordered by descending score.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>>;
}

#[async_trait]
pub trait FoodSearch: Send + Sync {
    async fn search_label(&self, label: &str) -> Result<Vec<ScanCandidate>>;
}
