use crate::domain::model::Resolution;
use crate::domain::ports::BarcodeProvider;
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;

/// Tries barcode providers in priority order and returns the first usable result.
///
/// Failures of every provider but the last are logged and treated as a miss; only the last
/// provider's failure is reported to the caller.
pub struct BarcodeResolver {
    providers: Vec<Arc<dyn BarcodeProvider>>,
}

impl BarcodeResolver {
    pub fn new(providers: Vec<Arc<dyn BarcodeProvider>>) -> Self {
        Self { providers }
    }

    pub async fn resolve(&self, barcode: &str) -> Result<Resolution> {
        let last = self.providers.len().saturating_sub(1);

        for (index, provider) in self.providers.iter().enumerate() {
            let source = provider.source();
            tracing::debug!("Looking up barcode {} via {}", barcode, source);

            match provider.lookup(barcode).await {
                Ok(Some(summary)) => {
                    tracing::info!("✅ Barcode {} resolved by {}", barcode, source);
                    return Ok(Resolution { source, summary });
                }
                Ok(None) => {
                    tracing::debug!("{} has no product for barcode {}", source, barcode);
                }
                Err(e) if index == last => {
                    tracing::error!("❌ Last provider {} failed for {}: {}", source, barcode, e);
                    return Err(GatewayError::upstream(
                        source.as_str(),
                        "Failed to fetch data.",
                    ));
                }
                Err(e) => {
                    tracing::warn!("{} failed for barcode {}, falling back: {}", source, barcode, e);
                }
            }
        }

        Err(GatewayError::not_found("No product found for the barcode"))
    }
}
