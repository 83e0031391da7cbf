use crate::core::chunker::{nutrition_grid, regroup};
use crate::core::normalizer::normalize;
use crate::domain::model::{FoodDataType, NutritionGrid, ScanCandidate, ScanResult};
use crate::domain::ports::{FoodSearch, ImageClassifier};
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;

/// Lowest top-prediction score accepted as a detection.
pub const MIN_CONFIDENCE: f64 = 0.5;

/// Classifies a food photo, then looks the label up for nutrition and packaging details.
pub struct FoodScanner {
    classifier: Arc<dyn ImageClassifier>,
    search: Arc<dyn FoodSearch>,
}

impl FoodScanner {
    pub fn new(classifier: Arc<dyn ImageClassifier>, search: Arc<dyn FoodSearch>) -> Self {
        Self { classifier, search }
    }

    pub async fn scan(&self, image: &[u8]) -> Result<ScanResult> {
        let predictions = self.classifier.classify(image).await?;

        let top = match predictions.into_iter().next() {
            Some(top) if top.score >= MIN_CONFIDENCE => top,
            Some(top) => {
                tracing::info!(
                    "Top prediction {} below confidence threshold ({:.3})",
                    top.label,
                    top.score
                );
                return Err(GatewayError::not_found("No food items detected in the image"));
            }
            None => {
                tracing::info!("Classifier returned no predictions");
                return Err(GatewayError::not_found("No food items detected in the image"));
            }
        };
        tracing::info!("🔍 Prediction label: {}, score: {:.3}", top.label, top.score);

        let candidates = self.search.search_label(&top.label).await?;
        tracing::debug!("{} candidate foods for {}", candidates.len(), top.label);

        Ok(assemble_scan_result(top.label, &candidates))
    }
}

/// Nutrition and packaging details are drawn independently; either may be missing.
pub fn assemble_scan_result(food_name: String, candidates: &[ScanCandidate]) -> ScanResult {
    let mut result = ScanResult {
        food_name,
        ..ScanResult::default()
    };

    if let Some(survey) = candidates
        .iter()
        .find(|c| c.data_type == FoodDataType::SurveyFndds)
    {
        tracing::debug!("Nutrition from survey food: {}", survey.description);
        result.nutrition = Some(survey_nutrition(survey));
    }

    if let Some(branded) = candidates.iter().find(|c| is_usable_branded(c)) {
        tracing::debug!("Packaging details from branded food: {}", branded.description);
        result.ingredients = Some(branded.ingredients.clone());
        result.serving_size = Some(if branded.package_weight.is_empty() {
            format!("{}{}", branded.serving_size, branded.serving_size_unit)
        } else {
            branded.package_weight.clone()
        });
    }

    result
}

fn survey_nutrition(candidate: &ScanCandidate) -> NutritionGrid {
    let grid = nutrition_grid(normalize(candidate.nutrients.clone()));
    regroup(grid, 2)
}

fn is_usable_branded(candidate: &ScanCandidate) -> bool {
    let has_serving = !candidate.package_weight.is_empty()
        || (candidate.serving_size > 0.0 && !candidate.serving_size_unit.is_empty());

    candidate.data_type == FoodDataType::Branded && !candidate.ingredients.is_empty() && has_serving
}
