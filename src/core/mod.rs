pub mod chunker;
pub mod normalizer;
pub mod resolver;
pub mod scanner;

pub use crate::domain::model::{NormalizedNutrient, NutrientFact, NutritionGrid};
pub use crate::domain::ports::{BarcodeProvider, FoodSearch, ImageClassifier};
pub use crate::utils::error::Result;
