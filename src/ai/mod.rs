mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::NutritionFacts;

/// Which kind of win yesterday's numbers showed, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementKind {
    CaloricDeficit,
    WeightLoss,
}

/// Returned whenever the motivation service cannot be reached. A missing
/// motivational message has no functional impact, so this is the one
/// failure that is absorbed rather than surfaced.
pub const FALLBACK_MESSAGE: &str = "Great job! Your hard work is paying off.";

pub fn nutrition_prompt(query: &str) -> String {
    format!(
        "Provide the nutritional information for: {query}. \
         Assume a standard single serving unless specified otherwise."
    )
}

pub fn motivation_prompt(kind: AchievementKind) -> &'static str {
    match kind {
        AchievementKind::CaloricDeficit => {
            "Generate a short, positive, and motivational message for someone who \
             successfully stayed in a calorie deficit yesterday. Keep it under 25 words."
        }
        AchievementKind::WeightLoss => {
            "Generate a short, encouraging message for someone who lost weight. \
             Keep it under 25 words."
        }
    }
}

/// Converts a free-text food description (or decoded barcode value) into
/// structured nutrition facts. Identical queries re-invoke the service;
/// nothing is cached.
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<NutritionFacts, AppError>;
}

/// Produces a short motivational message for an achievement. Never fails:
/// implementations fall back to [`FALLBACK_MESSAGE`] on any error.
#[async_trait]
pub trait MotivationSource: Send + Sync {
    async fn message(&self, kind: AchievementKind) -> String;
}
