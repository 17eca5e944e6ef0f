use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::{
    motivation_prompt, nutrition_prompt, AchievementKind, MotivationSource, NutritionLookup,
    FALLBACK_MESSAGE,
};
use crate::error::AppError;
use crate::models::NutritionFacts;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Response schema the service is constrained to for nutrition queries:
/// all five fields required, numbers in kcal/grams.
fn nutrition_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "The name of the food item, including portion size if specified."
            },
            "calories": { "type": "NUMBER", "description": "Total calories in the food item." },
            "carbohydrates_g": { "type": "NUMBER", "description": "Total carbohydrates in grams." },
            "fiber_g": { "type": "NUMBER", "description": "Total dietary fiber in grams." },
            "fat_g": { "type": "NUMBER", "description": "Total fat in grams." }
        },
        "required": ["name", "calories", "carbohydrates_g", "fiber_g", "fat_g"]
    })
}

/// Client for the Google Generative AI `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            client: Client::new(),
        }
    }

    fn build_url(&self) -> String {
        format!(
            "{API_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }

    /// One prompt in, the first candidate's text out.
    async fn generate(
        &self,
        prompt: String,
        config: Option<GenerationConfig>,
    ) -> anyhow::Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: config,
        };

        debug!(model = %self.model, "calling generateContent");
        let response = self
            .client
            .post(self.build_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body: GenerateResponse = response.json().await?;

        if let Some(error) = body.error {
            anyhow::bail!("api error ({status}): {}", error.message);
        }
        if !status.is_success() {
            anyhow::bail!("api error: http {status}");
        }

        extract_text(body).ok_or_else(|| anyhow::anyhow!("response carried no text candidate"))
    }
}

fn extract_text(body: GenerateResponse) -> Option<String> {
    body.candidates?
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()
        .map(|p| p.text)
}

/// Parse and validate a nutrition JSON document. Any shape violation
/// collapses to `LookupFailed`; a partially populated result never
/// escapes.
fn parse_nutrition(raw: &str) -> Result<NutritionFacts, AppError> {
    let facts: NutritionFacts = serde_json::from_str(raw.trim()).map_err(|e| {
        warn!(error = %e, "nutrition response is not valid JSON");
        AppError::LookupFailed
    })?;
    facts.validate().map_err(|reason| {
        warn!(%reason, "nutrition response failed schema validation");
        AppError::LookupFailed
    })?;
    Ok(facts)
}

#[async_trait]
impl NutritionLookup for GeminiClient {
    #[instrument(skip(self))]
    async fn lookup(&self, query: &str) -> Result<NutritionFacts, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput("query must be non-empty".into()));
        }

        let config = GenerationConfig {
            response_mime_type: "application/json".into(),
            response_schema: nutrition_schema(),
        };
        let raw = self
            .generate(nutrition_prompt(query), Some(config))
            .await
            .map_err(|e| {
                warn!(error = %e, "nutrition lookup failed");
                AppError::LookupFailed
            })?;
        parse_nutrition(&raw)
    }
}

#[async_trait]
impl MotivationSource for GeminiClient {
    #[instrument(skip(self))]
    async fn message(&self, kind: AchievementKind) -> String {
        match self.generate(motivation_prompt(kind).to_string(), None).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => FALLBACK_MESSAGE.to_string(),
            Err(e) => {
                warn!(error = %e, "motivation request failed, using fallback");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}
