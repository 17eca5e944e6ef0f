use serde::{Deserialize, Serialize};

use crate::logs::aggregate::MacroTotals;
use crate::models::{Exercise, Meal, NutritionFacts};

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub query: String,
}

/// `barcode`/`nutrition` are both absent when the session was stopped
/// before anything was detected.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub barcode: Option<String>,
    pub nutrition: Option<NutritionFacts>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub calories_burned: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateWeightRequest {
    pub weight: f64,
}

/// `?date=YYYY-MM-DD`; defaults to today in the configured local offset.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub date: String,
    pub goal_kcal: f64,
    pub consumed_kcal: f64,
    pub burned_kcal: f64,
    pub remaining_kcal: f64,
    pub macros: MacroTotals,
    pub meals: Vec<Meal>,
    pub exercises: Vec<Exercise>,
    pub motivation: String,
}
