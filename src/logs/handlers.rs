use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::instrument;

use super::aggregate::{
    burned_kcal, consumed_kcal, filter_on, macro_totals, remaining_kcal,
};
use super::dto::{
    CreateExerciseRequest, CreateWeightRequest, DashboardResponse, DateQuery, LookupRequest,
    ScanResponse,
};
use crate::achievements;
use crate::error::AppError;
use crate::models::{Exercise, Meal, NutritionFacts, WeightEntry};
use crate::state::AppState;

const DATE_FMT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/exercises", get(list_exercises))
        .route("/weights", get(list_weights))
        .route("/dashboard", get(dashboard))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/exercises", post(create_exercise))
        .route("/weights", post(create_weight))
        .route("/food/lookup", post(lookup_food))
        .route("/food/scan", post(scan_food))
}

fn resolve_date(query: &DateQuery, offset: UtcOffset) -> Result<Date, AppError> {
    match &query.date {
        Some(raw) => Date::parse(raw, DATE_FMT).map_err(|_| {
            AppError::InvalidInput(format!("invalid date '{raw}', expected YYYY-MM-DD"))
        }),
        None => Ok(OffsetDateTime::now_utc().to_offset(offset).date()),
    }
}

#[instrument(skip(state))]
async fn list_meals(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Meal>>, AppError> {
    let offset = state.config.utc_offset;
    let date = resolve_date(&query, offset)?;
    let logs = state.logs.read().await;
    let items = filter_on(logs.meals(), date, offset)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
async fn list_exercises(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Exercise>>, AppError> {
    let offset = state.config.utc_offset;
    let date = resolve_date(&query, offset)?;
    let logs = state.logs.read().await;
    let items = filter_on(logs.exercises(), date, offset)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(items))
}

/// Full weight history, oldest first.
#[instrument(skip(state))]
async fn list_weights(State(state): State<AppState>) -> Json<Vec<WeightEntry>> {
    Json(state.logs.read().await.weight_entries().to_vec())
}

#[instrument(skip(state, facts))]
async fn create_meal(
    State(state): State<AppState>,
    Json(facts): Json<NutritionFacts>,
) -> Result<(StatusCode, Json<Meal>), AppError> {
    let meal = state.logs.write().await.add_meal(facts).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state, body))]
async fn create_exercise(
    State(state): State<AppState>,
    Json(body): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<Exercise>), AppError> {
    let exercise = state
        .logs
        .write()
        .await
        .add_exercise(body.name, body.calories_burned)
        .await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

#[instrument(skip(state, body))]
async fn create_weight(
    State(state): State<AppState>,
    Json(body): Json<CreateWeightRequest>,
) -> Result<(StatusCode, Json<WeightEntry>), AppError> {
    let entry = state.logs.write().await.add_weight(body.weight).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state, body))]
async fn lookup_food(
    State(state): State<AppState>,
    Json(body): Json<LookupRequest>,
) -> Result<Json<NutritionFacts>, AppError> {
    let query = body.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("query must be non-empty".into()));
    }
    let facts = state.nutrition.lookup(query).await?;
    Ok(Json(facts))
}

/// Scan a barcode with the host camera, then look the decoded value up as
/// a regular free-text query.
#[instrument(skip(state))]
async fn scan_food(State(state): State<AppState>) -> Result<Json<ScanResponse>, AppError> {
    let Some(barcode) = state.scanner.scan().await? else {
        return Ok(Json(ScanResponse {
            barcode: None,
            nutrition: None,
        }));
    };
    let nutrition = state.nutrition.lookup(&barcode).await?;
    Ok(Json(ScanResponse {
        barcode: Some(barcode),
        nutrition: Some(nutrition),
    }))
}

#[instrument(skip(state))]
async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let offset = state.config.utc_offset;
    let date = resolve_date(&query, offset)?;
    let goal = state.config.profile.daily_goal_kcal();

    let (meals, exercises, burned, achievement) = {
        let logs = state.logs.read().await;

        let meals: Vec<Meal> = filter_on(logs.meals(), date, offset)
            .into_iter()
            .cloned()
            .collect();
        let exercises: Vec<Exercise> = filter_on(logs.exercises(), date, offset)
            .into_iter()
            .cloned()
            .collect();
        let burned = burned_kcal(&exercises.iter().collect::<Vec<_>>());

        let achievement = date.previous_day().and_then(|yesterday| {
            achievements::evaluate(
                logs.meals(),
                logs.exercises(),
                logs.weight_entries(),
                yesterday,
                offset,
                state.config.profile.tdee_kcal(),
            )
        });

        (meals, exercises, burned, achievement)
    };

    // Lock dropped before the (possibly slow) motivation request.
    let motivation = achievements::motivation_for(achievement, &*state.motivation).await;

    let meal_refs: Vec<&Meal> = meals.iter().collect();
    let consumed = consumed_kcal(&meal_refs);
    let macros = macro_totals(&meal_refs);

    Ok(Json(DashboardResponse {
        date: date
            .format(DATE_FMT)
            .map_err(|e| AppError::Store(e.into()))?,
        goal_kcal: goal,
        consumed_kcal: consumed,
        burned_kcal: burned,
        remaining_kcal: remaining_kcal(goal, burned, consumed),
        macros,
        meals,
        exercises,
        motivation,
    }))
}
