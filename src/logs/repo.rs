use std::sync::Arc;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Exercise, Meal, NutritionFacts, WeightEntry};
use crate::store::{Store, EXERCISES_KEY, MEALS_KEY, WEIGHT_ENTRIES_KEY};

/// The three append-only logs, loaded from the store once at startup and
/// written back after every append. No update or delete operations exist.
pub struct LogBook {
    store: Arc<dyn Store>,
    meals: Vec<Meal>,
    exercises: Vec<Exercise>,
    weight_entries: Vec<WeightEntry>,
}

impl LogBook {
    pub async fn load(store: Arc<dyn Store>) -> anyhow::Result<Self> {
        let meals = read_log(&*store, MEALS_KEY).await?;
        let exercises = read_log(&*store, EXERCISES_KEY).await?;
        let weight_entries = read_log(&*store, WEIGHT_ENTRIES_KEY).await?;
        Ok(Self {
            store,
            meals,
            exercises,
            weight_entries,
        })
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn weight_entries(&self) -> &[WeightEntry] {
        &self.weight_entries
    }

    pub async fn add_meal(&mut self, facts: NutritionFacts) -> Result<Meal, AppError> {
        facts.validate().map_err(AppError::InvalidInput)?;
        let meal = Meal {
            id: Uuid::new_v4(),
            name: facts.name,
            calories: facts.calories,
            carbohydrates_g: facts.carbohydrates_g,
            fiber_g: facts.fiber_g,
            fat_g: facts.fat_g,
            created_at: OffsetDateTime::now_utc(),
        };
        self.meals.push(meal.clone());
        if let Err(e) = persist(&*self.store, MEALS_KEY, &self.meals).await {
            self.meals.pop();
            return Err(e);
        }
        Ok(meal)
    }

    pub async fn add_exercise(
        &mut self,
        name: String,
        calories_burned: f64,
    ) -> Result<Exercise, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("name must be non-empty".into()));
        }
        if !calories_burned.is_finite() || calories_burned < 0.0 {
            return Err(AppError::InvalidInput(
                "calories_burned must be a non-negative number".into(),
            ));
        }
        let exercise = Exercise {
            id: Uuid::new_v4(),
            name,
            calories_burned,
            created_at: OffsetDateTime::now_utc(),
        };
        self.exercises.push(exercise.clone());
        if let Err(e) = persist(&*self.store, EXERCISES_KEY, &self.exercises).await {
            self.exercises.pop();
            return Err(e);
        }
        Ok(exercise)
    }

    pub async fn add_weight(&mut self, weight: f64) -> Result<WeightEntry, AppError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(AppError::InvalidInput(
                "weight must be a positive number".into(),
            ));
        }
        let entry = WeightEntry {
            weight,
            created_at: OffsetDateTime::now_utc(),
        };
        self.weight_entries.push(entry.clone());
        if let Err(e) = persist(&*self.store, WEIGHT_ENTRIES_KEY, &self.weight_entries).await {
            self.weight_entries.pop();
            return Err(e);
        }
        Ok(entry)
    }
}

async fn read_log<T: DeserializeOwned>(store: &dyn Store, key: &str) -> anyhow::Result<Vec<T>> {
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value).with_context(|| format!("decode {key} log")),
        None => Ok(Vec::new()),
    }
}

async fn persist<T: Serialize>(store: &dyn Store, key: &str, entries: &[T]) -> Result<(), AppError> {
    let value = serde_json::to_value(entries)
        .with_context(|| format!("encode {key} log"))
        .map_err(AppError::Store)?;
    store.set(key, value).await.map_err(AppError::Store)
}
