use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A logged food entry. Append-only: meals are never edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub carbohydrates_g: f64,
    pub fiber_g: f64,
    pub fat_g: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A logged workout entry. Same lifecycle as [`Meal`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub calories_burned: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A body-weight measurement. No id; ordering is insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub weight: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Nutrition facts for one serving of a food item, as returned by the
/// lookup service. Transient: consumed once to build a [`Meal`], never
/// persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub name: String,
    pub calories: f64,
    pub carbohydrates_g: f64,
    pub fiber_g: f64,
    pub fat_g: f64,
}

impl NutritionFacts {
    /// All five fields are required and the numeric ones must be finite
    /// and non-negative. Partial or nonsense records are rejected whole.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must be non-empty".into());
        }
        for (field, value) in [
            ("calories", self.calories),
            ("carbohydrates_g", self.carbohydrates_g),
            ("fiber_g", self.fiber_g),
            ("fat_g", self.fat_g),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{field} must be a non-negative number"));
            }
        }
        Ok(())
    }
}

/// Anything that carries a creation timestamp and can be bucketed by
/// calendar day.
pub trait Logged {
    fn logged_at(&self) -> OffsetDateTime;
}

impl Logged for Meal {
    fn logged_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Logged for Exercise {
    fn logged_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Logged for WeightEntry {
    fn logged_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts() -> NutritionFacts {
        NutritionFacts {
            name: "1 cup oatmeal".into(),
            calories: 154.0,
            carbohydrates_g: 27.0,
            fiber_g: 4.0,
            fat_g: 2.5,
        }
    }

    #[test]
    fn validate_accepts_complete_record() {
        assert!(facts().validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let mut f = facts();
        f.name = "  ".into();
        assert!(f.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_and_non_finite_numbers() {
        let mut f = facts();
        f.fat_g = -0.1;
        assert!(f.validate().is_err());

        let mut f = facts();
        f.calories = f64::NAN;
        assert!(f.validate().is_err());
    }
}
