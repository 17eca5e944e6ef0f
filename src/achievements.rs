//! Decides which motivational message to request after a log change, from
//! yesterday's consumption/burn and the last two weight entries.

use time::{Date, UtcOffset};

use crate::ai::{AchievementKind, MotivationSource};
use crate::logs::aggregate::{burned_kcal, consumed_kcal, filter_on};
use crate::models::{Exercise, Meal, WeightEntry};

/// Shown when neither achievement matched. Chosen locally, so it costs no
/// network call.
pub const STATIC_ENCOURAGEMENT: &str =
    "Keep pushing forward, one step at a time. You've got this!";

/// First match wins, checked in this order: caloric deficit, then weight
/// loss. At most one achievement per evaluation; outcomes are never
/// combined.
pub fn evaluate(
    meals: &[Meal],
    exercises: &[Exercise],
    weights: &[WeightEntry],
    yesterday: Date,
    offset: UtcOffset,
    tdee_kcal: f64,
) -> Option<AchievementKind> {
    let consumed = consumed_kcal(&filter_on(meals, yesterday, offset));
    let burned = burned_kcal(&filter_on(exercises, yesterday, offset));
    if consumed > 0.0 && consumed < tdee_kcal + burned {
        return Some(AchievementKind::CaloricDeficit);
    }

    if let [.., previous, latest] = weights {
        if latest.weight < previous.weight {
            return Some(AchievementKind::WeightLoss);
        }
    }

    None
}

pub async fn motivation_for(
    kind: Option<AchievementKind>,
    source: &dyn MotivationSource,
) -> String {
    match kind {
        Some(kind) => source.message(kind).await,
        None => STATIC_ENCOURAGEMENT.to_string(),
    }
}
