//! Pure daily-total arithmetic. No I/O and no ambient clock: callers pass
//! the reference date in, so date-boundary behavior stays deterministic.

use serde::Serialize;
use time::{Date, UtcOffset};

use crate::models::{Exercise, Logged, Meal};

/// Entries whose timestamp falls on `on` in local time.
pub fn filter_on<'a, T: Logged>(entries: &'a [T], on: Date, offset: UtcOffset) -> Vec<&'a T> {
    entries
        .iter()
        .filter(|e| e.logged_at().to_offset(offset).date() == on)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub carbohydrates_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

pub fn consumed_kcal(meals: &[&Meal]) -> f64 {
    meals.iter().map(|m| m.calories).sum()
}

pub fn burned_kcal(exercises: &[&Exercise]) -> f64 {
    exercises.iter().map(|e| e.calories_burned).sum()
}

pub fn macro_totals(meals: &[&Meal]) -> MacroTotals {
    meals.iter().fold(MacroTotals::default(), |acc, m| MacroTotals {
        calories: acc.calories + m.calories,
        carbohydrates_g: acc.carbohydrates_g + m.carbohydrates_g,
        fat_g: acc.fat_g + m.fat_g,
        fiber_g: acc.fiber_g + m.fiber_g,
    })
}

/// Calories still available today: the fixed goal, credited with exercise
/// burn, debited with consumption.
pub fn remaining_kcal(goal: f64, burned: f64, consumed: f64) -> f64 {
    goal + burned - consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::Month;
    use uuid::Uuid;

    fn meal(calories: f64, created_at: time::OffsetDateTime) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            name: "test".into(),
            calories,
            carbohydrates_g: 10.0,
            fiber_g: 1.0,
            fat_g: 2.0,
            created_at,
        }
    }

    #[test]
    fn filter_on_buckets_by_local_calendar_date() {
        let meals = vec![
            meal(100.0, datetime!(2024-03-10 08:00 UTC)),
            meal(200.0, datetime!(2024-03-10 23:30 UTC)),
            meal(300.0, datetime!(2024-03-11 00:10 UTC)),
        ];
        let day = Date::from_calendar_date(2024, Month::March, 10).unwrap();
        let today = filter_on(&meals, day, UtcOffset::UTC);
        assert_eq!(today.len(), 2);

        // A 23:30 UTC entry belongs to the next local day at UTC+1.
        let plus_one = UtcOffset::from_hms(1, 0, 0).unwrap();
        assert_eq!(filter_on(&meals, day, plus_one).len(), 1);
    }

    #[test]
    fn filter_on_is_idempotent() {
        let meals = vec![
            meal(100.0, datetime!(2024-03-10 08:00 UTC)),
            meal(200.0, datetime!(2024-03-11 08:00 UTC)),
        ];
        let day = Date::from_calendar_date(2024, Month::March, 10).unwrap();
        let once: Vec<Meal> = filter_on(&meals, day, UtcOffset::UTC)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_on(&once, day, UtcOffset::UTC);
        assert_eq!(twice.len(), once.len());
        assert!(twice.iter().zip(&once).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn summing_appended_meals_matches_independent_per_meal_sum() {
        let now = datetime!(2024-03-10 12:00 UTC);
        let meals: Vec<Meal> = (1..=5).map(|i| meal(f64::from(i) * 110.0, now)).collect();
        let refs: Vec<&Meal> = meals.iter().collect();
        let independent: f64 = meals.iter().map(|m| m.calories).sum();
        assert_eq!(consumed_kcal(&refs), independent);
        assert_eq!(macro_totals(&refs).calories, independent);
    }

    #[test]
    fn remaining_credits_burn_and_debits_consumption() {
        assert_eq!(remaining_kcal(1700.0, 300.0, 1200.0), 800.0);
    }
}
