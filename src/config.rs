use std::path::PathBuf;

use time::UtcOffset;

/// Sedentary activity multiplier applied to BMR.
const ACTIVITY_SEDENTARY: f64 = 1.2;
/// Fixed daily deficit target (approx. 1 lb/week of loss).
const DAILY_DEFICIT_KCAL: f64 = 500.0;

const LBS_PER_KG: f64 = 2.20462;
const CM_PER_INCH: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

/// Fixed user profile the energy constants are derived from.
#[derive(Debug, Clone)]
pub struct Profile {
    pub weight_lbs: f64,
    pub height_in: f64,
    pub age: u32,
    pub sex: Sex,
}

impl Profile {
    /// Basal metabolic rate per the Mifflin-St Jeor equation.
    pub fn bmr_kcal(&self) -> f64 {
        let kg = self.weight_lbs / LBS_PER_KG;
        let cm = self.height_in * CM_PER_INCH;
        let sex_term = match self.sex {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        };
        10.0 * kg + 6.25 * cm - 5.0 * f64::from(self.age) + sex_term
    }

    /// Total daily energy expenditure assuming a sedentary lifestyle.
    pub fn tdee_kcal(&self) -> f64 {
        self.bmr_kcal() * ACTIVITY_SEDENTARY
    }

    /// Daily calorie budget: TDEE minus the fixed deficit, rounded.
    pub fn daily_goal_kcal(&self) -> f64 {
        (self.tdee_kcal() - DAILY_DEFICIT_KCAL).round()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub profile: Profile,
    /// Fixed local-time offset used for all calendar-day comparisons.
    pub utc_offset: UtcOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir: PathBuf = std::env::var("DATA_DIR")
            .unwrap_or_else(|_| "./data".into())
            .into();
        let gemini_api_key = std::env::var("GEMINI_API_KEY")?;
        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into());

        let profile = Profile {
            weight_lbs: std::env::var("PROFILE_WEIGHT_LBS")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(175.0),
            height_in: std::env::var("PROFILE_HEIGHT_IN")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(68.0),
            age: std::env::var("PROFILE_AGE")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(39),
            sex: match std::env::var("PROFILE_SEX").as_deref() {
                Ok("female") => Sex::Female,
                _ => Sex::Male,
            },
        };

        let offset_hours = std::env::var("UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i8>().ok())
            .unwrap_or(0);
        let utc_offset = UtcOffset::from_hms(offset_hours, 0, 0)?;

        Ok(Self {
            data_dir,
            gemini_api_key,
            gemini_model,
            profile,
            utc_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_profile() -> Profile {
        Profile {
            weight_lbs: 175.0,
            height_in: 68.0,
            age: 39,
            sex: Sex::Male,
        }
    }

    #[test]
    fn bmr_matches_mifflin_st_jeor_by_hand() {
        let p = default_profile();
        let kg = 175.0 / 2.20462;
        let cm = 68.0 * 2.54;
        let expected = 10.0 * kg + 6.25 * cm - 5.0 * 39.0 + 5.0;
        assert!((p.bmr_kcal() - expected).abs() < 1e-9);
    }

    #[test]
    fn daily_goal_is_sedentary_tdee_minus_deficit() {
        let p = default_profile();
        let expected = (p.bmr_kcal() * 1.2 - 500.0).round();
        assert_eq!(p.daily_goal_kcal(), expected);
    }

    #[test]
    fn female_sex_term_lowers_bmr() {
        let male = default_profile();
        let female = Profile {
            sex: Sex::Female,
            ..default_profile()
        };
        assert!((male.bmr_kcal() - female.bmr_kcal() - 166.0).abs() < 1e-9);
    }
}
