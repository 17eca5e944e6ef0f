use std::sync::Arc;

use tokio::sync::RwLock;

use crate::ai::{GeminiClient, MotivationSource, NutritionLookup};
use crate::config::AppConfig;
use crate::logs::repo::LogBook;
use crate::scanner::{NoCamera, NoDetector, ScanController};
use crate::store::{JsonFileStore, MemoryStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub logs: Arc<RwLock<LogBook>>,
    pub nutrition: Arc<dyn NutritionLookup>,
    pub motivation: Arc<dyn MotivationSource>,
    pub scanner: Arc<ScanController>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn Store> = Arc::new(JsonFileStore::open(&config.data_dir).await?);
        let logs = Arc::new(RwLock::new(LogBook::load(store).await?));

        let gemini = Arc::new(GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        ));

        // A headless host has no camera hardware and no barcode-detection
        // capability; deployments with either plug their own impls in via
        // from_parts.
        let scanner = Arc::new(ScanController::new(Arc::new(NoCamera), Arc::new(NoDetector)));

        Ok(Self {
            config,
            logs,
            nutrition: Arc::clone(&gemini) as Arc<dyn NutritionLookup>,
            motivation: gemini as Arc<dyn MotivationSource>,
            scanner,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        logs: Arc<RwLock<LogBook>>,
        nutrition: Arc<dyn NutritionLookup>,
        motivation: Arc<dyn MotivationSource>,
        scanner: Arc<ScanController>,
    ) -> Self {
        Self {
            config,
            logs,
            nutrition,
            motivation,
            scanner,
        }
    }

    /// A state with an in-memory store and canned AI answers, for tests.
    pub async fn fake() -> Self {
        use async_trait::async_trait;

        use crate::ai::AchievementKind;
        use crate::error::AppError;
        use crate::models::NutritionFacts;

        struct FixedLookup;
        #[async_trait]
        impl NutritionLookup for FixedLookup {
            async fn lookup(&self, query: &str) -> Result<NutritionFacts, AppError> {
                Ok(NutritionFacts {
                    name: query.to_string(),
                    calories: 154.0,
                    carbohydrates_g: 27.0,
                    fiber_g: 4.0,
                    fat_g: 2.5,
                })
            }
        }

        struct FixedMotivation;
        #[async_trait]
        impl MotivationSource for FixedMotivation {
            async fn message(&self, _kind: AchievementKind) -> String {
                "nice work".to_string()
            }
        }

        let config = Arc::new(Self::fake_config());
        let store: Arc<dyn Store> = Arc::new(MemoryStore::default());
        let logs = Arc::new(RwLock::new(
            LogBook::load(store).await.expect("memory store load"),
        ));
        let scanner = Arc::new(ScanController::new(Arc::new(NoCamera), Arc::new(NoDetector)));

        Self::from_parts(
            config,
            logs,
            Arc::new(FixedLookup),
            Arc::new(FixedMotivation),
            scanner,
        )
    }

    pub fn fake_config() -> AppConfig {
        use crate::config::{Profile, Sex};

        AppConfig {
            data_dir: "unused".into(),
            gemini_api_key: "test".into(),
            gemini_model: "gemini-2.5-flash".into(),
            profile: Profile {
                weight_lbs: 175.0,
                height_in: 68.0,
                age: 39,
                sex: Sex::Male,
            },
            utc_offset: time::UtcOffset::UTC,
        }
    }
}
