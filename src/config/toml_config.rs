use crate::core::walking::WalkingTimeModel;
use crate::domain::model::RegionBounds;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INTERESTS: &str = "достопримечательности и интересные места";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub catalog: CatalogConfig,
    pub embedding: EmbeddingConfig,
    pub walking: Option<WalkingConfig>,
    pub defaults: Option<DefaultsConfig>,
    pub start_region: Option<RegionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: String,
    pub region: Option<RegionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkingConfig {
    pub speed_kmh: Option<f64>,
    pub min_minutes: Option<f64>,
    pub max_minutes: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub interests: Option<String>,
    pub min_hours: Option<f64>,
    pub max_hours: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegionConfig {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl From<RegionConfig> for RegionBounds {
    fn from(region: RegionConfig) -> Self {
        RegionBounds {
            min_lat: region.min_lat,
            max_lat: region.max_lat,
            min_lon: region.min_lon,
            max_lon: region.max_lon,
        }
    }
}

impl PlannerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // 環境變數未設定時不送出佔位字串
        let unresolved = config
            .embedding
            .api_key
            .as_deref()
            .is_some_and(|key| env_var_pattern().is_match(key));
        if unresolved {
            tracing::warn!("⚠️ embedding.api_key references an unset variable, sending no key");
            config.embedding.api_key = None;
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${EMBEDDING_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern().replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("catalog.path", &self.catalog.path)?;
        validation::validate_file_extension("catalog.path", &self.catalog.path, &["csv"])?;
        validation::validate_url("embedding.endpoint", &self.embedding.endpoint)?;

        if let Some(model) = &self.embedding.model {
            validation::validate_non_empty_string("embedding.model", model)?;
        }
        if let Some(batch_size) = self.embedding.batch_size {
            validation::validate_positive_number("embedding.batch_size", batch_size, 1)?;
        }
        if let Some(timeout) = self.embedding.timeout_seconds {
            validation::validate_range("embedding.timeout_seconds", timeout, 1, 600)?;
        }

        let walking = self.walking_model()?;
        validation::validate_range("walking.speed_kmh", walking.speed_kmh, 0.5, 10.0)?;
        validation::validate_range("walking.min_minutes", walking.min_minutes, 0.0, walking.max_minutes)?;
        validation::validate_range("walking.max_minutes", walking.max_minutes, walking.min_minutes, 24.0 * 60.0)?;

        if let Some(defaults) = &self.defaults {
            if let Some(interests) = &defaults.interests {
                validation::validate_non_empty_string("defaults.interests", interests)?;
            }
            if let Some(min_hours) = defaults.min_hours {
                validation::validate_positive_hours("defaults.min_hours", min_hours)?;
            }
            if let Some(max_hours) = defaults.max_hours {
                validation::validate_positive_hours("defaults.max_hours", max_hours)?;
            }
        }

        for (field, region) in [
            ("catalog.region", self.catalog.region),
            ("start_region", self.start_region),
        ] {
            if let Some(region) = region {
                validate_region(field, region)?;
            }
        }

        Ok(())
    }

    pub fn walking_model(&self) -> Result<WalkingTimeModel> {
        let walking = self.walking.as_ref();
        WalkingTimeModel::new(
            walking
                .and_then(|w| w.speed_kmh)
                .unwrap_or(WalkingTimeModel::DEFAULT_SPEED_KMH),
            walking
                .and_then(|w| w.min_minutes)
                .unwrap_or(WalkingTimeModel::DEFAULT_MIN_MINUTES),
            walking
                .and_then(|w| w.max_minutes)
                .unwrap_or(WalkingTimeModel::DEFAULT_MAX_MINUTES),
        )
    }

    pub fn catalog_region(&self) -> RegionBounds {
        self.catalog
            .region
            .map(RegionBounds::from)
            .unwrap_or(RegionBounds::CATALOG)
    }

    pub fn start_region(&self) -> RegionBounds {
        self.start_region
            .map(RegionBounds::from)
            .unwrap_or(RegionBounds::START)
    }

    /// 使用者沒有輸入興趣時的預設文字
    pub fn interests_or_default(&self, interests: Option<&str>) -> String {
        match interests.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => text.to_string(),
            None => self
                .defaults
                .as_ref()
                .and_then(|d| d.interests.clone())
                .unwrap_or_else(|| DEFAULT_INTERESTS.to_string()),
        }
    }

    /// 預設時間範圍：最少 2 小時，最多為最少再加 2 小時
    pub fn window_hours(&self, min_hours: Option<f64>, max_hours: Option<f64>) -> (f64, f64) {
        let defaults = self.defaults.as_ref();
        let min = min_hours
            .or_else(|| defaults.and_then(|d| d.min_hours))
            .unwrap_or(2.0);
        let max = max_hours
            .or_else(|| defaults.and_then(|d| d.max_hours))
            .unwrap_or(min + 2.0);
        (min, max)
    }
}

fn env_var_pattern() -> &'static regex::Regex {
    static ENV_VAR: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    ENV_VAR.get_or_init(|| regex::Regex::new(r"\$\{([^}]+)\}").unwrap())
}

fn validate_region(field: &str, region: RegionConfig) -> Result<()> {
    validation::validate_range(&format!("{}.min_lat", field), region.min_lat, -90.0, region.max_lat)?;
    validation::validate_range(&format!("{}.max_lat", field), region.max_lat, region.min_lat, 90.0)?;
    validation::validate_range(&format!("{}.min_lon", field), region.min_lon, -180.0, region.max_lon)?;
    validation::validate_range(&format!("{}.max_lon", field), region.max_lon, region.min_lon, 180.0)?;
    Ok(())
}

impl Validate for PlannerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
