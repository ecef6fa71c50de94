use std::fmt;
use thiserror::Error;

/// 組合流程的階段，用於標記外部依賴在哪一步失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Scoring,
    Ranking,
    Selection,
    Sequencing,
    Accounting,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Scoring => "scoring",
            PipelineStage::Ranking => "ranking",
            PipelineStage::Selection => "selection",
            PipelineStage::Sequencing => "sequencing",
            PipelineStage::Accounting => "accounting",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Catalog has no usable places")]
    CatalogEmpty,

    #[error("Duplicate place id in catalog: {id}")]
    DuplicatePlaceId { id: u64 },

    #[error("Dependency unavailable during {stage}: {source}")]
    DependencyUnavailable {
        stage: PipelineStage,
        #[source]
        source: Box<PlannerError>,
    },

    #[error("Invalid time window [{min_hours}, {max_hours}]: {reason}")]
    InvalidWindow {
        min_hours: f64,
        max_hours: f64,
        reason: String,
    },

    #[error("Invalid coordinates: {input}")]
    InvalidCoordinates { input: String },

    #[error("Embedding service error: {message}")]
    EmbeddingError { message: String },

    #[error("Distance calculation error: {message}")]
    DistanceError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Catalog,
    Dependency,
    Request,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlannerError {
    /// 將協作者錯誤包裝成帶階段資訊的依賴錯誤；已包裝過的保持原樣
    pub fn at_stage(self, stage: PipelineStage) -> Self {
        match self {
            err @ PlannerError::DependencyUnavailable { .. } => err,
            other => PlannerError::DependencyUnavailable {
                stage,
                source: Box::new(other),
            },
        }
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        PlannerError::EmbeddingError {
            message: message.into(),
        }
    }

    pub fn distance(message: impl Into<String>) -> Self {
        PlannerError::DistanceError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PlannerError::CatalogEmpty | PlannerError::DuplicatePlaceId { .. } => {
                ErrorCategory::Catalog
            }
            PlannerError::DependencyUnavailable { .. }
            | PlannerError::EmbeddingError { .. }
            | PlannerError::DistanceError { .. }
            | PlannerError::ApiError(_) => ErrorCategory::Dependency,
            PlannerError::InvalidWindow { .. } | PlannerError::InvalidCoordinates { .. } => {
                ErrorCategory::Request
            }
            PlannerError::CsvError(_)
            | PlannerError::IoError(_)
            | PlannerError::SerializationError(_) => ErrorCategory::Io,
            PlannerError::ConfigValidationError { .. }
            | PlannerError::InvalidConfigValueError { .. }
            | PlannerError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Request => ErrorSeverity::Medium,
            ErrorCategory::Dependency => ErrorSeverity::Medium,
            ErrorCategory::Catalog | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PlannerError::CatalogEmpty => {
                "Check the catalog file: every row needs an id, a title and coordinates inside the region"
            }
            PlannerError::DuplicatePlaceId { .. } => "Give every catalog row a unique id",
            PlannerError::DependencyUnavailable { .. }
            | PlannerError::EmbeddingError { .. }
            | PlannerError::ApiError(_) => {
                "Make sure the embedding service is reachable and retry the request"
            }
            PlannerError::DistanceError { .. } | PlannerError::InvalidCoordinates { .. } => {
                "Use decimal latitude and longitude inside the serviced region, e.g. 56.326887 44.005986"
            }
            PlannerError::InvalidWindow { .. } => {
                "Use positive hours with the minimum not greater than the maximum"
            }
            PlannerError::CsvError(_) => "Check that the catalog is a valid CSV file with a header row",
            PlannerError::IoError(_) => "Check file paths and permissions",
            PlannerError::SerializationError(_) => "Check the data format",
            PlannerError::ConfigValidationError { .. }
            | PlannerError::InvalidConfigValueError { .. }
            | PlannerError::MissingConfigError { .. } => "Fix the configuration file and try again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlannerError::CatalogEmpty => "Нет данных о местах".to_string(),
            PlannerError::DependencyUnavailable { stage, .. } => {
                format!("Сервис недоступен на этапе '{}'", stage)
            }
            PlannerError::InvalidWindow {
                min_hours,
                max_hours,
                ..
            } => format!("Некорректное время прогулки: {}-{} ч", min_hours, max_hours),
            PlannerError::InvalidCoordinates { input } => {
                format!("Не удалось определить начальную точку: {}", input)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_stage_wraps_once() {
        let err = PlannerError::distance("boom").at_stage(PipelineStage::Ranking);
        let err = err.at_stage(PipelineStage::Selection);

        match err {
            PlannerError::DependencyUnavailable { stage, source } => {
                assert_eq!(stage, PipelineStage::Ranking);
                assert!(matches!(*source, PlannerError::DistanceError { .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(PlannerError::CatalogEmpty.severity(), ErrorSeverity::High);
        assert_eq!(
            PlannerError::embedding("down").severity(),
            ErrorSeverity::Medium
        );
        assert_eq!(
            PlannerError::MissingConfigError {
                field: "catalog.path".to_string()
            }
            .category(),
            ErrorCategory::Configuration
        );
    }
}
