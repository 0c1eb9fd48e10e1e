use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Invalid distribution for {university_id}/{year}: {reason}")]
    InvalidDistribution {
        university_id: String,
        year: i32,
        reason: String,
    },

    #[error("Data provider '{provider}' unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    #[error("Aggregation scope mismatch: expected university '{expected}', found '{found}'")]
    ScopeMismatch { expected: String, found: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Provider,
    Configuration,
    System,
}

impl StatsError {
    pub fn provider_unavailable(provider: &str, message: impl Into<String>) -> Self {
        StatsError::ProviderUnavailable {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_distribution(university_id: &str, year: i32, reason: impl Into<String>) -> Self {
        StatsError::InvalidDistribution {
            university_id: university_id.to_string(),
            year,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StatsError::InvalidDistribution { .. } | StatsError::ScopeMismatch { .. } => {
                ErrorCategory::Data
            }
            StatsError::ProviderUnavailable { .. } => ErrorCategory::Provider,
            StatsError::ConfigError { .. }
            | StatsError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            StatsError::IoError(_) | StatsError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// Only provider outages may be answered from a fallback source.
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(self, StatsError::ProviderUnavailable { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StatsError::InvalidDistribution { university_id, year, .. } => format!(
                "The applicant distribution for {} in {} could not be computed",
                university_id, year
            ),
            StatsError::ProviderUnavailable { provider, .. } => {
                format!("The {} data source could not be reached", provider)
            }
            StatsError::ScopeMismatch { .. } => {
                "Statistics from several universities were mixed in one aggregate".to_string()
            }
            StatsError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Data => "Check the raw data for the affected university and year",
            ErrorCategory::Provider => {
                "Verify the endpoint and API key, or enable the fallback data source"
            }
            ErrorCategory::Configuration => "Review the command line flags or the TOML config file",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
