use crate::domain::model::OutputRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status} for {url}: {body}")]
    HttpStatusError { status: u16, url: String, body: String },

    #[error("Invalid upstream response: {message}")]
    InvalidResponseError { message: String },

    #[error("Parameter '{parameter}' could not be resolved: {message}")]
    ParameterError { parameter: String, message: String },

    #[error("Invalid time value for '{parameter}': {value}")]
    InvalidDateError { parameter: String, value: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    /// 批次中止：帶上節點名稱與觸發失敗的 item，已完成的記錄不會被收回
    #[error("{node} failed on item {item_index}: {source}")]
    NodeApiError {
        node: String,
        item_index: usize,
        source: Box<EtlError>,
        completed: Vec<OutputRecord>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parameter,
    Upstream,
    Configuration,
    Output,
    Execution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ParameterError { .. } | EtlError::InvalidDateError { .. } => {
                ErrorCategory::Parameter
            }
            EtlError::ApiError(_)
            | EtlError::HttpStatusError { .. }
            | EtlError::InvalidResponseError { .. } => ErrorCategory::Upstream,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::Output
            }
            EtlError::NodeApiError { .. } => ErrorCategory::Execution,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ParameterError { .. } | EtlError::InvalidDateError { .. } => {
                ErrorSeverity::High
            }
            // 上游暫時性錯誤，重跑通常可以解決
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorSeverity::Medium,
            EtlError::InvalidResponseError { .. } => ErrorSeverity::High,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::High,
            EtlError::CsvError(_) | EtlError::SerializationError(_) => ErrorSeverity::High,
            EtlError::IoError(_) => ErrorSeverity::Critical,
            EtlError::NodeApiError { source, .. } => source.severity(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ParameterError { parameter, .. } => {
                format!("Check the value supplied for '{}'", parameter)
            }
            EtlError::InvalidDateError { .. } => {
                "Use a date such as 2024-03-15 or an RFC 3339 timestamp".to_string()
            }
            EtlError::ApiError(_) => {
                "Check network connectivity to api.bcra.gob.ar and retry".to_string()
            }
            EtlError::HttpStatusError { status, .. } if *status == 404 => {
                "The variable id may not exist; run with --list-variables".to_string()
            }
            EtlError::HttpStatusError { .. } => {
                "The BCRA API rejected the request; verify the date range and retry later"
                    .to_string()
            }
            EtlError::InvalidResponseError { .. } => {
                "The upstream did not return JSON; check the configured base_url".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the TOML run file and command line flags".to_string()
            }
            EtlError::CsvError(_) | EtlError::SerializationError(_) | EtlError::IoError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            EtlError::NodeApiError { source, .. } => format!(
                "{} (or enable continue_on_fail to keep processing other items)",
                source.recovery_suggestion()
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::NodeApiError {
                node,
                item_index,
                source,
                completed,
            } => format!(
                "{} stopped at item {} after producing {} record(s): {}",
                node,
                item_index,
                completed.len(),
                source
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
