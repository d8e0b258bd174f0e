use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Content request to {url} returned status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Content document has no '{key}' collection")]
    MissingCollectionError { key: String },

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

    #[error("Invalid state transition for {collection}: {from:?} -> {to:?}")]
    StateTransitionError {
        collection: String,
        from: crate::domain::model::LoadState,
        to: crate::domain::model::LoadState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Retrieval,
    Parse,
    Configuration,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PageError::HttpError(_) | PageError::HttpStatusError { .. } => ErrorCategory::Retrieval,
            PageError::IoError(_) => ErrorCategory::Io,
            PageError::SerializationError(_) | PageError::MissingCollectionError { .. } => {
                ErrorCategory::Parse
            }
            PageError::ConfigError { .. }
            | PageError::ConfigValidationError { .. }
            | PageError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PageError::StateTransitionError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Retrieval => ErrorSeverity::Medium,
            ErrorCategory::Parse => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// Whether a collection loader should swallow this error and show its
    /// fallback message instead of propagating.
    pub fn is_soft_failure(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Retrieval | ErrorCategory::Parse | ErrorCategory::Io
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PageError::HttpError(_) | PageError::HttpStatusError { .. } => {
                "Could not retrieve the content document".to_string()
            }
            PageError::IoError(e) => format!("File access failed: {}", e),
            PageError::SerializationError(_) => "The content document is not valid JSON".to_string(),
            PageError::MissingCollectionError { key } => {
                format!("The content document has no '{}' section", key)
            }
            PageError::ConfigError { message } => format!("Configuration problem: {}", message),
            PageError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            PageError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            PageError::StateTransitionError { collection, .. } => {
                format!("The {} loader was run twice in one render", collection)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Retrieval => "Check that the content URL is reachable and returns 2xx",
            ErrorCategory::Parse => "Check that data.json contains 'projects' and 'skills' arrays",
            ErrorCategory::Configuration => "Review the command line flags and site.toml",
            ErrorCategory::Io => "Check that the paths exist and are readable/writable",
            ErrorCategory::Internal => "Report this as a bug",
        }
    }
}

pub type Result<T> = std::result::Result<T, PageError>;
