use thiserror::Error;

/// Main error type for the estimator
#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} error: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EstimatorError>;

impl EstimatorError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            EstimatorError::Http(err) => err.is_timeout() || err.is_connect(),
            EstimatorError::Api { status, .. } => *status >= 500,
            EstimatorError::RateLimit { .. } => true,
            _ => false,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimatorError::Config(_) => "CONFIG_ERROR",
            EstimatorError::Http(_) => "HTTP_ERROR",
            EstimatorError::Api { .. } => "API_ERROR",
            EstimatorError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            EstimatorError::Provider(_) => "PROVIDER_ERROR",
            EstimatorError::Parse(_) => "PARSE_ERROR",
            EstimatorError::Serialization(_) => "SERIALIZATION_ERROR",
            EstimatorError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}
