//! # USDA Error Types Module
//!
//! This module defines the error types returned by the FoodData Central client.
//! None of these escape the reconciliation pipeline: the orchestrator logs them
//! and treats every variant as "no data available".

/// Failure modes of a FoodData Central request
#[derive(Debug, Clone, PartialEq)]
pub enum UsdaError {
    /// No API key configured
    ConfigurationMissing,
    /// Network-level failure (connect, timeout, body read)
    Transport(String),
    /// Non-success HTTP status
    Status { status: u16, message: String },
    /// Response body did not match the expected shape
    Decode(String),
    /// Too many consecutive failures, requests are short-circuited
    CircuitOpen,
}

impl UsdaError {
    /// Whether a retry has a chance of succeeding
    pub fn is_retryable(&self) -> bool {
        match self {
            UsdaError::Transport(_) => true,
            UsdaError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl std::fmt::Display for UsdaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsdaError::ConfigurationMissing => write!(f, "USDA API key is not configured"),
            UsdaError::Transport(msg) => write!(f, "USDA transport error: {msg}"),
            UsdaError::Status { status, message } => {
                write!(f, "USDA API request failed ({status}): {message}")
            }
            UsdaError::Decode(msg) => write!(f, "USDA response decode error: {msg}"),
            UsdaError::CircuitOpen => write!(f, "USDA circuit breaker is open"),
        }
    }
}

impl std::error::Error for UsdaError {}

impl From<reqwest::Error> for UsdaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UsdaError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            UsdaError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            UsdaError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(UsdaError::Transport("reset".to_string()).is_retryable());
        assert!(UsdaError::Status { status: 503, message: String::new() }.is_retryable());
        assert!(UsdaError::Status { status: 429, message: String::new() }.is_retryable());
        assert!(!UsdaError::Status { status: 404, message: String::new() }.is_retryable());
        assert!(!UsdaError::ConfigurationMissing.is_retryable());
        assert!(!UsdaError::Decode("bad json".to_string()).is_retryable());
        assert!(!UsdaError::CircuitOpen.is_retryable());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            UsdaError::ConfigurationMissing.to_string(),
            "USDA API key is not configured"
        );
        let err = UsdaError::Status { status: 500, message: "Internal Server Error".to_string() };
        assert_eq!(err.to_string(), "USDA API request failed (500): Internal Server Error");
    }
}
