//! Application error types with stable machine codes.

use thiserror::Error;

/// Application-level errors for graphsphere.
#[derive(Error, Debug)]
pub enum AppError {
    // Load source errors
    #[error("Failed to load graph: {0}")]
    LoadFailure(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Graph state errors
    #[error("No graph loaded")]
    EmptyGraph,

    #[error("Invalid filter: {0}")]
    InvalidPredicate(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Unknown layout '{0}' (expected circular, sphere, random or force)")]
    UnknownLayout(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Stable code for reporting to users or peers.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::LoadFailure(_) => "LOAD_FAILURE",
            AppError::Http(_) => "LOAD_FAILURE",
            AppError::Parse(_) => "PARSE_ERROR",
            AppError::Csv(_) => "PARSE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::EmptyGraph => "EMPTY_GRAPH",
            AppError::InvalidPredicate(_) => "INVALID_PREDICATE",
            AppError::NodeNotFound(_) => "NODE_NOT_FOUND",
            AppError::UnknownLayout(_) => "UNKNOWN_LAYOUT",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the error came from obtaining a graph (network, parse, import).
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            AppError::LoadFailure(_)
                | AppError::Http(_)
                | AppError::Parse(_)
                | AppError::Csv(_)
                | AppError::Validation(_)
                | AppError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(AppError::EmptyGraph.code(), "EMPTY_GRAPH");
        assert_eq!(
            AppError::InvalidPredicate("min > max".into()).code(),
            "INVALID_PREDICATE"
        );
        assert_eq!(AppError::LoadFailure("404".into()).code(), "LOAD_FAILURE");
    }

    #[test]
    fn test_load_error_classification() {
        assert!(AppError::Validation("missing column".into()).is_load_error());
        assert!(!AppError::EmptyGraph.is_load_error());
        assert!(!AppError::NodeNotFound("a".into()).is_load_error());
    }

    #[test]
    fn test_display() {
        let err = AppError::UnknownLayout("spiral".into());
        assert_eq!(
            err.to_string(),
            "Unknown layout 'spiral' (expected circular, sphere, random or force)"
        );
    }
}
