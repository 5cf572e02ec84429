//! Query error types
//!
//! Defines all error conditions that can occur while assembling and executing
//! a trends query.

use crate::query::ast::Sampling;
use thiserror::Error;

/// Errors that can occur during query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// A statistical sampling kind was requested without the numeric
    /// property it aggregates over
    #[error("math_property is required for {sampling}")]
    MissingMathProperty { sampling: Sampling },

    /// The API answered with a non-success status
    #[error("Failed to fetch data: {status_text} {body}")]
    Api {
        status: u16,
        status_text: String,
        /// Error body, parsed as JSON when possible, otherwise the raw text
        body: serde_json::Value,
    },

    /// The request could not be sent or its body could not be read
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The success response did not match the trends result shape
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request parameters could not be serialized
    #[error("Failed to encode parameters: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_math_property_message() {
        let err = QueryError::MissingMathProperty {
            sampling: Sampling::P95,
        };
        assert_eq!(err.to_string(), "math_property is required for p95");
    }

    #[test]
    fn test_api_error_message_includes_status_text_and_body() {
        let err = QueryError::Api {
            status: 403,
            status_text: "Forbidden".to_string(),
            body: serde_json::json!({"detail": "bad key"}),
        };
        assert_eq!(
            err.to_string(),
            r#"Failed to fetch data: Forbidden {"detail":"bad key"}"#
        );
    }
}
