//! Centralized error handling for LendLens
//!
//! This module provides the error taxonomy for everything that can go wrong
//! between us and the Kiva marketplace API: transport failures, malformed
//! responses, and generic processing errors.

use thiserror::Error;

/// Errors raised by the Kiva API client and the loan pipeline
///
/// The variants mirror the failure classes the session layer has to
/// distinguish: connectivity problems, bad data, and everything else. The
/// session is the single point that translates these into user-facing text
/// via [`ApiError::user_message`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Connectivity or transport failure, including non-2xx HTTP responses.
    ///
    /// For HTTP-level failures `reason` carries the status code and reason
    /// phrase (e.g. `"500 Internal Server Error"`), `status` the raw code and
    /// `body` the best-effort response body text.
    #[error("network error: {reason}")]
    Network {
        status: Option<u16>,
        reason: String,
        body: Option<String>,
    },

    /// Malformed or error-carrying GraphQL response.
    #[error("data format error: {message}")]
    DataFormat { message: String },

    /// Generic server/processing failure.
    #[error("API error: {message}")]
    Api { message: String },
}

impl ApiError {
    /// Build a `Network` error without HTTP status information
    pub fn network(reason: impl Into<String>) -> Self {
        ApiError::Network {
            status: None,
            reason: reason.into(),
            body: None,
        }
    }

    /// Build a `DataFormat` error
    pub fn data_format(message: impl Into<String>) -> Self {
        ApiError::DataFormat {
            message: message.into(),
        }
    }

    /// Build a generic `Api` error
    pub fn api(message: impl Into<String>) -> Self {
        ApiError::Api {
            message: message.into(),
        }
    }

    /// Whether this error is a connectivity failure
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Friendly message shown to the user for this error class
    ///
    /// This is the only place technical errors are translated into
    /// user-facing text, and the match is exhaustive on purpose.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => {
                "We could not connect to the server. Please check your internet connection."
            }
            ApiError::DataFormat { .. } => {
                "We received unexpected data from the server. Please try again."
            }
            ApiError::Api { .. } => {
                "An error occurred while processing your request. Please try again later."
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network {
            status: err.status().map(|s| s.as_u16()),
            reason: err.to_string(),
            body: None,
        }
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_message_carries_status_and_reason() {
        let err = ApiError::Network {
            status: Some(500),
            reason: "500 Internal Server Error".to_string(),
            body: Some("boom".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("Internal Server Error"));
    }

    #[test]
    fn test_user_messages_per_variant() {
        assert!(ApiError::network("dns failure")
            .user_message()
            .contains("could not connect"));
        assert!(ApiError::data_format("bad shape")
            .user_message()
            .contains("unexpected data"));
        assert!(ApiError::api("oops")
            .user_message()
            .contains("processing your request"));
    }

    #[test]
    fn test_is_network() {
        assert!(ApiError::network("refused").is_network());
        assert!(!ApiError::data_format("x").is_network());
        assert!(!ApiError::api("x").is_network());
    }

    #[test]
    fn test_data_format_display() {
        let err = ApiError::data_format("GraphQL errors: X");
        assert!(err.to_string().contains("GraphQL errors: X"));
    }
}
