//! Provider error type.

use thiserror::Error;

/// Errors that can occur while fetching raster tiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The request did not complete in time.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The URL template lacks a `{z}`, `{x}` or `{y}` placeholder.
    #[error("Invalid URL template: {0}")]
    InvalidTemplate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::HttpError("HTTP 404 Not Found".to_string());
        assert_eq!(err.to_string(), "HTTP error: HTTP 404 Not Found");
    }
}
