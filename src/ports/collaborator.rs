//! Shared error type and call discipline for external collaborators.
//!
//! Every collaborator port (product search, availability, payment, order
//! recording, reply composition) fails with [`CollaboratorError`]. Callers
//! wrap each call in [`call_with_timeout`] so an unresponsive collaborator
//! becomes an ordinary failure instead of an unbounded stall.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Error returned by any collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorError {
    /// Error code for categorization.
    pub code: CollaboratorErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the call can be retried.
    pub retryable: bool,
}

impl CollaboratorError {
    pub fn new(code: CollaboratorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Call did not complete within `limit`.
    pub fn timeout(operation: &str, limit: Duration) -> Self {
        Self::new(
            CollaboratorErrorCode::Timeout,
            format!("{} timed out after {}ms", operation, limit.as_millis()),
        )
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorCode::Unavailable, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorCode::InvalidRequest, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorCode::MalformedResponse, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(
            CollaboratorErrorCode::NotFound,
            format!("{} not found", resource),
        )
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorCode::Storage, message)
    }

    pub fn is_timeout(&self) -> bool {
        self.code == CollaboratorErrorCode::Timeout
    }
}

impl std::fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CollaboratorError {}

impl From<ValidationError> for CollaboratorError {
    fn from(err: ValidationError) -> Self {
        Self::invalid_request(err.to_string())
    }
}

/// Collaborator error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorErrorCode {
    /// No reply within the configured call timeout.
    Timeout,

    /// Collaborator could not be reached or refused the call.
    Unavailable,

    /// Request failed boundary validation.
    InvalidRequest,

    /// Reply could not be parsed.
    MalformedResponse,

    /// Referenced resource (SKU, file) does not exist.
    NotFound,

    /// Backing store could not be read or written.
    Storage,
}

impl CollaboratorErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Unavailable)
    }
}

impl std::fmt::Display for CollaboratorErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
            Self::InvalidRequest => "invalid_request",
            Self::MalformedResponse => "malformed_response",
            Self::NotFound => "not_found",
            Self::Storage => "storage",
        };
        f.write_str(s)
    }
}

/// Awaits `call`, turning expiry of `limit` into a `Timeout` error.
pub async fn call_with_timeout<T, F>(
    operation: &str,
    limit: Duration,
    call: F,
) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::timeout(operation, limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_codes() {
        assert!(CollaboratorErrorCode::Timeout.is_retryable());
        assert!(CollaboratorErrorCode::Unavailable.is_retryable());
        assert!(!CollaboratorErrorCode::InvalidRequest.is_retryable());
        assert!(!CollaboratorErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = CollaboratorError::unavailable("payment gateway down");
        assert_eq!(err.to_string(), "unavailable: payment gateway down");
    }

    #[tokio::test]
    async fn slow_call_times_out() {
        let result: Result<(), _> = call_with_timeout("find_products", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert!(err.message.contains("find_products"));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let result = call_with_timeout("find_products", Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
