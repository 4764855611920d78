// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Waypoint routing core.

use std::time::Duration;

use thiserror::Error;

/// Coarse classification of a [`WaypointError`].
///
/// Callers branch on the kind to decide between failing the request,
/// retrying, or degrading to a fallback value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A required setting or credential is missing or invalid. Not retried.
    Configuration,
    /// The content moderator vetoed the request.
    PolicyRejection,
    /// An external collaborator (LLM, search, embeddings) failed or timed out.
    ExternalService,
    /// Unexpected failure inside the routing core.
    Internal,
}

/// The error type used across all Waypoint crates.
#[derive(Debug, Error)]
pub enum WaypointError {
    /// Configuration errors (missing credential, invalid value).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request rejected by the content moderation gate.
    #[error("content policy violation: {reason}")]
    PolicyRejection { reason: String },

    /// An external service call failed.
    #[error("{service} error: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external service call exceeded its deadline.
    #[error("{service} timed out after {duration:?}")]
    Timeout {
        service: &'static str,
        duration: Duration,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WaypointError {
    /// Build an [`WaypointError::ExternalService`] from an underlying error.
    pub fn external<E>(service: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExternalService {
            service,
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Build an [`WaypointError::ExternalService`] from a message only.
    pub fn external_msg(service: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::PolicyRejection { .. } => ErrorKind::PolicyRejection,
            Self::ExternalService { .. } | Self::Timeout { .. } => ErrorKind::ExternalService,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::ExternalService
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_external_service_kind() {
        let err = WaypointError::Timeout {
            service: "ollama",
            duration: Duration::from_secs(5),
        };
        assert_eq!(err.kind(), ErrorKind::ExternalService);
        assert!(err.is_retryable());
    }

    #[test]
    fn config_and_policy_are_not_retryable() {
        assert!(!WaypointError::Config("x".into()).is_retryable());
        assert!(
            !WaypointError::PolicyRejection {
                reason: "x".into()
            }
            .is_retryable()
        );
        assert!(!WaypointError::Internal("x".into()).is_retryable());
    }

    #[test]
    fn external_keeps_source() {
        let err = WaypointError::external("tavily", std::io::Error::other("connection reset"));
        assert_eq!(err.to_string(), "tavily error: connection reset");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(ErrorKind::ExternalService.to_string(), "external_service");
        assert_eq!(ErrorKind::PolicyRejection.to_string(), "policy_rejection");
    }
}
