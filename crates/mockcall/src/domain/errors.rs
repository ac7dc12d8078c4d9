//! Domain Errors
//!
//! Error types for call orchestration and the user-facing failure
//! categories they collapse into.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Timed out after {after_ms}ms waiting for {operation}")]
    Timeout { operation: String, after_ms: u64 },

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Voice provider error: {0}")]
    Provider(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Call session is closed")]
    SessionClosed,
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn timeout<T: AsRef<str>>(operation: T, after: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.as_ref().to_string(),
            after_ms: after.as_millis() as u64,
        }
    }

    /// User-facing category this error is reported under
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Permission(_) => FailureKind::Permission,
            Self::Auth(_) | Self::NotFound { .. } => FailureKind::Credential,
            _ => FailureKind::Generic,
        }
    }
}

/// Failure categories surfaced to the UI
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Microphone or other OS permission missing
    Permission,
    /// Token exchange or backend authorization failed
    Credential,
    Generic,
}

impl FailureKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::Permission => {
                "Microphone access is needed for the interview. Check your permissions and try again."
            }
            FailureKind::Credential => {
                "We couldn't authorize your interview session. Please try again."
            }
            FailureKind::Generic => "Something went wrong connecting your call. Please try again.",
        }
    }
}

/// A failure as presented to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Whether answering again is expected to help
    pub retryable: bool,
}

impl CallFailure {
    /// Failure before the call connected; the user may answer again
    pub fn pre_call(error: &DomainError) -> Self {
        let kind = error.failure_kind();
        Self {
            kind,
            message: kind.user_message().to_string(),
            retryable: true,
        }
    }

    /// Provider error that terminated an active call
    pub fn mid_call() -> Self {
        Self {
            kind: FailureKind::Generic,
            message: "The interview call dropped unexpectedly.".to_string(),
            retryable: false,
        }
    }
}
