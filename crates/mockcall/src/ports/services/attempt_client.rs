//! Attempt Client Port
//!
//! Backend interface for opening and closing graded interview attempts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AttemptId, FinishAttempt};
use crate::domain::errors::DomainError;

/// Backend acknowledgement of a started attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptTicket {
    pub attempt_id: AttemptId,
}

/// Attempt lifecycle interface
///
/// Errors are `Network`, `NotFound` or `Auth`. Callers of
/// [`AttemptClient::finish_attempt`] must tolerate failure without rollback.
#[async_trait]
pub trait AttemptClient: Send + Sync {
    /// Open a new attempt for an interview
    async fn start_attempt(&self, interview_id: &str) -> Result<AttemptTicket, DomainError>;

    /// Close an attempt with its final duration and conversation id
    async fn finish_attempt(&self, request: &FinishAttempt) -> Result<(), DomainError>;
}
