//! Attempt - One graded run of a mock interview
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned attempt identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(String);

impl AttemptId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttemptId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Attempt - created when a call starts connecting, finalized once when it ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub id: AttemptId,
    pub interview_id: String,
    conversation_id: Option<String>,
    duration_seconds: u64,
    pub started_at: DateTime<Utc>,
}

/// Outcome of merging a conversation id into an attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationMerge {
    /// First id observed, now recorded
    Applied,
    /// Same id seen again
    Unchanged,
    /// A different id arrived after one was recorded; the recorded id is kept
    Conflict { kept: String },
}

/// Payload closing an attempt on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishAttempt {
    pub interview_id: String,
    pub attempt_id: AttemptId,
    pub duration_seconds: u64,
    pub conversation_id: Option<String>,
}

impl Attempt {
    pub fn new(id: AttemptId, interview_id: impl Into<String>) -> Self {
        Self {
            id,
            interview_id: interview_id.into(),
            conversation_id: None,
            duration_seconds: 0,
            started_at: Utc::now(),
        }
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    /// Record a conversation id; the first one observed wins
    pub fn record_conversation(&mut self, conversation_id: &str) -> ConversationMerge {
        match &self.conversation_id {
            None => {
                self.conversation_id = Some(conversation_id.to_string());
                ConversationMerge::Applied
            }
            Some(existing) if existing == conversation_id => ConversationMerge::Unchanged,
            Some(existing) => ConversationMerge::Conflict {
                kept: existing.clone(),
            },
        }
    }

    /// Count one elapsed second of active call time
    pub fn record_tick(&mut self) -> u64 {
        self.duration_seconds = self.duration_seconds.saturating_add(1);
        self.duration_seconds
    }

    pub fn finish_request(&self) -> FinishAttempt {
        FinishAttempt {
            interview_id: self.interview_id.clone(),
            attempt_id: self.id.clone(),
            duration_seconds: self.duration_seconds,
            conversation_id: self.conversation_id.clone(),
        }
    }
}
