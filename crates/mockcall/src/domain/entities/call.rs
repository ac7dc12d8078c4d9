//! Call - Observable call state and results handoff
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AgentMetadata, AttemptId};
use crate::domain::errors::CallFailure;
use crate::domain::value_objects::{CallState, NavigationDirection};

/// Outcome of the background attempt finalization
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum Finalization {
    #[default]
    NotStarted,
    Pending,
    Completed,
    Failed(String),
}

/// Intent to show results once a call has ended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultsHandoff {
    pub interview_id: String,
    pub attempt_id: AttemptId,
    pub duration_seconds: u64,
    pub conversation_id: Option<String>,
    pub direction: NavigationDirection,
    pub ended_at: DateTime<Utc>,
}

/// Everything a call screen renders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallSnapshot {
    pub state: CallState,
    pub duration_seconds: u64,
    pub last_error: Option<CallFailure>,
    pub agent: Option<AgentMetadata>,
    pub attempt_id: Option<AttemptId>,
    pub conversation_id: Option<String>,
    pub handoff: Option<ResultsHandoff>,
    pub finalization: Finalization,
}

impl CallSnapshot {
    /// Answer button is interactive once the persona is known
    pub fn answer_enabled(&self) -> bool {
        self.state == CallState::Incoming && self.agent.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_gated_on_agent() {
        let mut snapshot = CallSnapshot::default();
        assert!(!snapshot.answer_enabled());

        snapshot.agent = Some(AgentMetadata::fallback());
        assert!(snapshot.answer_enabled());

        snapshot.state = CallState::Connecting;
        assert!(!snapshot.answer_enabled());
    }
}
