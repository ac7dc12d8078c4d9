//! AgentMetadata - Interviewer persona display data

use serde::{Deserialize, Serialize};

/// Interviewer persona shown on the incoming call screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentMetadata {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl AgentMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Persona used when the catalog cannot be reached
    pub fn fallback() -> Self {
        Self::new("Your interviewer")
    }
}
