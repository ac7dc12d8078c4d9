//! Token Exchange Port
//!
//! Backend interface issuing single-use voice session credentials.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::entities::AgentMetadata;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::InterviewType;

/// Credential grant for one conversation
#[derive(Clone, Deserialize)]
pub struct ConversationGrant {
    pub conversation_token: String,
    #[serde(default)]
    pub agent: Option<AgentMetadata>,
}

impl std::fmt::Debug for ConversationGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationGrant")
            .field("conversation_token", &"<redacted>")
            .field("agent", &self.agent)
            .finish()
    }
}

#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Issue a conversation token for an interview
    async fn conversation_token(
        &self,
        interview_id: &str,
        interview_type: InterviewType,
    ) -> Result<ConversationGrant, DomainError>;
}
