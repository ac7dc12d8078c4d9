//! Agent Catalog Port
//!
//! Lookup of interviewer persona display data.

use async_trait::async_trait;

use crate::domain::entities::AgentMetadata;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::InterviewType;

#[async_trait]
pub trait AgentCatalog: Send + Sync {
    /// Persona that conducts interviews of the given type
    async fn agent_for(&self, interview_type: InterviewType) -> Result<AgentMetadata, DomainError>;
}
