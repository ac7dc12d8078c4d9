//! HTTP AgentCatalog Implementation

use std::sync::Arc;

use async_trait::async_trait;

use mockcall::{AgentCatalog, AgentMetadata, DomainError, InterviewType};

use super::http::{segment, BackendHttp};

/// Looks up the interviewer persona per interview type
pub struct HttpAgentCatalog {
    http: Arc<BackendHttp>,
}

impl HttpAgentCatalog {
    pub fn new(http: Arc<BackendHttp>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AgentCatalog for HttpAgentCatalog {
    async fn agent_for(&self, interview_type: InterviewType) -> Result<AgentMetadata, DomainError> {
        let path = format!("agents/{}", segment(interview_type.as_str()));
        self.http
            .send_json(self.http.get(&path), "agent", interview_type.as_str())
            .await
    }
}
