//! HTTP TokenExchange Implementation

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use mockcall::{ConversationGrant, DomainError, InterviewType, TokenExchange};

use super::http::{segment, BackendHttp};

/// Exchanges an interview for a short-lived voice conversation token
pub struct HttpTokenExchange {
    http: Arc<BackendHttp>,
}

#[derive(Debug, Serialize)]
struct TokenRequest {
    interview_type: InterviewType,
}

impl HttpTokenExchange {
    pub fn new(http: Arc<BackendHttp>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn conversation_token(
        &self,
        interview_id: &str,
        interview_type: InterviewType,
    ) -> Result<ConversationGrant, DomainError> {
        let path = format!("interviews/{}/conversation-token", segment(interview_id));
        let request = self.http.post(&path).json(&TokenRequest { interview_type });

        let grant: ConversationGrant = self
            .http
            .send_json(request, "interview", interview_id)
            .await?;

        if grant.conversation_token.trim().is_empty() {
            return Err(DomainError::Auth(
                "backend returned an empty conversation token".to_string(),
            ));
        }
        Ok(grant)
    }
}
