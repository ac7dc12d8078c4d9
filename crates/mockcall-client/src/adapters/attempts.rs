//! HTTP AttemptClient Implementation

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use mockcall::{AttemptClient, AttemptTicket, DomainError, FinishAttempt};

use super::http::{segment, BackendHttp};

/// Attempt lifecycle over the interview backend's REST API
pub struct HttpAttemptClient {
    http: Arc<BackendHttp>,
}

#[derive(Debug, Serialize)]
struct FinishBody<'a> {
    duration_seconds: u64,
    conversation_id: Option<&'a str>,
}

impl HttpAttemptClient {
    pub fn new(http: Arc<BackendHttp>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AttemptClient for HttpAttemptClient {
    async fn start_attempt(&self, interview_id: &str) -> Result<AttemptTicket, DomainError> {
        let path = format!("interviews/{}/attempts", segment(interview_id));
        let ticket: AttemptTicket = self
            .http
            .send_json(self.http.post(&path), "interview", interview_id)
            .await?;

        debug!(%interview_id, attempt_id = %ticket.attempt_id, "Attempt created");
        Ok(ticket)
    }

    async fn finish_attempt(&self, request: &FinishAttempt) -> Result<(), DomainError> {
        let path = format!(
            "interviews/{}/attempts/{}/finish",
            segment(&request.interview_id),
            segment(request.attempt_id.as_str())
        );
        let body = FinishBody {
            duration_seconds: request.duration_seconds,
            conversation_id: request.conversation_id.as_deref(),
        };

        self.http
            .send(
                self.http.post(&path).json(&body),
                "attempt",
                request.attempt_id.as_str(),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use mockcall::AttemptId;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client(server: &MockServer) -> HttpAttemptClient {
        let config = BackendConfig::new(server.uri()).with_api_key("secret");
        HttpAttemptClient::new(Arc::new(BackendHttp::new(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_start_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/interviews/i-1/attempts"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"attempt_id": "A1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ticket = client(&server).start_attempt("i-1").await.unwrap();
        assert_eq!(ticket.attempt_id, AttemptId::from("A1"));
    }

    #[tokio::test]
    async fn test_start_attempt_unknown_interview() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server).start_attempt("missing").await.unwrap_err();
        assert_eq!(err, DomainError::not_found("interview", "missing"));
    }

    #[tokio::test]
    async fn test_start_attempt_bad_body_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).start_attempt("i-1").await.unwrap_err();
        assert!(matches!(err, DomainError::Network(_)));
    }

    #[tokio::test]
    async fn test_finish_attempt_sends_duration_and_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/interviews/i-1/attempts/A1/finish"))
            .and(body_json(serde_json::json!({
                "duration_seconds": 42,
                "conversation_id": "c1"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let request = FinishAttempt {
            interview_id: "i-1".to_string(),
            attempt_id: AttemptId::from("A1"),
            duration_seconds: 42,
            conversation_id: Some("c1".to_string()),
        };
        client(&server).finish_attempt(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_finish_attempt_rejected_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let request = FinishAttempt {
            interview_id: "i-1".to_string(),
            attempt_id: AttemptId::from("A1"),
            duration_seconds: 0,
            conversation_id: None,
        };
        let err = client(&server).finish_attempt(&request).await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(_)));
    }
}
