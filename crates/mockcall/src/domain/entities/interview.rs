//! InterviewContext - Caller-supplied data for one call

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::InterviewType;

/// Everything the coordinator needs to start a call for an interview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewContext {
    pub interview_id: String,
    pub interview_type: InterviewType,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub cv_text: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Static agent reference; skips the token exchange when set
    #[serde(default)]
    pub agent_id: Option<String>,
}

impl InterviewContext {
    pub fn new(interview_id: impl Into<String>, interview_type: InterviewType) -> Self {
        Self {
            interview_id: interview_id.into(),
            interview_type,
            candidate_name: String::new(),
            role: String::new(),
            company: String::new(),
            cv_text: None,
            topics: Vec::new(),
            agent_id: None,
        }
    }

    pub fn with_candidate(mut self, name: impl Into<String>) -> Self {
        self.candidate_name = name.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_cv(mut self, cv_text: impl Into<String>) -> Self {
        self.cv_text = Some(cv_text.into());
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.interview_id.trim().is_empty() {
            return Err(DomainError::Validation(
                "interview_id must not be empty".to_string(),
            ));
        }
        if matches!(&self.agent_id, Some(id) if id.trim().is_empty()) {
            return Err(DomainError::Validation(
                "agent_id must not be blank when provided".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(InterviewContext::new("i-1", InterviewType::Technical)
            .validate()
            .is_ok());
        assert!(InterviewContext::new("  ", InterviewType::Technical)
            .validate()
            .is_err());
        assert!(InterviewContext::new("i-1", InterviewType::Technical)
            .with_agent_id("")
            .validate()
            .is_err());
    }
}
