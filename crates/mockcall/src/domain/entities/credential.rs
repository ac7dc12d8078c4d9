//! SessionCredential - Authorization for one voice session start

/// Short-lived credential for starting a voice session
///
/// Moved into the provider on start; never cloned or logged.
pub enum SessionCredential {
    /// Single-use token from the token exchange
    ConversationToken(String),
    /// Public agent reference supplied by the caller
    AgentId(String),
}

impl SessionCredential {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionCredential::ConversationToken(_) => "conversation_token",
            SessionCredential::AgentId(_) => "agent_id",
        }
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionCredential::ConversationToken(_) => {
                f.write_str("ConversationToken(<redacted>)")
            }
            SessionCredential::AgentId(id) => f.debug_tuple("AgentId").field(id).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let credential = SessionCredential::ConversationToken("secret-token".into());
        assert!(!format!("{:?}", credential).contains("secret-token"));
        assert_eq!(credential.kind(), "conversation_token");
    }
}
