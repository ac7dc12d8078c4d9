//! Infrastructure Adapters
//!
//! Implementations of the call ports against the interview backend.

mod agent_catalog;
mod attempts;
mod http;
mod token_exchange;

pub use agent_catalog::HttpAgentCatalog;
pub use attempts::HttpAttemptClient;
pub use http::BackendHttp;
pub use token_exchange::HttpTokenExchange;

use std::sync::Arc;

use mockcall::{DomainError, PresenceCues, VoiceSessionProvider};

use crate::application::CallDependencies;
use crate::config::BackendConfig;

/// Wire every backend port to one HTTP client
pub fn backend_dependencies(
    config: &BackendConfig,
    voice: Arc<dyn VoiceSessionProvider>,
    cues: Arc<dyn PresenceCues>,
) -> Result<CallDependencies, DomainError> {
    let http = Arc::new(BackendHttp::new(config)?);
    Ok(CallDependencies {
        attempts: Arc::new(HttpAttemptClient::new(http.clone())),
        tokens: Arc::new(HttpTokenExchange::new(http.clone())),
        agents: Arc::new(HttpAgentCatalog::new(http)),
        voice,
        cues,
    })
}
