//! Voice Session Port
//!
//! Abstract interface for the third-party conversational voice SDK.
//!
//! Implementations wrap a concrete SDK and forward its callbacks into the
//! [`VoiceEventSink`] handed to [`VoiceSessionProvider::start_session`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::domain::entities::SessionCredential;
use crate::domain::errors::DomainError;
use crate::domain::services::DynamicVariables;

/// Events emitted by a running voice session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceEvent {
    /// Audio connected, the conversation is live
    Connected,

    /// Session closed by the provider or the remote side
    Disconnected {
        #[serde(default)]
        reason: Option<String>,
    },

    /// Session metadata carrying the provider's conversation id
    Metadata { conversation_id: String },

    /// Transcript or agent message, provider-specific payload
    Message {
        #[serde(default)]
        payload: serde_json::Value,
    },

    /// Provider-side failure
    Error { message: String },
}

impl VoiceEvent {
    /// Conversation id carried by this event, if any
    pub fn conversation_id(&self) -> Option<&str> {
        match self {
            Self::Metadata { conversation_id } => Some(conversation_id),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected { .. } => "disconnected",
            Self::Metadata { .. } => "metadata",
            Self::Message { .. } => "message",
            Self::Error { .. } => "error",
        }
    }
}

/// Channel the provider pushes events into
pub type VoiceEventSink = mpsc::UnboundedSender<VoiceEvent>;

/// Configuration for one voice session
#[derive(Debug)]
pub struct SessionConfig {
    pub credential: SessionCredential,
    pub dynamic_variables: DynamicVariables,
}

/// Result of a successful start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStarted {
    /// Some SDKs return the conversation id synchronously
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Voice session provider interface
///
/// Treated as unreliable: `start_session` may succeed and never emit
/// [`VoiceEvent::Connected`].
///
/// # Example
///
/// ```rust,ignore
/// use mockcall::ports::VoiceSessionProvider;
///
/// struct ConvaiSdk { /* ... */ }
///
/// #[async_trait]
/// impl VoiceSessionProvider for ConvaiSdk {
///     async fn start_session(&self, config: SessionConfig, events: VoiceEventSink)
///         -> Result<SessionStarted, DomainError> {
///         // Open the realtime connection, forward callbacks into `events`
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait VoiceSessionProvider: Send + Sync {
    /// Start a session; events flow into `events` after this resolves
    async fn start_session(
        &self,
        config: SessionConfig,
        events: VoiceEventSink,
    ) -> Result<SessionStarted, DomainError>;

    /// End the current session
    async fn end_session(&self) -> Result<(), DomainError>;

    /// Provider name (e.g., "elevenlabs", "dry-run")
    fn name(&self) -> &str;
}
