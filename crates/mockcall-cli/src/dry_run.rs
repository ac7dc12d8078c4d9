//! Dry-run voice provider and terminal ring cues
//!
//! Lets `mockcall rehearse` exercise the full call flow against the real
//! backend without any audio.

use std::sync::Mutex;

use async_trait::async_trait;
use colored::Colorize;
use mockcall::{
    DomainError, PresenceCues, SessionConfig, SessionStarted, VoiceEvent, VoiceEventSink,
    VoiceSessionProvider,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Connects immediately and reports a generated conversation id
#[derive(Default)]
pub struct DryRunVoice {
    sink: Mutex<Option<VoiceEventSink>>,
}

impl DryRunVoice {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoiceSessionProvider for DryRunVoice {
    async fn start_session(
        &self,
        config: SessionConfig,
        events: VoiceEventSink,
    ) -> Result<SessionStarted, DomainError> {
        info!(
            credential = config.credential.kind(),
            variables = config.dynamic_variables.len(),
            "🎙️  Dry-run session opened"
        );
        for (key, value) in config.dynamic_variables.iter() {
            debug!(%key, chars = value.chars().count(), "Dynamic variable");
        }

        let conversation_id = format!("dry-{}", Uuid::new_v4());
        let send = |event| {
            events
                .send(event)
                .map_err(|_| DomainError::Provider("call session is gone".to_string()))
        };
        send(VoiceEvent::Connected)?;
        send(VoiceEvent::Metadata { conversation_id })?;

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| DomainError::Provider("dry-run state poisoned".to_string()))?;
        *sink = Some(events);

        Ok(SessionStarted::default())
    }

    async fn end_session(&self) -> Result<(), DomainError> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| DomainError::Provider("dry-run state poisoned".to_string()))?;
        if sink.take().is_some() {
            info!("Dry-run session closed");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

/// Prints a bell line per ring pulse
pub struct ConsoleCues;

impl PresenceCues for ConsoleCues {
    fn ring_pulse(&self, pulse: u32) {
        eprintln!("  {} {}", "🔔".yellow(), format!("ring {}", pulse).dimmed());
    }

    fn ring_stopped(&self) {
        eprintln!("  {}", "ringing stopped".dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockcall::{DynamicVariables, SessionCredential};
    use tokio::sync::mpsc;

    fn config() -> SessionConfig {
        SessionConfig {
            credential: SessionCredential::AgentId("agent-1".to_string()),
            dynamic_variables: DynamicVariables::new(),
        }
    }

    #[tokio::test]
    async fn test_connects_then_reports_conversation() {
        let voice = DryRunVoice::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        voice.start_session(config(), tx).await.unwrap();

        assert_eq!(rx.recv().await, Some(VoiceEvent::Connected));
        let metadata = rx.recv().await.unwrap();
        assert!(metadata.conversation_id().unwrap().starts_with("dry-"));
    }

    #[tokio::test]
    async fn test_end_releases_event_sink() {
        let voice = DryRunVoice::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        voice.start_session(config(), tx).await.unwrap();

        voice.end_session().await.unwrap();

        rx.recv().await;
        rx.recv().await;
        assert_eq!(rx.recv().await, None);
    }
}
