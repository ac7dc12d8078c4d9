//! Mock implementations of the call ports.
//!
//! Every mock counts its calls so tests can assert on side effects, and can
//! be switched to fail or hang.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mockcall::{
    AgentCatalog, AgentMetadata, AttemptClient, AttemptId, AttemptTicket, ConversationGrant,
    DomainError, FinishAttempt, InterviewType, PresenceCues, SessionConfig, SessionStarted,
    TokenExchange, VoiceEvent, VoiceEventSink, VoiceSessionProvider,
};

use crate::application::CallDependencies;

/// How a mocked request behaves
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Fail(DomainError),
    Hang,
}

async fn hang() {
    std::future::pending::<()>().await
}

/// Attempt backend handing out `A1`, `A2`, ...
pub struct MockAttempts {
    started: AtomicUsize,
    start_failures: Mutex<VecDeque<DomainError>>,
    start_delay: Mutex<Option<Duration>>,
    finish_behavior: Mutex<Behavior>,
    finished: Mutex<Vec<FinishAttempt>>,
}

impl MockAttempts {
    pub fn new() -> Self {
        Self {
            started: AtomicUsize::new(0),
            start_failures: Mutex::new(VecDeque::new()),
            start_delay: Mutex::new(None),
            finish_behavior: Mutex::new(Behavior::Succeed),
            finished: Mutex::new(Vec::new()),
        }
    }

    /// Fail the next start call
    pub fn fail_next_start(&self, error: DomainError) {
        self.start_failures.lock().unwrap().push_back(error);
    }

    pub fn set_start_delay(&self, delay: Duration) {
        *self.start_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_finish_behavior(&self, behavior: Behavior) {
        *self.finish_behavior.lock().unwrap() = behavior;
    }

    pub fn start_calls(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finish_requests(&self) -> Vec<FinishAttempt> {
        self.finished.lock().unwrap().clone()
    }
}

impl Default for MockAttempts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttemptClient for MockAttempts {
    async fn start_attempt(&self, _interview_id: &str) -> Result<AttemptTicket, DomainError> {
        let n = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = *self.start_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.start_failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(AttemptTicket {
                attempt_id: AttemptId::new(format!("A{}", n)),
            }),
        }
    }

    async fn finish_attempt(&self, request: &FinishAttempt) -> Result<(), DomainError> {
        self.finished.lock().unwrap().push(request.clone());
        let behavior = self.finish_behavior.lock().unwrap().clone();
        match behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(error) => Err(error),
            Behavior::Hang => {
                hang().await;
                Ok(())
            }
        }
    }
}

/// Token exchange returning `tok-N` and an optional persona
pub struct MockTokens {
    calls: AtomicUsize,
    agent: Mutex<Option<AgentMetadata>>,
    behavior: Mutex<Behavior>,
}

impl MockTokens {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            agent: Mutex::new(None),
            behavior: Mutex::new(Behavior::Succeed),
        }
    }

    pub fn set_agent(&self, agent: AgentMetadata) {
        *self.agent.lock().unwrap() = Some(agent);
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTokens {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenExchange for MockTokens {
    async fn conversation_token(
        &self,
        _interview_id: &str,
        _interview_type: InterviewType,
    ) -> Result<ConversationGrant, DomainError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            Behavior::Succeed => Ok(ConversationGrant {
                conversation_token: format!("tok-{}", n),
                agent: self.agent.lock().unwrap().clone(),
            }),
            Behavior::Fail(error) => Err(error),
            Behavior::Hang => {
                hang().await;
                Err(DomainError::Network("unreachable".to_string()))
            }
        }
    }
}

/// Voice provider that keeps the event sink so tests can push events
pub struct MockVoice {
    starts: AtomicUsize,
    ends: AtomicUsize,
    auto_connect: AtomicBool,
    start_failure: Mutex<Option<DomainError>>,
    start_conversation: Mutex<Option<String>>,
    end_delay: Mutex<Option<Duration>>,
    sink: Mutex<Option<VoiceEventSink>>,
    configs: Mutex<Vec<SessionConfig>>,
}

impl MockVoice {
    pub fn new() -> Self {
        Self {
            starts: AtomicUsize::new(0),
            ends: AtomicUsize::new(0),
            auto_connect: AtomicBool::new(true),
            start_failure: Mutex::new(None),
            start_conversation: Mutex::new(None),
            end_delay: Mutex::new(None),
            sink: Mutex::new(None),
            configs: Mutex::new(Vec::new()),
        }
    }

    /// Emit `Connected` as soon as a session starts
    pub fn set_auto_connect(&self, enabled: bool) {
        self.auto_connect.store(enabled, Ordering::SeqCst);
    }

    pub fn fail_next_start(&self, error: DomainError) {
        *self.start_failure.lock().unwrap() = Some(error);
    }

    /// Conversation id returned synchronously from start
    pub fn set_start_conversation(&self, conversation_id: &str) {
        *self.start_conversation.lock().unwrap() = Some(conversation_id.to_string());
    }

    /// Slow down teardown; the session is closed after the delay
    pub fn set_end_delay(&self, delay: Duration) {
        *self.end_delay.lock().unwrap() = Some(delay);
    }

    /// Whether a started session is still open
    pub fn session_alive(&self) -> bool {
        self.sink.lock().unwrap().is_some()
    }

    /// Push an event into the current session
    pub fn emit(&self, event: VoiceEvent) -> bool {
        match self.sink.lock().unwrap().as_ref() {
            Some(sink) => sink.send(event).is_ok(),
            None => false,
        }
    }

    pub fn start_calls(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn end_calls(&self) -> usize {
        self.ends.load(Ordering::SeqCst)
    }

    /// Credential kind and candidate name of each started session
    pub fn started_with(&self) -> Vec<(&'static str, String)> {
        self.configs
            .lock()
            .unwrap()
            .iter()
            .map(|c| {
                (
                    c.credential.kind(),
                    c.dynamic_variables
                        .get("candidate_name")
                        .unwrap_or_default()
                        .to_string(),
                )
            })
            .collect()
    }
}

impl Default for MockVoice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceSessionProvider for MockVoice {
    async fn start_session(
        &self,
        config: SessionConfig,
        events: VoiceEventSink,
    ) -> Result<SessionStarted, DomainError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.start_failure.lock().unwrap().take() {
            return Err(error);
        }

        self.configs.lock().unwrap().push(config);
        if self.auto_connect.load(Ordering::SeqCst) {
            let _ = events.send(VoiceEvent::Connected);
        }
        *self.sink.lock().unwrap() = Some(events);

        Ok(SessionStarted {
            conversation_id: self.start_conversation.lock().unwrap().clone(),
        })
    }

    async fn end_session(&self) -> Result<(), DomainError> {
        self.ends.fetch_add(1, Ordering::SeqCst);
        let delay = *self.end_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.sink.lock().unwrap().take();
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Agent catalog with a fixed answer
pub struct MockAgents {
    result: Result<AgentMetadata, DomainError>,
}

impl MockAgents {
    pub fn returning(agent: AgentMetadata) -> Self {
        Self { result: Ok(agent) }
    }

    pub fn failing(error: DomainError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl AgentCatalog for MockAgents {
    async fn agent_for(&self, _interview_type: InterviewType) -> Result<AgentMetadata, DomainError> {
        self.result.clone()
    }
}

/// Records ring pulses
#[derive(Default)]
pub struct RecordingCues {
    pulses: Mutex<Vec<u32>>,
    stops: AtomicUsize,
}

impl RecordingCues {
    pub fn pulses(&self) -> Vec<u32> {
        self.pulses.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl PresenceCues for RecordingCues {
    fn ring_pulse(&self, pulse: u32) {
        self.pulses.lock().unwrap().push(pulse);
    }

    fn ring_stopped(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// All mocks wired together
pub struct MockPorts {
    pub attempts: Arc<MockAttempts>,
    pub tokens: Arc<MockTokens>,
    pub voice: Arc<MockVoice>,
    pub agents: Arc<MockAgents>,
    pub cues: Arc<RecordingCues>,
}

impl MockPorts {
    pub fn new() -> Self {
        Self::with_agents(MockAgents::returning(AgentMetadata::new("Maya")))
    }

    pub fn with_agents(agents: MockAgents) -> Self {
        Self {
            attempts: Arc::new(MockAttempts::new()),
            tokens: Arc::new(MockTokens::new()),
            voice: Arc::new(MockVoice::new()),
            agents: Arc::new(agents),
            cues: Arc::new(RecordingCues::default()),
        }
    }

    pub fn dependencies(&self) -> CallDependencies {
        CallDependencies {
            attempts: self.attempts.clone(),
            tokens: self.tokens.clone(),
            voice: self.voice.clone(),
            agents: self.agents.clone(),
            cues: self.cues.clone(),
        }
    }
}

impl Default for MockPorts {
    fn default() -> Self {
        Self::new()
    }
}
