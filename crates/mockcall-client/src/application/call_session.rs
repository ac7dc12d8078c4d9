//! Call Session Coordinator
//!
//! Runs one interview call as a single task. User intents, voice provider
//! events, timer beats and the call setup pipeline are all handled by one
//! `select!` loop, so the state machine and the attempt have exactly one
//! writer.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mockcall::{
    dynamic_variables, AgentCatalog, AgentMetadata, Attempt, AttemptClient, AttemptId,
    CallFailure, CallMachine, CallSnapshot, CallState, ConversationMerge, DomainError,
    Finalization, FinishAttempt, InterviewContext, NavigationDirection, PresenceCues,
    ResultsHandoff, SessionConfig, SessionCredential, TokenExchange, Transition, VoiceEvent,
    VoiceSessionProvider,
};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Sleep;
use tracing::{debug, info, trace, warn};

use super::cadence::{Cadence, TICK_INTERVAL};
use crate::config::CallSettings;

/// External collaborators of a call
#[derive(Clone)]
pub struct CallDependencies {
    pub attempts: Arc<dyn AttemptClient>,
    pub tokens: Arc<dyn TokenExchange>,
    pub voice: Arc<dyn VoiceSessionProvider>,
    pub agents: Arc<dyn AgentCatalog>,
    pub cues: Arc<dyn PresenceCues>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Accept,
    Decline,
    End,
}

/// UI-side handle to a running call
///
/// Intents never block; their effect shows up in the snapshot.
#[derive(Clone)]
pub struct CallHandle {
    intents: mpsc::UnboundedSender<Intent>,
    snapshot: watch::Receiver<CallSnapshot>,
}

impl CallHandle {
    /// Answer the call; ignored unless ringing
    pub fn accept(&self) -> Result<(), DomainError> {
        self.send(Intent::Accept)
    }

    /// Reject the call; ignored unless ringing
    pub fn decline(&self) -> Result<(), DomainError> {
        self.send(Intent::Decline)
    }

    /// Hang up; ignored unless active
    pub fn end(&self) -> Result<(), DomainError> {
        self.send(Intent::End)
    }

    fn send(&self, intent: Intent) -> Result<(), DomainError> {
        self.intents
            .send(intent)
            .map_err(|_| DomainError::SessionClosed)
    }

    pub fn snapshot(&self) -> CallSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> CallState {
        self.snapshot.borrow().state
    }

    pub fn subscribe(&self) -> watch::Receiver<CallSnapshot> {
        self.snapshot.clone()
    }

    /// Wait until the snapshot satisfies `predicate`
    pub async fn wait_for<F>(&self, predicate: F) -> Result<CallSnapshot, DomainError>
    where
        F: FnMut(&CallSnapshot) -> bool,
    {
        let mut rx = self.snapshot.clone();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|_| DomainError::SessionClosed)?;
        Ok(CallSnapshot::clone(&snapshot))
    }
}

/// Call coordinator for one interview
///
/// Single use: once the call has ended, start a new session.
///
/// # Example
///
/// ```rust,ignore
/// let session = CallSession::new(context, deps, CallSettings::default())?;
/// let (call, _task) = session.spawn();
///
/// call.accept()?;
/// let active = call.wait_for(|s| s.state == CallState::Active).await?;
/// ```
pub struct CallSession {
    context: Arc<InterviewContext>,
    deps: CallDependencies,
    settings: CallSettings,
}

impl CallSession {
    pub fn new(
        context: InterviewContext,
        deps: CallDependencies,
        settings: CallSettings,
    ) -> Result<Self, DomainError> {
        context.validate()?;
        settings.validate()?;
        Ok(Self {
            context: Arc::new(context),
            deps,
            settings,
        })
    }

    /// Start the coordinator task; the call rings until answered
    pub fn spawn(self) -> (CallHandle, JoinHandle<()>) {
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(CallSnapshot::default());

        let coordinator = Coordinator {
            context: self.context,
            deps: self.deps,
            settings: self.settings,
            machine: CallMachine::new(),
            attempt: None,
            snapshot: Arc::new(snapshot_tx),
            intents: intent_rx,
            setup: None,
            cleanup: None,
            events: None,
            connect_deadline: None,
            agent_lookup: None,
            duration: Cadence::new(),
            ring: Cadence::new(),
            finish_dispatched: false,
        };

        let task = tokio::spawn(coordinator.run());
        let handle = CallHandle {
            intents: intent_tx,
            snapshot: snapshot_rx,
        };
        (handle, task)
    }
}

/// Output of a successful setup pipeline
struct Launched {
    attempt: Attempt,
    agent: Option<AgentMetadata>,
    events: mpsc::UnboundedReceiver<VoiceEvent>,
}

struct Coordinator {
    context: Arc<InterviewContext>,
    deps: CallDependencies,
    settings: CallSettings,
    machine: CallMachine,
    attempt: Option<Attempt>,
    snapshot: Arc<watch::Sender<CallSnapshot>>,
    intents: mpsc::UnboundedReceiver<Intent>,
    setup: Option<JoinHandle<Result<Launched, DomainError>>>,
    /// Latest provider teardown; the next setup waits for it
    cleanup: Option<JoinHandle<()>>,
    events: Option<mpsc::UnboundedReceiver<VoiceEvent>>,
    connect_deadline: Option<Pin<Box<Sleep>>>,
    agent_lookup: Option<JoinHandle<Result<AgentMetadata, DomainError>>>,
    duration: Cadence,
    ring: Cadence,
    finish_dispatched: bool,
}

impl Coordinator {
    async fn run(mut self) {
        info!(
            interview_id = %self.context.interview_id,
            interview_type = %self.context.interview_type,
            "📞 Incoming interview call"
        );

        let agents = self.deps.agents.clone();
        let interview_type = self.context.interview_type;
        let limit = self.settings.request_timeout;
        self.agent_lookup = Some(tokio::spawn(async move {
            bounded(limit, "agent lookup", agents.agent_for(interview_type)).await
        }));
        self.start_ringing();

        while !self.machine.state().is_terminal() {
            tokio::select! {
                intent = self.intents.recv() => match intent {
                    Some(intent) => self.on_intent(intent),
                    None => {
                        self.shutdown();
                        break;
                    }
                },
                result = join_opt(&mut self.setup), if self.setup.is_some() => {
                    self.setup = None;
                    self.on_setup_complete(result);
                }
                event = recv_opt(&mut self.events), if self.events.is_some() => {
                    self.on_session_event(event);
                }
                _ = sleep_opt(&mut self.connect_deadline), if self.connect_deadline.is_some() => {
                    self.on_connect_timeout();
                }
                _ = self.duration.tick() => self.on_duration_tick(),
                pulse = self.ring.tick() => self.deps.cues.ring_pulse(pulse),
                lookup = join_opt(&mut self.agent_lookup), if self.agent_lookup.is_some() => {
                    self.agent_lookup = None;
                    self.on_agent_lookup(lookup);
                }
            }
        }

        self.stop_ringing();
        if let Some(lookup) = self.agent_lookup.take() {
            lookup.abort();
        }
        info!(
            interview_id = %self.context.interview_id,
            state = %self.machine.state(),
            "📴 Call session closed"
        );
    }

    fn publish(&self, update: impl FnOnce(&mut CallSnapshot)) {
        self.snapshot.send_modify(update);
    }

    fn attempt_id(&self) -> Option<&AttemptId> {
        self.attempt.as_ref().map(|a| &a.id)
    }

    fn on_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Accept => self.accept(),
            Intent::Decline => self.decline(),
            Intent::End => self.end_call(),
        }
    }

    fn accept(&mut self) {
        let Some(transition) = self.machine.accept() else {
            debug!(state = %self.machine.state(), "Accept ignored");
            return;
        };

        if transition.leaves(CallState::Incoming) {
            self.stop_ringing();
        }
        info!(interview_id = %self.context.interview_id, "✅ Call accepted, setting up session");
        self.publish(|s| {
            s.state = CallState::Connecting;
            s.last_error = None;
        });

        self.setup = Some(tokio::spawn(begin_call(
            self.context.clone(),
            self.deps.clone(),
            self.settings.clone(),
            self.cleanup.take(),
        )));
    }

    fn decline(&mut self) {
        let Some(transition) = self.machine.decline() else {
            debug!(state = %self.machine.state(), "Decline ignored");
            return;
        };

        if transition.leaves(CallState::Incoming) {
            self.stop_ringing();
        }
        info!(interview_id = %self.context.interview_id, "🚫 Call declined");
        self.publish(|s| s.state = CallState::Ended);
    }

    fn end_call(&mut self) {
        if self.machine.end().is_none() {
            debug!(state = %self.machine.state(), "End ignored");
            return;
        }

        info!(attempt_id = ?self.attempt_id(), "👋 Call ended by user");
        self.finish_call(true, None);
    }

    fn on_setup_complete(&mut self, result: Result<Result<Launched, DomainError>, JoinError>) {
        let outcome = result.unwrap_or_else(|e| {
            Err(DomainError::Provider(format!("call setup task failed: {}", e)))
        });

        match outcome {
            Ok(launched) if self.machine.state() == CallState::Connecting => {
                let Launched {
                    attempt,
                    agent,
                    events,
                } = launched;

                let attempt_id = attempt.id.clone();
                let conversation_id = attempt.conversation_id().map(str::to_string);
                self.attempt = Some(attempt);
                self.events = Some(events);
                self.connect_deadline =
                    Some(Box::pin(tokio::time::sleep(self.settings.connect_timeout)));

                self.publish(move |s| {
                    s.attempt_id = Some(attempt_id);
                    s.conversation_id = conversation_id;
                    if agent.is_some() {
                        s.agent = agent;
                    }
                });
            }
            Ok(_) => {
                warn!(state = %self.machine.state(), "Setup finished outside connecting, discarding session");
                self.end_provider_session();
            }
            Err(error) => {
                let transition = self.machine.on_connect_failed();
                self.rollback(transition, error, false);
            }
        }
    }

    fn on_session_event(&mut self, event: Option<VoiceEvent>) {
        let Some(event) = event else {
            debug!("Voice event stream closed");
            self.events = None;
            return;
        };

        trace!(kind = event.kind(), "Voice event");
        match event {
            VoiceEvent::Connected => self.on_connected(),
            VoiceEvent::Metadata { conversation_id } => self.merge_conversation(&conversation_id),
            VoiceEvent::Message { payload } => trace!(%payload, "Voice message"),
            VoiceEvent::Disconnected { reason } => self.on_disconnected(reason),
            VoiceEvent::Error { message } => self.on_provider_error(&message),
        }
    }

    fn on_connected(&mut self) {
        if self.machine.on_provider_connected().is_none() {
            debug!(state = %self.machine.state(), "Connect ignored");
            return;
        }

        self.connect_deadline = None;
        self.duration.start(TICK_INTERVAL);
        info!(attempt_id = ?self.attempt_id(), "🟢 Interview call connected");
        self.publish(|s| {
            s.state = CallState::Active;
            s.duration_seconds = 0;
        });
    }

    fn merge_conversation(&mut self, conversation_id: &str) {
        let Some(attempt) = self.attempt.as_mut() else {
            debug!(%conversation_id, "Conversation id without an attempt, ignoring");
            return;
        };

        match attempt.record_conversation(conversation_id) {
            ConversationMerge::Applied => {
                info!(attempt_id = %attempt.id, %conversation_id, "🔗 Conversation linked to attempt");
                let id = conversation_id.to_string();
                self.publish(move |s| s.conversation_id = Some(id));
            }
            ConversationMerge::Unchanged => {}
            ConversationMerge::Conflict { kept } => {
                warn!(
                    attempt_id = %attempt.id,
                    %kept,
                    ignored = %conversation_id,
                    "Ignoring conflicting conversation id"
                );
            }
        }
    }

    fn on_disconnected(&mut self, reason: Option<String>) {
        match self.machine.state() {
            CallState::Connecting => {
                let reason = reason.unwrap_or_else(|| "disconnected before connect".to_string());
                let transition = self.machine.on_provider_disconnected();
                self.rollback(transition, DomainError::Provider(reason), false);
            }
            CallState::Active => {
                if self.machine.on_provider_disconnected().is_some() {
                    info!(?reason, "📴 Provider ended the call");
                    self.finish_call(false, None);
                }
            }
            state => debug!(%state, "Disconnect ignored"),
        }
    }

    fn on_provider_error(&mut self, message: &str) {
        let error = provider_error(message);
        match self.machine.state() {
            CallState::Connecting => {
                let transition = self.machine.on_provider_error();
                self.rollback(transition, error, true);
            }
            CallState::Active => {
                if self.machine.on_provider_error().is_some() {
                    warn!(error = %error, "❌ Provider error ended the call");
                    self.finish_call(true, Some(CallFailure::mid_call()));
                }
            }
            state => debug!(%state, error = %error, "Provider error ignored"),
        }
    }

    fn on_connect_timeout(&mut self) {
        self.connect_deadline = None;
        let error = DomainError::timeout("voice connect", self.settings.connect_timeout);
        let transition = self.machine.on_connect_failed();
        self.rollback(transition, error, true);
    }

    fn on_duration_tick(&mut self) {
        if self.machine.state() != CallState::Active {
            self.duration.stop();
            return;
        }
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };

        let seconds = attempt.record_tick();
        self.publish(move |s| s.duration_seconds = seconds);
    }

    fn on_agent_lookup(&mut self, result: Result<Result<AgentMetadata, DomainError>, JoinError>) {
        let agent = match result {
            Ok(Ok(agent)) => agent,
            Ok(Err(e)) => {
                warn!(error = %e, "⚠️  Agent lookup failed, using fallback persona");
                AgentMetadata::fallback()
            }
            Err(e) => {
                warn!(error = %e, "⚠️  Agent lookup task failed, using fallback persona");
                AgentMetadata::fallback()
            }
        };

        // The token grant's persona takes precedence.
        self.publish(move |s| {
            if s.agent.is_none() {
                s.agent = Some(agent);
            }
        });
    }

    /// `Connecting → Incoming` after a setup or connect failure
    fn rollback(&mut self, transition: Option<Transition>, error: DomainError, end_provider: bool) {
        let Some(transition) = transition else {
            return;
        };

        self.events = None;
        self.connect_deadline = None;
        if end_provider {
            self.end_provider_session();
        }
        if let Some(attempt) = self.attempt.take() {
            warn!(attempt_id = %attempt.id, "Attempt left open after failed connect");
        }

        warn!(error = %error, "↩️  Call setup failed, ringing again");
        let failure = CallFailure::pre_call(&error);
        self.publish(move |s| {
            s.state = CallState::Incoming;
            s.last_error = Some(failure);
            s.attempt_id = None;
            s.conversation_id = None;
        });
        if transition.enters(CallState::Incoming) {
            self.start_ringing();
        }
    }

    /// Side effects of `Active → Ended`: provider cleanup, results handoff,
    /// then background finalization
    fn finish_call(&mut self, end_provider: bool, failure: Option<CallFailure>) {
        self.duration.stop();
        self.events = None;
        self.connect_deadline = None;

        if end_provider {
            self.end_provider_session();
        }

        let Some(attempt) = self.attempt.as_ref() else {
            warn!("Call ended without an attempt");
            self.publish(move |s| {
                s.state = CallState::Ended;
                s.last_error = failure;
            });
            return;
        };

        let request = attempt.finish_request();
        let started_at = attempt.started_at;
        let handoff = ResultsHandoff {
            interview_id: request.interview_id.clone(),
            attempt_id: request.attempt_id.clone(),
            duration_seconds: request.duration_seconds,
            conversation_id: request.conversation_id.clone(),
            direction: NavigationDirection::Forward,
            ended_at: Utc::now(),
        };

        info!(
            attempt_id = %request.attempt_id,
            duration_seconds = request.duration_seconds,
            conversation_id = ?request.conversation_id,
            %started_at,
            "🏁 Call ended, handing off to results"
        );
        self.publish(move |s| {
            s.state = CallState::Ended;
            s.duration_seconds = handoff.duration_seconds;
            s.handoff = Some(handoff);
            s.last_error = failure;
            s.finalization = Finalization::Pending;
        });

        if !self.finish_dispatched {
            self.finish_dispatched = true;
            tokio::spawn(finalize_attempt(
                self.deps.attempts.clone(),
                request,
                self.snapshot.clone(),
                self.settings.request_timeout,
            ));
        }
    }

    fn shutdown(&mut self) {
        match self.machine.state() {
            CallState::Active => {
                if self.machine.end().is_some() {
                    info!("Call handles dropped, ending active call");
                    self.finish_call(true, None);
                }
            }
            CallState::Connecting => {
                if let Some(setup) = self.setup.take() {
                    setup.abort();
                }
                self.machine.on_connect_failed();
                self.events = None;
                self.connect_deadline = None;
                self.end_provider_session();
                if let Some(attempt) = self.attempt.take() {
                    warn!(attempt_id = %attempt.id, "Attempt left open after handles dropped");
                }

                info!("Call handles dropped during setup, session torn down");
                let failure = CallFailure::pre_call(&DomainError::SessionClosed);
                self.publish(move |s| {
                    s.state = CallState::Incoming;
                    s.last_error = Some(failure);
                    s.attempt_id = None;
                    s.conversation_id = None;
                });
            }
            _ => {}
        }
    }

    /// Ends the provider session once any earlier teardown has finished
    fn end_provider_session(&mut self) {
        let previous = self.cleanup.take();
        self.cleanup = Some(end_voice_session(
            self.deps.voice.clone(),
            previous,
            self.settings.request_timeout,
        ));
    }

    fn start_ringing(&mut self) {
        if self.ring.start(self.settings.ring_interval) {
            debug!("🔔 Ringing");
        }
    }

    fn stop_ringing(&mut self) {
        if self.ring.stop() {
            self.deps.cues.ring_stopped();
        }
    }
}

/// Attempt start, credential, provider start
///
/// `previous_cleanup` is the teardown of an earlier failed try; nothing
/// starts until it has finished.
async fn begin_call(
    context: Arc<InterviewContext>,
    deps: CallDependencies,
    settings: CallSettings,
    previous_cleanup: Option<JoinHandle<()>>,
) -> Result<Launched, DomainError> {
    if let Some(cleanup) = previous_cleanup {
        debug!("Waiting for the previous voice session to close");
        if let Err(e) = cleanup.await {
            warn!(error = %e, "Previous voice session cleanup task failed");
        }
    }

    let ticket = bounded(
        settings.request_timeout,
        "attempt start",
        deps.attempts.start_attempt(&context.interview_id),
    )
    .await?;

    let mut attempt = Attempt::new(ticket.attempt_id, context.interview_id.clone());
    info!(attempt_id = %attempt.id, "📝 Attempt started");

    match launch_voice(&context, &deps, &settings, &mut attempt).await {
        Ok((agent, events)) => Ok(Launched {
            attempt,
            agent,
            events,
        }),
        Err(e) => {
            warn!(attempt_id = %attempt.id, error = %e, "Attempt left open after failed setup");
            Err(e)
        }
    }
}

async fn launch_voice(
    context: &InterviewContext,
    deps: &CallDependencies,
    settings: &CallSettings,
    attempt: &mut Attempt,
) -> Result<(Option<AgentMetadata>, mpsc::UnboundedReceiver<VoiceEvent>), DomainError> {
    let (credential, agent) = match &context.agent_id {
        Some(agent_id) => (SessionCredential::AgentId(agent_id.clone()), None),
        None => {
            let grant = bounded(
                settings.request_timeout,
                "token exchange",
                deps.tokens
                    .conversation_token(&context.interview_id, context.interview_type),
            )
            .await?;
            (
                SessionCredential::ConversationToken(grant.conversation_token),
                grant.agent,
            )
        }
    };
    debug!(credential = credential.kind(), "Session credential ready");

    let config = SessionConfig {
        credential,
        dynamic_variables: dynamic_variables(context, settings.cv_excerpt_chars),
    };
    let (sink, events) = mpsc::unbounded_channel();

    let started = match tokio::time::timeout(
        settings.connect_timeout,
        deps.voice.start_session(config, sink),
    )
    .await
    {
        Ok(result) => result?,
        Err(_) => {
            let ended = bounded(
                settings.request_timeout,
                "voice session end",
                deps.voice.end_session(),
            )
            .await;
            if let Err(e) = ended {
                warn!(provider = deps.voice.name(), error = %e, "Voice session cleanup failed");
            }
            return Err(DomainError::timeout(
                "voice session start",
                settings.connect_timeout,
            ));
        }
    };

    if let Some(conversation_id) = started.conversation_id.as_deref() {
        attempt.record_conversation(conversation_id);
    }
    info!(provider = deps.voice.name(), "🎙️  Voice session started, waiting for connect");

    Ok((agent, events))
}

async fn finalize_attempt(
    attempts: Arc<dyn AttemptClient>,
    request: FinishAttempt,
    snapshot: Arc<watch::Sender<CallSnapshot>>,
    limit: Duration,
) {
    let finalization = match bounded(limit, "attempt finish", attempts.finish_attempt(&request)).await
    {
        Ok(()) => {
            info!(attempt_id = %request.attempt_id, "✅ Attempt finalized");
            Finalization::Completed
        }
        Err(e) => {
            warn!(
                attempt_id = %request.attempt_id,
                error = %e,
                "❌ Attempt finalization failed, not retried"
            );
            Finalization::Failed(e.to_string())
        }
    };

    snapshot.send_modify(|s| s.finalization = finalization);
}

/// Background provider cleanup, run after `previous` completes
fn end_voice_session(
    voice: Arc<dyn VoiceSessionProvider>,
    previous: Option<JoinHandle<()>>,
    limit: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(previous) = previous {
            let _ = previous.await;
        }
        if let Err(e) = bounded(limit, "voice session end", voice.end_session()).await {
            warn!(provider = voice.name(), error = %e, "Voice session cleanup failed");
        }
    })
}

fn provider_error(message: &str) -> DomainError {
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("microphone") {
        DomainError::Permission(message.to_string())
    } else {
        DomainError::Provider(message.to_string())
    }
}

async fn bounded<T, F>(limit: Duration, operation: &str, fut: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| DomainError::timeout(operation, limit))?
}

async fn join_opt<T>(handle: &mut Option<JoinHandle<T>>) -> Result<T, JoinError> {
    match handle {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

async fn recv_opt<T>(rx: &mut Option<mpsc::UnboundedReceiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn sleep_opt(sleep: &mut Option<Pin<Box<Sleep>>>) {
    match sleep {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
