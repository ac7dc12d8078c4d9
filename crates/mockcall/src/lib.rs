//! Mockcall Domain Library
//!
//! Core domain types and interfaces for voice mock-interview calls.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Attempt, InterviewContext, CallSnapshot, AgentMetadata)
//!   - `value_objects/`: Immutable value types (CallState, InterviewType, NavigationDirection)
//!   - `services/`: Call state machine and session prompt building
//!   - `errors/`: Domain error and user-facing failure types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `services/`: Backend interfaces (attempts, token exchange, agent catalog)
//!   - `voice`: Third-party voice session SDK
//!   - `cues`: Ring alert feedback
//!
//! # Usage
//!
//! ```rust,ignore
//! use mockcall::domain::{CallMachine, InterviewContext};
//! use mockcall::ports::{AttemptClient, VoiceSessionProvider};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    dynamic_variables, system_prompt, AgentMetadata, Attempt, AttemptId, CallFailure,
    CallMachine, CallSnapshot, CallState, CallTrigger, ConversationMerge, DomainError,
    DynamicVariables, FailureKind, Finalization, FinishAttempt, InterviewContext, InterviewType,
    NavigationDirection, ResultsHandoff, SessionCredential, Transition,
    DEFAULT_CV_EXCERPT_CHARS,
};
pub use ports::{
    AgentCatalog, AttemptClient, AttemptTicket, ConversationGrant, PresenceCues, SessionConfig,
    SessionStarted, SilentCues, TokenExchange, VoiceEvent, VoiceEventSink, VoiceSessionProvider,
};
