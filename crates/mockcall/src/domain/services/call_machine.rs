//! Call State Machine
//!
//! Owns the call lifecycle. Every edge is listed in [`CallMachine::next`];
//! any other (state, trigger) pair is ignored.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CallState;

/// Inputs that may move a call between states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallTrigger {
    /// User answered
    Accept,
    /// User rejected the incoming call
    Decline,
    /// Voice provider connected
    Connected,
    /// Voice provider disconnected
    Disconnected,
    /// Voice provider reported an error
    ProviderError,
    /// Attempt start, credential, provider start or connect timeout failed
    ConnectFailed,
    /// User hung up
    End,
}

/// An applied edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: CallState,
    pub to: CallState,
    pub trigger: CallTrigger,
}

impl Transition {
    pub fn leaves(&self, state: CallState) -> bool {
        self.from == state && self.to != state
    }

    pub fn enters(&self, state: CallState) -> bool {
        self.to == state && self.from != state
    }
}

/// Single-use call state machine
#[derive(Debug, Clone, Default)]
pub struct CallMachine {
    state: CallState,
}

impl CallMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    /// Target state for a trigger, if the edge exists
    pub fn next(state: CallState, trigger: CallTrigger) -> Option<CallState> {
        use CallState::*;
        use CallTrigger::*;

        match (state, trigger) {
            (Incoming, Accept) => Some(Connecting),
            (Incoming, Decline) => Some(Ended),
            (Connecting, Connected) => Some(Active),
            (Connecting, Disconnected | ProviderError | ConnectFailed) => Some(Incoming),
            (Active, End | Disconnected | ProviderError) => Some(Ended),
            _ => None,
        }
    }

    /// Apply a trigger; `None` when the edge does not exist
    pub fn fire(&mut self, trigger: CallTrigger) -> Option<Transition> {
        let from = self.state;
        let Some(to) = Self::next(from, trigger) else {
            tracing::debug!(state = %from, ?trigger, "Ignoring trigger with no edge");
            return None;
        };

        self.state = to;
        tracing::debug!(from = %from, to = %to, ?trigger, "Call transition");
        Some(Transition { from, to, trigger })
    }

    pub fn accept(&mut self) -> Option<Transition> {
        self.fire(CallTrigger::Accept)
    }

    pub fn decline(&mut self) -> Option<Transition> {
        self.fire(CallTrigger::Decline)
    }

    pub fn on_provider_connected(&mut self) -> Option<Transition> {
        self.fire(CallTrigger::Connected)
    }

    pub fn on_provider_disconnected(&mut self) -> Option<Transition> {
        self.fire(CallTrigger::Disconnected)
    }

    pub fn on_provider_error(&mut self) -> Option<Transition> {
        self.fire(CallTrigger::ProviderError)
    }

    pub fn on_connect_failed(&mut self) -> Option<Transition> {
        self.fire(CallTrigger::ConnectFailed)
    }

    pub fn end(&mut self) -> Option<Transition> {
        self.fire(CallTrigger::End)
    }
}
