//! CallState - Lifecycle phase of a mock interview call

use serde::{Deserialize, Serialize};

/// Call lifecycle phase
///
/// `Incoming → Connecting → Active → Ended`, with `Connecting → Incoming`
/// as the only backwards edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    #[default]
    Incoming,
    Connecting,
    Active,
    Ended,
}

impl CallState {
    /// `Ended` accepts no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::Ended)
    }
}

impl std::fmt::Display for CallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallState::Incoming => write!(f, "incoming"),
            CallState::Connecting => write!(f, "connecting"),
            CallState::Active => write!(f, "active"),
            CallState::Ended => write!(f, "ended"),
        }
    }
}
