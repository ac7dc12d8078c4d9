//! Presence Cues Port
//!
//! Local haptic/audio feedback while a call is ringing.

/// Ring alert sink
///
/// Called from the coordinator task; implementations must not block.
pub trait PresenceCues: Send + Sync {
    /// One ring pulse; `pulse` counts from 1 for each ringing phase
    fn ring_pulse(&self, pulse: u32);

    /// Ringing stopped (answered, declined or torn down)
    fn ring_stopped(&self) {}
}

/// Cue sink that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCues;

impl PresenceCues for SilentCues {
    fn ring_pulse(&self, _pulse: u32) {}
}
