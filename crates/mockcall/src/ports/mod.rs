//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the call domain
//! interacts with external systems (backend, voice SDK, device cues).
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod cues;
pub mod services;
pub mod voice;

// Re-exports
pub use cues::*;
pub use services::*;
pub use voice::*;
