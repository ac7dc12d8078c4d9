//! Application Layer (Use Cases)
//!
//! Coordinates one interview call between the UI, the interview backend
//! and the voice provider.

mod cadence;
mod call_session;

pub use cadence::{Cadence, TICK_INTERVAL};
pub use call_session::{CallDependencies, CallHandle, CallSession};
