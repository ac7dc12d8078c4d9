//! Mockcall Client
//!
//! Runtime for one interview call on top of the `mockcall` domain crate.
//!
//! - `application/`: `CallSession` coordinator, `CallHandle`, `Cadence` timer
//! - `adapters/`: reqwest implementations of the backend ports
//! - `config`: `CallSettings` and `BackendConfig`
//!
//! # Usage
//!
//! ```rust,ignore
//! use mockcall_client::{backend_dependencies, BackendConfig, CallSession, CallSettings};
//!
//! let deps = backend_dependencies(&BackendConfig::from_env()?, voice, cues)?;
//! let (call, _task) = CallSession::new(context, deps, CallSettings::default())?.spawn();
//! call.accept()?;
//! ```

pub mod adapters;
pub mod application;
pub mod config;

#[cfg(test)]
mod test_support;

pub use adapters::{
    backend_dependencies, BackendHttp, HttpAgentCatalog, HttpAttemptClient, HttpTokenExchange,
};
pub use application::{Cadence, CallDependencies, CallHandle, CallSession, TICK_INTERVAL};
pub use config::{BackendConfig, CallSettings};
