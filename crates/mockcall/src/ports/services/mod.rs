//! Service Ports
//!
//! Abstract interfaces for backend services.

mod agent_catalog;
mod attempt_client;
mod token_exchange;

pub use agent_catalog::*;
pub use attempt_client::*;
pub use token_exchange::*;
