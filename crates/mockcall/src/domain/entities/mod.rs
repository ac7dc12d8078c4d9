//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Attempt: one graded run of an interview
//! - InterviewContext: caller-supplied data for a call
//! - SessionCredential: single-use voice session authorization
//! - AgentMetadata: interviewer persona display data
//! - Call: observable snapshot and results handoff

mod agent;
mod attempt;
mod call;
mod credential;
mod interview;

pub use agent::*;
pub use attempt::*;
pub use call::*;
pub use credential::*;
pub use interview::*;
