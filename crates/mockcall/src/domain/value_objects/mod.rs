//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod call_state;
mod interview_type;
mod navigation;

pub use call_state::*;
pub use interview_type::*;
pub use navigation::*;
