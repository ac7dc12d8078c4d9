//! Domain Services
//!
//! Stateless or self-contained logic over domain entities.

mod call_machine;
mod prompt;

pub use call_machine::*;
pub use prompt::*;
