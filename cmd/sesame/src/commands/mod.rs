//! CLI commands module.

mod compare;
mod enroll;
mod extract;
mod show;
mod util;
mod verify;

pub use compare::CompareCommand;
pub use enroll::EnrollCommand;
pub use extract::ExtractCommand;
pub use show::{ResetCommand, ShowCommand};
pub use verify::VerifyCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
