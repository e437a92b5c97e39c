//! External command execution.
//!
//! Every external tool the pipeline touches (artifact builders, `tar`, the
//! dependency fetcher, the license scanner) goes through a single blocking
//! [`CommandRunner`] so steps stay mockable.

mod cmd;
mod types;

pub use cmd::SystemRunner;
pub use types::*;
