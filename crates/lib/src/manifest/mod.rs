//! Release manifest.
//!
//! The manifest is the single input of a release run: which outputs to build,
//! where the prepared working tree lives, and how to reach the external tools
//! that produce each artifact.

mod types;

pub use types::*;
