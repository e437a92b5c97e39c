//! relbuild-lib: Release artifact orchestration
//!
//! This crate turns a release [`manifest::Manifest`] into distributable
//! artifacts and provenance files:
//! - `manifest`: the immutable input describing what to build
//! - `exec`: blocking external command execution
//! - `step`: builders, chart sanitizer, and provenance steps
//! - `pipeline`: the fixed step order and the fail-fast orchestrator

pub mod consts;
pub mod exec;
pub mod manifest;
pub mod pipeline;
pub mod step;
pub mod util;
