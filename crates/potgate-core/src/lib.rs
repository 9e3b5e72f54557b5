//! Interatomic-potential acquisition and workflow gating for multi-stage
//! molecular-dynamics runs.
//!
//! The crate locates a potential file for a requested element from remote
//! sources (direct files or multi-format archives), verifies that the
//! artifact is real and physically plausible for its format, and maintains a
//! per-working-directory gate that blocks downstream simulation stages until
//! both a validated potential and a readable structure file exist.

pub mod archive;
pub mod candidate;
pub mod common;
pub mod domain;
pub mod gate;
pub mod resolve;
pub mod sw;
pub mod validate;
