//! Startup lifecycle orchestration.
//!
//! Sequencing contracts for application startup: concurrent init with a
//! fan-in barrier, ordered sequential start, and the single-root invariant.

pub mod orchestrator;
pub mod status;
