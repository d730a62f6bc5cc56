//! Repair loop orchestration.
//!
//! Generate, execute, and on failure feed the error back to the model for a
//! fix, bounded by an iteration budget and a stagnation check.

pub mod repair;

pub use repair::{RepairRunner, RepairRunnerConfig, RunOutcome, RunReport};
