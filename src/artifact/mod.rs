//! Artifact persistence - every generation is written to disk so a human can
//! audit the run or resume by hand.

pub mod store;

pub use store::{ArtifactStatus, ArtifactStore, file_extension};
