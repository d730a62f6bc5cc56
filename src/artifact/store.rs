//! On-disk store for generated code.
//!
//! Each generation is saved as `script_<status>.<ext>` in the output
//! directory. Labels are the only versioning; a colliding label is
//! overwritten (last write wins - labels are iteration-qualified, and the
//! design assumes a single run per directory, no locking).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Status label for a saved artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// First generation, before any execution
    Initial,
    /// Regenerated code after the n-th failed execution
    Iteration(u32),
    /// Code that executed successfully
    Debugged,
    /// Last code state reached, written on every exit path
    Final,
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactStatus::Initial => write!(f, "initial"),
            ArtifactStatus::Iteration(n) => write!(f, "iteration_{}", n),
            ArtifactStatus::Debugged => write!(f, "debugged"),
            ArtifactStatus::Final => write!(f, "final"),
        }
    }
}

/// File extension for a code type: "python" maps to "py", anything else is
/// used verbatim.
pub fn file_extension(code_type: &str) -> &str {
    if code_type == "python" { "py" } else { code_type }
}

/// Writes code artifacts to a single output directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `code` verbatim to `script_<status>.<ext>`, creating the output
    /// directory if absent. Returns the path written.
    pub fn save(&self, code: &str, code_type: &str, status: ArtifactStatus) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self
            .dir
            .join(format!("script_{}.{}", status, file_extension(code_type)));
        fs::write(&path, code)?;

        log::info!("Saved {} artifact to {}", status, path.display());
        Ok(path)
    }
}
