//! CLI argument definitions using clap.
//!
//! Exactly one of `--prompt` / `--modify` must be supplied; that rule is
//! checked in main rather than by clap so the no-argument case can print
//! usage text and exit cleanly instead of failing.

use clap::Parser;
use std::path::PathBuf;

/// Herdr - reflective LLM code generator and debugger
#[derive(Parser, Debug)]
#[command(name = "herdr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The code prompt to generate new code, or the path to a file containing the prompt
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// The path to an existing code file to modify
    #[arg(short, long)]
    pub modify: Option<PathBuf>,

    /// The type of code (python, latex, html, ...); only python is executed
    #[arg(short, long = "code_type", default_value = "python")]
    pub code_type: String,

    /// Number of debug iterations to perform
    #[arg(short, long, default_value_t = 5)]
    pub iterations: u32,

    /// Optional config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Whether exactly one prompt source was supplied
    pub fn has_valid_input(&self) -> bool {
        self.prompt.is_some() != self.modify.is_some()
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
