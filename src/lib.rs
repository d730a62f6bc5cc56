//! Herdr - a reflective LLM code generator and debugger
//!
//! Herdr turns a natural-language prompt into code via an LLM chat API,
//! executes Python output locally, and on failure feeds the error back to the
//! model to request a fix, iterating until the code runs, the model stagnates
//! on the same error, or the iteration budget is exhausted.
//!
//! Generated code is executed with full host privileges. The executor is a
//! trust boundary in name only - there is no isolation.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod llm;
pub mod prompt;
pub mod runner;

pub use error::{HerdrError, Result};
