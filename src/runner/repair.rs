//! The generate-execute-repair loop.
//!
//! Each run:
//! 1. Generates initial code and persists it as `initial`.
//! 2. For executable code, runs it; a success is persisted as `debugged` and
//!    ends the loop. A failure is folded into a repair prompt and the model
//!    regenerates, persisted as `iteration_<n>`.
//! 3. Two consecutive byte-identical error texts end the loop early - the
//!    model is taken to not be converging.
//! 4. Whatever terminal state is reached, the last code is persisted as
//!    `final` so a human can resume by hand.
//!
//! Model and transport errors are not caught here; they propagate and abort
//! the whole run. Only execution failures of the generated code are
//! recoverable.

use std::path::PathBuf;
use std::sync::Arc;

use colored::*;

use crate::artifact::{ArtifactStatus, ArtifactStore};
use crate::error::Result;
use crate::executor::{ExecutionResult, Executor};
use crate::llm::{self, LlmClient};
use crate::prompt;

/// Terminal state of a repair loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Execution succeeded within the budget
    Debugged,
    /// Non-executable code type - generated and saved, never run
    Skipped,
    /// Two consecutive identical errors; stopped early
    Stagnant,
    /// Iteration budget exhausted without success
    Exhausted,
}

/// Configuration for the repair loop.
#[derive(Debug, Clone)]
pub struct RepairRunnerConfig {
    /// Upper bound on repair attempts
    pub max_iterations: u32,
}

impl Default for RepairRunnerConfig {
    fn default() -> Self {
        Self { max_iterations: 5 }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Last code state reached, equal to the `final` artifact contents
    pub code: String,
    /// Path of the `final` artifact
    pub final_path: PathBuf,
}

/// Drives the generate-execute-repair loop for a single run.
///
/// Exactly one runner instance exists per process; the output directory is
/// protected only by the natural sequencing of writes.
pub struct RepairRunner<L, E>
where
    L: LlmClient,
    E: Executor,
{
    llm: Arc<L>,
    executor: Arc<E>,
    store: ArtifactStore,
    config: RepairRunnerConfig,
}

impl<L, E> RepairRunner<L, E>
where
    L: LlmClient,
    E: Executor,
{
    pub fn new(llm: Arc<L>, executor: Arc<E>, store: ArtifactStore, config: RepairRunnerConfig) -> Self {
        Self {
            llm,
            executor,
            store,
            config,
        }
    }

    /// Run the loop to a terminal state.
    ///
    /// `initial_prompt` is the user's request (reused verbatim in repair
    /// prompts); `instruction` is the generation prefix, which differs for
    /// fresh generation versus modification of existing code.
    pub async fn run(&self, initial_prompt: &str, instruction: &str, code_type: &str) -> Result<RunReport> {
        let mut code = llm::generate(&*self.llm, instruction, initial_prompt, code_type).await?;

        println!("{}", "------------------".dimmed());
        println!("Initial code generated:\n{}", code);
        println!("{}", "------------------".dimmed());

        self.store.save(&code, code_type, ArtifactStatus::Initial)?;

        let outcome = if code_type == "python" {
            self.repair_cycle(initial_prompt, code_type, &mut code).await?
        } else {
            println!("Execution not supported for code type '{}', saving only.", code_type);
            log::info!("Skipping execution for code type {}", code_type);
            RunOutcome::Skipped
        };

        // Every terminal state leaves a final artifact on disk
        let final_path = self.store.save(&code, code_type, ArtifactStatus::Final)?;
        println!("Final version saved to {}", final_path.display());

        Ok(RunReport {
            outcome,
            code,
            final_path,
        })
    }

    /// Execute-repair iterations over `code`, mutating it in place.
    async fn repair_cycle(&self, initial_prompt: &str, code_type: &str, code: &mut String) -> Result<RunOutcome> {
        let mut last_error: Option<String> = None;

        for iteration in 1..=self.config.max_iterations {
            println!("\n{} {}:", "Iteration".bold(), iteration);
            log::info!("Iteration {}/{}", iteration, self.config.max_iterations);

            match self.executor.run(code).await? {
                ExecutionResult::Success => {
                    println!("{}", "Code executed successfully.".green());
                    let path = self.store.save(code, code_type, ArtifactStatus::Debugged)?;
                    println!("Saved to {}", path.display());
                    return Ok(RunOutcome::Debugged);
                }
                ExecutionResult::Failure(error_text) => {
                    println!("{} {}", "Error encountered:".red(), error_text);

                    if last_error.as_deref() == Some(error_text.as_str()) {
                        println!("{}", "Encountered the same error. Stopping iterations.".yellow());
                        log::warn!("Stagnation detected at iteration {}", iteration);
                        return Ok(RunOutcome::Stagnant);
                    }
                    last_error = Some(error_text.clone());

                    let repair = prompt::repair_prompt(initial_prompt, code, &error_text);
                    *code = llm::generate(&*self.llm, "", &repair, code_type).await?;

                    println!("{}", "------------------".dimmed());
                    println!("Suggested fix:\n{}", code);
                    println!("{}", "------------------".dimmed());

                    self.store
                        .save(code, code_type, ArtifactStatus::Iteration(iteration))?;
                }
            }
        }

        log::warn!("Iteration budget of {} exhausted", self.config.max_iterations);
        Ok(RunOutcome::Exhausted)
    }
}
