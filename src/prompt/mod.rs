//! Prompt source resolution and prompt construction.
//!
//! The initial prompt is either inline text or the contents of a file (the
//! existence of the path decides). Repair prompts embed the original prompt,
//! the failing code, and its error text.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::error::Result;

/// Resolve the `--prompt` argument: a path to an existing file means "use the
/// file contents", anything else is the prompt itself.
pub fn resolve_prompt(arg: &str) -> Result<String> {
    let path = Path::new(arg);
    if path.is_file() {
        log::info!("Reading prompt from file: {}", arg);
        Ok(fs::read_to_string(path)?)
    } else {
        Ok(arg.to_string())
    }
}

/// Instruction prefix for a fresh generation
pub fn generation_instruction(code_type: &str) -> String {
    format!(
        "Implement a {} script in a single code block to perform this task: ",
        code_type
    )
}

/// Instruction prefix for modifying existing code. The original file contents
/// are embedded verbatim.
pub fn modification_instruction(existing_code: &str) -> String {
    format!("Modify the following code:\n\n{}\n\n", existing_code)
}

/// Repair prompt embedding the original request, the failing code, and its
/// error text.
pub fn repair_prompt(original_prompt: &str, code: &str, error: &str) -> String {
    format!(
        "The original prompt was:\n\n{}\n\nHere is the code:\n\n{}\n\nIt produced the following error:\n\n{}\n\nPlease help me fix it.",
        original_prompt, code, error
    )
}

/// Ask the user on stdin for a modification description
pub fn ask_modification_description() -> Result<String> {
    print!("Please describe the modifications you want to make: ");
    io::stdout().flush()?;
    read_description(io::stdin().lock())
}

fn read_description<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
