//! The interactive boundary between the workflow and the user.
//!
//! Prompting logic only talks to a [`Console`], so it can be driven by a real
//! terminal or by a scripted sequence of answers.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Standard input reached end-of-file while an answer was still required.
    #[error("input stream closed")]
    Closed,
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub trait Console {
    /// Writes one line of output.
    fn print(&mut self, line: &str);

    /// Shows `prompt` without a line break and reads one line, trimmed of its terminator.
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError>;

    /// Shows `prompt` and reads a single keystroke without waiting for enter.
    fn read_key(&mut self, prompt: &str) -> Result<char, ConsoleError>;
}
