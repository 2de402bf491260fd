//! Interactive questions for arguments missing from the command line.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

/// Reads answers from `input`, writing questions to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns `given` if present, otherwise asks `question`.
    pub fn value_or_ask(&mut self, given: Option<String>, question: &str) -> Result<String> {
        match given {
            Some(value) => Ok(value),
            None => self.ask(question),
        }
    }

    /// Asks one question and returns the trimmed answer.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;

        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .context("failed to read answer")?;
        if read == 0 {
            bail!("no answer given to: {question}");
        }
        Ok(answer.trim().to_string())
    }

    /// Writes an informational line (used for the bill list).
    pub fn say(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{text}")?;
        Ok(())
    }
}
