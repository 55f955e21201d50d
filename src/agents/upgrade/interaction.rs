use crate::error::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Asks the operator before a state-changing step runs.
///
/// The pipeline only depends on this trait, so tests can script answers
/// without a terminal.
pub trait ConfirmPrompt {
    fn confirm(&mut self, action: &str) -> Result<bool>;
}

/// Prompt policy for `--yes` runs: every confirmation is affirmative.
pub struct AssumeYes;

impl ConfirmPrompt for AssumeYes {
    fn confirm(&mut self, _action: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Interactive prompt reading one line from stdin. Only an explicit yes
/// proceeds; an empty or unrecognized answer declines.
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&mut self, action: &str) -> Result<bool> {
        print!("{}", format!("Proceed with {action}? [y/N]: ").bold());
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(is_affirmative(&input))
    }
}

pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
