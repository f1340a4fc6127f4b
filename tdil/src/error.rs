use buddy::TokenizeError;
use buddy::naming::NameError;
use buddy::pattern::PatternError;
use thiserror::Error;

use crate::evaluator::Mismatch;
use crate::formatter::FormatError;
use crate::writer::WriterError;

/// Failure to turn one step sentence into a directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error(transparent)]
    Input(#[from] TokenizeError),
    #[error("no instruction starts with '{0}'")]
    UnknownInstruction(String),
    #[error("{0}")]
    NoMatch(Mismatch),
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("invalid instruction table: {0}")]
    Pattern(#[from] PatternError),
    #[error("step {} '{sentence}': {source}", step + 1)]
    Step {
        /// 0-based index into the scenario's steps.
        step: usize,
        sentence: String,
        #[source]
        source: StepError,
    },
    #[error("invalid unit name: {0}")]
    Name(#[from] NameError),
    #[error(transparent)]
    Writer(#[from] WriterError),
}

impl CompileError {
    /// Index of the step the error belongs to, if any.
    pub fn step(&self) -> Option<usize> {
        match self {
            CompileError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}
