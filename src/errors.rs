use std::io;
use thiserror::Error;

/// Error raised while evaluating a boolean expression.
///
/// Kept separate from [`ShellError`] so callers can tell "the expression is
/// malformed" apart from "the expression evaluated to false".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ExpressionError(pub String);

impl ExpressionError {
    pub fn new(message: impl Into<String>) -> Self {
        ExpressionError(message.into())
    }

    pub fn malformed() -> Self {
        ExpressionError("Malformed expression".to_string())
    }
}

/// Comprehensive error type for shell operations
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Unknown command or script name '{0}'")]
    UnknownCommand(String),

    #[error("{0}")]
    InputError(String),

    #[error("{0}")]
    BindingError(String),

    #[error("{0}")]
    ScriptError(String),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
