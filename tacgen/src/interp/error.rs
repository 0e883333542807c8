//! Runtime errors of the TAC executor

use std::fmt;

use crate::tac::{Label, Temp};

/// Runtime error during execution of a piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No piece with the requested name
    UndefinedFunction,
    /// Temp read before any write on the executed path
    UninitializedTemp,
    /// Jump to a label the piece never marks
    UndefinedLabel,
    /// Division or remainder by zero
    DivisionByZero,
    /// Argument count mismatch
    ArityMismatch,
    /// Step budget exhausted
    StepLimitExceeded,
    /// Control reached `FuncExit` without a `Return`
    MissingReturn,
}

impl RuntimeError {
    pub fn undefined_function(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UndefinedFunction,
            message: format!("undefined function: {name}"),
        }
    }

    pub fn uninitialized_temp(temp: Temp, pc: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::UninitializedTemp,
            message: format!("{temp} read at instruction {pc} before it was written"),
        }
    }

    pub fn undefined_label(label: Label) -> Self {
        RuntimeError {
            kind: ErrorKind::UndefinedLabel,
            message: format!("jump to unmarked label {label}"),
        }
    }

    pub fn division_by_zero() -> Self {
        RuntimeError {
            kind: ErrorKind::DivisionByZero,
            message: "division by zero".to_string(),
        }
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::ArityMismatch,
            message: format!("function {name} expects {expected} argument(s), got {got}"),
        }
    }

    pub fn step_limit_exceeded(limit: u64) -> Self {
        RuntimeError {
            kind: ErrorKind::StepLimitExceeded,
            message: format!("step limit of {limit} exceeded"),
        }
    }

    pub fn missing_return(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::MissingReturn,
            message: format!("function {name} ended without returning"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for executor operations
pub type InterpResult<T> = Result<T, RuntimeError>;
