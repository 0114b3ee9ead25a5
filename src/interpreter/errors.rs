//! Runtime error types for the virtual machine
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to semantic or configuration errors).
//!
//! All runtime errors are fatal: the first one halts execution and becomes the
//! program result, carrying the line of the statement that raised it.

use crate::ast::Line;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Pop from a stack with no elements
    #[error("Attempted to pop from empty stack '{stack}' at line {line}")]
    EmptyStackPop { stack: String, line: Line },

    /// Peek at a stack with no elements
    #[error("Attempted to peek empty stack '{stack}' at line {line}")]
    EmptyStackPeek { stack: String, line: Line },

    /// Index past the end of an array, list or string
    #[error("Array index out of bounds at line {line}: index {index} for size {size}")]
    IndexOutOfBounds { index: usize, size: usize, line: Line },

    /// Negative or fractional index
    #[error("Invalid index {index} at line {line}")]
    InvalidIndex { index: f64, line: Line },

    /// Negative or fractional array size
    #[error("Invalid array size {size} at line {line}")]
    InvalidArraySize { size: f64, line: Line },

    /// Declared size disagrees with the initial values
    #[error("Initialisation of array failed at line {line}: size {expected} given {found} values")]
    ArrayInitialiser {
        expected: usize,
        found: usize,
        line: Line,
    },

    /// Explicit positions are configured but none exists for this instance
    #[error("Missing position values for '{uid}' at line {line}")]
    MissingPosition { uid: String, line: Line },

    /// Too many data structures for one animation
    #[error("Exceeded the maximum of {limit} data structures at line {line}")]
    TooManyDataStructures { limit: usize, line: Line },

    /// Chained node access through an absent child
    #[error("Accessed child does not exist at line {line}")]
    MissingChild { line: Line },

    /// Attaching a node would create a cycle or duplicate it in its tree
    #[error("Tree cannot self reference at line {line}")]
    SelfReference { line: Line },

    /// Attaching a node that is drawn in another tree
    #[error("Node is already part of another tree at line {line}")]
    NodeAlreadyAttached { line: Line },

    #[error("Max number of loop executions ({limit}) exceeded at line {line}")]
    LoopLimitExceeded { limit: usize, line: Line },

    #[error("Stack overflow at line {line}: call depth exceeded {depth}")]
    StackOverflow { depth: usize, line: Line },

    #[error("Division by zero at line {line}")]
    DivisionByZero { line: Line },

    #[error("Invalid cast of '{value}' at line {line}")]
    InvalidCast { value: String, line: Line },

    #[error("Range step cannot be zero at line {line}")]
    ZeroRangeStep { line: Line },

    #[error("Non positive speed change {factor} provided at line {line}")]
    InvalidSpeed { factor: f64, line: Line },

    /// Value of the wrong shape reached an operation
    #[error("Type error at line {line}: expected {expected}, found {found}")]
    TypeError {
        expected: &'static str,
        found: String,
        line: Line,
    },

    #[error("Undefined variable '{name}' at line {line}")]
    UndefinedVariable { name: String, line: Line },

    #[error("Undefined function '{name}' at line {line}")]
    UndefinedFunction { name: String, line: Line },

    #[error("Unsupported operation '{operation}' at line {line}")]
    UnsupportedOperation { operation: String, line: Line },

    #[error("No active frame at line {line}")]
    NoStackFrame { line: Line },
}

impl RuntimeError {
    pub fn line(&self) -> Line {
        match self {
            RuntimeError::EmptyStackPop { line, .. }
            | RuntimeError::EmptyStackPeek { line, .. }
            | RuntimeError::IndexOutOfBounds { line, .. }
            | RuntimeError::InvalidIndex { line, .. }
            | RuntimeError::InvalidArraySize { line, .. }
            | RuntimeError::ArrayInitialiser { line, .. }
            | RuntimeError::MissingPosition { line, .. }
            | RuntimeError::TooManyDataStructures { line, .. }
            | RuntimeError::MissingChild { line }
            | RuntimeError::SelfReference { line }
            | RuntimeError::NodeAlreadyAttached { line }
            | RuntimeError::LoopLimitExceeded { line, .. }
            | RuntimeError::StackOverflow { line, .. }
            | RuntimeError::DivisionByZero { line }
            | RuntimeError::InvalidCast { line, .. }
            | RuntimeError::ZeroRangeStep { line }
            | RuntimeError::InvalidSpeed { line, .. }
            | RuntimeError::TypeError { line, .. }
            | RuntimeError::UndefinedVariable { line, .. }
            | RuntimeError::UndefinedFunction { line, .. }
            | RuntimeError::UnsupportedOperation { line, .. }
            | RuntimeError::NoStackFrame { line } => *line,
        }
    }
}
