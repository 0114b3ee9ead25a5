//! Semantic errors, warnings and the per-run collector
//!
//! Analysis is best-effort: every violation becomes one [`SemanticError`]
//! pushed into a [`Diagnostics`] value owned by the current run, and checking
//! continues with the next statement. Nothing here is global, so sequential
//! compilations never see each other's diagnostics.

use crate::ast::Line;
use crate::types::Type;
use thiserror::Error;

/// Errors found while checking a program
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("Cannot assign expression of type {found} to '{name}' of type {expected} at line {line}")]
    MismatchedAssignment {
        name: String,
        expected: Type,
        found: Type,
        line: Line,
    },

    #[error("'{name}' of type {ty} is already declared at line {line}")]
    Redeclaration { name: String, ty: Type, line: Line },

    #[error("'{name}' has not been declared at line {line}")]
    Undeclared { name: String, line: Line },

    #[error("'{name}' is not a data structure at line {line}")]
    NotADataStructure { name: String, line: Line },

    #[error("'{name}' is not a function at line {line}")]
    NotAFunction { name: String, line: Line },

    #[error("{data_structure} does not support '{method}' method at line {line}")]
    UnsupportedMethod {
        data_structure: Type,
        method: String,
        line: Line,
    },

    #[error("'{method}' method on {data_structure} does not accept {found} argument(s) at line {line}")]
    WrongArity {
        data_structure: Type,
        method: String,
        found: usize,
        line: Line,
    },

    #[error("'{method}' method on {data_structure} does not accept argument {position} of type {found}, expected {expected} at line {line}")]
    WrongArgumentType {
        data_structure: Type,
        method: String,
        position: usize,
        expected: Type,
        found: Type,
        line: Line,
    },

    #[error("{data_structure} constructor expects {expected} argument(s) but only found {found} at line {line}")]
    MissingConstructorArguments {
        data_structure: Type,
        expected: usize,
        found: usize,
        line: Line,
    },

    #[error("{data_structure} cannot be initialised with a value of type {found} at line {line}")]
    InitialiserType {
        data_structure: Type,
        found: Type,
        line: Line,
    },

    #[error("{data_structure} cannot hold elements of this type at line {line}")]
    InvalidElementType { data_structure: Type, line: Line },

    #[error("Operator '{op}' is not compatible with types {lhs} and {rhs} at line {line}")]
    IncompatibleOperator {
        op: &'static str,
        lhs: Type,
        rhs: Type,
        line: Line,
    },

    #[error("Operator '{op}' is not compatible with type {operand} at line {line}")]
    IncompatibleUnaryOperator {
        op: &'static str,
        operand: Type,
        line: Line,
    },

    #[error("Expected {context} of type {expected} but found {found} at line {line}")]
    UnexpectedType {
        context: &'static str,
        expected: Type,
        found: Type,
        line: Line,
    },

    #[error("Cannot return from global scope at line {line}")]
    GlobalReturn { line: Line },

    #[error("Cannot return expression of type {found} in function '{function}' with return type {expected} at line {line}")]
    ReturnTypeMismatch {
        function: String,
        expected: Type,
        found: Type,
        line: Line,
    },

    #[error("Missing return statement in function '{function}' that expects return type {return_type} at line {line}")]
    MissingReturn {
        function: String,
        return_type: Type,
        line: Line,
    },

    #[error("Cannot initialise '{name}' with a void value at line {line}")]
    VoidDeclaration { name: String, line: Line },

    #[error("Function '{function}' does not accept {found} argument(s) (expected {expected}, declared at line {declared_line}) at line {line}")]
    FunctionArity {
        function: String,
        expected: usize,
        found: usize,
        declared_line: Line,
        line: Line,
    },

    #[error("Function '{function}' parameter {position} is of type {expected} (declared at line {declared_line}) but was given {found} at line {line}")]
    FunctionArgumentType {
        function: String,
        position: usize,
        expected: Type,
        found: Type,
        declared_line: Line,
        line: Line,
    },

    #[error("Function '{function}' called at line {line} incompatibly with its call at line {first_line}")]
    IncompatibleCallSites {
        function: String,
        first_line: Line,
        line: Line,
    },

    #[error("Cannot assign null to '{name}' of type {ty} at line {line}")]
    NullAssignment { name: String, ty: Type, line: Line },

    #[error("Cannot infer the type of '{name}' from null at line {line}")]
    CannotInferFromNull { name: String, line: Line },

    #[error("'{keyword}' cannot occur outside a loop at line {line}")]
    LoopControlOutsideLoop { keyword: &'static str, line: Line },

    #[error("Cannot cast {from} to {to} at line {line}")]
    InvalidCast { from: Type, to: Type, line: Line },

    #[error("Loop variable '{name}' cannot be reassigned inside its loop at line {line}")]
    LoopVariableReassigned { name: String, line: Line },

    #[error("'{name}' cannot be assigned to at line {line}")]
    InvalidAssignmentTarget { name: String, line: Line },

    #[error("Cannot index a {dimensions}D array {found} times at line {line}")]
    ArrayIndexCount {
        dimensions: usize,
        found: usize,
        line: Line,
    },

    #[error("Cannot initialise {dimensions}D array with {found} constructor arguments at line {line}")]
    ArrayConstructorDimensions {
        dimensions: usize,
        found: usize,
        line: Line,
    },

    /// Row initialiser for a 1D container, or flat values for a 2D array
    #[error("Initialiser does not match the dimensions of {data_structure} at line {line}")]
    InitialiserShape { data_structure: Type, line: Line },

    #[error("Rows of a 2D array initialiser must all have the same length at line {line}")]
    RaggedInitialiser { line: Line },
}

impl SemanticError {
    pub fn line(&self) -> Line {
        match self {
            SemanticError::MismatchedAssignment { line, .. }
            | SemanticError::Redeclaration { line, .. }
            | SemanticError::Undeclared { line, .. }
            | SemanticError::NotADataStructure { line, .. }
            | SemanticError::NotAFunction { line, .. }
            | SemanticError::UnsupportedMethod { line, .. }
            | SemanticError::WrongArity { line, .. }
            | SemanticError::WrongArgumentType { line, .. }
            | SemanticError::MissingConstructorArguments { line, .. }
            | SemanticError::InitialiserType { line, .. }
            | SemanticError::InvalidElementType { line, .. }
            | SemanticError::IncompatibleOperator { line, .. }
            | SemanticError::IncompatibleUnaryOperator { line, .. }
            | SemanticError::UnexpectedType { line, .. }
            | SemanticError::GlobalReturn { line }
            | SemanticError::ReturnTypeMismatch { line, .. }
            | SemanticError::MissingReturn { line, .. }
            | SemanticError::VoidDeclaration { line, .. }
            | SemanticError::FunctionArity { line, .. }
            | SemanticError::FunctionArgumentType { line, .. }
            | SemanticError::IncompatibleCallSites { line, .. }
            | SemanticError::NullAssignment { line, .. }
            | SemanticError::CannotInferFromNull { line, .. }
            | SemanticError::LoopControlOutsideLoop { line, .. }
            | SemanticError::InvalidCast { line, .. }
            | SemanticError::LoopVariableReassigned { line, .. }
            | SemanticError::InvalidAssignmentTarget { line, .. }
            | SemanticError::ArrayIndexCount { line, .. }
            | SemanticError::ArrayConstructorDimensions { line, .. }
            | SemanticError::InitialiserShape { line, .. }
            | SemanticError::RaggedInitialiser { line } => *line,
        }
    }
}

/// Non-fatal problems; a default is substituted and execution proceeds
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    #[error("Unknown data structure '{name}' in style configuration; entry ignored")]
    UnknownDataStructure { name: String },

    #[error("Unknown creation style '{style}'; using {fallback}")]
    UnknownCreationStyle { style: String, fallback: &'static str },

    #[error("Unknown animation style '{style}'; using {fallback}")]
    UnknownAnimationStyle { style: String, fallback: &'static str },

    #[error("Unknown code tracking mode '{mode}'; using {fallback}")]
    UnknownCodeTracking { mode: String, fallback: &'static str },

    #[error("Unknown syntax highlighting style '{style}'; using {fallback}")]
    UnknownHighlightingStyle { style: String, fallback: &'static str },

    #[error("Style given for undeclared variable '{name}'")]
    UndeclaredVariableStyle { name: String },
}

/// Errors and warnings collected over one compilation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    errors: Vec<SemanticError>,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, error: SemanticError) {
        tracing::debug!(line = error.line(), "{error}");
        self.errors.push(error);
    }

    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Errors first, then warnings, rendered for display
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("Semantic error: {e}"))
            .chain(self.warnings.iter().map(|w| format!("Warning: {w}")))
            .collect()
    }

    /// Hand over everything collected so far and leave this collector empty
    pub fn drain(&mut self) -> Diagnostics {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_resets_collector() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(SemanticError::GlobalReturn { line: 4 });
        diagnostics.warn(Warning::UndeclaredVariableStyle { name: "q".into() });

        let drained = diagnostics.drain();
        assert!(drained.has_errors());
        assert_eq!(drained.warnings().len(), 1);
        assert!(!diagnostics.has_errors());
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn messages_name_the_line() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(SemanticError::Undeclared {
            name: "s".into(),
            line: 7,
        });
        assert_eq!(
            diagnostics.messages(),
            vec!["Semantic error: 's' has not been declared at line 7".to_string()]
        );
    }
}
