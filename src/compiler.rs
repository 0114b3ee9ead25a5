//! End-to-end entry point
//!
//! ```text
//! Program ─▶ analyze ─▶ validate config ─▶ VirtualMachine::run ─▶ Compilation
//! ```
//!
//! Semantic errors stop the pipeline before the configuration is looked
//! at. A malformed configuration is the only failure returned as `Err`;
//! every other outcome is a [`Compilation`] whose [`ExitStatus`] says how
//! far the program got.

use crate::ast::{Line, Program};
use crate::instructions::boundary::BoundaryMap;
use crate::instructions::InstructionStream;
use crate::interpreter::engine::VirtualMachine;
use crate::interpreter::errors::RuntimeError;
use crate::semantic::analyze;
use crate::semantic::diagnostics::Diagnostics;
use crate::style::validate::{validate, ConfigError};
use crate::style::{StyleConfig, StyleResolver};

/// How far a program got through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Reported by the external parser; never produced by [`compile`]
    SyntaxError,
    SemanticError,
    RuntimeError,
}

/// Result of compiling one program
#[derive(Debug)]
pub struct Compilation {
    pub status: ExitStatus,
    pub diagnostics: Diagnostics,
    pub instructions: InstructionStream,
    pub boundaries: BoundaryMap,
    pub runtime_error: Option<RuntimeError>,
}

impl Compilation {
    /// Outcome for a program the external parser rejected
    pub fn syntax_error() -> Self {
        Compilation::empty(ExitStatus::SyntaxError, Diagnostics::new())
    }

    fn empty(status: ExitStatus, diagnostics: Diagnostics) -> Self {
        Compilation {
            status,
            diagnostics,
            instructions: InstructionStream::new(),
            boundaries: BoundaryMap::default(),
            runtime_error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExitStatus::Success
    }

    /// Source line of the runtime error, if execution failed
    pub fn error_line(&self) -> Option<Line> {
        self.runtime_error.as_ref().map(RuntimeError::line)
    }
}

/// Analyse `program`, validate `config` against it and run it.
/// `source` is the program text shown in the code block.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile(
    program: Program,
    source: Option<&str>,
    config: StyleConfig,
) -> Result<Compilation, ConfigError> {
    let analysis = analyze(program);
    let mut diagnostics = analysis.diagnostics;
    let Some(checked) = analysis.checked else {
        tracing::debug!(errors = diagnostics.errors().len(), "semantic analysis failed");
        return Ok(Compilation::empty(ExitStatus::SemanticError, diagnostics));
    };

    let config = validate(config, checked.symbols.variable_names(), &mut diagnostics)?;
    let execution = VirtualMachine::new(checked, StyleResolver::new(config), source).run();

    let (status, runtime_error) = match execution.result {
        Ok(()) => (ExitStatus::Success, None),
        Err(err) => (ExitStatus::RuntimeError, Some(err)),
    };
    Ok(Compilation {
        status,
        diagnostics,
        instructions: execution.instructions,
        boundaries: execution.boundaries,
        runtime_error,
    })
}
