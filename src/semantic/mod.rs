//! Semantic analysis
//!
//! - [`symbol_table`]: scope tree with stable ids
//! - [`diagnostics`]: error/warning types and the per-run collector
//! - [`analyzer`]: the two traversal passes
//! - [`returns`]: return-path completeness
//!
//! # Passes
//!
//! ```text
//! AST ─▶ collect_signatures ─▶ check_bodies ─▶ CheckedProgram | Diagnostics
//! ```
//!
//! Both passes share one [`symbol_table::SymbolTable`]. The first registers
//! every function signature and parameter scope, so calls may refer to
//! functions declared later and functions may be mutually recursive.

pub mod analyzer;
pub mod diagnostics;
pub mod returns;
pub mod symbol_table;

use crate::ast::Program;
use diagnostics::Diagnostics;
use symbol_table::SymbolTable;

/// A program that passed analysis, with the table built while checking it
#[derive(Debug, Clone)]
pub struct CheckedProgram {
    pub program: Program,
    pub symbols: SymbolTable,
}

/// Outcome of analysing one program
#[derive(Debug)]
pub struct Analysis {
    /// Present only when no semantic error was collected
    pub checked: Option<CheckedProgram>,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    pub fn is_ok(&self) -> bool {
        self.checked.is_some()
    }
}

/// Run both passes over `program` with a fresh diagnostics collector
#[tracing::instrument(level = "debug", skip_all, fields(functions = program.functions.len()))]
pub fn analyze(program: Program) -> Analysis {
    let mut diagnostics = Diagnostics::new();
    let symbols = {
        let mut analyzer = analyzer::Analyzer::new(&mut diagnostics);
        analyzer.collect_signatures(&program.functions);
        analyzer.check_bodies(&program);
        analyzer.into_symbols()
    };

    let checked = (!diagnostics.has_errors()).then(|| CheckedProgram { program, symbols });
    Analysis {
        checked,
        diagnostics,
    }
}
