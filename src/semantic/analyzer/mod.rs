//! Analyser state shared by both passes
//!
//! `impl Analyzer` is split across files:
//! - [`signatures`]: pass 1, function signatures and parameter scopes
//! - [`bodies`]: pass 2, statements
//! - [`expressions`]: expression typing and call checking

mod bodies;
mod expressions;
mod signatures;

use super::diagnostics::Diagnostics;
use super::symbol_table::{ScopeId, SymbolTable};
use crate::ast::Line;
use crate::types::Type;
use rustc_hash::FxHashMap;

/// Function whose body is being checked
#[derive(Debug, Clone)]
pub(crate) struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

/// First call seen for a function with no declaration
#[derive(Debug, Clone)]
pub(crate) struct InferredCall {
    pub line: Line,
    pub arguments: Vec<Type>,
}

pub struct Analyzer<'d> {
    pub(crate) symbols: SymbolTable,
    pub(crate) diagnostics: &'d mut Diagnostics,
    /// Parameter scope of each function, by declaration index
    pub(crate) function_scopes: Vec<ScopeId>,
    pub(crate) current_function: Option<FunctionContext>,
    pub(crate) loop_depth: usize,
    pub(crate) loop_variables: Vec<String>,
    pub(crate) inferred_calls: FxHashMap<String, InferredCall>,
}

impl<'d> Analyzer<'d> {
    pub fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Analyzer {
            symbols: SymbolTable::new(),
            diagnostics,
            function_scopes: Vec::new(),
            current_function: None,
            loop_depth: 0,
            loop_variables: Vec::new(),
            inferred_calls: FxHashMap::default(),
        }
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }
}
