//! Pass 1: register every function before any body is checked.

use super::Analyzer;
use crate::ast::{FunctionDecl, Line};
use crate::semantic::diagnostics::SemanticError;
use crate::semantic::symbol_table::{FunctionSignature, GLOBAL_SCOPE};
use crate::types::Type;

impl Analyzer<'_> {
    /// Adds each function's signature to the global scope and opens a scope
    /// holding its parameters. The scope ids are kept so the body pass can
    /// re-enter them.
    #[tracing::instrument(level = "debug", skip_all, fields(count = functions.len()))]
    pub fn collect_signatures(&mut self, functions: &[FunctionDecl]) {
        self.symbols.go_to_scope(GLOBAL_SCOPE);

        for function in functions {
            if self.symbols.is_declared_in_current_scope(&function.name) {
                self.diagnostics.error(SemanticError::Redeclaration {
                    name: function.name.clone(),
                    ty: self.symbols.get_type_of(&function.name),
                    line: function.line,
                });
            } else {
                self.symbols.add_function(
                    &function.name,
                    FunctionSignature {
                        line: function.line,
                        parameters: function.parameters.iter().map(|p| p.ty.clone()).collect(),
                        return_type: function.return_type.clone(),
                    },
                );
            }
            self.check_declared_type(&function.return_type, function.line);

            let scope = self.symbols.enter_scope();
            for parameter in &function.parameters {
                self.check_declared_type(&parameter.ty, function.line);
                if self.symbols.is_declared_in_current_scope(&parameter.name) {
                    self.diagnostics.error(SemanticError::Redeclaration {
                        name: parameter.name.clone(),
                        ty: parameter.ty.clone(),
                        line: function.line,
                    });
                } else {
                    self.symbols.add_variable(&parameter.name, parameter.ty.clone());
                }
            }
            self.symbols.leave_scope();
            self.function_scopes.push(scope);
        }

        tracing::debug!("signature collection complete");
    }

    /// Data-structure annotations must name an element type the kind can hold
    pub(crate) fn check_declared_type(&mut self, ty: &Type, line: Line) {
        if let Type::DataStructure(ds) = ty {
            if !ds.has_valid_internal() {
                self.diagnostics.error(SemanticError::InvalidElementType {
                    data_structure: ty.clone(),
                    line,
                });
            }
        }
    }
}
