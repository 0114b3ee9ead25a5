//! Pass 2: check function bodies and top-level statements.

use super::{Analyzer, FunctionContext};
use crate::ast::{AssignTarget, Expr, Line, Program, Statement};
use crate::semantic::diagnostics::SemanticError;
use crate::semantic::returns::always_returns;
use crate::semantic::symbol_table::{Symbol, GLOBAL_SCOPE};
use crate::types::Type;

impl Analyzer<'_> {
    /// Checks every function body inside the scope opened for it by
    /// [`Analyzer::collect_signatures`], then the top-level statements in the
    /// global scope.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn check_bodies(&mut self, program: &Program) {
        let scopes = self.function_scopes.clone();
        for (function, &scope) in program.functions.iter().zip(&scopes) {
            self.symbols.go_to_scope(scope);
            self.current_function = Some(FunctionContext {
                name: function.name.clone(),
                return_type: function.return_type.clone(),
            });

            self.check_statements(&function.body);

            if function.return_type != Type::Void && !always_returns(&function.body) {
                self.diagnostics.error(SemanticError::MissingReturn {
                    function: function.name.clone(),
                    return_type: function.return_type.clone(),
                    line: function.line,
                });
            }
            self.current_function = None;
        }

        self.symbols.go_to_scope(GLOBAL_SCOPE);
        self.check_statements(&program.statements);

        tracing::debug!(
            errors = self.diagnostics.errors().len(),
            "body check complete"
        );
    }

    fn check_statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.check_statement(statement);
        }
    }

    fn check_block(&mut self, statements: &[Statement]) {
        self.symbols.enter_scope();
        self.check_statements(statements);
        self.symbols.leave_scope();
    }

    fn check_loop_body(&mut self, statements: &[Statement]) {
        self.loop_depth += 1;
        self.check_block(statements);
        self.loop_depth -= 1;
    }

    fn check_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Declaration {
                line,
                name,
                declared_type,
                value,
            } => {
                let found = self.check_expr(value);
                self.check_declaration(name, declared_type.as_ref(), &found, *line);
            }

            Statement::Assignment {
                line,
                target,
                value,
            } => {
                let found = self.check_expr(value);
                self.check_assignment(target, &found, *line);
            }

            Statement::Expression { expr, .. } => {
                self.check_expr(expr);
            }

            Statement::Return { line, value } => {
                let found = value
                    .as_ref()
                    .map_or(Type::Void, |value| self.check_expr(value));
                match &self.current_function {
                    None => self
                        .diagnostics
                        .error(SemanticError::GlobalReturn { line: *line }),
                    Some(function) if !function.return_type.accepts(&found) => {
                        let error = SemanticError::ReturnTypeMismatch {
                            function: function.name.clone(),
                            expected: function.return_type.clone(),
                            found,
                            line: *line,
                        };
                        self.diagnostics.error(error);
                    }
                    Some(_) => {}
                }
            }

            Statement::If {
                condition,
                then_branch,
                elifs,
                else_branch,
                ..
            } => {
                self.expect_type(condition, &Type::Bool, "condition");
                self.check_block(then_branch);
                for elif in elifs {
                    self.expect_type(&elif.condition, &Type::Bool, "condition");
                    self.check_block(&elif.body);
                }
                if let Some(else_branch) = else_branch {
                    self.check_block(else_branch);
                }
            }

            Statement::While {
                condition, body, ..
            } => {
                self.expect_type(condition, &Type::Bool, "condition");
                self.check_loop_body(body);
            }

            Statement::For {
                line,
                variable,
                start,
                end,
                step,
                body,
            } => {
                let start_type = self.check_expr(start);
                let end_type = self.check_expr(end);
                let variable_type = match (&start_type, &end_type) {
                    (Type::Error, _) | (_, Type::Error) => Type::Error,
                    (Type::Number, Type::Number) => Type::Number,
                    (Type::Char, Type::Char) => Type::Char,
                    _ => {
                        self.diagnostics.error(SemanticError::UnexpectedType {
                            context: "range bound",
                            expected: start_type.clone(),
                            found: end_type.clone(),
                            line: *line,
                        });
                        Type::Error
                    }
                };
                if let Some(step) = step {
                    self.expect_type(step, &Type::Number, "range step");
                }

                self.symbols.enter_scope();
                self.symbols.add_variable(variable, variable_type);
                self.loop_variables.push(variable.clone());
                self.check_loop_body(body);
                self.loop_variables.pop();
                self.symbols.leave_scope();
            }

            Statement::Break { line } | Statement::Continue { line } => {
                if self.loop_depth == 0 {
                    let keyword = if matches!(statement, Statement::Break { .. }) {
                        "break"
                    } else {
                        "continue"
                    };
                    self.diagnostics
                        .error(SemanticError::LoopControlOutsideLoop { keyword, line: *line });
                }
            }

            Statement::Sleep { duration, .. } => {
                self.expect_type(duration, &Type::Number, "sleep duration");
            }

            Statement::Subtitle {
                duration,
                condition,
                ..
            } => {
                if let Some(duration) = duration {
                    self.expect_type(duration, &Type::Number, "subtitle duration");
                }
                self.check_annotation_condition(condition.as_ref());
            }

            // Annotation blocks share the enclosing scope
            Statement::CodeTracking {
                condition, body, ..
            } => {
                self.check_annotation_condition(condition.as_ref());
                self.check_statements(body);
            }

            Statement::Speed {
                factor,
                condition,
                body,
                ..
            } => {
                self.expect_type(factor, &Type::Number, "speed factor");
                self.check_annotation_condition(condition.as_ref());
                self.check_statements(body);
            }
        }
    }

    fn check_annotation_condition(&mut self, condition: Option<&Expr>) {
        if let Some(condition) = condition {
            self.expect_type(condition, &Type::Bool, "annotation condition");
        }
    }

    fn check_declaration(&mut self, name: &str, declared: Option<&Type>, found: &Type, line: Line) {
        if self.symbols.is_declared_in_current_scope(name) {
            self.diagnostics.error(SemanticError::Redeclaration {
                name: name.to_string(),
                ty: self.symbols.get_type_of(name),
                line,
            });
            return;
        }

        let ty = match declared {
            Some(declared) => {
                self.check_declared_type(declared, line);
                self.check_assignable(name, declared, found, line);
                declared.clone()
            }
            None => match found {
                Type::Void => {
                    self.diagnostics.error(SemanticError::VoidDeclaration {
                        name: name.to_string(),
                        line,
                    });
                    Type::Error
                }
                Type::Null => {
                    self.diagnostics.error(SemanticError::CannotInferFromNull {
                        name: name.to_string(),
                        line,
                    });
                    Type::Error
                }
                other => other.clone(),
            },
        };
        self.symbols.add_variable(name, ty);
    }

    fn check_assignment(&mut self, target: &AssignTarget, found: &Type, line: Line) {
        match target {
            AssignTarget::Identifier(name) => {
                if self.loop_variables.iter().any(|v| v == name) {
                    self.diagnostics.error(SemanticError::LoopVariableReassigned {
                        name: name.clone(),
                        line,
                    });
                    return;
                }
                match self.symbols.lookup(name) {
                    Some(Symbol::Variable(expected)) => {
                        let expected = expected.clone();
                        self.check_assignable(name, &expected, found, line);
                    }
                    Some(Symbol::Function(_)) => {
                        self.diagnostics.error(SemanticError::InvalidAssignmentTarget {
                            name: name.clone(),
                            line,
                        });
                    }
                    None => self.diagnostics.error(SemanticError::Undeclared {
                        name: name.clone(),
                        line,
                    }),
                }
            }
            AssignTarget::Index { target, indices } => {
                if self.symbols.get_type_of(target) == Type::String {
                    self.diagnostics.error(SemanticError::InvalidAssignmentTarget {
                        name: target.clone(),
                        line,
                    });
                    return;
                }
                let expected = self.indexed_element_type(target, indices, line);
                self.check_assignable(target, &expected, found, line);
            }
            AssignTarget::NodeAccess {
                target,
                from_root,
                chain,
            } => {
                if chain.is_empty() {
                    self.diagnostics.error(SemanticError::InvalidAssignmentTarget {
                        name: target.clone(),
                        line,
                    });
                    return;
                }
                let expected = self.node_access_type(target, *from_root, chain, line);
                self.check_assignable(target, &expected, found, line);
            }
        }
    }

    /// Shared by declarations and assignments
    fn check_assignable(&mut self, name: &str, expected: &Type, found: &Type, line: Line) {
        if expected.accepts(found) {
            return;
        }
        let error = match found {
            Type::Null => SemanticError::NullAssignment {
                name: name.to_string(),
                ty: expected.clone(),
                line,
            },
            Type::Void => SemanticError::VoidDeclaration {
                name: name.to_string(),
                line,
            },
            _ => SemanticError::MismatchedAssignment {
                name: name.to_string(),
                expected: expected.clone(),
                found: found.clone(),
                line,
            },
        };
        self.diagnostics.error(error);
    }
}
