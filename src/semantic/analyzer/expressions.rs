//! Expression typing.
//!
//! Every check returns the expression's type. Faults are recorded and the
//! sentinel [`Type::Error`] is returned, which every later check accepts.

use super::{Analyzer, InferredCall};
use crate::ast::{BinaryOp, Expr, Initialiser, Line, NodeField, UnaryOp};
use crate::semantic::diagnostics::SemanticError;
use crate::semantic::symbol_table::Symbol;
use crate::types::{DataStructureKind, DataStructureMethod, DataStructureType, Type};

fn is_numeric(ty: &Type) -> bool {
    matches!(ty, Type::Number | Type::Char)
}

fn dimensions(ds: &DataStructureType) -> usize {
    if ds.is_2d() {
        2
    } else {
        1
    }
}

impl Analyzer<'_> {
    pub(crate) fn check_expr(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Number { .. } => Type::Number,
            Expr::Bool { .. } => Type::Bool,
            Expr::Char { .. } => Type::Char,
            Expr::String { .. } => Type::String,
            Expr::Null { .. } => Type::Null,

            Expr::Identifier { line, name } => self.variable_type(name, *line),

            Expr::Binary { line, op, lhs, rhs } => {
                let lhs = self.check_expr(lhs);
                let rhs = self.check_expr(rhs);
                self.binary_type(*op, lhs, rhs, *line)
            }

            Expr::Unary { line, op, operand } => {
                let operand = self.check_expr(operand);
                let result = match (op, &operand) {
                    (_, Type::Error) => return Type::Error,
                    (UnaryOp::Neg | UnaryOp::Plus, ty) if is_numeric(ty) => Some(Type::Number),
                    (UnaryOp::Not, Type::Bool) => Some(Type::Bool),
                    _ => None,
                };
                result.unwrap_or_else(|| {
                    self.diagnostics.error(SemanticError::IncompatibleUnaryOperator {
                        op: op.symbol(),
                        operand,
                        line: *line,
                    });
                    Type::Error
                })
            }

            Expr::FunctionCall {
                line,
                name,
                arguments,
            } => {
                let arguments: Vec<Type> = arguments.iter().map(|a| self.check_expr(a)).collect();
                self.check_function_call(name, arguments, *line)
            }

            Expr::MethodCall {
                line,
                instance,
                method,
                arguments,
            } => {
                let arguments: Vec<Type> = arguments.iter().map(|a| self.check_expr(a)).collect();
                self.check_method_call(instance, method, &arguments, *line)
            }

            Expr::Constructor {
                line,
                ty,
                arguments,
                initialiser,
            } => {
                let arguments: Vec<Type> = arguments.iter().map(|a| self.check_expr(a)).collect();
                self.check_constructor(ty, &arguments, initialiser, *line)
            }

            Expr::Index {
                line,
                target,
                indices,
            } => self.indexed_element_type(target, indices, *line),

            Expr::NodeAccess {
                line,
                target,
                from_root,
                chain,
            } => self.node_access_type(target, *from_root, chain, *line),

            Expr::Cast { line, target, expr } => {
                let from = self.check_expr(expr);
                let allowed = match (target, &from) {
                    (_, Type::Error) => true,
                    (Type::Number, Type::Number | Type::Char | Type::String) => true,
                    (Type::Char, Type::Number | Type::Char) => true,
                    _ => false,
                };
                if !allowed {
                    self.diagnostics.error(SemanticError::InvalidCast {
                        from,
                        to: target.clone(),
                        line: *line,
                    });
                }
                target.clone()
            }
        }
    }

    /// Checks `expr` and records an error unless it has type `expected`
    pub(crate) fn expect_type(&mut self, expr: &Expr, expected: &Type, context: &'static str) {
        let found = self.check_expr(expr);
        if !expected.accepts(&found) {
            self.diagnostics.error(SemanticError::UnexpectedType {
                context,
                expected: expected.clone(),
                found,
                line: expr.line(),
            });
        }
    }

    fn variable_type(&mut self, name: &str, line: Line) -> Type {
        match self.symbols.lookup(name) {
            Some(Symbol::Variable(ty)) => ty.clone(),
            _ => {
                self.diagnostics.error(SemanticError::Undeclared {
                    name: name.to_string(),
                    line,
                });
                Type::Error
            }
        }
    }

    fn binary_type(&mut self, op: BinaryOp, lhs: Type, rhs: Type, line: Line) -> Type {
        if lhs.is_error() || rhs.is_error() {
            return Type::Error;
        }
        let result = match op {
            BinaryOp::Add
                if (lhs == Type::String || rhs == Type::String)
                    && lhs.is_primitive()
                    && rhs.is_primitive() =>
            {
                Some(Type::String)
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
                if is_numeric(&lhs) && is_numeric(&rhs) =>
            {
                Some(Type::Number)
            }
            BinaryOp::And | BinaryOp::Or if lhs == Type::Bool && rhs == Type::Bool => {
                Some(Type::Bool)
            }
            BinaryOp::Eq | BinaryOp::Ne if lhs.accepts(&rhs) || rhs.accepts(&lhs) => {
                Some(Type::Bool)
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
                if lhs == rhs && lhs.is_primitive() =>
            {
                Some(Type::Bool)
            }
            _ => None,
        };
        result.unwrap_or_else(|| {
            self.diagnostics.error(SemanticError::IncompatibleOperator {
                op: op.symbol(),
                lhs,
                rhs,
                line,
            });
            Type::Error
        })
    }

    fn check_function_call(&mut self, name: &str, arguments: Vec<Type>, line: Line) -> Type {
        let signature = match self.symbols.lookup(name) {
            Some(Symbol::Function(signature)) => signature.clone(),
            Some(Symbol::Variable(_)) => {
                self.diagnostics.error(SemanticError::NotAFunction {
                    name: name.to_string(),
                    line,
                });
                return Type::Error;
            }
            None => {
                self.record_inferred_call(name, arguments, line);
                return Type::Error;
            }
        };

        if signature.parameters.len() != arguments.len() {
            self.diagnostics.error(SemanticError::FunctionArity {
                function: name.to_string(),
                expected: signature.parameters.len(),
                found: arguments.len(),
                declared_line: signature.line,
                line,
            });
        } else {
            for (position, (expected, found)) in
                signature.parameters.iter().zip(arguments).enumerate()
            {
                if !expected.accepts(&found) {
                    self.diagnostics.error(SemanticError::FunctionArgumentType {
                        function: name.to_string(),
                        position: position + 1,
                        expected: expected.clone(),
                        found,
                        declared_line: signature.line,
                        line,
                    });
                }
            }
        }
        signature.return_type
    }

    /// Calls to a function with no declaration must at least agree with
    /// each other. The first call is reported as undeclared and remembered.
    fn record_inferred_call(&mut self, name: &str, arguments: Vec<Type>, line: Line) {
        match self.inferred_calls.get(name) {
            None => {
                self.diagnostics.error(SemanticError::Undeclared {
                    name: name.to_string(),
                    line,
                });
                self.inferred_calls
                    .insert(name.to_string(), InferredCall { line, arguments });
            }
            Some(first) => {
                let compatible = first.arguments.len() == arguments.len()
                    && first
                        .arguments
                        .iter()
                        .zip(&arguments)
                        .all(|(a, b)| a.accepts(b) || b.accepts(a));
                if !compatible {
                    let first_line = first.line;
                    self.diagnostics.error(SemanticError::IncompatibleCallSites {
                        function: name.to_string(),
                        first_line,
                        line,
                    });
                }
            }
        }
    }

    fn check_method_call(
        &mut self,
        instance: &str,
        method: &str,
        arguments: &[Type],
        line: Line,
    ) -> Type {
        let owner = self.variable_type(instance, line);
        let Some(ds) = owner.as_data_structure() else {
            if !owner.is_error() {
                self.diagnostics.error(SemanticError::NotADataStructure {
                    name: instance.to_string(),
                    line,
                });
            }
            return Type::Error;
        };
        if !ds.contains_method(method) {
            self.diagnostics.error(SemanticError::UnsupportedMethod {
                data_structure: owner.clone(),
                method: method.to_string(),
                line,
            });
            return Type::Error;
        }
        let signature = ds.method_by_name(method);
        self.check_arguments(&owner, &signature, arguments, line);
        signature.return_type
    }

    fn check_constructor(
        &mut self,
        ty: &Type,
        arguments: &[Type],
        initialiser: &Initialiser,
        line: Line,
    ) -> Type {
        let Some(ds) = ty.as_data_structure() else {
            self.diagnostics.error(SemanticError::NotADataStructure {
                name: ty.to_string(),
                line,
            });
            return Type::Error;
        };
        if !ds.has_valid_internal() {
            self.diagnostics.error(SemanticError::InvalidElementType {
                data_structure: ty.clone(),
                line,
            });
            return Type::Error;
        }

        let constructor = ds.constructor();
        let dimensions = dimensions(ds);
        let required = constructor.min_required_without_initialiser;
        if ds.kind == DataStructureKind::Array
            && !arguments.is_empty()
            && arguments.len() != dimensions
        {
            self.diagnostics.error(SemanticError::ArrayConstructorDimensions {
                dimensions,
                found: arguments.len(),
                line,
            });
        } else if initialiser.is_empty() && arguments.len() < required {
            self.diagnostics.error(SemanticError::MissingConstructorArguments {
                data_structure: ty.clone(),
                expected: required,
                found: arguments.len(),
                line,
            });
        } else {
            self.check_arguments(ty, &constructor.method, arguments, line);
        }

        match initialiser {
            Initialiser::None => {}
            Initialiser::Values(values) => {
                let fits = !ds.is_2d();
                if !fits {
                    self.diagnostics.error(SemanticError::InitialiserShape {
                        data_structure: ty.clone(),
                        line,
                    });
                }
                self.check_initial_values(ty, ds, values.iter(), fits, line);
            }
            Initialiser::Rows(rows) => {
                let fits = ds.is_2d();
                if !fits {
                    self.diagnostics.error(SemanticError::InitialiserShape {
                        data_structure: ty.clone(),
                        line,
                    });
                } else if rows.iter().any(|row| row.len() != rows[0].len()) {
                    self.diagnostics.error(SemanticError::RaggedInitialiser { line });
                }
                self.check_initial_values(ty, ds, rows.iter().flatten(), fits, line);
            }
        }
        ty.clone()
    }

    /// Checks every initial value; element types are only compared when the
    /// initialiser has the right shape
    fn check_initial_values<'e>(
        &mut self,
        ty: &Type,
        ds: &DataStructureType,
        values: impl Iterator<Item = &'e Expr>,
        compare: bool,
        line: Line,
    ) {
        for value in values {
            let found = self.check_expr(value);
            if compare && (!ds.is_initialisable() || !ds.element().accepts(&found)) {
                self.diagnostics.error(SemanticError::InitialiserType {
                    data_structure: ty.clone(),
                    found,
                    line,
                });
            }
        }
    }

    /// Arity against the required/optional/varargs shape, then each argument
    fn check_arguments(
        &mut self,
        owner: &Type,
        method: &DataStructureMethod,
        arguments: &[Type],
        line: Line,
    ) {
        if !method.accepts_arity(arguments.len()) {
            self.diagnostics.error(SemanticError::WrongArity {
                data_structure: owner.clone(),
                method: method.name.to_string(),
                found: arguments.len(),
                line,
            });
            return;
        }
        for (index, found) in arguments.iter().enumerate() {
            if let Some(expected) = method.argument_type(index) {
                if !expected.accepts(found) {
                    self.diagnostics.error(SemanticError::WrongArgumentType {
                        data_structure: owner.clone(),
                        method: method.name.to_string(),
                        position: index + 1,
                        expected: expected.clone(),
                        found: found.clone(),
                        line,
                    });
                }
            }
        }
    }

    /// Element type of `target[i]` or `target[i][j]`; strings index to chars
    pub(crate) fn indexed_element_type(
        &mut self,
        target: &str,
        indices: &[Expr],
        line: Line,
    ) -> Type {
        for index in indices {
            self.expect_type(index, &Type::Number, "index");
        }
        let owner = self.variable_type(target, line);
        let (dimensions, element) = match &owner {
            Type::Error => return Type::Error,
            Type::String => (1, Type::Char),
            Type::DataStructure(ds) if ds.is_indexable() => (dimensions(ds), ds.element().clone()),
            _ => {
                self.diagnostics.error(SemanticError::NotADataStructure {
                    name: target.to_string(),
                    line,
                });
                return Type::Error;
            }
        };
        if indices.len() != dimensions {
            self.diagnostics.error(SemanticError::ArrayIndexCount {
                dimensions,
                found: indices.len(),
                line,
            });
            return Type::Error;
        }
        element
    }

    /// Type of a chained access such as `tree.root.left.value`, resolving one
    /// link at a time through the registry
    pub(crate) fn node_access_type(
        &mut self,
        target: &str,
        from_root: bool,
        chain: &[NodeField],
        line: Line,
    ) -> Type {
        let mut current = self.variable_type(target, line);
        let links = from_root
            .then_some("root")
            .into_iter()
            .chain(chain.iter().map(|field| field.method_name()));

        for link in links {
            if current.is_error() {
                return Type::Error;
            }
            let Some(ds) = current.as_data_structure() else {
                self.diagnostics.error(SemanticError::NotADataStructure {
                    name: target.to_string(),
                    line,
                });
                return Type::Error;
            };
            if !ds.contains_method(link) {
                self.diagnostics.error(SemanticError::UnsupportedMethod {
                    data_structure: current.clone(),
                    method: link.to_string(),
                    line,
                });
                return Type::Error;
            }
            current = ds.method_by_name(link).return_type;
        }
        current
    }
}
