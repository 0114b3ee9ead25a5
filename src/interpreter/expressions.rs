//! Expression evaluation
//!
//! Expressions are evaluated to [`ExecValue`]s. Method calls, constructors
//! and element accesses are delegated to the executor for the instance's
//! kind; operators and casts are evaluated here.
//!
//! # Nested calls
//!
//! A method call passed straight to a stack `push` is evaluated as nested,
//! so a popped value keeps its block and the push can reuse it
//! (`s2.push(s1.pop())`). Every other receiving call gets a plain value.

use crate::ast::{BinaryOp, Expr, Initialiser, NodeField, UnaryOp};
use crate::executors::array::element_index;
use crate::executors::{executor_for, kind_of, Accessor, ConstructRequest, MethodCall};
use crate::interpreter::engine::VirtualMachine;
use crate::interpreter::errors::RuntimeError;
use crate::runtime::value::ExecValue;
use crate::types::{DataStructureKind, Type};

impl VirtualMachine {
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<ExecValue, RuntimeError> {
        match expr {
            Expr::Number { value, .. } => Ok(ExecValue::Number(*value)),
            Expr::Bool { value, .. } => Ok(ExecValue::Bool(*value)),
            Expr::Char { value, .. } => Ok(ExecValue::Char(*value)),
            Expr::String { value, .. } => Ok(ExecValue::String(value.clone())),
            Expr::Null { .. } => Ok(ExecValue::Null),
            Expr::Identifier { name, .. } => self.lookup(name),

            Expr::Binary { op, lhs, rhs, .. } => self.evaluate_binary_op(*op, lhs, rhs),
            Expr::Unary { op, operand, .. } => self.evaluate_unary_op(*op, operand),

            Expr::FunctionCall {
                line,
                name,
                arguments,
            } => self.call_function(name, arguments, *line),

            Expr::MethodCall {
                instance,
                method,
                arguments,
                ..
            } => self.call_method(instance, method, arguments, false, true),

            Expr::Constructor {
                ty,
                arguments,
                initialiser,
                ..
            } => {
                let uid = self.ctx.names.generate("anonymous");
                self.construct(ty, arguments, initialiser, uid, "")
            }

            Expr::Index {
                target, indices, ..
            } => {
                let container = self.lookup(target)?;
                let positions = self.evaluate_indices(indices)?;
                let accessor = self.index_accessor(&positions)?;
                if let ExecValue::String(text) = &container {
                    let Accessor::Index(index) = accessor else {
                        return Err(RuntimeError::TypeError {
                            expected: "single index",
                            found: text.clone(),
                            line: self.ctx.line,
                        });
                    };
                    let chars: Vec<char> = text.chars().collect();
                    let position = element_index(&self.ctx, index, chars.len())?;
                    return Ok(ExecValue::Char(chars[position]));
                }
                let kind = self.data_structure_kind(&container)?;
                executor_for(kind).read(&mut self.ctx, &container, accessor)
            }

            Expr::NodeAccess {
                target,
                from_root,
                chain,
                ..
            } => {
                let container = self.lookup(target)?;
                self.read_chain(&container, *from_root, chain)
            }

            Expr::Cast { target, expr, .. } => {
                let value = self.evaluate_expr(expr)?.into_plain();
                self.cast(target, value)
            }
        }
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<ExecValue, RuntimeError> {
        self.frame()?
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                line: self.ctx.line,
            })
    }

    pub(crate) fn evaluate_indices(
        &mut self,
        indices: &[Expr],
    ) -> Result<Vec<ExecValue>, RuntimeError> {
        let mut positions = Vec::with_capacity(indices.len());
        for index in indices {
            positions.push(self.evaluate_expr(index)?.into_plain());
        }
        Ok(positions)
    }

    /// One index addresses an element, two address a row and column
    pub(crate) fn index_accessor<'a>(
        &self,
        positions: &'a [ExecValue],
    ) -> Result<Accessor<'a>, RuntimeError> {
        match positions {
            [index] => Ok(Accessor::Index(index)),
            [row, column] => Ok(Accessor::Cell(row, column)),
            _ => Err(RuntimeError::UnsupportedOperation {
                operation: format!("access with {} indices", positions.len()),
                line: self.ctx.line,
            }),
        }
    }

    pub(crate) fn data_structure_kind(
        &self,
        value: &ExecValue,
    ) -> Result<DataStructureKind, RuntimeError> {
        kind_of(value).ok_or_else(|| RuntimeError::TypeError {
            expected: "data structure",
            found: value.to_string(),
            line: self.ctx.line,
        })
    }

    pub(crate) fn evaluate_condition(&mut self, condition: &Expr) -> Result<bool, RuntimeError> {
        let value = self.evaluate_expr(condition)?;
        value.as_bool().ok_or_else(|| RuntimeError::TypeError {
            expected: "boolean",
            found: value.to_string(),
            line: self.ctx.line,
        })
    }

    pub(crate) fn evaluate_number(&mut self, expr: &Expr) -> Result<f64, RuntimeError> {
        let value = self.evaluate_expr(expr)?;
        value.as_number().ok_or_else(|| RuntimeError::TypeError {
            expected: "number",
            found: value.to_string(),
            line: self.ctx.line,
        })
    }

    /// Invoke `method` on the instance bound to `instance`
    pub(crate) fn call_method(
        &mut self,
        instance: &str,
        method: &str,
        arguments: &[Expr],
        nested: bool,
        as_expression: bool,
    ) -> Result<ExecValue, RuntimeError> {
        let target = self.lookup(instance)?;
        let kind = self.data_structure_kind(&target)?;
        let receives_block = kind == DataStructureKind::Stack && method == "push";

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let value = match argument {
                Expr::MethodCall {
                    instance,
                    method,
                    arguments,
                    ..
                } => self.call_method(instance, method, arguments, receives_block, true)?,
                other => self.evaluate_expr(other)?.into_plain(),
            };
            values.push(value);
        }

        executor_for(kind).call_method(
            &mut self.ctx,
            MethodCall {
                variable: instance,
                method,
                arguments: values,
                nested,
                as_expression,
            },
            &target,
        )
    }

    /// Build a new instance of `ty` with instance id `uid`
    pub(crate) fn construct(
        &mut self,
        ty: &Type,
        arguments: &[Expr],
        initialiser: &Initialiser,
        uid: String,
        label: &str,
    ) -> Result<ExecValue, RuntimeError> {
        let ds = ty.as_data_structure().ok_or_else(|| RuntimeError::TypeError {
            expected: "data structure type",
            found: ty.to_string(),
            line: self.ctx.line,
        })?;

        let mut argument_values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            argument_values.push(self.evaluate_expr(argument)?.into_plain());
        }
        let mut initial_values = Vec::new();
        let mut rows = Vec::new();
        match initialiser {
            Initialiser::None => {}
            Initialiser::Values(values) => initial_values = self.evaluate_indices(values)?,
            Initialiser::Rows(source) => {
                for row in source {
                    rows.push(self.evaluate_indices(row)?);
                }
            }
        }

        let value = executor_for(ds.kind).construct(
            &mut self.ctx,
            ConstructRequest {
                ty: ds,
                arguments: argument_values,
                initialiser: initial_values,
                rows,
                uid,
                label,
            },
        )?;

        if ds.kind != DataStructureKind::Node && value.renders() {
            if let Some(ident) = value.visual() {
                self.frame_mut()?.record_data_structure(ident);
            }
        }
        Ok(value)
    }

    pub(crate) fn read_chain(
        &mut self,
        container: &ExecValue,
        from_root: bool,
        chain: &[NodeField],
    ) -> Result<ExecValue, RuntimeError> {
        let kind = self.data_structure_kind(container)?;
        executor_for(kind).read(&mut self.ctx, container, Accessor::Chain { from_root, chain })
    }

    pub(crate) fn evaluate_binary_op(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<ExecValue, RuntimeError> {
        let left = self.evaluate_expr(lhs)?.into_plain();

        // Short-circuit logical operators
        match op {
            BinaryOp::And if left.as_bool() == Some(false) => return Ok(ExecValue::Bool(false)),
            BinaryOp::Or if left.as_bool() == Some(true) => return Ok(ExecValue::Bool(true)),
            _ => {}
        }

        let right = self.evaluate_expr(rhs)?.into_plain();
        let line = self.ctx.line;

        match op {
            BinaryOp::Add => match (&left, &right) {
                (ExecValue::String(_), _) | (_, ExecValue::String(_)) => {
                    Ok(ExecValue::String(format!("{left}{right}")))
                }
                _ => self.arithmetic(op, &left, &right),
            },
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                self.arithmetic(op, &left, &right)
            }
            BinaryOp::Eq => Ok(ExecValue::Bool(left == right)),
            BinaryOp::Ne => Ok(ExecValue::Bool(left != right)),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ordering = match (&left, &right) {
                    (ExecValue::String(a), ExecValue::String(b)) => a.partial_cmp(b),
                    (ExecValue::Bool(a), ExecValue::Bool(b)) => a.partial_cmp(b),
                    _ => match (left.as_number(), right.as_number()) {
                        (Some(a), Some(b)) => a.partial_cmp(&b),
                        _ => None,
                    },
                };
                let ordering = ordering.ok_or_else(|| RuntimeError::UnsupportedOperation {
                    operation: format!("{left} {} {right}", op.symbol()),
                    line,
                })?;
                Ok(ExecValue::Bool(match op {
                    BinaryOp::Lt => ordering.is_lt(),
                    BinaryOp::Le => ordering.is_le(),
                    BinaryOp::Gt => ordering.is_gt(),
                    _ => ordering.is_ge(),
                }))
            }
            BinaryOp::And | BinaryOp::Or => match right.as_bool() {
                Some(value) => Ok(ExecValue::Bool(value)),
                None => Err(RuntimeError::TypeError {
                    expected: "boolean",
                    found: right.to_string(),
                    line,
                }),
            },
        }
    }

    fn arithmetic(
        &self,
        op: BinaryOp,
        left: &ExecValue,
        right: &ExecValue,
    ) -> Result<ExecValue, RuntimeError> {
        let line = self.ctx.line;
        let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
            return Err(RuntimeError::UnsupportedOperation {
                operation: format!("{left} {} {right}", op.symbol()),
                line,
            });
        };
        let result = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div | BinaryOp::Mod if b == 0.0 => {
                return Err(RuntimeError::DivisionByZero { line });
            }
            BinaryOp::Div => a / b,
            _ => a % b,
        };
        Ok(ExecValue::Number(result))
    }

    pub(crate) fn evaluate_unary_op(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
    ) -> Result<ExecValue, RuntimeError> {
        let value = self.evaluate_expr(operand)?.into_plain();
        let result = match op {
            UnaryOp::Neg => value.as_number().map(|n| ExecValue::Number(-n)),
            UnaryOp::Plus => value.as_number().map(ExecValue::Number),
            UnaryOp::Not => value.as_bool().map(|b| ExecValue::Bool(!b)),
        };
        result.ok_or_else(|| RuntimeError::UnsupportedOperation {
            operation: format!("{}{value}", op.symbol()),
            line: self.ctx.line,
        })
    }

    fn cast(&self, target: &Type, value: ExecValue) -> Result<ExecValue, RuntimeError> {
        let invalid = |value: &ExecValue| RuntimeError::InvalidCast {
            value: value.to_string(),
            line: self.ctx.line,
        };
        match (target, &value) {
            (Type::Number, ExecValue::String(text)) => text
                .trim()
                .parse::<f64>()
                .map(ExecValue::Number)
                .map_err(|_| invalid(&value)),
            (Type::Number, _) => value
                .as_number()
                .map(ExecValue::Number)
                .ok_or_else(|| invalid(&value)),
            (Type::Char, ExecValue::Char(c)) => Ok(ExecValue::Char(*c)),
            (Type::Char, ExecValue::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => {
                char::from_u32(*n as u32)
                    .map(ExecValue::Char)
                    .ok_or_else(|| invalid(&value))
            }
            _ => Err(invalid(&value)),
        }
    }
}
