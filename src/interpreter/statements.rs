//! Statement execution implementation
//!
//! This module handles the execution of all statement types, including:
//!
//! - Variable declarations and assignments (plain, indexed, node access)
//! - Conditionals (`if` / `elif` / `else`)
//! - `sleep` and `subtitle`
//! - Annotation blocks (`@stepInto`, `@stepOver`, `@speed`), which run their
//!   body in the enclosing scope and restore the previous mode afterwards
//! - User function calls and returns
//!
//! Loops live in [`super::loops`].
//!
//! # Control Flow
//!
//! `break`, `continue` and `return` set [`ControlFlow`]; blocks stop at the
//! first statement that leaves it non-normal and the enclosing loop or call
//! consumes the signal.

use crate::ast::{AssignTarget, ElifBranch, Expr, Line, Statement};
use crate::executors::{executor_for, Accessor};
use crate::instructions::InstructionKind;
use crate::interpreter::constants::MAX_CALL_DEPTH;
use crate::interpreter::engine::{ControlFlow, VirtualMachine};
use crate::interpreter::errors::RuntimeError;
use crate::runtime::frame::Frame;
use crate::runtime::value::ExecValue;
use crate::style::{CodeTracking, SUBTITLE_ID};
use std::rc::Rc;

impl VirtualMachine {
    /// Execute a single statement
    pub(crate) fn execute_statement(&mut self, stmt: &Statement) -> Result<(), RuntimeError> {
        match stmt {
            // The annotation line itself is not part of the displayed code
            Statement::CodeTracking { line, .. } | Statement::Speed { line, .. } => {
                self.ctx.line = *line;
            }
            _ => self.step_to(stmt.line())?,
        }

        match stmt {
            Statement::Declaration { name, value, .. } => {
                let value = self.evaluate_binding(name, value)?;
                let shown = value.is_displayable();
                self.frame_mut()?.declare(name, value);
                if shown {
                    self.update_variables()?;
                }
                Ok(())
            }

            Statement::Assignment { target, value, .. } => self.execute_assignment(target, value),

            Statement::Expression { expr, .. } => {
                match expr {
                    Expr::MethodCall {
                        instance,
                        method,
                        arguments,
                        ..
                    } => {
                        self.call_method(instance, method, arguments, false, false)?;
                    }
                    other => {
                        self.evaluate_expr(other)?;
                    }
                }
                Ok(())
            }

            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate_expr(expr)?.into_plain(),
                    None => ExecValue::Empty,
                };
                self.control_flow = ControlFlow::Return(value);
                Ok(())
            }

            Statement::If {
                condition,
                then_branch,
                elifs,
                else_branch,
                ..
            } => self.execute_if(condition, then_branch, elifs, else_branch.as_deref()),

            Statement::While {
                line,
                condition,
                body,
            } => self.execute_while(condition, body, *line),

            Statement::For {
                line,
                variable,
                start,
                end,
                step,
                body,
            } => self.execute_for(variable, start, end, step.as_ref(), body, *line),

            Statement::Break { .. } => {
                self.control_flow = ControlFlow::Break;
                Ok(())
            }

            Statement::Continue { .. } => {
                self.control_flow = ControlFlow::Continue;
                Ok(())
            }

            Statement::Sleep { duration, .. } => {
                let duration = self.evaluate_number(duration)?;
                self.ctx.emit(InstructionKind::Sleep, duration.max(0.0), true);
                Ok(())
            }

            Statement::Subtitle {
                line,
                text,
                duration,
                condition,
                show_once,
            } => {
                if !self.annotation_applies(condition.as_ref())? {
                    return Ok(());
                }
                if *show_once && !self.shown_subtitles.insert(*line) {
                    return Ok(());
                }
                let duration = match duration {
                    Some(expr) => self.evaluate_number(expr)?.max(0.0),
                    None => self.ctx.default_duration(),
                };
                let boundary = self.ctx.placement(SUBTITLE_ID)?;
                self.ctx.emit(
                    InstructionKind::Subtitle {
                        text: text.clone(),
                        boundary,
                    },
                    duration,
                    true,
                );
                Ok(())
            }

            Statement::CodeTracking {
                step_into,
                condition,
                body,
                ..
            } => {
                let previous = self.code_tracking;
                if self.annotation_applies(condition.as_ref())? {
                    self.code_tracking = if *step_into {
                        CodeTracking::StepInto
                    } else {
                        CodeTracking::StepOver
                    };
                }
                let result = self.execute_statements(body);
                self.code_tracking = previous;
                result
            }

            Statement::Speed {
                line,
                factor,
                condition,
                body,
            } => {
                let factor = self.evaluate_number(factor)?;
                if factor <= 0.0 {
                    return Err(RuntimeError::InvalidSpeed { factor, line: *line });
                }
                let scale = if self.annotation_applies(condition.as_ref())? {
                    1.0 / factor
                } else {
                    self.ctx.time_scale()
                };
                self.ctx.push_time_scale(scale);
                let result = self.execute_statements(body);
                self.ctx.pop_time_scale();
                result
            }
        }
    }

    /// An annotation without a condition always applies
    fn annotation_applies(&mut self, condition: Option<&Expr>) -> Result<bool, RuntimeError> {
        match condition {
            Some(condition) => self.evaluate_condition(condition),
            None => Ok(true),
        }
    }

    /// Run `body` in the current scope, stopping at the first control-flow signal
    fn execute_statements(&mut self, body: &[Statement]) -> Result<(), RuntimeError> {
        for stmt in body {
            self.execute_statement(stmt)?;
            if !matches!(self.control_flow, ControlFlow::Normal) {
                break;
            }
        }
        Ok(())
    }

    /// Execute `body` in a fresh scope, stopping at the first control-flow signal
    pub(crate) fn execute_block(&mut self, body: &[Statement]) -> Result<(), RuntimeError> {
        self.enter_scope();
        self.execute_statements(body)?;
        self.exit_scope();
        Ok(())
    }

    pub(crate) fn execute_if(
        &mut self,
        condition: &Expr,
        then_branch: &[Statement],
        elifs: &[ElifBranch],
        else_branch: Option<&[Statement]>,
    ) -> Result<(), RuntimeError> {
        if self.evaluate_condition(condition)? {
            return self.execute_block(then_branch);
        }
        for elif in elifs {
            self.step_to(elif.line)?;
            if self.evaluate_condition(&elif.condition)? {
                return self.execute_block(&elif.body);
            }
        }
        match else_branch {
            Some(body) => self.execute_block(body),
            None => Ok(()),
        }
    }

    pub(crate) fn execute_assignment(
        &mut self,
        target: &AssignTarget,
        value: &Expr,
    ) -> Result<(), RuntimeError> {
        match target {
            AssignTarget::Identifier(name) => {
                let value = self.evaluate_binding(name, value)?;
                let shown = value.is_displayable();
                let line = self.ctx.line;
                if !self.frame_mut()?.assign(name, value) {
                    return Err(RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        line,
                    });
                }
                if shown {
                    self.update_variables()?;
                }
                Ok(())
            }

            AssignTarget::Index { target, indices } => {
                let container = self.lookup(target)?;
                let positions = self.evaluate_indices(indices)?;
                let value = self.evaluate_expr(value)?.into_plain();
                let accessor = self.index_accessor(&positions)?;
                let kind = self.data_structure_kind(&container)?;
                executor_for(kind).write(&mut self.ctx, &container, accessor, value)
            }

            AssignTarget::NodeAccess {
                target,
                from_root,
                chain,
            } => {
                let container = self.lookup(target)?;
                let value = self.evaluate_expr(value)?.into_plain();
                let kind = self.data_structure_kind(&container)?;
                executor_for(kind).write(
                    &mut self.ctx,
                    &container,
                    Accessor::Chain {
                        from_root: *from_root,
                        chain,
                    },
                    value,
                )
            }
        }
    }

    /// Value bound to variable `name`: constructors take the variable as
    /// their label and instance id
    pub(crate) fn evaluate_binding(
        &mut self,
        name: &str,
        value: &Expr,
    ) -> Result<ExecValue, RuntimeError> {
        match value {
            Expr::Constructor {
                ty,
                arguments,
                initialiser,
                ..
            } => {
                let uid = self.frame()?.uid(name);
                self.construct(ty, arguments, initialiser, uid, name)
            }
            other => Ok(self.evaluate_expr(other)?.into_plain()),
        }
    }

    /// Call a user function with already-checked argument expressions
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        arguments: &[Expr],
        line: Line,
    ) -> Result<ExecValue, RuntimeError> {
        let function = self
            .functions
            .get(name)
            .map(Rc::clone)
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
                line,
            })?;

        if self.stack.depth() >= MAX_CALL_DEPTH {
            return Err(RuntimeError::StackOverflow {
                depth: MAX_CALL_DEPTH,
                line,
            });
        }

        // Arguments are evaluated in the caller's frame
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate_expr(argument)?.into_plain());
        }

        let mut frame = Frame::new(name, format!("{name}."), self.callee_shows_code());
        frame.push_scope();
        for (parameter, value) in function.parameters.iter().zip(values) {
            frame.declare(&parameter.name, value);
        }
        self.stack.push_frame(frame);
        tracing::trace!(function = name, depth = self.stack.depth(), "frame pushed");
        self.update_variables()?;

        for stmt in function.body.iter() {
            self.execute_statement(stmt)?;
            if !matches!(self.control_flow, ControlFlow::Normal) {
                break;
            }
        }

        let returned = match std::mem::take(&mut self.control_flow) {
            ControlFlow::Return(value) => value,
            _ => ExecValue::Empty,
        };

        let frame = self.stack.pop_frame().ok_or(RuntimeError::NoStackFrame { line })?;
        tracing::trace!(function = name, depth = self.stack.depth(), "frame popped");
        self.clean_up_locals(&frame, &returned);

        // Back in the caller
        self.ctx.line = line;
        if frame.show_code_pointer {
            self.step_to(line)?;
            self.update_variables()?;
        }
        Ok(returned)
    }

    /// Remove data structures created by a finished call. The one it returns,
    /// if any, now belongs to the caller.
    fn clean_up_locals(&mut self, frame: &Frame, returned: &ExecValue) {
        let kept = returned.visual();
        let mut idents = Vec::new();
        for ident in frame.local_data_structures() {
            if kept.as_deref() == Some(ident.as_str()) {
                if let Some(caller) = self.stack.current_frame_mut() {
                    caller.record_data_structure(ident.clone());
                }
            } else {
                idents.push(ident.clone());
            }
        }
        if !idents.is_empty() {
            self.ctx
                .emit(InstructionKind::CleanUpLocals { idents }, 0.0, true);
        }
    }
}
