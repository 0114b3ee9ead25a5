//! Loop statement execution (`while`, `for ... in range`).
//!
//! Adds `impl VirtualMachine` methods for the two loop forms. `break` and
//! `continue` are propagated via `LoopBodyResult` so the loop driver can
//! react without inspecting `control_flow` directly.
//!
//! `return` inside a loop body is handled by returning
//! `LoopBodyResult::Exit`, which causes the loop to unwind immediately and
//! let the enclosing call consume the control-flow signal.
//!
//! Every loop is capped at [`MAX_LOOP_ITERATIONS`] iterations; exceeding
//! the cap is a runtime error at the loop's line.

use crate::ast::{Expr, Line, Statement};
use crate::interpreter::constants::MAX_LOOP_ITERATIONS;
use crate::interpreter::engine::{ControlFlow, VirtualMachine};
use crate::interpreter::errors::RuntimeError;
use crate::runtime::value::ExecValue;

/// Result returned by [`VirtualMachine::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally or via `continue`; the loop should iterate again.
    Continue,
    /// `break` was encountered; the loop should exit cleanly.
    Break,
    /// `return` was executed; the loop driver should unwind and leave
    /// `self.control_flow` for the caller.
    Exit,
}

/// Bounds of a `range(start, end, step)` loop
#[derive(Debug, Clone, Copy)]
enum RangeKind {
    Number,
    Char,
}

impl VirtualMachine {
    /// Executes all statements in `body` inside a fresh scope.
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &[Statement],
    ) -> Result<LoopBodyResult, RuntimeError> {
        self.enter_scope();
        for stmt in body {
            self.execute_statement(stmt)?;
            match self.control_flow {
                ControlFlow::Normal => {}
                ControlFlow::Break => {
                    self.control_flow = ControlFlow::Normal;
                    self.exit_scope();
                    return Ok(LoopBodyResult::Break);
                }
                ControlFlow::Continue => {
                    self.control_flow = ControlFlow::Normal;
                    self.exit_scope();
                    return Ok(LoopBodyResult::Continue);
                }
                ControlFlow::Return(_) => {
                    self.exit_scope();
                    return Ok(LoopBodyResult::Exit);
                }
            }
        }
        self.exit_scope();
        Ok(LoopBodyResult::Continue)
    }

    /// Executes a `while (condition) { body }` loop.
    ///
    /// The code pointer returns to the loop line before every re-check of
    /// the condition.
    pub(crate) fn execute_while(
        &mut self,
        condition: &Expr,
        body: &[Statement],
        line: Line,
    ) -> Result<(), RuntimeError> {
        let mut iterations = 0;
        loop {
            if !self.evaluate_condition(condition)? {
                break;
            }
            iterations += 1;
            check_iterations(iterations, line)?;

            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit => return Ok(()),
                LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }
            self.step_to(line)?;
        }
        Ok(())
    }

    /// Executes `for variable in range(start, end[, step])`.
    ///
    /// Bounds are both numbers or both chars; the end is exclusive. The loop
    /// variable lives in its own scope around the body.
    pub(crate) fn execute_for(
        &mut self,
        variable: &str,
        start: &Expr,
        end: &Expr,
        step: Option<&Expr>,
        body: &[Statement],
        line: Line,
    ) -> Result<(), RuntimeError> {
        let start = self.evaluate_expr(start)?.into_plain();
        let kind = match start {
            ExecValue::Char(_) => RangeKind::Char,
            _ => RangeKind::Number,
        };
        let first = self.range_bound(&start)?;
        let end = self.evaluate_expr(end)?.into_plain();
        let last = self.range_bound(&end)?;
        let step = match step {
            Some(expr) => self.evaluate_number(expr)?,
            None => 1.0,
        };
        if step == 0.0 {
            return Err(RuntimeError::ZeroRangeStep { line });
        }

        self.enter_scope();
        let mut current = first;
        let mut iterations = 0;
        let mut declared = false;
        while (step > 0.0 && current < last) || (step < 0.0 && current > last) {
            iterations += 1;
            if let Err(err) = check_iterations(iterations, line) {
                self.exit_scope();
                return Err(err);
            }

            let value = match kind {
                RangeKind::Number => ExecValue::Number(current),
                RangeKind::Char => char::from_u32(current as u32)
                    .map(ExecValue::Char)
                    .ok_or(RuntimeError::InvalidCast {
                        value: current.to_string(),
                        line,
                    })?,
            };
            let frame = self.frame_mut()?;
            if declared {
                frame.assign(variable, value);
            } else {
                frame.declare(variable, value);
                declared = true;
            }
            self.update_variables()?;

            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit => {
                    self.exit_scope();
                    return Ok(());
                }
                LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }
            current += step;
            self.step_to(line)?;
        }
        self.exit_scope();
        Ok(())
    }

    fn range_bound(&self, value: &ExecValue) -> Result<f64, RuntimeError> {
        value.as_number().ok_or_else(|| RuntimeError::TypeError {
            expected: "number or char",
            found: value.to_string(),
            line: self.ctx.line,
        })
    }
}

fn check_iterations(iterations: usize, line: Line) -> Result<(), RuntimeError> {
    if iterations > MAX_LOOP_ITERATIONS {
        return Err(RuntimeError::LoopLimitExceeded {
            limit: MAX_LOOP_ITERATIONS,
            line,
        });
    }
    Ok(())
}
