//! Return-path completeness
//!
//! A statement list is complete when control cannot fall off its end. An
//! `if` only counts when it has an `else` and every arm is complete; a loop
//! counts only as `while (true)` without a `break` that targets it.
//! Annotation blocks always run their body, so they count when it does.

use crate::ast::{Expr, Statement};

/// Whether every path through `body` ends in a `return`
pub fn always_returns(body: &[Statement]) -> bool {
    body.iter().any(statement_returns)
}

fn statement_returns(statement: &Statement) -> bool {
    match statement {
        Statement::Return { .. } => true,
        Statement::If {
            then_branch,
            elifs,
            else_branch: Some(else_branch),
            ..
        } => {
            always_returns(then_branch)
                && elifs.iter().all(|elif| always_returns(&elif.body))
                && always_returns(else_branch)
        }
        Statement::While {
            condition: Expr::Bool { value: true, .. },
            body,
            ..
        } => !breaks_out(body),
        Statement::CodeTracking { body, .. } | Statement::Speed { body, .. } => {
            always_returns(body)
        }
        _ => false,
    }
}

/// Whether a `break` in `body` leaves the enclosing loop
fn breaks_out(body: &[Statement]) -> bool {
    body.iter().any(|statement| match statement {
        Statement::Break { .. } => true,
        Statement::If {
            then_branch,
            elifs,
            else_branch,
            ..
        } => {
            breaks_out(then_branch)
                || elifs.iter().any(|elif| breaks_out(&elif.body))
                || else_branch.as_deref().is_some_and(breaks_out)
        }
        Statement::CodeTracking { body, .. } | Statement::Speed { body, .. } => breaks_out(body),
        // nested loops own their breaks
        _ => false,
    })
}
