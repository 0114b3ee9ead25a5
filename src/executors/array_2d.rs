//! Two-dimensional arrays
//!
//! An `Array<Array<T>>` is a fixed grid addressed by row, then column. It is
//! built from a `(rows, columns)` size, from a row initialiser, or from both
//! when they agree, and is drawn as one block of cells. `size` counts rows.

use super::array::{declared_size, default_value, element_index};
use super::{label, mismatch, unsupported, Accessor, ConstructRequest, MethodCall};
use crate::instructions::boundary::{BoundaryShape, ShapeKind};
use crate::instructions::InstructionKind;
use crate::interpreter::constants::MAX_ARRAY_SIZE;
use crate::interpreter::context::ExecContext;
use crate::interpreter::errors::RuntimeError;
use crate::runtime::value::{Array2DRef, ExecValue, Instance};
use crate::types::DataStructureKind;
use std::cell::RefCell;
use std::rc::Rc;

type Grid = Instance<Vec<Vec<ExecValue>>>;
type Cell = (usize, usize);

pub(crate) fn construct(
    ctx: &mut ExecContext,
    request: ConstructRequest<'_>,
) -> Result<ExecValue, RuntimeError> {
    let kind = request.ty.kind;
    let rows = grid_values(ctx, &request)?;
    let cells = rows.iter().map(Vec::len).sum();

    let style = ctx.styles.resolve(request.label, kind.name());
    let animated = ctx.styles.resolve_animated(request.label, kind.name());
    let shape = BoundaryShape::new(ShapeKind::Square, cells);
    let boundary = ctx.register_instance(&request.uid, shape)?;
    let render = ctx.styles.renders(&request.uid);
    let ident = ctx.names.generate("array");
    let duration = style.creation_time.unwrap_or_else(|| ctx.default_duration());

    ctx.emit(
        InstructionKind::ConstructArray2D {
            ident: ident.clone(),
            uid: request.uid.clone(),
            label: label(style.show_label, request.label),
            rows: rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
            style: style.clone(),
            boundary,
        },
        duration,
        render,
    );

    Ok(ExecValue::Array2D(Rc::new(RefCell::new(Instance {
        uid: request.uid,
        visual: Some(ident),
        style,
        animated,
        render,
        data: rows,
    }))))
}

/// Rows of a new grid: defaults for a bare size, otherwise the initialiser
/// checked against the size
fn grid_values(
    ctx: &ExecContext,
    request: &ConstructRequest<'_>,
) -> Result<Vec<Vec<ExecValue>>, RuntimeError> {
    let rows: Vec<Vec<ExecValue>> = request
        .rows
        .iter()
        .map(|row| row.iter().cloned().map(ExecValue::into_plain).collect())
        .collect();
    let sizes: Vec<f64> = request.arguments.iter().filter_map(ExecValue::as_number).collect();
    let &[height, width] = sizes.as_slice() else {
        return Ok(rows);
    };
    let height = declared_size(ctx, height)?;
    let width = declared_size(ctx, width)?;
    if height * width > MAX_ARRAY_SIZE {
        return Err(RuntimeError::InvalidArraySize {
            size: (height * width) as f64,
            line: ctx.line,
        });
    }

    if rows.is_empty() {
        return Ok(vec![vec![default_value(request.ty.element()); width]; height]);
    }
    if rows.len() != height {
        return Err(RuntimeError::ArrayInitialiser {
            expected: height,
            found: rows.len(),
            line: ctx.line,
        });
    }
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(RuntimeError::ArrayInitialiser {
            expected: width,
            found: row.len(),
            line: ctx.line,
        });
    }
    Ok(rows)
}

pub(crate) fn call_method(
    ctx: &mut ExecContext,
    call: MethodCall<'_>,
    grid: &Array2DRef,
) -> Result<ExecValue, RuntimeError> {
    let arguments: Vec<ExecValue> =
        call.arguments.into_iter().map(ExecValue::into_plain).collect();
    match (call.method, arguments.as_slice()) {
        ("size", _) => Ok(ExecValue::Number(grid.borrow().data.len() as f64)),
        ("contains", [needle, ..]) => {
            let found = grid.borrow().data.iter().flatten().any(|value| value == needle);
            Ok(ExecValue::Bool(found))
        }
        ("swap", [row1, column1, row2, column2]) => {
            let first = cell_index(ctx, &grid.borrow(), row1, column1)?;
            let second = cell_index(ctx, &grid.borrow(), row2, column2)?;
            swap(ctx, grid, first, second);
            Ok(ExecValue::Empty)
        }
        (other, _) => Err(unsupported(ctx, DataStructureKind::Array, other)),
    }
}

pub(crate) fn read(
    ctx: &mut ExecContext,
    grid: &Array2DRef,
    accessor: Accessor<'_>,
) -> Result<ExecValue, RuntimeError> {
    let Accessor::Cell(row, column) = accessor else {
        return Err(whole_row(ctx, grid));
    };
    let borrowed = grid.borrow();
    let cell = cell_index(ctx, &borrowed, row, column)?;
    highlight(ctx, &borrowed, &[cell], |_| {});
    Ok(borrowed.data[cell.0][cell.1].clone())
}

pub(crate) fn write(
    ctx: &mut ExecContext,
    grid: &Array2DRef,
    accessor: Accessor<'_>,
    value: ExecValue,
) -> Result<(), RuntimeError> {
    let Accessor::Cell(row, column) = accessor else {
        return Err(whole_row(ctx, grid));
    };
    let value = value.into_plain();
    let cell = cell_index(ctx, &grid.borrow(), row, column)?;

    let assign = InstructionKind::Array2DElemAssign {
        array: grid.borrow().visual.clone().unwrap_or_default(),
        row: cell.0,
        column: cell.1,
        value: value.to_string(),
    };
    grid.borrow_mut().data[cell.0][cell.1] = value;
    let borrowed = grid.borrow();
    let duration = ctx.duration(borrowed.animated.as_ref());
    let render = borrowed.render;
    highlight(ctx, &borrowed, &[cell], |ctx| ctx.emit(assign, duration, render));
    Ok(())
}

/// Rows are not values of their own
fn whole_row(ctx: &ExecContext, grid: &Array2DRef) -> RuntimeError {
    mismatch(ctx, "row and column", &ExecValue::Array2D(Rc::clone(grid)))
}

fn cell_index(
    ctx: &ExecContext,
    grid: &Grid,
    row: &ExecValue,
    column: &ExecValue,
) -> Result<Cell, RuntimeError> {
    let row = element_index(ctx, row, grid.data.len())?;
    let column = element_index(ctx, column, grid.data[row].len())?;
    Ok((row, column))
}

fn swap(ctx: &mut ExecContext, grid: &Array2DRef, first: Cell, second: Cell) {
    {
        let mut instance = grid.borrow_mut();
        let taken = std::mem::take(&mut instance.data[first.0][first.1]);
        let displaced = std::mem::replace(&mut instance.data[second.0][second.1], taken);
        instance.data[first.0][first.1] = displaced;
    }

    let borrowed = grid.borrow();
    let exchange = InstructionKind::Array2DSwap {
        array: borrowed.visual.clone().unwrap_or_default(),
        first,
        second,
    };
    let duration = ctx.duration(borrowed.animated.as_ref());
    let render = borrowed.render;
    tracing::trace!(array = %borrowed.uid, ?first, ?second, "cells swapped");
    highlight(ctx, &borrowed, &[first, second], |ctx| {
        ctx.emit(exchange, duration, render)
    });
}

/// Run `step` between restyling `cells` to the animated colours and back
fn highlight<F>(ctx: &mut ExecContext, grid: &Grid, cells: &[Cell], step: F)
where
    F: FnOnce(&mut ExecContext),
{
    let Some(animated) = &grid.animated else {
        step(ctx);
        return;
    };
    let array = grid.visual.clone().unwrap_or_default();
    let duration = ctx.duration(Some(animated));

    ctx.emit(
        InstructionKind::Array2DElemRestyle {
            array: array.clone(),
            cells: cells.to_vec(),
            border_color: animated.border_color.clone(),
            text_color: Some(animated.text_color.clone()),
            pointer: animated.pointer,
        },
        duration,
        grid.render,
    );
    step(ctx);
    ctx.emit(
        InstructionKind::Array2DElemRestyle {
            array,
            cells: cells.to_vec(),
            border_color: Some(grid.style.border_color.clone()),
            text_color: Some(grid.style.text_color.clone()),
            pointer: false,
        },
        duration,
        grid.render,
    );
}
