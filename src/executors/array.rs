//! Array and list executor
//!
//! Arrays have a fixed size given at construction, either explicitly or by
//! their initial values; lists start from their initial values and grow with
//! `append` and `prepend`. Both are drawn as one horizontal row of cells.
//!
//! Element access is only animated for instances with an animated style:
//! the touched cells are restyled to the animated colours for one step and
//! then restored. Two-dimensional arrays are handled by [`super::array_2d`].

use super::{
    array_2d, label, mismatch, unsupported, Accessor, ConstructRequest, DataStructureExecutor,
    MethodCall,
};
use crate::instructions::boundary::{BoundaryShape, ShapeKind};
use crate::instructions::InstructionKind;
use crate::interpreter::constants::MAX_ARRAY_SIZE;
use crate::interpreter::context::ExecContext;
use crate::interpreter::errors::RuntimeError;
use crate::runtime::value::{ArrayRef, ExecValue, Instance};
use crate::types::{DataStructureKind, Type};
use std::cell::RefCell;
use std::rc::Rc;

pub struct ArrayExecutor;

impl DataStructureExecutor for ArrayExecutor {
    fn construct(
        &self,
        ctx: &mut ExecContext,
        request: ConstructRequest<'_>,
    ) -> Result<ExecValue, RuntimeError> {
        if request.ty.is_2d() {
            return array_2d::construct(ctx, request);
        }
        let kind = request.ty.kind;
        let values = match kind {
            DataStructureKind::Array => array_values(ctx, &request)?,
            _ => request
                .arguments
                .iter()
                .chain(&request.initialiser)
                .cloned()
                .map(ExecValue::into_plain)
                .collect(),
        };

        let style = ctx.styles.resolve(request.label, kind.name());
        let animated = ctx.styles.resolve_animated(request.label, kind.name());
        let shape = BoundaryShape::new(ShapeKind::Wide, values.len());
        let boundary = ctx.register_instance(&request.uid, shape)?;
        let render = ctx.styles.renders(&request.uid);
        let prefix = if kind == DataStructureKind::List { "list" } else { "array" };
        let ident = ctx.names.generate(prefix);
        let duration = style.creation_time.unwrap_or_else(|| ctx.default_duration());

        ctx.emit(
            InstructionKind::ConstructArray {
                ident: ident.clone(),
                uid: request.uid.clone(),
                label: label(style.show_label, request.label),
                values: values.iter().map(ToString::to_string).collect(),
                style: style.clone(),
                boundary,
            },
            duration,
            render,
        );

        let array = Rc::new(RefCell::new(Instance {
            uid: request.uid,
            visual: Some(ident),
            style,
            animated,
            render,
            data: values,
        }));
        Ok(match kind {
            DataStructureKind::List => ExecValue::List(array),
            _ => ExecValue::Array(array),
        })
    }

    fn call_method(
        &self,
        ctx: &mut ExecContext,
        call: MethodCall<'_>,
        instance: &ExecValue,
    ) -> Result<ExecValue, RuntimeError> {
        let (kind, array) = match instance {
            ExecValue::Array2D(grid) => return array_2d::call_method(ctx, call, grid),
            ExecValue::Array(array) => (DataStructureKind::Array, array),
            ExecValue::List(array) => (DataStructureKind::List, array),
            other => return Err(mismatch(ctx, "array or list", other)),
        };
        let mut arguments = call.arguments.into_iter().map(ExecValue::into_plain);

        match (kind, call.method) {
            (_, "size") => Ok(ExecValue::Number(array.borrow().data.len() as f64)),
            (_, "contains") => {
                let needle = arguments.next().unwrap_or_default();
                Ok(ExecValue::Bool(array.borrow().data.contains(&needle)))
            }
            (DataStructureKind::Array, "swap") => {
                let first = arguments.next().unwrap_or_default();
                let second = arguments.next().unwrap_or_default();
                let fade = arguments.next().and_then(|v| v.as_bool()).unwrap_or(false);
                swap(ctx, array, &first, &second, fade)?;
                Ok(ExecValue::Empty)
            }
            (DataStructureKind::List, method @ ("append" | "prepend")) => {
                let value = arguments.next().unwrap_or_default();
                let mut instance = array.borrow_mut();
                if method == "append" {
                    instance.data.push(value);
                } else {
                    instance.data.insert(0, value);
                }
                let size = instance.data.len();
                tracing::trace!(list = %instance.uid, size, method, "list resized");
                let duration = ctx.duration(instance.animated.as_ref());
                ctx.emit(
                    InstructionKind::ArrayRerender {
                        array: instance.visual.clone().unwrap_or_default(),
                        values: instance.data.iter().map(ToString::to_string).collect(),
                    },
                    duration,
                    instance.render,
                );
                ctx.reach(&instance.uid, size);
                Ok(ExecValue::Empty)
            }
            (kind, other) => Err(unsupported(ctx, kind, other)),
        }
    }

    fn read(
        &self,
        ctx: &mut ExecContext,
        instance: &ExecValue,
        accessor: Accessor<'_>,
    ) -> Result<ExecValue, RuntimeError> {
        if let ExecValue::Array2D(grid) = instance {
            return array_2d::read(ctx, grid, accessor);
        }
        let array = shared(ctx, instance)?;
        let Accessor::Index(index) = accessor else {
            return Err(mismatch(ctx, "index", instance));
        };
        let borrowed = array.borrow();
        let index = element_index(ctx, index, borrowed.data.len())?;
        highlight(ctx, &borrowed, &[index], |_| {});
        Ok(borrowed.data[index].clone())
    }

    fn write(
        &self,
        ctx: &mut ExecContext,
        instance: &ExecValue,
        accessor: Accessor<'_>,
        value: ExecValue,
    ) -> Result<(), RuntimeError> {
        if let ExecValue::Array2D(grid) = instance {
            return array_2d::write(ctx, grid, accessor, value);
        }
        let array = shared(ctx, instance)?;
        let Accessor::Index(index) = accessor else {
            return Err(mismatch(ctx, "index", instance));
        };
        let value = value.into_plain();
        let index = element_index(ctx, index, array.borrow().data.len())?;

        let assign = InstructionKind::ArrayElemAssign {
            array: array.borrow().visual.clone().unwrap_or_default(),
            index,
            value: value.to_string(),
        };
        array.borrow_mut().data[index] = value;
        let borrowed = array.borrow();
        let duration = ctx.duration(borrowed.animated.as_ref());
        let render = borrowed.render;
        highlight(ctx, &borrowed, &[index], |ctx| ctx.emit(assign, duration, render));
        Ok(())
    }
}

fn shared<'v>(ctx: &ExecContext, instance: &'v ExecValue) -> Result<&'v ArrayRef, RuntimeError> {
    match instance {
        ExecValue::Array(array) | ExecValue::List(array) => Ok(array),
        other => Err(mismatch(ctx, "array or list", other)),
    }
}

/// Initial values of a fixed-size array
fn array_values(
    ctx: &ExecContext,
    request: &ConstructRequest<'_>,
) -> Result<Vec<ExecValue>, RuntimeError> {
    let initial: Vec<ExecValue> = request
        .initialiser
        .iter()
        .cloned()
        .map(ExecValue::into_plain)
        .collect();
    let Some(declared) = request.arguments.first().and_then(ExecValue::as_number) else {
        return Ok(initial);
    };
    let size = declared_size(ctx, declared)?;
    if initial.is_empty() {
        return Ok(vec![default_value(request.ty.element()); size]);
    }
    if initial.len() != size {
        return Err(RuntimeError::ArrayInitialiser {
            expected: size,
            found: initial.len(),
            line: ctx.line,
        });
    }
    Ok(initial)
}

/// A size given to an array constructor, within [`MAX_ARRAY_SIZE`]
pub(crate) fn declared_size(ctx: &ExecContext, declared: f64) -> Result<usize, RuntimeError> {
    if declared < 0.0 || declared.fract() != 0.0 || declared > MAX_ARRAY_SIZE as f64 {
        return Err(RuntimeError::InvalidArraySize {
            size: declared,
            line: ctx.line,
        });
    }
    Ok(declared as usize)
}

/// Value of an array cell that was never assigned
pub fn default_value(ty: &Type) -> ExecValue {
    match ty {
        Type::Number => ExecValue::Number(0.0),
        Type::Bool => ExecValue::Bool(false),
        Type::Char => ExecValue::Char(' '),
        Type::String => ExecValue::String(String::new()),
        _ => ExecValue::Null,
    }
}

/// Position addressed by `index` in a sequence of `size` elements
pub(crate) fn element_index(
    ctx: &ExecContext,
    index: &ExecValue,
    size: usize,
) -> Result<usize, RuntimeError> {
    let raw = index
        .as_number()
        .ok_or_else(|| mismatch(ctx, "number", index))?;
    if raw < 0.0 || raw.fract() != 0.0 {
        return Err(RuntimeError::InvalidIndex {
            index: raw,
            line: ctx.line,
        });
    }
    let position = raw as usize;
    if position >= size {
        return Err(RuntimeError::IndexOutOfBounds {
            index: position,
            size,
            line: ctx.line,
        });
    }
    Ok(position)
}

fn swap(
    ctx: &mut ExecContext,
    array: &ArrayRef,
    first: &ExecValue,
    second: &ExecValue,
    fade: bool,
) -> Result<(), RuntimeError> {
    let size = array.borrow().data.len();
    let first = element_index(ctx, first, size)?;
    let second = element_index(ctx, second, size)?;
    array.borrow_mut().data.swap(first, second);

    let borrowed = array.borrow();
    let exchange = InstructionKind::ArraySwap {
        array: borrowed.visual.clone().unwrap_or_default(),
        first,
        second,
        fade,
    };
    let duration = ctx.duration(borrowed.animated.as_ref());
    let render = borrowed.render;
    highlight(ctx, &borrowed, &[first, second], |ctx| {
        ctx.emit(exchange, duration, render)
    });
    Ok(())
}

/// Run `step` between restyling `indices` to the animated colours and back.
/// Instances without an animated style only run `step`.
fn highlight<F>(
    ctx: &mut ExecContext,
    instance: &Instance<Vec<ExecValue>>,
    indices: &[usize],
    step: F,
) where
    F: FnOnce(&mut ExecContext),
{
    let Some(animated) = &instance.animated else {
        step(ctx);
        return;
    };
    let array = instance.visual.clone().unwrap_or_default();
    let duration = ctx.duration(Some(animated));

    ctx.emit(
        InstructionKind::ArrayElemRestyle {
            array: array.clone(),
            indices: indices.to_vec(),
            border_color: animated.border_color.clone(),
            text_color: Some(animated.text_color.clone()),
            pointer: animated.pointer,
        },
        duration,
        instance.render,
    );
    step(ctx);
    ctx.emit(
        InstructionKind::ArrayElemRestyle {
            array,
            indices: indices.to_vec(),
            border_color: Some(instance.style.border_color.clone()),
            text_color: Some(instance.style.text_color.clone()),
            pointer: false,
        },
        duration,
        instance.render,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{AnimatedStyle, StyleConfig, StyleRecord, StyleResolver};
    use crate::types::DataStructureType;
    use pretty_assertions::assert_eq;
    use rustc_hash::FxHashSet;

    fn construct(
        ctx: &mut ExecContext,
        kind: DataStructureKind,
        arguments: Vec<ExecValue>,
        initialiser: Vec<ExecValue>,
    ) -> Result<ExecValue, RuntimeError> {
        let ty = DataStructureType::new(kind, Type::Number);
        ArrayExecutor.construct(
            ctx,
            ConstructRequest {
                ty: &ty,
                arguments,
                initialiser,
                rows: vec![],
                uid: "a".into(),
                label: "a",
            },
        )
    }

    fn numbers(values: &[f64]) -> Vec<ExecValue> {
        values.iter().map(|n| ExecValue::Number(*n)).collect()
    }

    fn method<'a>(method: &'a str, arguments: Vec<ExecValue>) -> MethodCall<'a> {
        MethodCall {
            variable: "a",
            method,
            arguments,
            nested: false,
            as_expression: true,
        }
    }

    #[test]
    fn sized_array_without_values_uses_defaults() {
        let mut ctx = ExecContext::default();
        let array = construct(&mut ctx, DataStructureKind::Array, numbers(&[3.0]), vec![])
            .unwrap();
        assert_eq!(array.to_string(), "[0, 0, 0]");
        assert_eq!(ctx.boundaries["a"].max_size, 3);
    }

    #[test]
    fn size_and_initialiser_must_agree() {
        let mut ctx = ExecContext::default();
        ctx.line = 2;
        let err = construct(
            &mut ctx,
            DataStructureKind::Array,
            numbers(&[2.0]),
            numbers(&[1.0, 2.0, 3.0]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RuntimeError::ArrayInitialiser {
                expected: 2,
                found: 3,
                line: 2
            }
        );
    }

    #[test]
    fn negative_size_is_rejected() {
        let mut ctx = ExecContext::default();
        let err = construct(&mut ctx, DataStructureKind::Array, numbers(&[-1.0]), vec![])
            .unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArraySize { .. }));
    }

    #[test]
    fn oversized_array_is_rejected_before_allocation() {
        let mut ctx = ExecContext::default();
        ctx.line = 4;
        let err = construct(&mut ctx, DataStructureKind::Array, numbers(&[1e18]), vec![])
            .unwrap_err();
        assert_eq!(err, RuntimeError::InvalidArraySize { size: 1e18, line: 4 });
        assert!(ctx.instructions.is_empty());

        let limit = MAX_ARRAY_SIZE as f64;
        let at_limit = construct(&mut ctx, DataStructureKind::Array, numbers(&[limit]), vec![]);
        assert!(at_limit.is_ok());
    }

    #[test]
    fn out_of_bounds_read_reports_index_and_size() {
        let mut ctx = ExecContext::default();
        let array = construct(&mut ctx, DataStructureKind::Array, vec![], numbers(&[1.0, 2.0]))
            .unwrap();
        ctx.line = 5;
        let err = ArrayExecutor
            .read(&mut ctx, &array, Accessor::Index(&ExecValue::Number(2.0)))
            .unwrap_err();
        assert_eq!(
            err,
            RuntimeError::IndexOutOfBounds {
                index: 2,
                size: 2,
                line: 5
            }
        );
    }

    #[test]
    fn swap_exchanges_elements() {
        let mut ctx = ExecContext::default();
        let values = numbers(&[1.0, 2.0, 3.0]);
        let array = construct(&mut ctx, DataStructureKind::Array, vec![], values).unwrap();
        ArrayExecutor
            .call_method(&mut ctx, method("swap", numbers(&[0.0, 2.0])), &array)
            .unwrap();
        assert_eq!(array.to_string(), "[3, 2, 1]");
        assert!(matches!(
            ctx.instructions.iter().last().map(|i| &i.kind),
            Some(InstructionKind::ArraySwap { first: 0, second: 2, fade: false, .. })
        ));
    }

    #[test]
    fn list_grows_at_both_ends() {
        let mut ctx = ExecContext::default();
        let list = construct(&mut ctx, DataStructureKind::List, vec![], numbers(&[2.0])).unwrap();
        ArrayExecutor
            .call_method(&mut ctx, method("append", numbers(&[3.0])), &list)
            .unwrap();
        ArrayExecutor
            .call_method(&mut ctx, method("prepend", numbers(&[1.0])), &list)
            .unwrap();
        assert_eq!(list.to_string(), "List[1, 2, 3]");
        assert_eq!(ctx.boundaries["a"].max_size, 3);
    }

    #[test]
    fn animated_write_is_wrapped_in_restyles() {
        let mut config = StyleConfig::default();
        config.variables.insert(
            "a".into(),
            StyleRecord {
                animate: Some(AnimatedStyle::default()),
                ..Default::default()
            },
        );
        let mut ctx = ExecContext::new(StyleResolver::new(config), FxHashSet::default());
        let array = construct(&mut ctx, DataStructureKind::Array, vec![], numbers(&[1.0, 2.0]))
            .unwrap();
        let index = ExecValue::Number(1.0);
        ArrayExecutor
            .write(&mut ctx, &array, Accessor::Index(&index), ExecValue::Number(9.0))
            .unwrap();

        let kinds: Vec<&InstructionKind> =
            ctx.instructions.iter().skip(1).map(|i| &i.kind).collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[0], InstructionKind::ArrayElemRestyle { pointer: true, .. }));
        assert!(matches!(kinds[1], InstructionKind::ArrayElemAssign { index: 1, .. }));
        assert!(matches!(kinds[2], InstructionKind::ArrayElemRestyle { pointer: false, .. }));
        assert_eq!(array.to_string(), "[1, 9]");
    }
}
