// Stack executor

use super::{label, mismatch, unsupported, ConstructRequest, DataStructureExecutor, MethodCall};
use crate::instructions::boundary::{BoundaryShape, ShapeKind};
use crate::instructions::InstructionKind;
use crate::interpreter::context::ExecContext;
use crate::interpreter::errors::RuntimeError;
use crate::runtime::value::{Element, ExecValue, Instance, StackRef};
use crate::types::DataStructureKind;
use std::cell::RefCell;
use std::rc::Rc;

pub struct StackExecutor;

impl DataStructureExecutor for StackExecutor {
    fn construct(
        &self,
        ctx: &mut ExecContext,
        request: ConstructRequest<'_>,
    ) -> Result<ExecValue, RuntimeError> {
        let kind = DataStructureKind::Stack.name();
        let style = ctx.styles.resolve(request.label, kind);
        let animated = ctx.styles.resolve_animated(request.label, kind);
        let boundary = ctx.register_instance(&request.uid, BoundaryShape::new(ShapeKind::Tall, 0))?;
        let render = ctx.styles.renders(&request.uid);
        let ident = ctx.names.generate("stack");
        let duration = style.creation_time.unwrap_or_else(|| ctx.default_duration());

        ctx.emit(
            InstructionKind::ConstructStack {
                ident: ident.clone(),
                uid: request.uid.clone(),
                label: label(style.show_label, request.label),
                style: style.clone(),
                boundary,
            },
            duration,
            render,
        );

        let stack = Rc::new(RefCell::new(Instance {
            uid: request.uid,
            visual: Some(ident),
            style,
            animated,
            render,
            data: Vec::new(),
        }));
        for value in request.initialiser {
            push(ctx, &stack, value);
        }
        Ok(ExecValue::Stack(stack))
    }

    fn call_method(
        &self,
        ctx: &mut ExecContext,
        call: MethodCall<'_>,
        instance: &ExecValue,
    ) -> Result<ExecValue, RuntimeError> {
        let ExecValue::Stack(stack) = instance else {
            return Err(mismatch(ctx, "stack", instance));
        };
        match call.method {
            "push" => {
                let value = call
                    .arguments
                    .into_iter()
                    .next()
                    .ok_or_else(|| unsupported(ctx, DataStructureKind::Stack, "push"))?;
                push(ctx, stack, value);
                Ok(ExecValue::Empty)
            }
            "pop" => pop(ctx, stack, &call),
            "peek" => stack
                .borrow()
                .data
                .last()
                .map(|element| element.value.clone())
                .ok_or_else(|| RuntimeError::EmptyStackPeek {
                    stack: call.variable.to_string(),
                    line: ctx.line,
                }),
            "isEmpty" => Ok(ExecValue::Bool(stack.borrow().data.is_empty())),
            "size" => Ok(ExecValue::Number(stack.borrow().data.len() as f64)),
            other => Err(unsupported(ctx, DataStructureKind::Stack, other)),
        }
    }
}

/// Push `value`, reusing its block when it was moved out of another stack
fn push(ctx: &mut ExecContext, stack: &StackRef, value: ExecValue) {
    let mut instance = stack.borrow_mut();
    let stack_ident = instance.visual.clone().unwrap_or_default();
    let duration = ctx.duration(instance.animated.as_ref());
    let render = instance.render;

    let (value, block, reused) = match value {
        ExecValue::Moved(element) if element.visual.is_some() => {
            let Element { value, visual } = *element;
            (value, visual.unwrap_or_default(), true)
        }
        other => {
            let other = other.into_plain();
            let block = ctx.names.generate("rectangle");
            let (border_color, text_color) = match &instance.animated {
                Some(animated) => (
                    animated
                        .border_color
                        .clone()
                        .unwrap_or_else(|| instance.style.border_color.clone()),
                    animated.text_color.clone(),
                ),
                None => (
                    instance.style.border_color.clone(),
                    instance.style.text_color.clone(),
                ),
            };
            ctx.emit(
                InstructionKind::CreateBlock {
                    ident: block.clone(),
                    text: other.to_string(),
                    stack: stack_ident.clone(),
                    border_color,
                    text_color,
                },
                0.0,
                render,
            );
            (other, block, false)
        }
    };

    ctx.emit(
        InstructionKind::StackPush {
            block: block.clone(),
            stack: stack_ident,
            reused,
            creation_style: instance.style.creation_style.clone(),
        },
        duration,
        render,
    );
    if instance.animated.is_some() {
        ctx.emit(
            InstructionKind::RestyleBlock {
                block: block.clone(),
                border_color: Some(instance.style.border_color.clone()),
                text_color: Some(instance.style.text_color.clone()),
            },
            duration,
            render,
        );
    }

    instance.data.push(Element {
        value,
        visual: Some(block),
    });
    let size = instance.data.len();
    tracing::trace!(stack = %instance.uid, size, reused, "push");
    ctx.reach(&instance.uid, size);
}

/// Pop the top element. A nested pop keeps its block alive and hands it to
/// the enclosing call.
fn pop(
    ctx: &mut ExecContext,
    stack: &StackRef,
    call: &MethodCall<'_>,
) -> Result<ExecValue, RuntimeError> {
    let mut instance = stack.borrow_mut();
    let element = instance.data.pop().ok_or_else(|| RuntimeError::EmptyStackPop {
        stack: call.variable.to_string(),
        line: ctx.line,
    })?;
    let block = element.visual.clone().unwrap_or_default();
    let stack_ident = instance.visual.clone().unwrap_or_default();
    let duration = ctx.duration(instance.animated.as_ref());
    let render = instance.render;

    if let Some(animated) = &instance.animated {
        ctx.emit(
            InstructionKind::RestyleBlock {
                block: block.clone(),
                border_color: animated.border_color.clone(),
                text_color: Some(animated.text_color.clone()),
            },
            duration,
            render,
        );
    }
    ctx.emit(
        InstructionKind::StackPop {
            block,
            stack: stack_ident,
            keep_block: call.nested,
        },
        duration,
        render,
    );

    Ok(match (call.as_expression, call.nested) {
        (false, _) => ExecValue::Empty,
        (true, true) => ExecValue::Moved(Box::new(element)),
        (true, false) => element.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataStructureType, Type};
    use pretty_assertions::assert_eq;

    fn new_stack(ctx: &mut ExecContext, name: &str) -> ExecValue {
        let ty = DataStructureType::new(DataStructureKind::Stack, Type::Number);
        StackExecutor
            .construct(
                ctx,
                ConstructRequest {
                    ty: &ty,
                    arguments: Vec::new(),
                    initialiser: Vec::new(),
                    rows: Vec::new(),
                    uid: name.to_string(),
                    label: name,
                },
            )
            .unwrap()
    }

    fn call<'a>(method: &'a str, arguments: Vec<ExecValue>, nested: bool) -> MethodCall<'a> {
        MethodCall {
            variable: "s",
            method,
            arguments,
            nested,
            as_expression: true,
        }
    }

    #[test]
    fn push_then_pop_returns_last_value() {
        let mut ctx = ExecContext::default();
        let s = new_stack(&mut ctx, "s");
        for n in [1.0, 2.0] {
            StackExecutor
                .call_method(&mut ctx, call("push", vec![ExecValue::Number(n)], false), &s)
                .unwrap();
        }
        let popped = StackExecutor
            .call_method(&mut ctx, call("pop", vec![], false), &s)
            .unwrap();
        assert_eq!(popped, ExecValue::Number(2.0));
        let size = StackExecutor
            .call_method(&mut ctx, call("size", vec![], false), &s)
            .unwrap();
        assert_eq!(size, ExecValue::Number(1.0));
        assert_eq!(ctx.boundaries["s"].max_size, 2);
    }

    #[test]
    fn pop_on_empty_stack_reports_line() {
        let mut ctx = ExecContext::default();
        let s = new_stack(&mut ctx, "s");
        ctx.line = 9;
        let err = StackExecutor
            .call_method(&mut ctx, call("pop", vec![], false), &s)
            .unwrap_err();
        assert_eq!(
            err,
            RuntimeError::EmptyStackPop {
                stack: "s".into(),
                line: 9
            }
        );
    }

    #[test]
    fn nested_pop_hands_block_to_push() {
        let mut ctx = ExecContext::default();
        let s1 = new_stack(&mut ctx, "s1");
        let s2 = new_stack(&mut ctx, "s2");
        StackExecutor
            .call_method(&mut ctx, call("push", vec![ExecValue::Number(7.0)], false), &s1)
            .unwrap();
        let moved = StackExecutor
            .call_method(&mut ctx, call("pop", vec![], true), &s1)
            .unwrap();
        assert_eq!(moved.visual().as_deref(), Some("rectangle1"));
        StackExecutor
            .call_method(&mut ctx, call("push", vec![moved], false), &s2)
            .unwrap();

        let last = ctx.instructions.iter().last().unwrap();
        assert_eq!(
            last.kind,
            InstructionKind::StackPush {
                block: "rectangle1".into(),
                stack: "stack2".into(),
                reused: true,
                creation_style: "FadeIn".into(),
            }
        );
        let creates = ctx
            .instructions
            .iter()
            .filter(|i| matches!(i.kind, InstructionKind::CreateBlock { .. }))
            .count();
        assert_eq!(creates, 1);
    }
}
