//! Binary tree and node executor
//!
//! Nodes exist on their own until attached to a tree. A node records the
//! tree it is drawn in through a weak handle, so structural edits know
//! whether to animate: edits below a detached node are recorded as hidden
//! steps, edits below an attached node are drawn in that tree.
//!
//! Before a child is attached to a drawn tree the tree's bounds are checked
//! with the new node count, immediately ahead of the append itself.

use super::{
    label, mismatch, unsupported, Accessor, ConstructRequest, DataStructureExecutor, MethodCall,
};
use crate::ast::NodeField;
use crate::instructions::boundary::{BoundaryShape, ShapeKind};
use crate::instructions::{InstructionKind, Side};
use crate::interpreter::context::ExecContext;
use crate::interpreter::errors::RuntimeError;
use crate::runtime::value::{
    subtree_contains, subtree_size, ExecValue, Instance, NodeData, NodeRef, TreeRef,
};
use crate::types::DataStructureKind;
use std::cell::RefCell;
use std::rc::Rc;

pub struct TreeExecutor;

impl DataStructureExecutor for TreeExecutor {
    fn construct(
        &self,
        ctx: &mut ExecContext,
        request: ConstructRequest<'_>,
    ) -> Result<ExecValue, RuntimeError> {
        let first = request
            .arguments
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_plain();

        if request.ty.kind == DataStructureKind::Node {
            let ident = ctx.names.generate("node");
            let render = ctx.styles.renders(&request.uid);
            ctx.emit(
                InstructionKind::ConstructNode {
                    ident: ident.clone(),
                    value: first.to_string(),
                },
                0.0,
                render,
            );
            return Ok(ExecValue::Node(Rc::new(RefCell::new(NodeData::new(first, ident)))));
        }

        let root = match first {
            ExecValue::Node(root) => root,
            other => return Err(mismatch(ctx, "node", &other)),
        };
        if root.borrow().attached_tree().is_some() {
            return Err(RuntimeError::NodeAlreadyAttached { line: ctx.line });
        }

        let kind = DataStructureKind::Tree.name();
        let style = ctx.styles.resolve(request.label, kind);
        let animated = ctx.styles.resolve_animated(request.label, kind);
        let size = subtree_size(&root);
        let shape = BoundaryShape::new(ShapeKind::Square, size);
        let boundary = ctx.register_instance(&request.uid, shape)?;
        let render = ctx.styles.renders(&request.uid);
        let ident = ctx.names.generate("tree");
        let duration = style.creation_time.unwrap_or_else(|| ctx.default_duration());

        ctx.emit(
            InstructionKind::ConstructTree {
                ident: ident.clone(),
                uid: request.uid.clone(),
                label: label(style.show_label, request.label),
                root: root.borrow().visual.clone().unwrap_or_default(),
                style: style.clone(),
                boundary,
            },
            duration,
            render,
        );

        let tree = Rc::new(RefCell::new(Instance {
            uid: request.uid,
            visual: Some(ident),
            style,
            animated,
            render,
            data: Rc::clone(&root),
        }));
        attach(&root, Some(&tree), 0);
        Ok(ExecValue::Tree(tree))
    }

    fn call_method(
        &self,
        ctx: &mut ExecContext,
        call: MethodCall<'_>,
        instance: &ExecValue,
    ) -> Result<ExecValue, RuntimeError> {
        let (from_root, field) = match (instance, call.method) {
            (ExecValue::Tree(_), "root") => (true, None),
            (ExecValue::Node(_), "left") => (false, Some(NodeField::Left)),
            (ExecValue::Node(_), "right") => (false, Some(NodeField::Right)),
            (ExecValue::Node(_), "value") => (false, Some(NodeField::Value)),
            (ExecValue::Tree(_), other) => {
                return Err(unsupported(ctx, DataStructureKind::Tree, other))
            }
            (_, other) => return Err(unsupported(ctx, DataStructureKind::Node, other)),
        };
        let chain: Vec<NodeField> = field.into_iter().collect();
        self.read(ctx, instance, Accessor::Chain { from_root, chain: &chain })
    }

    fn read(
        &self,
        ctx: &mut ExecContext,
        instance: &ExecValue,
        accessor: Accessor<'_>,
    ) -> Result<ExecValue, RuntimeError> {
        let (start, chain) = chain_start(ctx, instance, accessor)?;
        let Some((last, path)) = chain.split_last() else {
            return Ok(ExecValue::Node(start));
        };
        let node = walk(ctx, start, path)?;

        let value = match last {
            NodeField::Left => child_value(node.borrow().left.clone()),
            NodeField::Right => child_value(node.borrow().right.clone()),
            NodeField::Value => {
                highlight(ctx, &node, |_| {});
                node.borrow().value.clone()
            }
        };
        Ok(value)
    }

    fn write(
        &self,
        ctx: &mut ExecContext,
        instance: &ExecValue,
        accessor: Accessor<'_>,
        value: ExecValue,
    ) -> Result<(), RuntimeError> {
        let (start, chain) = chain_start(ctx, instance, accessor)?;
        let Some((last, path)) = chain.split_last() else {
            return Err(mismatch(ctx, "node field", instance));
        };
        let node = walk(ctx, start, path)?;

        match (last, value.into_plain()) {
            (NodeField::Value, value) => {
                edit_value(ctx, &node, value);
                Ok(())
            }
            (field, ExecValue::Null) => {
                delete_child(ctx, &node, side_of(*field));
                Ok(())
            }
            (field, ExecValue::Node(child)) => append_child(ctx, &node, child, side_of(*field)),
            (_, other) => Err(mismatch(ctx, "node or null", &other)),
        }
    }
}

/// A child slot read as a value; empty slots read as null
fn child_value(child: Option<NodeRef>) -> ExecValue {
    child.map_or(ExecValue::Null, ExecValue::Node)
}

fn side_of(field: NodeField) -> Side {
    match field {
        NodeField::Right => Side::Right,
        _ => Side::Left,
    }
}

/// Node an access chain starts from, and the chain to follow
fn chain_start<'a>(
    ctx: &ExecContext,
    instance: &ExecValue,
    accessor: Accessor<'a>,
) -> Result<(NodeRef, &'a [NodeField]), RuntimeError> {
    let Accessor::Chain { from_root, chain } = accessor else {
        return Err(mismatch(ctx, "node access", instance));
    };
    match (instance, from_root) {
        (ExecValue::Tree(tree), true) => Ok((Rc::clone(&tree.borrow().data), chain)),
        (ExecValue::Node(node), false) => Ok((Rc::clone(node), chain)),
        (other, _) => Err(mismatch(ctx, "tree or node", other)),
    }
}

/// Follow child links; every link on the path must exist
fn walk(ctx: &ExecContext, start: NodeRef, path: &[NodeField]) -> Result<NodeRef, RuntimeError> {
    let mut node = start;
    for field in path {
        let next = match field {
            NodeField::Left => node.borrow().left.clone(),
            NodeField::Right => node.borrow().right.clone(),
            NodeField::Value => return Err(mismatch(ctx, "node", &node.borrow().value)),
        };
        node = next.ok_or(RuntimeError::MissingChild { line: ctx.line })?;
    }
    Ok(node)
}

fn child_slot(node: &mut NodeData, side: Side) -> &mut Option<NodeRef> {
    match side {
        Side::Left => &mut node.left,
        Side::Right => &mut node.right,
    }
}

/// Set the tree and depth of every node in a subtree
fn attach(node: &NodeRef, tree: Option<&TreeRef>, depth: usize) {
    let (left, right) = {
        let mut data = node.borrow_mut();
        data.tree = tree.map(Rc::downgrade);
        data.depth = depth;
        (data.left.clone(), data.right.clone())
    };
    for child in [left, right].into_iter().flatten() {
        attach(&child, tree, depth + 1);
    }
}

fn ident(node: &NodeRef) -> String {
    node.borrow().visual.clone().unwrap_or_default()
}

/// Tree identifier and render flag for instructions about `node`; detached
/// nodes produce hidden steps
fn drawn_in(node: &NodeRef) -> (Option<TreeRef>, String, bool) {
    match node.borrow().attached_tree() {
        Some(tree) => {
            let (visual, render) = {
                let borrowed = tree.borrow();
                (borrowed.visual.clone().unwrap_or_default(), borrowed.render)
            };
            (Some(tree), visual, render)
        }
        None => (None, String::new(), false),
    }
}

/// Run `step` between restyling `node` to its tree's animated colours and back
fn highlight<F>(ctx: &mut ExecContext, node: &NodeRef, step: F)
where
    F: FnOnce(&mut ExecContext),
{
    let Some(tree) = node.borrow().attached_tree() else {
        step(ctx);
        return;
    };
    let tree = tree.borrow();
    let Some(animated) = &tree.animated else {
        step(ctx);
        return;
    };
    let duration = ctx.duration(Some(animated));
    ctx.emit(
        InstructionKind::TreeNodeRestyle {
            node: ident(node),
            border_color: animated.border_color.clone(),
            text_color: Some(animated.text_color.clone()),
            highlight: Some(animated.highlight.clone()),
        },
        duration,
        tree.render,
    );
    step(ctx);
    ctx.emit(
        InstructionKind::TreeNodeRestyle {
            node: ident(node),
            border_color: Some(tree.style.border_color.clone()),
            text_color: Some(tree.style.text_color.clone()),
            highlight: None,
        },
        duration,
        tree.render,
    );
}

fn edit_value(ctx: &mut ExecContext, node: &NodeRef, value: ExecValue) {
    let (tree, tree_ident, render) = drawn_in(node);
    let duration = ctx.duration(tree.as_ref().and_then(|t| t.borrow().animated.clone()).as_ref());
    let step = InstructionKind::TreeEditValue {
        tree: tree_ident,
        node: ident(node),
        value: value.to_string(),
    };
    node.borrow_mut().value = value;
    highlight(ctx, node, |ctx| ctx.emit(step, duration, render));
}

fn delete_child(ctx: &mut ExecContext, parent: &NodeRef, side: Side) {
    let Some(child) = child_slot(&mut parent.borrow_mut(), side).take() else {
        return;
    };
    attach(&child, None, 0);
    let (tree, tree_ident, render) = drawn_in(parent);
    let duration = ctx.duration(tree.as_ref().and_then(|t| t.borrow().animated.clone()).as_ref());
    ctx.emit(
        InstructionKind::TreeDeleteChild {
            tree: tree_ident,
            parent: ident(parent),
            side,
        },
        duration,
        render,
    );
}

fn append_child(
    ctx: &mut ExecContext,
    parent: &NodeRef,
    child: NodeRef,
    side: Side,
) -> Result<(), RuntimeError> {
    if subtree_contains(&child, parent) {
        return Err(RuntimeError::SelfReference { line: ctx.line });
    }
    if let Some(owner) = child.borrow().attached_tree() {
        let same_tree = parent
            .borrow()
            .attached_tree()
            .is_some_and(|tree| Rc::ptr_eq(&tree, &owner));
        return Err(if same_tree {
            RuntimeError::SelfReference { line: ctx.line }
        } else {
            RuntimeError::NodeAlreadyAttached { line: ctx.line }
        });
    }

    delete_child(ctx, parent, side);
    *child_slot(&mut parent.borrow_mut(), side) = Some(Rc::clone(&child));

    let depth = parent.borrow().depth + 1;
    let (tree, tree_ident, render) = drawn_in(parent);
    let Some(tree) = tree else {
        attach(&child, None, depth);
        ctx.emit(
            InstructionKind::NodeAppend {
                parent: ident(parent),
                child: ident(&child),
                side,
            },
            0.0,
            false,
        );
        return Ok(());
    };

    attach(&child, Some(&tree), depth);
    let (uid, size, duration) = {
        let borrowed = tree.borrow();
        (
            borrowed.uid.clone(),
            subtree_size(&borrowed.data),
            ctx.duration(borrowed.animated.as_ref()),
        )
    };
    tracing::trace!(tree = %uid, size, ?side, "node appended");
    ctx.reach(&uid, size);
    highlight(ctx, parent, |ctx| {
        ctx.emit(
            InstructionKind::CheckBoundary {
                tree: tree_ident.clone(),
                uid,
                size,
            },
            0.0,
            render,
        );
        ctx.emit(
            InstructionKind::TreeAppend {
                tree: tree_ident,
                parent: ident(parent),
                child: ident(&child),
                side,
            },
            duration,
            render,
        );
    });
    Ok(())
}
