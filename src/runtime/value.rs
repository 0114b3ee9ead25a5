//! Runtime value representation
//!
//! This module defines [`ExecValue`], the tagged value the virtual machine
//! passes around. Primitives are stored inline. Containers are shared
//! handles ([`Shared`]), so passing one to a function clones the handle and
//! callee and caller operate on the same on-screen object.
//!
//! # Visual identity
//!
//! Every container records the identifier of the visual object drawing it
//! (`None` until first rendered), its resolved styles and its render flag.
//! Values held inside a container carry their own identifier, independent of
//! the container's; see [`Element`].

use crate::style::{ResolvedAnimation, ResolvedStyle};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

pub type Shared<T> = Rc<RefCell<T>>;

/// A value stored in a container together with the block drawing it
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub value: ExecValue,
    pub visual: Option<String>,
}

/// State common to every data-structure instance
#[derive(Debug, Clone)]
pub struct Instance<T> {
    /// Frame prefix plus variable name; keys positions and boundaries
    pub uid: String,
    pub visual: Option<String>,
    pub style: ResolvedStyle,
    pub animated: Option<ResolvedAnimation>,
    pub render: bool,
    pub data: T,
}

pub type StackRef = Shared<Instance<Vec<Element>>>;
pub type ArrayRef = Shared<Instance<Vec<ExecValue>>>;
/// Rows of equal length
pub type Array2DRef = Shared<Instance<Vec<Vec<ExecValue>>>>;
pub type TreeRef = Shared<Instance<NodeRef>>;
pub type NodeRef = Shared<NodeData>;

/// One binary-tree node
#[derive(Debug)]
pub struct NodeData {
    pub value: ExecValue,
    pub visual: Option<String>,
    pub left: Option<NodeRef>,
    pub right: Option<NodeRef>,
    pub depth: usize,
    /// Tree this node is currently drawn in
    pub tree: Option<Weak<RefCell<Instance<NodeRef>>>>,
}

impl NodeData {
    pub fn new(value: ExecValue, visual: String) -> Self {
        NodeData {
            value,
            visual: Some(visual),
            left: None,
            right: None,
            depth: 0,
            tree: None,
        }
    }

    pub fn attached_tree(&self) -> Option<TreeRef> {
        self.tree.as_ref().and_then(Weak::upgrade)
    }
}

/// Number of nodes in the subtree rooted at `node`
pub fn subtree_size(node: &NodeRef) -> usize {
    let node = node.borrow();
    1 + node.left.as_ref().map_or(0, subtree_size) + node.right.as_ref().map_or(0, subtree_size)
}

/// Whether `needle` is `root` or one of its descendants
pub fn subtree_contains(root: &NodeRef, needle: &NodeRef) -> bool {
    if Rc::ptr_eq(root, needle) {
        return true;
    }
    let root = root.borrow();
    root.left.as_ref().is_some_and(|l| subtree_contains(l, needle))
        || root.right.as_ref().is_some_and(|r| subtree_contains(r, needle))
}

/// Runtime values in the interpreter
#[derive(Debug, Clone, Default)]
pub enum ExecValue {
    Number(f64),
    Bool(bool),
    Char(char),
    String(String),
    Null,
    Stack(StackRef),
    Array(ArrayRef),
    List(ArrayRef),
    Array2D(Array2DRef),
    Tree(TreeRef),
    Node(NodeRef),
    /// A primitive taken out of a container while its block stays on screen,
    /// so the receiving call can reuse the block
    Moved(Box<Element>),
    /// Result of a statement-level call, or an unset slot
    #[default]
    Empty,
}

impl ExecValue {
    /// Drop any attached visual block
    pub fn into_plain(self) -> ExecValue {
        match self {
            ExecValue::Moved(element) => element.value,
            other => other,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ExecValue::Number(n) => Some(*n),
            ExecValue::Char(c) => Some(*c as u32 as f64),
            ExecValue::Moved(element) => element.value.as_number(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExecValue::Bool(b) => Some(*b),
            ExecValue::Moved(element) => element.value.as_bool(),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ExecValue::Number(_) | ExecValue::Bool(_) | ExecValue::Char(_) | ExecValue::String(_)
        )
    }

    /// Visual object of a container, if it has been drawn
    pub fn visual(&self) -> Option<String> {
        match self {
            ExecValue::Stack(s) => s.borrow().visual.clone(),
            ExecValue::Array(a) | ExecValue::List(a) => a.borrow().visual.clone(),
            ExecValue::Array2D(g) => g.borrow().visual.clone(),
            ExecValue::Tree(t) => t.borrow().visual.clone(),
            ExecValue::Node(n) => n.borrow().visual.clone(),
            ExecValue::Moved(element) => element.visual.clone(),
            _ => None,
        }
    }

    /// Render flag of a container; primitives never render on their own
    pub fn renders(&self) -> bool {
        match self {
            ExecValue::Stack(s) => s.borrow().render,
            ExecValue::Array(a) | ExecValue::List(a) => a.borrow().render,
            ExecValue::Array2D(g) => g.borrow().render,
            ExecValue::Tree(t) => t.borrow().render,
            _ => false,
        }
    }

    /// Shown in the variable table: primitives and hidden containers
    pub fn is_displayable(&self) -> bool {
        let hidden_container = matches!(
            self,
            ExecValue::Stack(_)
                | ExecValue::Array(_)
                | ExecValue::List(_)
                | ExecValue::Array2D(_)
                | ExecValue::Tree(_)
        ) && !self.renders();
        self.is_primitive() || hidden_container
    }
}

impl PartialEq for ExecValue {
    /// Primitives compare by value, containers by identity
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ExecValue::Moved(a), b) => a.value == *b,
            (a, ExecValue::Moved(b)) => *a == b.value,
            (ExecValue::Number(a), ExecValue::Number(b)) => a == b,
            (ExecValue::Bool(a), ExecValue::Bool(b)) => a == b,
            (ExecValue::Char(a), ExecValue::Char(b)) => a == b,
            (ExecValue::String(a), ExecValue::String(b)) => a == b,
            (ExecValue::Null, ExecValue::Null) | (ExecValue::Empty, ExecValue::Empty) => true,
            (ExecValue::Stack(a), ExecValue::Stack(b)) => Rc::ptr_eq(a, b),
            (ExecValue::Array(a), ExecValue::Array(b))
            | (ExecValue::List(a), ExecValue::List(b)) => Rc::ptr_eq(a, b),
            (ExecValue::Array2D(a), ExecValue::Array2D(b)) => Rc::ptr_eq(a, b),
            (ExecValue::Tree(a), ExecValue::Tree(b)) => Rc::ptr_eq(a, b),
            (ExecValue::Node(a), ExecValue::Node(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn join(values: &[ExecValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for ExecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecValue::Number(n) => write!(f, "{n}"),
            ExecValue::Bool(b) => write!(f, "{b}"),
            ExecValue::Char(c) => write!(f, "{c}"),
            ExecValue::String(s) => write!(f, "{s}"),
            ExecValue::Null => write!(f, "null"),
            ExecValue::Stack(s) => {
                let stack = s.borrow();
                let values: Vec<ExecValue> = stack.data.iter().map(|e| e.value.clone()).collect();
                write!(f, "Stack[{}]", join(&values))
            }
            ExecValue::Array(a) => write!(f, "[{}]", join(&a.borrow().data)),
            ExecValue::List(a) => write!(f, "List[{}]", join(&a.borrow().data)),
            ExecValue::Array2D(g) => {
                let rows: Vec<String> = g
                    .borrow()
                    .data
                    .iter()
                    .map(|row| format!("[{}]", join(row)))
                    .collect();
                write!(f, "[{}]", rows.join(", "))
            }
            ExecValue::Tree(t) => write!(f, "Tree({})", t.borrow().data.borrow().value),
            ExecValue::Node(n) => write!(f, "Node({})", n.borrow().value),
            ExecValue::Moved(element) => write!(f, "{}", element.value),
            ExecValue::Empty => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(value: f64, visual: &str) -> NodeRef {
        Rc::new(RefCell::new(NodeData::new(ExecValue::Number(value), visual.into())))
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(ExecValue::Number(3.0).to_string(), "3");
        assert_eq!(ExecValue::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn moved_values_compare_by_content() {
        let moved = ExecValue::Moved(Box::new(Element {
            value: ExecValue::Number(4.0),
            visual: Some("rectangle1".into()),
        }));
        assert_eq!(moved, ExecValue::Number(4.0));
        assert_eq!(moved.visual().as_deref(), Some("rectangle1"));
        assert_eq!(moved.into_plain().visual(), None);
    }

    #[test]
    fn nodes_compare_by_identity() {
        let a = node(1.0, "node1");
        let b = node(1.0, "node2");
        assert_eq!(ExecValue::Node(a.clone()), ExecValue::Node(a.clone()));
        assert_ne!(ExecValue::Node(a), ExecValue::Node(b));
    }

    #[test]
    fn subtree_queries() {
        let root = node(1.0, "node1");
        let left = node(2.0, "node2");
        let stray = node(3.0, "node3");
        root.borrow_mut().left = Some(left.clone());
        assert_eq!(subtree_size(&root), 2);
        assert!(subtree_contains(&root, &left));
        assert!(!subtree_contains(&root, &stray));
    }
}
