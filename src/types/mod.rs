//! Static types of the visualisation language
//!
//! [`Type`] is the tag the analyser attaches to every expression. Data
//! structures carry their element type plus a [`DataStructureKind`] that keys
//! into the method tables in [`registry`].
//!
//! `Error` is the sentinel produced after a diagnostic has already been
//! recorded; it is compatible with every other type so a single fault yields a
//! single diagnostic.

pub mod registry;

use std::fmt;

pub use registry::{ConstructorMethod, DataStructureMethod};

/// Data-structure families known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataStructureKind {
    Stack,
    Array,
    List,
    Tree,
    Node,
}

impl DataStructureKind {
    pub const ALL: [DataStructureKind; 5] = [
        DataStructureKind::Stack,
        DataStructureKind::Array,
        DataStructureKind::List,
        DataStructureKind::Tree,
        DataStructureKind::Node,
    ];

    /// Name used in source text and in style configuration keys
    pub fn name(self) -> &'static str {
        match self {
            DataStructureKind::Stack => "Stack",
            DataStructureKind::Array => "Array",
            DataStructureKind::List => "List",
            DataStructureKind::Tree => "Tree",
            DataStructureKind::Node => "Node",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// A data-structure type: kind plus element type
#[derive(Debug, Clone, PartialEq)]
pub struct DataStructureType {
    pub kind: DataStructureKind,
    pub internal: Box<Type>,
}

impl DataStructureType {
    pub fn new(kind: DataStructureKind, internal: Type) -> Self {
        DataStructureType {
            kind,
            internal: Box::new(internal),
        }
    }

    /// Tree nodes may be null; every other container must hold a value
    pub fn is_nullable(&self) -> bool {
        self.kind == DataStructureKind::Node
    }

    /// `Array<Array<T>>`: a grid of `T` indexed by row then column
    pub fn is_2d(&self) -> bool {
        self.kind == DataStructureKind::Array
            && matches!(
                self.internal.as_ref(),
                Type::DataStructure(row) if row.kind == DataStructureKind::Array
            )
    }

    /// Type of the values stored in the cells; the rows' element type for 2D arrays
    pub fn element(&self) -> &Type {
        match self.internal.as_ref() {
            Type::DataStructure(row) if self.is_2d() => row.internal.as_ref(),
            internal => internal,
        }
    }

    /// Whether the element type is one this kind can hold
    pub fn has_valid_internal(&self) -> bool {
        match self.kind {
            DataStructureKind::Array if self.is_2d() => self.element().is_primitive(),
            DataStructureKind::Stack
            | DataStructureKind::Array
            | DataStructureKind::List
            | DataStructureKind::Node => self.internal.is_primitive(),
            DataStructureKind::Tree => matches!(
                self.internal.as_ref(),
                Type::DataStructure(node) if node.kind == DataStructureKind::Node
            ),
        }
    }
}

/// Static type of an expression or binding
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Number,
    Bool,
    Char,
    String,
    Void,
    Null,
    Error,
    DataStructure(DataStructureType),
}

impl Type {
    pub fn stack(internal: Type) -> Self {
        Type::DataStructure(DataStructureType::new(DataStructureKind::Stack, internal))
    }

    pub fn array(internal: Type) -> Self {
        Type::DataStructure(DataStructureType::new(DataStructureKind::Array, internal))
    }

    /// `Array<Array<internal>>`
    pub fn array_2d(internal: Type) -> Self {
        Type::array(Type::array(internal))
    }

    pub fn list(internal: Type) -> Self {
        Type::DataStructure(DataStructureType::new(DataStructureKind::List, internal))
    }

    pub fn node(internal: Type) -> Self {
        Type::DataStructure(DataStructureType::new(DataStructureKind::Node, internal))
    }

    /// `Tree<Node<internal>>`
    pub fn tree(internal: Type) -> Self {
        Type::DataStructure(DataStructureType::new(
            DataStructureKind::Tree,
            Type::node(internal),
        ))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Number | Type::Bool | Type::Char | Type::String)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Type::DataStructure(ds) if ds.is_nullable())
    }

    pub fn as_data_structure(&self) -> Option<&DataStructureType> {
        match self {
            Type::DataStructure(ds) => Some(ds),
            _ => None,
        }
    }

    /// Whether a value of type `other` may be stored where `self` is expected
    pub fn accepts(&self, other: &Type) -> bool {
        if self.is_error() || other.is_error() {
            return true;
        }
        self == other || (*other == Type::Null && self.is_nullable())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Number => write!(f, "number"),
            Type::Bool => write!(f, "boolean"),
            Type::Char => write!(f, "char"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
            Type::Error => write!(f, "error"),
            Type::DataStructure(ds) => write!(f, "{}<{}>", ds.kind.name(), ds.internal),
        }
    }
}
