//! Method tables for every data-structure kind
//!
//! Tables are `'static` and describe argument and return types in terms of
//! [`Slot`]s, which are resolved against a concrete element type on lookup.
//! Adding a kind means adding one [`DataStructureKind`] variant and one
//! [`KindTable`] here.

use super::{DataStructureKind, DataStructureType, Type};

/// Type position in a method signature, relative to the owning container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Number,
    Bool,
    Void,
    /// The container's element type
    Element,
    /// The container type itself (`Node.left` returns another node)
    Container,
}

struct MethodEntry {
    name: &'static str,
    returns: Slot,
    arguments: &'static [(Slot, bool)], // (type, required)
    varargs: bool,
}

struct KindTable {
    methods: &'static [MethodEntry],
    constructor: MethodEntry,
    min_required_without_initialiser: usize,
    /// Supports `x[i]` element access
    indexable: bool,
    /// Accepts a `{...}` initial-value list after the constructor call
    initialisable: bool,
}

const STACK: KindTable = KindTable {
    methods: &[
        MethodEntry {
            name: "push",
            returns: Slot::Void,
            arguments: &[(Slot::Element, true)],
            varargs: false,
        },
        MethodEntry {
            name: "pop",
            returns: Slot::Element,
            arguments: &[],
            varargs: false,
        },
        MethodEntry {
            name: "peek",
            returns: Slot::Element,
            arguments: &[],
            varargs: false,
        },
        MethodEntry {
            name: "isEmpty",
            returns: Slot::Bool,
            arguments: &[],
            varargs: false,
        },
        MethodEntry {
            name: "size",
            returns: Slot::Number,
            arguments: &[],
            varargs: false,
        },
    ],
    constructor: MethodEntry {
        name: "Stack",
        returns: Slot::Container,
        arguments: &[],
        varargs: false,
    },
    min_required_without_initialiser: 0,
    indexable: false,
    initialisable: true,
};

const ARRAY: KindTable = KindTable {
    methods: &[
        MethodEntry {
            name: "size",
            returns: Slot::Number,
            arguments: &[],
            varargs: false,
        },
        MethodEntry {
            name: "swap",
            returns: Slot::Void,
            arguments: &[(Slot::Number, true), (Slot::Number, true), (Slot::Bool, false)],
            varargs: false,
        },
        MethodEntry {
            name: "contains",
            returns: Slot::Bool,
            arguments: &[(Slot::Element, true)],
            varargs: false,
        },
    ],
    constructor: MethodEntry {
        name: "Array",
        returns: Slot::Container,
        arguments: &[(Slot::Number, false)],
        varargs: false,
    },
    min_required_without_initialiser: 1,
    indexable: true,
    initialisable: true,
};

/// `Array<Array<T>>`: `size` counts rows and `swap` takes two row/column pairs
const ARRAY_2D: KindTable = KindTable {
    methods: &[
        MethodEntry {
            name: "size",
            returns: Slot::Number,
            arguments: &[],
            varargs: false,
        },
        MethodEntry {
            name: "swap",
            returns: Slot::Void,
            arguments: &[
                (Slot::Number, true),
                (Slot::Number, true),
                (Slot::Number, true),
                (Slot::Number, true),
            ],
            varargs: false,
        },
        MethodEntry {
            name: "contains",
            returns: Slot::Bool,
            arguments: &[(Slot::Element, true)],
            varargs: false,
        },
    ],
    constructor: MethodEntry {
        name: "Array",
        returns: Slot::Container,
        arguments: &[(Slot::Number, false), (Slot::Number, false)],
        varargs: false,
    },
    min_required_without_initialiser: 2,
    indexable: true,
    initialisable: true,
};

const LIST: KindTable = KindTable {
    methods: &[
        MethodEntry {
            name: "size",
            returns: Slot::Number,
            arguments: &[],
            varargs: false,
        },
        MethodEntry {
            name: "prepend",
            returns: Slot::Void,
            arguments: &[(Slot::Element, true)],
            varargs: false,
        },
        MethodEntry {
            name: "append",
            returns: Slot::Void,
            arguments: &[(Slot::Element, true)],
            varargs: false,
        },
        MethodEntry {
            name: "contains",
            returns: Slot::Bool,
            arguments: &[(Slot::Element, true)],
            varargs: false,
        },
    ],
    constructor: MethodEntry {
        name: "List",
        returns: Slot::Container,
        arguments: &[(Slot::Element, false)],
        varargs: true,
    },
    min_required_without_initialiser: 0,
    indexable: true,
    initialisable: true,
};

const TREE: KindTable = KindTable {
    methods: &[MethodEntry {
        name: "root",
        returns: Slot::Element,
        arguments: &[],
        varargs: false,
    }],
    constructor: MethodEntry {
        name: "Tree",
        returns: Slot::Container,
        arguments: &[(Slot::Element, true)],
        varargs: false,
    },
    min_required_without_initialiser: 1,
    indexable: false,
    initialisable: false,
};

const NODE: KindTable = KindTable {
    methods: &[
        MethodEntry {
            name: "left",
            returns: Slot::Container,
            arguments: &[],
            varargs: false,
        },
        MethodEntry {
            name: "right",
            returns: Slot::Container,
            arguments: &[],
            varargs: false,
        },
        MethodEntry {
            name: "value",
            returns: Slot::Element,
            arguments: &[],
            varargs: false,
        },
    ],
    constructor: MethodEntry {
        name: "Node",
        returns: Slot::Container,
        arguments: &[(Slot::Element, true)],
        varargs: false,
    },
    min_required_without_initialiser: 1,
    indexable: false,
    initialisable: false,
};

fn table(ty: &DataStructureType) -> &'static KindTable {
    match ty.kind {
        DataStructureKind::Stack => &STACK,
        DataStructureKind::Array if ty.is_2d() => &ARRAY_2D,
        DataStructureKind::Array => &ARRAY,
        DataStructureKind::List => &LIST,
        DataStructureKind::Tree => &TREE,
        DataStructureKind::Node => &NODE,
    }
}

/// A method signature resolved against a concrete element type
#[derive(Debug, Clone, PartialEq)]
pub struct DataStructureMethod {
    pub name: &'static str,
    pub return_type: Type,
    pub arguments: Vec<(Type, bool)>,
    pub varargs: bool,
}

impl DataStructureMethod {
    /// Sentinel returned for unknown method names
    pub fn error() -> Self {
        DataStructureMethod {
            name: "",
            return_type: Type::Error,
            arguments: Vec::new(),
            varargs: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.return_type.is_error() && self.name.is_empty()
    }

    pub fn required_arguments(&self) -> usize {
        self.arguments.iter().filter(|(_, required)| *required).count()
    }

    /// Whether `count` arguments fit the required/optional/varargs shape
    pub fn accepts_arity(&self, count: usize) -> bool {
        if count < self.required_arguments() {
            return false;
        }
        if self.arguments.is_empty() {
            return count == 0;
        }
        self.varargs || count <= self.arguments.len()
    }

    /// Expected type of the argument at `index`; varargs repeat the last slot
    pub fn argument_type(&self, index: usize) -> Option<&Type> {
        match self.arguments.get(index) {
            Some((ty, _)) => Some(ty),
            None if self.varargs => self.arguments.last().map(|(ty, _)| ty),
            None => None,
        }
    }
}

/// Constructor signature plus the initial-value list rule
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorMethod {
    pub method: DataStructureMethod,
    /// Arguments required when no initial-value list follows the call
    pub min_required_without_initialiser: usize,
}

impl DataStructureType {
    fn resolve(&self, slot: Slot) -> Type {
        match slot {
            Slot::Number => Type::Number,
            Slot::Bool => Type::Bool,
            Slot::Void => Type::Void,
            Slot::Element => self.element().clone(),
            Slot::Container => Type::DataStructure(self.clone()),
        }
    }

    fn materialise(&self, entry: &MethodEntry) -> DataStructureMethod {
        DataStructureMethod {
            name: entry.name,
            return_type: self.resolve(entry.returns),
            arguments: entry
                .arguments
                .iter()
                .map(|&(slot, required)| (self.resolve(slot), required))
                .collect(),
            varargs: entry.varargs,
        }
    }

    pub fn contains_method(&self, name: &str) -> bool {
        table(self).methods.iter().any(|m| m.name == name)
    }

    /// Resolved signature, or [`DataStructureMethod::error`] for unknown names
    pub fn method_by_name(&self, name: &str) -> DataStructureMethod {
        table(self)
            .methods
            .iter()
            .find(|m| m.name == name)
            .map(|entry| self.materialise(entry))
            .unwrap_or_else(DataStructureMethod::error)
    }

    pub fn is_indexable(&self) -> bool {
        table(self).indexable
    }

    pub fn is_initialisable(&self) -> bool {
        table(self).initialisable
    }

    pub fn constructor(&self) -> ConstructorMethod {
        let table = table(self);
        ConstructorMethod {
            method: self.materialise(&table.constructor),
            min_required_without_initialiser: table.min_required_without_initialiser,
        }
    }
}
