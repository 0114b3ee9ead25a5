// Animation instruction stream produced by the virtual machine

pub mod boundary;
pub mod names;

use crate::style::{Corners, ResolvedStyle};

/// Which child slot of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Kind-specific payload of one animation step
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionKind {
    // Code and variable display
    CodeBlock {
        lines: Vec<String>,
        highlighting: Option<String>, // pygments style when highlighting is on
        tab_spacing: u32,
        boundary: Option<Corners>,
    },
    VariableBlock {
        boundary: Option<Corners>,
    },
    MoveToLine {
        line: usize,
    },
    UpdateVariables {
        entries: Vec<String>,
    },
    Subtitle {
        text: String,
        boundary: Option<Corners>,
    },
    Sleep,

    // Stack
    ConstructStack {
        ident: String,
        uid: String,
        label: Option<String>,
        style: ResolvedStyle,
        boundary: Option<Corners>,
    },
    CreateBlock {
        ident: String,
        text: String,
        stack: String,
        border_color: String,
        text_color: String,
    },
    StackPush {
        block: String,
        stack: String,
        reused: bool,
        creation_style: String,
    },
    StackPop {
        block: String,
        stack: String,
        keep_block: bool, // block is handed to another call
    },
    RestyleBlock {
        block: String,
        border_color: Option<String>,
        text_color: Option<String>,
    },

    // Array and list
    ConstructArray {
        ident: String,
        uid: String,
        label: Option<String>,
        values: Vec<String>,
        style: ResolvedStyle,
        boundary: Option<Corners>,
    },
    ArrayElemAssign {
        array: String,
        index: usize,
        value: String,
    },
    ArrayElemRestyle {
        array: String,
        indices: Vec<usize>,
        border_color: Option<String>,
        text_color: Option<String>,
        pointer: bool,
    },
    ArraySwap {
        array: String,
        first: usize,
        second: usize,
        fade: bool,
    },
    ArrayRerender {
        array: String,
        values: Vec<String>,
    },

    // 2D array; cells are (row, column)
    ConstructArray2D {
        ident: String,
        uid: String,
        label: Option<String>,
        rows: Vec<Vec<String>>,
        style: ResolvedStyle,
        boundary: Option<Corners>,
    },
    Array2DElemAssign {
        array: String,
        row: usize,
        column: usize,
        value: String,
    },
    Array2DElemRestyle {
        array: String,
        cells: Vec<(usize, usize)>,
        border_color: Option<String>,
        text_color: Option<String>,
        pointer: bool,
    },
    Array2DSwap {
        array: String,
        first: (usize, usize),
        second: (usize, usize),
    },

    // Tree
    ConstructNode {
        ident: String,
        value: String,
    },
    ConstructTree {
        ident: String,
        uid: String,
        label: Option<String>,
        root: String,
        style: ResolvedStyle,
        boundary: Option<Corners>,
    },
    CheckBoundary {
        tree: String,
        uid: String,
        size: usize,
    },
    TreeAppend {
        tree: String,
        parent: String,
        child: String,
        side: Side,
    },
    NodeAppend {
        parent: String,
        child: String,
        side: Side,
    },
    TreeDeleteChild {
        tree: String,
        parent: String,
        side: Side,
    },
    TreeEditValue {
        tree: String,
        node: String,
        value: String,
    },
    TreeNodeRestyle {
        node: String,
        border_color: Option<String>,
        text_color: Option<String>,
        highlight: Option<String>,
    },

    CleanUpLocals {
        idents: Vec<String>,
    },
}

/// One animation step
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub duration: f64,
    pub visible: bool,
    pub kind: InstructionKind,
}

impl Instruction {
    pub fn new(kind: InstructionKind, duration: f64, visible: bool) -> Self {
        Instruction {
            duration,
            visible,
            kind,
        }
    }

    /// Instance id of a construct instruction
    pub fn uid(&self) -> Option<&str> {
        match &self.kind {
            InstructionKind::ConstructStack { uid, .. }
            | InstructionKind::ConstructArray { uid, .. }
            | InstructionKind::ConstructArray2D { uid, .. }
            | InstructionKind::ConstructTree { uid, .. } => Some(uid),
            _ => None,
        }
    }

    /// Whether this step changes the logical contents of a data structure
    pub fn is_mutation(&self) -> bool {
        matches!(
            self.kind,
            InstructionKind::ConstructStack { .. }
                | InstructionKind::StackPush { .. }
                | InstructionKind::StackPop { .. }
                | InstructionKind::ConstructArray { .. }
                | InstructionKind::ArrayElemAssign { .. }
                | InstructionKind::ArraySwap { .. }
                | InstructionKind::ArrayRerender { .. }
                | InstructionKind::ConstructArray2D { .. }
                | InstructionKind::Array2DElemAssign { .. }
                | InstructionKind::Array2DSwap { .. }
                | InstructionKind::ConstructTree { .. }
                | InstructionKind::TreeAppend { .. }
                | InstructionKind::NodeAppend { .. }
                | InstructionKind::TreeDeleteChild { .. }
                | InstructionKind::TreeEditValue { .. }
        )
    }
}

/// Ordered, append-only output of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionStream {
    instructions: Vec<Instruction>,
}

impl InstructionStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Total animation time
    pub fn duration(&self) -> f64 {
        self.instructions.iter().map(|i| i.duration).sum()
    }
}

impl From<Vec<Instruction>> for InstructionStream {
    fn from(instructions: Vec<Instruction>) -> Self {
        InstructionStream { instructions }
    }
}

impl<'a> IntoIterator for &'a InstructionStream {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
