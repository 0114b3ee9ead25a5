//! Layout boundaries
//!
//! While executing, each data structure records the shape of the region it
//! will need and the largest element count it reached. An external layout
//! step turns those shapes into corner points, and
//! [`InstructionStream::with_boundaries`] writes them into the construct
//! instructions as a second pass, producing a new stream.

use super::{Instruction, InstructionKind, InstructionStream};
use crate::style::Corners;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Grows vertically (stacks)
    Tall,
    /// Grows horizontally (arrays and lists)
    Wide,
    /// Grows in both directions (trees and 2D arrays)
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryShape {
    pub kind: ShapeKind,
    pub max_size: usize,
}

impl BoundaryShape {
    pub fn new(kind: ShapeKind, size: usize) -> Self {
        BoundaryShape {
            kind,
            max_size: size,
        }
    }

    /// Record that the structure now holds `size` elements
    pub fn reach(&mut self, size: usize) {
        self.max_size = self.max_size.max(size);
    }
}

/// Boundary requirements keyed by instance id
pub type BoundaryMap = FxHashMap<String, BoundaryShape>;

impl InstructionStream {
    /// A copy of this stream in which every construct instruction whose uid
    /// appears in `computed` carries the computed corners
    pub fn with_boundaries(&self, computed: &FxHashMap<String, Corners>) -> InstructionStream {
        self.iter()
            .map(|instruction| match instruction.uid().and_then(|uid| computed.get(uid)) {
                Some(corners) => patched(instruction, *corners),
                None => instruction.clone(),
            })
            .collect::<Vec<_>>()
            .into()
    }
}

fn patched(instruction: &Instruction, corners: Corners) -> Instruction {
    let mut instruction = instruction.clone();
    match &mut instruction.kind {
        InstructionKind::ConstructStack { boundary, .. }
        | InstructionKind::ConstructArray { boundary, .. }
        | InstructionKind::ConstructArray2D { boundary, .. }
        | InstructionKind::ConstructTree { boundary, .. } => *boundary = Some(corners),
        _ => {}
    }
    instruction
}
