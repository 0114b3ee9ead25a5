//! State shared between the virtual machine and the data-structure executors
//!
//! Executors are stateless; everything they read or write during a call
//! lives in [`ExecContext`]: the output stream, the boundary map, the
//! identifier generator and the style resolver.
//!
//! Steps with no configured timing take [`ExecContext::default_duration`],
//! which `@speed` blocks scale through a stack of time multipliers.

use crate::ast::Line;
use crate::instructions::boundary::{BoundaryMap, BoundaryShape};
use crate::instructions::names::NameGenerator;
use crate::instructions::{Instruction, InstructionKind, InstructionStream};
use crate::interpreter::constants::DEFAULT_ANIMATION_DURATION;
use crate::interpreter::errors::RuntimeError;
use crate::style::{Corners, ResolvedAnimation, StyleResolver};
use rustc_hash::FxHashSet;

#[derive(Debug, Default)]
pub struct ExecContext {
    pub instructions: InstructionStream,
    pub boundaries: BoundaryMap,
    pub names: NameGenerator,
    pub styles: StyleResolver,
    /// Line of the statement being executed
    pub line: Line,
    data_structure_count: usize,
    /// One multiplier per enclosing `@speed` block, innermost last
    time_scales: Vec<f64>,
}

impl ExecContext {
    /// `reserved` holds the program's own variable names, which generated
    /// identifiers must avoid
    pub fn new(styles: StyleResolver, reserved: FxHashSet<String>) -> Self {
        ExecContext {
            instructions: InstructionStream::new(),
            boundaries: BoundaryMap::default(),
            names: NameGenerator::new(reserved),
            styles,
            line: 0,
            data_structure_count: 0,
            time_scales: Vec::new(),
        }
    }

    pub fn emit(&mut self, kind: InstructionKind, duration: f64, visible: bool) {
        self.instructions.push(Instruction::new(kind, duration, visible));
    }

    /// Duration of an animation step for an instance with `animated` style
    pub fn duration(&self, animated: Option<&ResolvedAnimation>) -> f64 {
        animated
            .and_then(|a| a.animation_time)
            .unwrap_or_else(|| self.default_duration())
    }

    pub fn default_duration(&self) -> f64 {
        DEFAULT_ANIMATION_DURATION * self.time_scale()
    }

    /// Multiplier applied to untimed steps; 1 outside any speed block
    pub fn time_scale(&self) -> f64 {
        self.time_scales.last().copied().unwrap_or(1.0)
    }

    pub fn push_time_scale(&mut self, scale: f64) {
        self.time_scales.push(scale);
    }

    pub fn pop_time_scale(&mut self) {
        self.time_scales.pop();
    }

    /// Corners of a user-placed element; an error when positions are
    /// configured but none names `uid`
    pub fn placement(&self, uid: &str) -> Result<Option<Corners>, RuntimeError> {
        match self.styles.position(uid) {
            Some(position) => Ok(Some(position.corners())),
            None if self.styles.config().has_user_positions() => Err(RuntimeError::MissingPosition {
                uid: uid.to_string(),
                line: self.line,
            }),
            None => Ok(None),
        }
    }

    /// Count a new data-structure instance and record its boundary shape.
    /// Returns its user-supplied corners, if any.
    pub fn register_instance(
        &mut self,
        uid: &str,
        shape: BoundaryShape,
    ) -> Result<Option<Corners>, RuntimeError> {
        let limit = self.styles.config().max_data_structures;
        if self.data_structure_count >= limit {
            return Err(RuntimeError::TooManyDataStructures {
                limit,
                line: self.line,
            });
        }
        let corners = self.placement(uid)?;
        self.data_structure_count += 1;
        self.boundaries
            .entry(uid.to_string())
            .and_modify(|existing| existing.reach(shape.max_size))
            .or_insert(shape);
        tracing::debug!(uid, count = self.data_structure_count, "data structure registered");
        Ok(corners)
    }

    /// Record that instance `uid` now holds `size` elements
    pub fn reach(&mut self, uid: &str, size: usize) {
        if let Some(shape) = self.boundaries.get_mut(uid) {
            shape.reach(size);
        }
    }
}
